//! Printer lifecycle event names and payload aliases.
//!
//! Event names are plain strings on the wire; the constants here are the
//! full set the monitoring agent emits. Routing from an event name to the
//! [`Feature`](crate::Feature) it requires lives in `printwatch-notify`.

use std::collections::HashMap;

/// Print finished successfully.
pub const PRINT_DONE: &str = "PrintDone";
/// Print failed terminally (detector verdict or firmware error).
pub const PRINT_FAILED: &str = "PrintFailed";
/// Print cancelled by the user.
pub const PRINT_CANCELLED: &str = "PrintCancelled";
/// Print started.
pub const PRINT_STARTED: &str = "PrintStarted";
/// Print paused.
pub const PRINT_PAUSED: &str = "PrintPaused";
/// Print resumed after a pause.
pub const PRINT_RESUMED: &str = "PrintResumed";
/// Printer paused waiting for a filament change.
pub const FILAMENT_CHANGE: &str = "FilamentChange";
/// A heater cooled below its threshold.
pub const HEATER_COOLED_DOWN: &str = "HeaterCooledDown";
/// A heater reached its target temperature.
pub const HEATER_TARGET_REACHED: &str = "HeaterTargetReached";
/// Periodic progress report. Not dispatchable yet: progress needs its own
/// feature flag and per-plugin throttling before it can ship.
pub const PRINT_PROGRESS: &str = "PrintProgress";

/// Lifecycle events covered by the catch-all
/// [`Feature::NotifyOnOtherEvents`](crate::Feature::NotifyOnOtherEvents).
pub const OTHER_PRINT_EVENTS: [&str; 3] = [PRINT_STARTED, PRINT_PAUSED, PRINT_RESUMED];

/// Free-form, string-keyed event payload attached to a printer event.
pub type EventPayload = HashMap<String, serde_json::Value>;

/// Channel-specific extra context, populated by each plugin's context
/// hook before its own invocation.
pub type ExtraContext = HashMap<String, serde_json::Value>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn other_events_do_not_overlap_routed_events() {
        for name in OTHER_PRINT_EVENTS {
            assert_ne!(name, PRINT_DONE);
            assert_ne!(name, PRINT_FAILED);
            assert_ne!(name, PRINT_CANCELLED);
            assert_ne!(name, FILAMENT_CHANGE);
            assert_ne!(name, PRINT_PROGRESS);
        }
    }
}
