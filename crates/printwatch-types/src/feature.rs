//! The [`Feature`] enumeration.
//!
//! A `Feature` is one class of printer event a user can opt into per
//! channel. It doubles as the capability tag a channel declares via
//! `supported_features()` and as the toggle key on a
//! [`NotificationSetting`](crate::entities::NotificationSetting).

use serde::{Deserialize, Serialize};

/// A notification capability / per-user toggle.
///
/// The set is closed: failure alerts are handled by a dedicated flag on
/// the notification setting rather than a `Feature` variant, and print
/// progress is reserved until progress notifications get their own
/// throttling story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Print finished or failed terminally.
    NotifyOnPrintDone,
    /// Print cancelled by the user.
    NotifyOnPrintCancelled,
    /// Printer paused for a filament change.
    NotifyOnFilamentChange,
    /// Heater cooled down or reached its target temperature.
    NotifyOnHeaterStatus,
    /// Remaining lifecycle events (started, paused, resumed).
    NotifyOnOtherEvents,
}

impl Feature {
    /// All features, in a stable order.
    pub const ALL: [Feature; 5] = [
        Feature::NotifyOnPrintDone,
        Feature::NotifyOnPrintCancelled,
        Feature::NotifyOnFilamentChange,
        Feature::NotifyOnHeaterStatus,
        Feature::NotifyOnOtherEvents,
    ];

    /// The snake_case name of this feature, matching its serde form.
    pub fn name(&self) -> &'static str {
        match self {
            Feature::NotifyOnPrintDone => "notify_on_print_done",
            Feature::NotifyOnPrintCancelled => "notify_on_print_cancelled",
            Feature::NotifyOnFilamentChange => "notify_on_filament_change",
            Feature::NotifyOnHeaterStatus => "notify_on_heater_status",
            Feature::NotifyOnOtherEvents => "notify_on_other_events",
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&Feature::NotifyOnPrintDone).unwrap();
        assert_eq!(json, "\"notify_on_print_done\"");

        let back: Feature = serde_json::from_str("\"notify_on_heater_status\"").unwrap();
        assert_eq!(back, Feature::NotifyOnHeaterStatus);
    }

    #[test]
    fn display_matches_serde_name() {
        for feature in Feature::ALL {
            let json = serde_json::to_string(&feature).unwrap();
            assert_eq!(json, format!("\"{feature}\""));
        }
    }

    #[test]
    fn all_contains_every_variant_once() {
        use std::collections::HashSet;
        let set: HashSet<Feature> = Feature::ALL.into_iter().collect();
        assert_eq!(set.len(), Feature::ALL.len());
    }
}
