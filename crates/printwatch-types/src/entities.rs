//! Read-only snapshots of the persisted domain records.
//!
//! The dispatch engine never mutates these; they are loaded by the web /
//! worker layers and handed in by reference. Identifiers are the numeric
//! database keys of the backing store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::feature::Feature;

/// An account that owns printers and notification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Database key.
    pub id: i64,
    /// Account email address.
    pub email: String,
    /// Given name, may be empty.
    pub first_name: String,
    /// Family name, may be empty.
    pub last_name: String,
    /// Whether the account is on the paid tier.
    pub is_pro: bool,
}

/// What the printer does when a failure is detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureAction {
    /// Alert only.
    DoNothing,
    /// Pause the print and alert.
    Pause,
}

/// A monitored printer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Printer {
    /// Database key.
    pub id: i64,
    /// Owning user's database key.
    pub user_id: i64,
    /// Display name.
    pub name: String,
    /// Configured response to a detected failure.
    pub action_on_failure: FailureAction,
    /// Whether failure detection is enabled for this printer.
    pub watching_enabled: bool,
}

/// One print job on a printer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintJob {
    /// Database key.
    pub id: i64,
    /// Printer this job ran on.
    pub printer_id: i64,
    /// G-code file name.
    pub filename: String,
    /// When the job started.
    pub started_at: Option<DateTime<Utc>>,
    /// When the first failure alert for this job fired, if any.
    pub alerted_at: Option<DateTime<Utc>>,
    /// When the job finished successfully.
    pub finished_at: Option<DateTime<Utc>>,
    /// When the job was cancelled.
    pub cancelled_at: Option<DateTime<Utc>>,
    /// User verdict on the last alert ("NOT_FAILED" etc.), empty if none.
    #[serde(default)]
    pub alert_overwrite: String,
}

impl PrintJob {
    /// When the job ended, whichever way it ended.
    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at.or(self.cancelled_at)
    }
}

/// Per-user, per-plugin notification configuration.
///
/// One row per (user, plugin) pair. Queried, never mutated, by the
/// dispatch engine. `config` is an opaque blob interpreted only by the
/// named plugin's factory and channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationSetting {
    /// Database key.
    pub id: i64,
    /// Owning user's database key.
    pub user_id: i64,
    /// Plugin name this setting configures (registry key).
    pub name: String,
    /// Master switch for this plugin.
    pub enabled: bool,
    /// Opaque channel configuration blob.
    #[serde(default)]
    pub config: serde_json::Value,
    /// Receive failure alerts.
    pub notify_on_failure_alert: bool,
    /// Receive "print done / failed" notifications.
    pub notify_on_print_done: bool,
    /// Receive "print cancelled" notifications.
    pub notify_on_print_cancelled: bool,
    /// Receive filament-change notifications.
    pub notify_on_filament_change: bool,
    /// Receive heater status notifications.
    pub notify_on_heater_status: bool,
    /// Receive remaining lifecycle notifications.
    pub notify_on_other_events: bool,
}

impl NotificationSetting {
    /// Whether the per-user toggle for `feature` is on.
    ///
    /// A fixed lookup table; the original implementation resolved the
    /// flag by reading an attribute named after the feature at runtime.
    pub fn feature_enabled(&self, feature: Feature) -> bool {
        match feature {
            Feature::NotifyOnPrintDone => self.notify_on_print_done,
            Feature::NotifyOnPrintCancelled => self.notify_on_print_cancelled,
            Feature::NotifyOnFilamentChange => self.notify_on_filament_change,
            Feature::NotifyOnHeaterStatus => self.notify_on_heater_status,
            Feature::NotifyOnOtherEvents => self.notify_on_other_events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setting() -> NotificationSetting {
        NotificationSetting {
            id: 1,
            user_id: 10,
            name: "webhook".into(),
            enabled: true,
            config: serde_json::json!({}),
            notify_on_failure_alert: true,
            notify_on_print_done: true,
            notify_on_print_cancelled: false,
            notify_on_filament_change: false,
            notify_on_heater_status: true,
            notify_on_other_events: false,
        }
    }

    #[test]
    fn feature_flags_map_to_fields() {
        let s = setting();
        assert!(s.feature_enabled(Feature::NotifyOnPrintDone));
        assert!(!s.feature_enabled(Feature::NotifyOnPrintCancelled));
        assert!(!s.feature_enabled(Feature::NotifyOnFilamentChange));
        assert!(s.feature_enabled(Feature::NotifyOnHeaterStatus));
        assert!(!s.feature_enabled(Feature::NotifyOnOtherEvents));
    }

    #[test]
    fn ended_at_prefers_finished() {
        let now = Utc::now();
        let earlier = now - chrono::Duration::minutes(5);
        let job = PrintJob {
            id: 7,
            printer_id: 3,
            filename: "benchy.gcode".into(),
            started_at: Some(earlier),
            alerted_at: None,
            finished_at: Some(now),
            cancelled_at: Some(earlier),
            alert_overwrite: String::new(),
        };
        assert_eq!(job.ended_at(), Some(now));

        let running = PrintJob {
            finished_at: None,
            cancelled_at: None,
            ..job
        };
        assert_eq!(running.ended_at(), None);
    }

    #[test]
    fn setting_roundtrips_through_json() {
        let s = setting();
        let json = serde_json::to_string(&s).unwrap();
        let back: NotificationSetting = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, "webhook");
        assert!(back.feature_enabled(Feature::NotifyOnHeaterStatus));
    }
}
