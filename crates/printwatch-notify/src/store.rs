//! Collaborator traits for external persistence and scheduling.
//!
//! The engine never owns storage or the task queue: the web application
//! implements [`SettingsStore`] over its database and [`TaskScheduler`]
//! over its queue transport, and injects both.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use printwatch_types::{EventPayload, ExtraContext, Feature, NotificationSetting, NotifyError};

/// Which boolean flag a settings query filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingFlag {
    /// The dedicated failure-alert flag.
    FailureAlert,
    /// The per-feature toggle.
    Feature(Feature),
}

/// Whether `setting` has the flag selected by `flag` turned on.
///
/// Shared by in-memory stores and tests so that every implementation
/// filters identically.
pub fn flag_enabled(setting: &NotificationSetting, flag: SettingFlag) -> bool {
    match flag {
        SettingFlag::FailureAlert => setting.notify_on_failure_alert,
        SettingFlag::Feature(feature) => setting.feature_enabled(feature),
    }
}

/// Read-only access to notification settings.
///
/// Result order is undefined but must be stable within one query.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// All settings of `user_id` that are enabled, belong to a plugin in
    /// `plugin_names`, and have `flag` turned on.
    async fn enabled_settings(
        &self,
        user_id: i64,
        plugin_names: &[String],
        flag: SettingFlag,
    ) -> Result<Vec<NotificationSetting>, NotifyError>;

    /// Whether at least one setting matches the same filter.
    async fn has_enabled_settings(
        &self,
        user_id: i64,
        plugin_names: &[String],
        flag: SettingFlag,
    ) -> Result<bool, NotifyError> {
        Ok(!self
            .enabled_settings(user_id, plugin_names, flag)
            .await?
            .is_empty())
    }
}

/// A deferred printer-notification dispatch, as placed on the queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrinterNotificationTask {
    pub event_name: String,
    pub event_payload: EventPayload,
    pub printer_id: i64,
    pub print_id: Option<i64>,
    pub poster_url: String,
    pub extra_context: ExtraContext,
}

/// The background task queue the web layer hands events to.
#[async_trait]
pub trait TaskScheduler: Send + Sync {
    /// Enqueue an asynchronous printer-notification dispatch.
    async fn enqueue_printer_notifications(
        &self,
        task: PrinterNotificationTask,
    ) -> Result<(), NotifyError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setting(failure: bool, done: bool) -> NotificationSetting {
        NotificationSetting {
            id: 1,
            user_id: 1,
            name: "webhook".into(),
            enabled: true,
            config: serde_json::json!({}),
            notify_on_failure_alert: failure,
            notify_on_print_done: done,
            notify_on_print_cancelled: false,
            notify_on_filament_change: false,
            notify_on_heater_status: false,
            notify_on_other_events: false,
        }
    }

    #[test]
    fn flag_enabled_selects_the_right_field() {
        let s = setting(true, false);
        assert!(flag_enabled(&s, SettingFlag::FailureAlert));
        assert!(!flag_enabled(
            &s,
            SettingFlag::Feature(Feature::NotifyOnPrintDone)
        ));

        let s = setting(false, true);
        assert!(!flag_enabled(&s, SettingFlag::FailureAlert));
        assert!(flag_enabled(
            &s,
            SettingFlag::Feature(Feature::NotifyOnPrintDone)
        ));
    }

    #[test]
    fn task_roundtrips_through_json() {
        let task = PrinterNotificationTask {
            event_name: "PrintDone".into(),
            event_payload: EventPayload::new(),
            printer_id: 7,
            print_id: Some(42),
            poster_url: String::new(),
            extra_context: ExtraContext::new(),
        };
        let json = serde_json::to_string(&task).unwrap();
        let back: PrinterNotificationTask = serde_json::from_str(&json).unwrap();
        assert_eq!(back.printer_id, 7);
        assert_eq!(back.print_id, Some(42));
    }
}
