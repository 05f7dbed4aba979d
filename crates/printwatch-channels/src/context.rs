//! Dispatch context types handed to channels.
//!
//! The three snapshot structs ([`UserContext`], [`PrinterContext`],
//! [`PrintContext`]) are immutable projections of the domain entities,
//! built fresh for each dispatch call and shared across all eligible
//! settings via `Arc`. The per-channel context variants wrap them
//! together with the setting's config blob and the channel-specific
//! extra context.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use printwatch_types::entities::{FailureAction, PrintJob, Printer, User};
use printwatch_types::{EventPayload, ExtraContext};

use crate::poster::PosterFetcher;

/// Snapshot of the user receiving the notification.
#[derive(Debug, Clone)]
pub struct UserContext {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_pro: bool,
}

impl From<&User> for UserContext {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            is_pro: user.is_pro,
        }
    }
}

/// Snapshot of the printer the event belongs to.
#[derive(Debug, Clone)]
pub struct PrinterContext {
    pub id: i64,
    pub name: String,
    /// Whether the printer is configured to pause on detected failure.
    pub pause_on_failure: bool,
    /// Whether failure detection is enabled.
    pub watching_enabled: bool,
}

impl From<&Printer> for PrinterContext {
    fn from(printer: &Printer) -> Self {
        Self {
            id: printer.id,
            name: printer.name.clone(),
            pause_on_failure: printer.action_on_failure == FailureAction::Pause,
            watching_enabled: printer.watching_enabled,
        }
    }
}

/// Snapshot of the print job, plus the lazy poster accessor.
///
/// `id` is 0 and the string fields are empty when the event carries no
/// job (e.g. an idle-printer heater event). The [`PosterFetcher`] is
/// primed by the context builder before the context reaches a channel;
/// channels call [`PosterFetcher::get`] on demand.
#[derive(Debug)]
pub struct PrintContext {
    pub id: i64,
    pub filename: String,
    /// Public URL of the preview image, may be empty.
    pub poster_url: String,
    pub started_at: Option<DateTime<Utc>>,
    pub alerted_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    /// User verdict on the last alert, empty if none.
    pub alert_overwrite: String,
    /// Memoized accessor for the preview image bytes.
    pub poster: PosterFetcher,
}

impl PrintContext {
    /// Build the snapshot from an optional job.
    pub fn new(print: Option<&PrintJob>, poster_url: &str, poster: PosterFetcher) -> Self {
        Self {
            id: print.map_or(0, |p| p.id),
            filename: print.map_or_else(String::new, |p| p.filename.clone()),
            poster_url: poster_url.to_owned(),
            started_at: print.and_then(|p| p.started_at),
            alerted_at: print.and_then(|p| p.alerted_at),
            ended_at: print.and_then(|p| p.ended_at()),
            alert_overwrite: print.map_or_else(String::new, |p| p.alert_overwrite.clone()),
            poster,
        }
    }
}

/// Payload for a failure alert invocation.
#[derive(Debug, Clone)]
pub struct FailureAlertContext {
    /// The setting's opaque channel configuration.
    pub config: serde_json::Value,
    pub user: Arc<UserContext>,
    pub printer: Arc<PrinterContext>,
    pub print: Arc<PrintContext>,
    /// Whether the hosting site is reachable from the public internet
    /// (controls whether links/images can be embedded).
    pub site_is_public: bool,
    /// Low-confidence detection vs. confirmed failure.
    pub is_warning: bool,
    /// Whether the print was paused by the failure action.
    pub print_paused: bool,
    /// Channel-specific extra context, populated per channel.
    pub extra_context: ExtraContext,
}

/// Payload for a printer lifecycle notification invocation.
#[derive(Debug, Clone)]
pub struct PrinterNotificationContext {
    pub config: serde_json::Value,
    pub user: Arc<UserContext>,
    pub printer: Arc<PrinterContext>,
    pub print: Arc<PrintContext>,
    pub site_is_public: bool,
    /// Symbolic event name (see `printwatch_types::event`).
    pub event_name: String,
    /// Free-form event payload from the monitoring agent.
    pub event_payload: EventPayload,
    pub extra_context: ExtraContext,
}

/// Payload for an interactive configuration test.
#[derive(Debug, Clone)]
pub struct TestMessageContext {
    pub config: serde_json::Value,
    pub user: UserContext,
    pub site_is_public: bool,
    pub extra_context: ExtraContext,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn printer_context_computes_pause_flag() {
        let printer = Printer {
            id: 4,
            user_id: 9,
            name: "ender".into(),
            action_on_failure: FailureAction::Pause,
            watching_enabled: false,
        };
        let ctx = PrinterContext::from(&printer);
        assert!(ctx.pause_on_failure);
        assert!(!ctx.watching_enabled);

        let printer = Printer {
            action_on_failure: FailureAction::DoNothing,
            ..printer
        };
        assert!(!PrinterContext::from(&printer).pause_on_failure);
    }

    #[test]
    fn print_context_without_job_is_empty() {
        let poster = PosterFetcher::new("", Duration::from_secs(5));
        let ctx = PrintContext::new(None, "", poster);
        assert_eq!(ctx.id, 0);
        assert!(ctx.filename.is_empty());
        assert!(ctx.started_at.is_none());
        assert!(ctx.ended_at.is_none());
    }

    #[test]
    fn print_context_projects_job_fields() {
        let now = Utc::now();
        let job = PrintJob {
            id: 12,
            printer_id: 4,
            filename: "calicat.gcode".into(),
            started_at: Some(now),
            alerted_at: None,
            finished_at: None,
            cancelled_at: Some(now),
            alert_overwrite: "NOT_FAILED".into(),
        };
        let poster = PosterFetcher::new("https://cdn.example.com/p.jpg", Duration::from_secs(5));
        let ctx = PrintContext::new(Some(&job), "https://cdn.example.com/p.jpg", poster);
        assert_eq!(ctx.id, 12);
        assert_eq!(ctx.filename, "calicat.gcode");
        assert_eq!(ctx.ended_at, Some(now));
        assert_eq!(ctx.alert_overwrite, "NOT_FAILED");
    }
}
