//! Channel plugin trait definitions.
//!
//! Defines the two core traits of the notification plugin system:
//!
//! - [`Channel`] -- implemented by each notification channel (webhook,
//!   email, chat, push); invoked by the dispatcher once per eligible
//!   notification setting
//! - [`ChannelFactory`] -- implemented by plugins, consumed by the
//!   registry to instantiate channels from JSON configuration

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;

use printwatch_types::entities::{PrintJob, Printer, User};
use printwatch_types::{ChannelError, ExtraContext, Feature};

use crate::context::{FailureAlertContext, PrinterNotificationContext, TestMessageContext};

/// The trait every notification channel must implement.
///
/// A channel is a long-lived, effectively immutable object shared across
/// dispatch calls; if the external scheduler runs dispatches in parallel,
/// the implementation is responsible for its own call safety (hence
/// `Send + Sync`). Within one dispatch, invocations are sequential.
///
/// Every send operation and both context hooks may return
/// [`ChannelError::NotImplemented`] to opt out of that capability; the
/// dispatcher skips the setting silently. The defaults opt out of all
/// three send operations and pass extra context through unchanged, so an
/// implementation only overrides what it supports.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Unique channel identifier (e.g. `"webhook"`, `"email"`).
    fn name(&self) -> &str;

    /// The features this channel can deliver.
    ///
    /// A user flag being on is necessary but not sufficient: an event is
    /// only forwarded when its feature is also in this set.
    fn supported_features(&self) -> HashSet<Feature>;

    /// Populate channel-specific extra context for a failure alert.
    ///
    /// Called once per eligible setting, before `send_failure_alert`.
    /// The result becomes the context's `extra_context` for this channel
    /// only.
    fn build_failure_alert_extra_context(
        &self,
        _user: &User,
        _print: Option<&PrintJob>,
        _printer: &Printer,
        extra_context: ExtraContext,
    ) -> Result<ExtraContext, ChannelError> {
        Ok(extra_context)
    }

    /// Populate channel-specific extra context for a printer event.
    ///
    /// Called once per eligible setting, before
    /// `send_printer_notification`.
    fn build_printer_notification_extra_context(
        &self,
        _user: &User,
        _print: Option<&PrintJob>,
        _printer: &Printer,
        extra_context: ExtraContext,
    ) -> Result<ExtraContext, ChannelError> {
        Ok(extra_context)
    }

    /// Deliver a failure alert.
    async fn send_failure_alert(
        &self,
        _context: &FailureAlertContext,
    ) -> Result<(), ChannelError> {
        Err(ChannelError::NotImplemented("failure alerts".into()))
    }

    /// Deliver a printer lifecycle notification.
    async fn send_printer_notification(
        &self,
        _context: &PrinterNotificationContext,
    ) -> Result<(), ChannelError> {
        Err(ChannelError::NotImplemented("printer notifications".into()))
    }

    /// Deliver a "verify my configuration" test message.
    async fn send_test_message(&self, _context: &TestMessageContext) -> Result<(), ChannelError> {
        Err(ChannelError::NotImplemented("test messages".into()))
    }
}

/// Factory for creating [`Channel`] instances from JSON configuration.
///
/// Each plugin provides a factory; the registry manifest pairs factories
/// with their config blobs and builds every channel once at load time.
pub trait ChannelFactory: Send + Sync {
    /// The channel name this factory creates (e.g. `"webhook"`).
    fn channel_name(&self) -> &str;

    /// Create a channel instance from its JSON config section.
    fn build(&self, config: &serde_json::Value) -> Result<Arc<dyn Channel>, ChannelError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A channel that keeps every default, supporting nothing.
    struct InertChannel;

    #[async_trait]
    impl Channel for InertChannel {
        fn name(&self) -> &str {
            "inert"
        }

        fn supported_features(&self) -> HashSet<Feature> {
            HashSet::new()
        }
    }

    fn printer() -> Printer {
        Printer {
            id: 1,
            user_id: 1,
            name: "voron".into(),
            action_on_failure: printwatch_types::FailureAction::Pause,
            watching_enabled: true,
        }
    }

    fn user() -> User {
        User {
            id: 1,
            email: "u@example.com".into(),
            first_name: "Ada".into(),
            last_name: "L".into(),
            is_pro: false,
        }
    }

    #[test]
    fn default_hooks_pass_extra_context_through() {
        let ch = InertChannel;
        let mut extra = ExtraContext::new();
        extra.insert("k".into(), serde_json::json!(1));

        let out = ch
            .build_failure_alert_extra_context(&user(), None, &printer(), extra.clone())
            .unwrap();
        assert_eq!(out.get("k"), Some(&serde_json::json!(1)));

        let out = ch
            .build_printer_notification_extra_context(&user(), None, &printer(), extra)
            .unwrap();
        assert_eq!(out.len(), 1);
    }

    #[tokio::test]
    async fn default_sends_opt_out() {
        let ch = InertChannel;
        let ctx = TestMessageContext {
            config: serde_json::json!({}),
            user: crate::context::UserContext::from(&user()),
            site_is_public: false,
            extra_context: ExtraContext::new(),
        };
        let err = ch.send_test_message(&ctx).await.unwrap_err();
        assert!(err.is_not_implemented());
    }
}
