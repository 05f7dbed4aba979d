//! [`WebhookChannel`] -- generic HTTP POST notification delivery.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use printwatch_types::{ChannelError, Feature};

use crate::context::{
    FailureAlertContext, PrintContext, PrinterContext, PrinterNotificationContext,
    TestMessageContext, UserContext,
};
use crate::traits::Channel;

/// Webhook channel configuration, parsed from the setting's config blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Target URL for the POST.
    #[serde(default)]
    pub url: String,
    /// Optional bearer token sent in the `Authorization` header.
    #[serde(default)]
    pub auth_token: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_timeout_seconds() -> u64 {
    10
}

/// Notification channel that POSTs JSON envelopes to a configured URL.
pub struct WebhookChannel {
    config: WebhookConfig,
    http: Client,
}

impl WebhookChannel {
    /// Create a channel from validated configuration.
    pub fn new(config: WebhookConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    /// The configured target URL.
    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Envelope fragment shared by all event kinds.
    fn snapshot_fields(
        user: &UserContext,
        printer: &PrinterContext,
        print: &PrintContext,
        site_is_public: bool,
    ) -> serde_json::Value {
        json!({
            "user": {
                "id": user.id,
                "email": user.email,
                "first_name": user.first_name,
                "last_name": user.last_name,
                "is_pro": user.is_pro,
            },
            "printer": {
                "id": printer.id,
                "name": printer.name,
                "pause_on_failure": printer.pause_on_failure,
                "watching_enabled": printer.watching_enabled,
            },
            "print": {
                "id": print.id,
                "filename": print.filename,
                "poster_url": if site_is_public { print.poster_url.as_str() } else { "" },
                "started_at": print.started_at,
                "ended_at": print.ended_at,
                "alerted_at": print.alerted_at,
            },
        })
    }

    /// Build the `failure_alert` envelope. Public for receiver tests.
    pub fn failure_alert_envelope(context: &FailureAlertContext) -> serde_json::Value {
        let mut envelope = Self::snapshot_fields(
            &context.user,
            &context.printer,
            &context.print,
            context.site_is_public,
        );
        envelope["kind"] = json!("failure_alert");
        envelope["is_warning"] = json!(context.is_warning);
        envelope["print_paused"] = json!(context.print_paused);
        envelope["extra_context"] = json!(context.extra_context);
        envelope
    }

    /// Build the `printer_event` envelope. Public for receiver tests.
    pub fn printer_event_envelope(context: &PrinterNotificationContext) -> serde_json::Value {
        let mut envelope = Self::snapshot_fields(
            &context.user,
            &context.printer,
            &context.print,
            context.site_is_public,
        );
        envelope["kind"] = json!("printer_event");
        envelope["event_name"] = json!(context.event_name);
        envelope["event_payload"] = json!(context.event_payload);
        envelope["extra_context"] = json!(context.extra_context);
        envelope
    }

    async fn post(&self, envelope: &serde_json::Value) -> Result<(), ChannelError> {
        let mut req = self
            .http
            .post(&self.config.url)
            .timeout(Duration::from_secs(self.config.timeout_seconds))
            .json(envelope);

        if let Some(token) = &self.config.auth_token {
            req = req.bearer_auth(token);
        }

        debug!(url = %self.config.url, kind = %envelope["kind"], "posting webhook");

        let resp = req
            .send()
            .await
            .map_err(|e| ChannelError::ConnectionFailed(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(ChannelError::AuthFailed(format!(
                "receiver returned {status}"
            )));
        }
        if !status.is_success() {
            return Err(ChannelError::SendFailed(format!(
                "receiver returned {status}"
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl Channel for WebhookChannel {
    fn name(&self) -> &str {
        "webhook"
    }

    fn supported_features(&self) -> HashSet<Feature> {
        Feature::ALL.into_iter().collect()
    }

    async fn send_failure_alert(&self, context: &FailureAlertContext) -> Result<(), ChannelError> {
        self.post(&Self::failure_alert_envelope(context)).await
    }

    async fn send_printer_notification(
        &self,
        context: &PrinterNotificationContext,
    ) -> Result<(), ChannelError> {
        self.post(&Self::printer_event_envelope(context)).await
    }

    async fn send_test_message(&self, context: &TestMessageContext) -> Result<(), ChannelError> {
        let envelope = json!({
            "kind": "test",
            "user": {
                "id": context.user.id,
                "email": context.user.email,
            },
            "extra_context": context.extra_context,
        });
        self.post(&envelope).await
    }
}
