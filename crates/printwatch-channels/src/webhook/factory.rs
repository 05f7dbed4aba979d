//! [`WebhookChannelFactory`] -- creates webhook channels from JSON config.

use std::sync::Arc;

use printwatch_types::ChannelError;

use crate::traits::{Channel, ChannelFactory};

use super::channel::{WebhookChannel, WebhookConfig};

/// Factory for creating [`WebhookChannel`] instances.
///
/// Expected config shape matches [`WebhookConfig`]:
///
/// ```json
/// {
///   "url": "https://hooks.example.com/printwatch",
///   "auth_token": "s3cret",
///   "timeout_seconds": 10
/// }
/// ```
pub struct WebhookChannelFactory;

impl ChannelFactory for WebhookChannelFactory {
    fn channel_name(&self) -> &str {
        "webhook"
    }

    fn build(&self, config: &serde_json::Value) -> Result<Arc<dyn Channel>, ChannelError> {
        let webhook_config: WebhookConfig = serde_json::from_value(config.clone())
            .map_err(|e| ChannelError::InvalidConfig(format!("webhook config: {e}")))?;

        if webhook_config.url.is_empty() {
            return Err(ChannelError::InvalidConfig(
                "missing 'url' in webhook config".into(),
            ));
        }

        Ok(Arc::new(WebhookChannel::new(webhook_config)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_channel_name() {
        assert_eq!(WebhookChannelFactory.channel_name(), "webhook");
    }

    #[test]
    fn factory_build_success() {
        let config = serde_json::json!({
            "url": "https://hooks.example.com/printwatch",
            "auth_token": "s3cret"
        });
        let channel = WebhookChannelFactory.build(&config).unwrap();
        assert_eq!(channel.name(), "webhook");
    }

    #[test]
    fn factory_build_missing_url_errors() {
        let result = WebhookChannelFactory.build(&serde_json::json!({}));
        match result {
            Err(ChannelError::InvalidConfig(msg)) => {
                assert!(msg.contains("url"), "error should mention url: {msg}");
            }
            Err(other) => panic!("expected InvalidConfig, got: {other:?}"),
            Ok(_) => panic!("expected error, got Ok"),
        }
    }

    #[test]
    fn factory_build_rejects_wrong_types() {
        let config = serde_json::json!({ "url": "https://x", "timeout_seconds": "soon" });
        assert!(WebhookChannelFactory.build(&config).is_err());
    }

    #[test]
    fn factory_build_applies_timeout_default() {
        let config = serde_json::json!({ "url": "https://hooks.example.com/x" });
        let channel = WebhookChannelFactory.build(&config);
        assert!(channel.is_ok());
    }
}
