//! Error types for the printwatch notification engine.
//!
//! Provides [`NotifyError`] as the engine-level error type and
//! [`ChannelError`] for channel-specific failures. Both are
//! non-exhaustive to allow future extension without breaking downstream.

use thiserror::Error;

/// Engine-level error type for dispatch operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum NotifyError {
    /// A test-message dispatch named a plugin that is not registered.
    ///
    /// This is a precondition failure: the test path is used for
    /// interactive configuration checks and never falls back to
    /// best-effort delivery.
    #[error("notification plugin is not loaded: {0}")]
    PluginNotLoaded(String),

    /// A channel invocation failed and `fail_silently` was disabled.
    #[error("channel \"{plugin}\" failed: {source}")]
    Channel {
        /// Name of the plugin whose channel failed.
        plugin: String,
        /// The underlying channel error.
        #[source]
        source: ChannelError,
    },

    /// The settings store could not be queried.
    #[error("settings store error: {0}")]
    Store(String),

    /// The task scheduler rejected an enqueue request.
    #[error("scheduler error: {0}")]
    Schedule(String),

    /// JSON serialization / deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Channel-specific error type.
///
/// Used by channel implementations (webhook, email, chat integrations)
/// to report failures in configuration, connecting, or sending.
///
/// [`NotImplemented`](ChannelError::NotImplemented) is special: it is the
/// capability opt-out signal. A channel returning it from any contract
/// method is silently skipped by the dispatcher, never treated as a
/// delivery failure.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ChannelError {
    /// The channel does not implement the requested operation.
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// Channel configuration is malformed or semantically invalid.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Failed to establish a connection to the channel backend.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Authentication / authorization was rejected.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// Sending a notification failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Serialization/deserialization error inside a channel.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Catch-all for errors that do not fit other variants.
    #[error("{0}")]
    Other(String),
}

impl ChannelError {
    /// Whether this error is the capability opt-out signal.
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, ChannelError::NotImplemented(_))
    }
}

/// A convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, NotifyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notify_error_display() {
        let err = NotifyError::PluginNotLoaded("pushover".into());
        assert_eq!(
            err.to_string(),
            "notification plugin is not loaded: pushover"
        );
    }

    #[test]
    fn channel_failure_preserves_source() {
        let err = NotifyError::Channel {
            plugin: "webhook".into(),
            source: ChannelError::SendFailed("502 bad gateway".into()),
        };
        assert!(err.to_string().contains("webhook"));
        let source = std::error::Error::source(&err).expect("source");
        assert!(source.to_string().contains("502"));
    }

    #[test]
    fn channel_error_display() {
        let err = ChannelError::AuthFailed("bad token".into());
        assert_eq!(err.to_string(), "authentication failed: bad token");

        let err = ChannelError::InvalidConfig("missing url".into());
        assert_eq!(err.to_string(), "invalid config: missing url");
    }

    #[test]
    fn not_implemented_is_detectable() {
        assert!(ChannelError::NotImplemented("test messages".into()).is_not_implemented());
        assert!(!ChannelError::SendFailed("boom".into()).is_not_implemented());
    }

    #[test]
    fn error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{{bad}}").unwrap_err();
        let err: NotifyError = json_err.into();
        assert!(matches!(err, NotifyError::Json(_)));
    }

    #[test]
    fn result_alias_works() {
        fn err_fn() -> Result<i32> {
            Err(NotifyError::Store("connection refused".into()))
        }
        assert!(err_fn().is_err());
    }
}
