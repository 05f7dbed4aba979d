//! Built-in webhook notification channel.
//!
//! POSTs a JSON envelope to a user-configured URL for every supported
//! event class. The envelope shape is stable across event kinds so that
//! receivers can switch on the `kind` field.

mod channel;
mod factory;

pub use channel::{WebhookChannel, WebhookConfig};
pub use factory::WebhookChannelFactory;
