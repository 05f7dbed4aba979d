//! Channel plugin system for printwatch.
//!
//! Provides the trait-based plugin architecture for notification
//! channels. Each channel (webhook, email, chat integrations, mobile
//! push) implements the [`Channel`] trait and is registered via a
//! [`ChannelFactory`] entry in the [`Registry`] manifest.
//!
//! # Architecture
//!
//! ```text
//! RegistryEntry { factory, config } ──Registry::load()──> Plugin
//!                                                           │
//!                                        Dispatcher (printwatch-notify)
//!                                            │          │
//!                                   build_*_extra_context()
//!                                            │          │
//!                              Channel::send_*(DispatchContext)
//! ```
//!
//! # Error handling
//!
//! Channel operations return
//! [`ChannelError`](printwatch_types::ChannelError); the
//! `NotImplemented` variant is the capability opt-out signal and is
//! never treated as a delivery failure. This crate re-exports the type
//! for convenience.

pub mod context;
pub mod poster;
pub mod registry;
pub mod traits;
pub mod webhook;

pub use context::{
    FailureAlertContext, PrintContext, PrinterContext, PrinterNotificationContext,
    TestMessageContext, UserContext,
};
pub use poster::PosterFetcher;
pub use registry::{LazyRegistry, Plugin, Registry, RegistryEntry};
pub use traits::{Channel, ChannelFactory};

pub use printwatch_types::ChannelError;
