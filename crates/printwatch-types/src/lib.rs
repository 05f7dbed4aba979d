//! # printwatch-types
//!
//! Core type definitions for the printwatch notification engine.
//!
//! This crate is the foundation of the dependency graph -- the channel
//! and dispatch crates both depend on it. It contains:
//!
//! - **[`error`]** -- [`NotifyError`] and [`ChannelError`] error types
//! - **[`feature`]** -- the [`Feature`] capability / toggle enumeration
//! - **[`event`]** -- printer event names and payload aliases
//! - **[`entities`]** -- read-only snapshots of the persisted domain
//!   records (users, printers, prints, notification settings)

pub mod entities;
pub mod error;
pub mod event;
pub mod feature;

pub use entities::{FailureAction, NotificationSetting, PrintJob, Printer, User};
pub use error::{ChannelError, NotifyError, Result};
pub use event::{EventPayload, ExtraContext};
pub use feature::Feature;
