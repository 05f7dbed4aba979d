//! Notification dispatch engine for printwatch.
//!
//! Routes printer lifecycle events to every notification channel a user
//! has enabled, one channel at a time, isolating each channel's failure
//! from the rest:
//!
//! - **[`router`]** -- maps an event name to the [`Feature`] it requires
//! - **[`store`]** -- collaborator traits for the settings persistence
//!   and the background task queue
//! - **[`context`]** -- builds the immutable per-dispatch snapshots
//! - **[`dispatch`]** -- the [`Dispatcher`] fan-out engine
//!
//! The engine exposes synchronous-in-shape async entry points; scheduling
//! (when a dispatch runs, and on which worker) belongs to the caller.
//!
//! [`Feature`]: printwatch_types::Feature

pub mod context;
pub mod dispatch;
pub mod router;
pub mod store;

pub use context::ContextBuilder;
pub use dispatch::{DispatchOptions, Dispatcher};
pub use router::feature_for_event;
pub use store::{PrinterNotificationTask, SettingFlag, SettingsStore, TaskScheduler};
