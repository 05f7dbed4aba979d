//! [`Dispatcher`] -- the fault-isolated notification fan-out engine.
//!
//! One dispatch call handles one triggering event: resolve the required
//! feature, query the eligible settings, build the shared snapshots
//! once, then invoke each eligible channel **sequentially**. A channel
//! opting out (`NotImplemented`) is skipped silently; any other channel
//! failure is logged and isolated by default (`fail_silently`), or
//! propagated immediately in strict mode.
//!
//! Sequential fan-out is deliberate: it trades latency for predictable
//! resource usage and simple failure isolation. Channels shared across
//! concurrently scheduled dispatch calls must be call-safe themselves;
//! the engine only serializes within one call.

use std::sync::Arc;

use tracing::{debug, error};

use printwatch_channels::context::{
    FailureAlertContext, PrintContext, PrinterContext, PrinterNotificationContext,
    TestMessageContext, UserContext,
};
use printwatch_channels::registry::{LazyRegistry, Plugin, Registry};
use printwatch_types::entities::{NotificationSetting, PrintJob, Printer, User};
use printwatch_types::{EventPayload, ExtraContext, NotifyError, Result};

use crate::context::ContextBuilder;
use crate::router::feature_for_event;
use crate::store::{PrinterNotificationTask, SettingFlag, SettingsStore, TaskScheduler};

/// Per-call dispatch options.
#[derive(Debug, Clone)]
pub struct DispatchOptions {
    /// Base extra context handed to every channel's context hook.
    pub extra_context: ExtraContext,
    /// Channel-name allowlist; empty means every registered channel.
    pub channels: Vec<String>,
    /// Isolate channel failures (`true`, the default) or propagate the
    /// first one and abort the remaining settings (`false`).
    pub fail_silently: bool,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            extra_context: ExtraContext::new(),
            channels: Vec::new(),
            fail_silently: true,
        }
    }
}

/// Routes one event to every eligible notification channel.
pub struct Dispatcher {
    registry: Arc<LazyRegistry>,
    settings: Arc<dyn SettingsStore>,
    contexts: ContextBuilder,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<LazyRegistry>,
        settings: Arc<dyn SettingsStore>,
        contexts: ContextBuilder,
    ) -> Self {
        Self {
            registry,
            settings,
            contexts,
        }
    }

    /// Registered names, intersected with the allowlist when non-empty.
    fn candidate_names(registry: &Registry, allowlist: &[String]) -> Vec<String> {
        if allowlist.is_empty() {
            registry.names().to_vec()
        } else {
            registry
                .names()
                .iter()
                .filter(|name| allowlist.contains(name))
                .cloned()
                .collect()
        }
    }

    /// Dispatch a failure alert to every enabled failure-alert setting.
    ///
    /// `user` must be the owner of `printer`; every matched setting is
    /// checked against the same owner (tenant isolation) and a mismatch
    /// is a programming error, not a recoverable condition.
    #[allow(clippy::too_many_arguments)]
    pub async fn send_failure_alerts(
        &self,
        is_warning: bool,
        print_paused: bool,
        printer: &Printer,
        user: &User,
        print: Option<&PrintJob>,
        poster_url: &str,
        options: DispatchOptions,
    ) -> Result<()> {
        debug_assert_eq!(user.id, printer.user_id);

        let registry = self.registry.get();
        let names = Self::candidate_names(registry, &options.channels);
        let settings = self
            .settings
            .enabled_settings(printer.user_id, &names, SettingFlag::FailureAlert)
            .await?;

        if settings.is_empty() {
            debug!(printer = printer.id, "no matching settings, ignoring failure alert");
            return Ok(());
        }

        let user_ctx = Arc::new(self.contexts.user_context(user));
        let printer_ctx = Arc::new(self.contexts.printer_context(printer));
        let print_ctx = Arc::new(self.contexts.print_context(print, poster_url));

        for setting in &settings {
            assert_eq!(
                setting.user_id, printer.user_id,
                "notification setting crossed the tenant boundary"
            );

            let Some(plugin) = registry.get(&setting.name) else {
                debug!(plugin = %setting.name, "plugin not loaded, skipping setting");
                continue;
            };

            debug!(plugin = %setting.name, setting = setting.id, "forwarding failure alert");

            let outcome = self
                .failure_alert_one(
                    plugin,
                    setting,
                    user,
                    print,
                    printer,
                    is_warning,
                    print_paused,
                    &user_ctx,
                    &printer_ctx,
                    &print_ctx,
                    &options.extra_context,
                )
                .await;

            self.settle(outcome, &setting.name, options.fail_silently)?;
        }

        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    async fn failure_alert_one(
        &self,
        plugin: &Plugin,
        setting: &NotificationSetting,
        user: &User,
        print: Option<&PrintJob>,
        printer: &Printer,
        is_warning: bool,
        print_paused: bool,
        user_ctx: &Arc<UserContext>,
        printer_ctx: &Arc<PrinterContext>,
        print_ctx: &Arc<PrintContext>,
        base_extra: &ExtraContext,
    ) -> std::result::Result<(), printwatch_types::ChannelError> {
        let extra_context = plugin.instance.build_failure_alert_extra_context(
            user,
            print,
            printer,
            base_extra.clone(),
        )?;

        let context = FailureAlertContext {
            config: setting.config.clone(),
            user: user_ctx.clone(),
            printer: printer_ctx.clone(),
            print: print_ctx.clone(),
            site_is_public: self.contexts.site_is_public(),
            is_warning,
            print_paused,
            extra_context,
        };

        plugin.instance.send_failure_alert(&context).await
    }

    /// Dispatch a printer lifecycle event to every eligible setting.
    ///
    /// A no-op when the event is not dispatchable or when no setting
    /// matches: no contexts are built and no channel is touched.
    #[allow(clippy::too_many_arguments)]
    pub async fn send_printer_notifications(
        &self,
        event_name: &str,
        event_payload: EventPayload,
        printer: &Printer,
        user: &User,
        print: Option<&PrintJob>,
        poster_url: &str,
        options: DispatchOptions,
    ) -> Result<()> {
        debug_assert_eq!(user.id, printer.user_id);

        let Some(feature) = feature_for_event(event_name, &event_payload) else {
            return Ok(());
        };

        let registry = self.registry.get();
        let names = Self::candidate_names(registry, &options.channels);
        let settings = self
            .settings
            .enabled_settings(printer.user_id, &names, SettingFlag::Feature(feature))
            .await?;

        if settings.is_empty() {
            debug!(
                printer = printer.id,
                event = event_name,
                "no matching settings, ignoring printer event"
            );
            return Ok(());
        }

        let user_ctx = Arc::new(self.contexts.user_context(user));
        let printer_ctx = Arc::new(self.contexts.printer_context(printer));
        let print_ctx = Arc::new(self.contexts.print_context(print, poster_url));

        for setting in &settings {
            assert_eq!(
                setting.user_id, printer.user_id,
                "notification setting crossed the tenant boundary"
            );

            let Some(plugin) = registry.get(&setting.name) else {
                debug!(plugin = %setting.name, "plugin not loaded, skipping setting");
                continue;
            };

            // The flag being on is necessary but not sufficient: the
            // plugin must also declare support for the feature.
            if !Self::should_handle_printer_event(plugin, setting, event_name, &event_payload) {
                continue;
            }

            debug!(plugin = %setting.name, setting = setting.id, event = event_name, "forwarding printer event");

            let outcome = self
                .printer_notification_one(
                    plugin,
                    setting,
                    user,
                    print,
                    printer,
                    event_name,
                    &event_payload,
                    &user_ctx,
                    &printer_ctx,
                    &print_ctx,
                    &options.extra_context,
                )
                .await;

            self.settle(outcome, &setting.name, options.fail_silently)?;
        }

        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    async fn printer_notification_one(
        &self,
        plugin: &Plugin,
        setting: &NotificationSetting,
        user: &User,
        print: Option<&PrintJob>,
        printer: &Printer,
        event_name: &str,
        event_payload: &EventPayload,
        user_ctx: &Arc<UserContext>,
        printer_ctx: &Arc<PrinterContext>,
        print_ctx: &Arc<PrintContext>,
        base_extra: &ExtraContext,
    ) -> std::result::Result<(), printwatch_types::ChannelError> {
        let extra_context = plugin.instance.build_printer_notification_extra_context(
            user,
            print,
            printer,
            base_extra.clone(),
        )?;

        let context = PrinterNotificationContext {
            config: setting.config.clone(),
            user: user_ctx.clone(),
            printer: printer_ctx.clone(),
            print: print_ctx.clone(),
            site_is_public: self.contexts.site_is_public(),
            event_name: event_name.to_owned(),
            event_payload: event_payload.clone(),
            extra_context,
        };

        plugin.instance.send_printer_notification(&context).await
    }

    /// Eligibility re-check for one (plugin, setting) pair.
    fn should_handle_printer_event(
        plugin: &Plugin,
        setting: &NotificationSetting,
        event_name: &str,
        event_payload: &EventPayload,
    ) -> bool {
        if !setting.enabled {
            debug!(plugin = %setting.name, setting = setting.id, "setting disabled, ignoring event");
            return false;
        }

        let Some(feature) = feature_for_event(event_name, event_payload) else {
            debug!(event = event_name, "event is not dispatchable, ignoring");
            return false;
        };

        if !plugin.supports(feature) {
            debug!(plugin = %setting.name, %feature, "feature not supported by plugin, ignoring event");
            return false;
        }

        if !setting.feature_enabled(feature) {
            debug!(plugin = %setting.name, setting = setting.id, %feature, "feature not enabled, ignoring event");
            return false;
        }

        true
    }

    /// Apply the failure-isolation policy to one channel outcome.
    fn settle(
        &self,
        outcome: std::result::Result<(), printwatch_types::ChannelError>,
        plugin: &str,
        fail_silently: bool,
    ) -> Result<()> {
        match outcome {
            Ok(()) => Ok(()),
            Err(err) if err.is_not_implemented() => {
                debug!(plugin = %plugin, "channel opted out");
                Ok(())
            }
            Err(err) if fail_silently => {
                error!(plugin = %plugin, error = %err, "channel invocation failed");
                Ok(())
            }
            Err(source) => Err(NotifyError::Channel {
                plugin: plugin.to_owned(),
                source,
            }),
        }
    }

    /// Send a configuration-check test message through one setting.
    ///
    /// The named plugin must already be registered; a miss is a
    /// precondition failure, not a best-effort skip. Channel errors are
    /// never isolated on this path.
    pub async fn send_test_message(
        &self,
        user: &User,
        setting: &NotificationSetting,
        extra_context: ExtraContext,
    ) -> Result<()> {
        let registry = self.registry.get();
        let plugin = registry
            .get(&setting.name)
            .ok_or_else(|| NotifyError::PluginNotLoaded(setting.name.clone()))?;

        let context = TestMessageContext {
            config: setting.config.clone(),
            user: self.contexts.user_context(user),
            site_is_public: self.contexts.site_is_public(),
            extra_context,
        };

        plugin
            .instance
            .send_test_message(&context)
            .await
            .map_err(|source| NotifyError::Channel {
                plugin: setting.name.clone(),
                source,
            })
    }

    /// Enqueue an asynchronous printer-notification dispatch, iff at
    /// least one matching enabled setting exists.
    ///
    /// Checking first keeps no-subscriber events off the queue entirely;
    /// unroutable events never reach the store or the queue.
    #[allow(clippy::too_many_arguments)]
    pub async fn queue_printer_notifications(
        &self,
        scheduler: &dyn TaskScheduler,
        event_name: &str,
        event_payload: EventPayload,
        printer: &Printer,
        print: Option<&PrintJob>,
        poster_url: &str,
        extra_context: ExtraContext,
    ) -> Result<()> {
        let Some(feature) = feature_for_event(event_name, &event_payload) else {
            return Ok(());
        };

        let registry = self.registry.get();
        let should_fire = self
            .settings
            .has_enabled_settings(
                printer.user_id,
                registry.names(),
                SettingFlag::Feature(feature),
            )
            .await?;

        if !should_fire {
            debug!(
                printer = printer.id,
                event = event_name,
                "no matching settings, not enqueuing"
            );
            return Ok(());
        }

        scheduler
            .enqueue_printer_notifications(PrinterNotificationTask {
                event_name: event_name.to_owned(),
                event_payload,
                printer_id: printer.id,
                print_id: print.map(|p| p.id),
                poster_url: poster_url.to_owned(),
                extra_context,
            })
            .await
    }
}
