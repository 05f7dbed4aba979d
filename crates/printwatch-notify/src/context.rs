//! [`ContextBuilder`] -- per-dispatch snapshot construction.
//!
//! Snapshot construction is pure projection; the only I/O-capable object
//! produced here is the [`PosterFetcher`], and it is primed (moved out
//! of its unprimed state) before the context is handed to any channel,
//! so a channel can never observe an unprimed fetcher.

use std::time::Duration;

use printwatch_channels::context::{PrintContext, PrinterContext, UserContext};
use printwatch_channels::poster::PosterFetcher;
use printwatch_types::entities::{PrintJob, Printer, User};

/// Builds the immutable snapshots shared by every channel of a dispatch.
#[derive(Debug, Clone)]
pub struct ContextBuilder {
    site_is_public: bool,
    poster_timeout: Duration,
}

impl ContextBuilder {
    /// Default per-attempt poster fetch timeout.
    pub const DEFAULT_POSTER_TIMEOUT: Duration = Duration::from_secs(5);

    pub fn new(site_is_public: bool, poster_timeout: Duration) -> Self {
        Self {
            site_is_public,
            poster_timeout,
        }
    }

    /// Whether the hosting site is reachable from the public internet.
    pub fn site_is_public(&self) -> bool {
        self.site_is_public
    }

    pub fn user_context(&self, user: &User) -> UserContext {
        UserContext::from(user)
    }

    pub fn printer_context(&self, printer: &Printer) -> PrinterContext {
        PrinterContext::from(printer)
    }

    /// Build the print snapshot, with its poster fetcher primed.
    pub fn print_context(&self, print: Option<&PrintJob>, poster_url: &str) -> PrintContext {
        let mut poster = PosterFetcher::new(poster_url, self.poster_timeout);
        poster.prime(None);
        PrintContext::new(print, poster_url, poster)
    }
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new(false, Self::DEFAULT_POSTER_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use printwatch_types::FailureAction;

    #[test]
    fn user_context_is_a_pure_projection() {
        let user = User {
            id: 3,
            email: "g@example.com".into(),
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            is_pro: true,
        };
        let ctx = ContextBuilder::default().user_context(&user);
        assert_eq!(ctx.id, 3);
        assert_eq!(ctx.email, "g@example.com");
        assert!(ctx.is_pro);
    }

    #[test]
    fn printer_context_projects_failure_action() {
        let printer = Printer {
            id: 1,
            user_id: 3,
            name: "prusa".into(),
            action_on_failure: FailureAction::DoNothing,
            watching_enabled: true,
        };
        let ctx = ContextBuilder::default().printer_context(&printer);
        assert!(!ctx.pause_on_failure);
        assert!(ctx.watching_enabled);
    }

    #[tokio::test]
    async fn print_context_poster_arrives_primed() {
        // Primed but bound to an empty URL: access yields nothing and
        // performs no I/O, rather than being stuck unprimed.
        let ctx = ContextBuilder::default().print_context(None, "");
        assert!(ctx.poster.get().await.is_none());
        assert_eq!(ctx.poster.url(), "");
    }
}
