//! Logging facilities for Lattice Inventory.
//!
//! Lattice Inventory uses the `tracing` crate for instrumentation and never
//! installs a subscriber itself. To see logs, install one in the host:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("lattice_inventory=debug")
//!     .init();
//! ```
//!
//! Every subsystem logs under one of the [`targets`], so a host can turn on
//! click routing traces without drowning in tick scheduling output.

/// Target names for log filtering.
pub mod targets {
    /// Root target.
    pub const ROOT: &str = "lattice_inventory";
    /// Session lifecycle: open, close, disconnect, shutdown.
    pub const SESSION: &str = "lattice_inventory::session";
    /// Interaction routing: clicks, drags, handler dispatch.
    pub const ROUTER: &str = "lattice_inventory::router";
    /// Tick scheduling and the asynchronous tick worker.
    pub const TICK: &str = "lattice_inventory::tick";
    /// Grid content mutations and live view pushes.
    pub const CONTENT: &str = "lattice_inventory::content";
    /// Main-thread invocation queue.
    pub const INVOCATION: &str = "lattice_inventory::invocation";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Used to time a whole dispatch or tick pass.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create and enter a span for `operation`.
    pub fn new(operation: &'static str) -> Self {
        let span = tracing::trace_span!(target: "lattice_inventory::perf", "perf", operation);
        Self {
            span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets_share_root() {
        for target in [
            targets::SESSION,
            targets::ROUTER,
            targets::TICK,
            targets::CONTENT,
            targets::INVOCATION,
        ] {
            assert!(target.starts_with(targets::ROOT));
        }
    }

    #[test]
    fn test_perf_span_with_subscriber() {
        let subscriber = tracing_subscriber::fmt().with_test_writer().finish();
        tracing::subscriber::with_default(subscriber, || {
            let _span = PerfSpan::new("dispatch");
            tracing::trace!(target: targets::ROUTER, "inside span");
        });
    }
}
