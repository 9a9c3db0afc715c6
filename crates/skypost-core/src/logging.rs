//! Diagnostic sink for the agent's session decisions.
//!
//! The agent reports which branch it took (`create`, `refresh`, `reuse`)
//! through a `Logger`. The default discards everything.

use tracing::debug;

pub trait Logger: Send + Sync {
    fn debug(&self, msg: &str);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn debug(&self, _msg: &str) {}
}

/// Forwards messages to `tracing` at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn debug(&self, msg: &str) {
        debug!(target: "skypost::auth", "{}", msg);
    }
}

/// Prints every message to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutLogger;

impl Logger for StdoutLogger {
    fn debug(&self, msg: &str) {
        println!("{}", msg);
    }
}
