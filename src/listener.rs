use std::error::Error;

use log::{debug, error, info};

/// Observability events emitted during an analysis run. The engine never
/// inspects a listener's behavior and never blocks on it; implementations
/// decide where the events go (console, file, CI log).
pub trait ListenerLogger {
    fn info(&self, message: &str);
    fn progress(&self, message: &str);
    fn error(&self, message: &str);
    fn error_with_cause(&self, message: &str, cause: &dyn Error);
}

/// Forwards listener events to the `log` facade. Progress events map to
/// debug level so that default output stays at one line per module.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogListener;

impl ListenerLogger for LogListener {
    fn info(&self, message: &str) {
        info!("{message}");
    }

    fn progress(&self, message: &str) {
        debug!("{message}");
    }

    fn error(&self, message: &str) {
        error!("{message}");
    }

    fn error_with_cause(&self, message: &str, cause: &dyn Error) {
        error!("{message}: {cause}");
    }
}
