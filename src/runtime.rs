use evlog::Logger;
use once_cell::sync::OnceCell;

static LOGGER: OnceCell<Logger> = OnceCell::new();

/// Installs the process logger. Only the first call takes effect.
pub fn set_logger(logger: Logger) {
    let _ = LOGGER.set(logger);
}

/// Falls back to a logger with no printers, which keeps tests quiet.
pub fn get_logger() -> &'static Logger {
    LOGGER.get_or_init(Logger::default)
}
