//! Colorized, developer-oriented log line formatting.
//!
//! Each event becomes one line of `key=value` fields: timestamp, logger
//! name, level and message, then call-site context for warnings and errors,
//! then the caller's own key/value pairs.
//!
//! ```
//! use happylog::{args, Level, Logger, Theme};
//! use std::sync::Arc;
//!
//! let log = Logger::new("api", Arc::new(Theme::plain()));
//! log.info("server started", &args!["port", 8080]);
//! # let _ = Level::Info;
//! ```

pub mod bridge;
pub mod colors;
pub mod config;
pub mod error;
pub mod formatters;
pub mod level;
pub mod logger;
pub mod stack;
pub mod tty;
pub mod value;

pub use colors::{parse_theme, Role, Theme, ThemeSpec, DARK_SCHEME, LIGHT_SCHEME};
pub use config::{ColorMode, LogConfig};
pub use error::TracedError;
pub use formatters::DevFormatter;
pub use level::Level;
pub use logger::{Logger, Registry, SharedWriter};
pub use value::{Value, ValueKind};

use once_cell::sync::Lazy;
use std::sync::Arc;

struct Global {
    registry: Registry,
    theme: Arc<Theme>,
    separator: String,
    writer: SharedWriter,
}

static GLOBAL: Lazy<Global> = Lazy::new(|| {
    let config = LogConfig::load();
    Global {
        registry: Registry::new(),
        theme: config.theme(),
        separator: config.separator,
        writer: logger::stdout_writer(),
    }
});

/// Process-wide logger for `name`, created on first use from the
/// environment and user config file. The theme is parsed once and shared by
/// every logger.
pub fn logger(name: &str) -> Arc<Logger> {
    let global = &*GLOBAL;
    global.registry.get_or_create(name, |name| {
        let formatter = DevFormatter::new(name, Arc::clone(&global.theme))
            .with_separator(global.separator.clone());
        Logger::with_writer(formatter, Arc::clone(&global.writer))
    })
}
