//! Adapter that sends records from the `log` facade through happylog.

use std::io::Write;
use std::sync::{Arc, PoisonError};

use log::{LevelFilter, Metadata, Record, SetLoggerError};

use crate::colors::Theme;
use crate::config::LogConfig;
use crate::formatters::DevFormatter;
use crate::logger::{stdout_writer, Logger, Registry, SharedWriter};
use crate::stack::ENTRY_DEPTH;

/// Frames the facade adds above `Logger::log` (`<LogBridge as Log>::log` and
/// the macro dispatch inside the `log` crate). Only used when symbol names
/// are unavailable; otherwise those frames are recognized by name.
const FACADE_DEPTH: usize = 4;

/// `log::Log` implementation with one happylog logger per record target
pub struct LogBridge {
    registry: Registry,
    theme: Arc<Theme>,
    separator: String,
    writer: SharedWriter,
}

impl LogBridge {
    pub fn new(config: &LogConfig) -> Self {
        Self::with_writer(config.theme(), config.separator.clone(), stdout_writer())
    }

    pub fn with_writer(theme: Arc<Theme>, separator: String, writer: SharedWriter) -> Self {
        Self {
            registry: Registry::new(),
            theme,
            separator,
            writer,
        }
    }

    fn logger_for(&self, target: &str) -> Arc<Logger> {
        self.registry.get_or_create(target, |name| {
            let formatter = DevFormatter::new(name, Arc::clone(&self.theme))
                .with_separator(self.separator.clone())
                .with_entry_depth(ENTRY_DEPTH + FACADE_DEPTH);
            Logger::with_writer(formatter, Arc::clone(&self.writer))
        })
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        // The facade's max level is the only filter
        true
    }

    fn log(&self, record: &Record) {
        let logger = self.logger_for(record.target());
        let message = record.args().to_string();
        logger.log(record.level().into(), &message, &[]);
    }

    fn flush(&self) {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writer.flush();
    }
}

/// Install a bridge built from the process configuration as the global
/// `log` logger
pub fn install(max_level: LevelFilter) -> Result<(), SetLoggerError> {
    let bridge = LogBridge::new(&LogConfig::load());
    log::set_boxed_logger(Box::new(bridge))?;
    log::set_max_level(max_level);
    Ok(())
}
