use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use crate::colors::Theme;
use crate::formatters::DevFormatter;
use crate::level::Level;
use crate::value::Value;

/// Output shared by every logger that writes to the same destination, so
/// whole lines never interleave
pub type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

pub fn stdout_writer() -> SharedWriter {
    Arc::new(Mutex::new(Box::new(io::stdout())))
}

/// A named logger: formats each call into one line and writes it out.
///
/// The level methods and [`Logger::log`] are the public entry points. Stack
/// context starts at the code calling them; code that logs through helpers
/// of its own sets `DevFormatter::with_caller_skip`.
pub struct Logger {
    formatter: DevFormatter,
    writer: SharedWriter,
}

impl Logger {
    /// Logger writing to stdout
    pub fn new(name: impl Into<String>, theme: Arc<Theme>) -> Self {
        Self::with_writer(DevFormatter::new(name, theme), stdout_writer())
    }

    pub fn with_writer(formatter: DevFormatter, writer: SharedWriter) -> Self {
        Self { formatter, writer }
    }

    pub fn name(&self) -> &str {
        self.formatter.name()
    }

    pub fn formatter(&self) -> &DevFormatter {
        &self.formatter
    }

    #[inline(never)]
    pub fn debug(&self, msg: &str, args: &[Value]) {
        self.write_event(Level::Debug, msg, args);
    }

    #[inline(never)]
    pub fn info(&self, msg: &str, args: &[Value]) {
        self.write_event(Level::Info, msg, args);
    }

    #[inline(never)]
    pub fn warn(&self, msg: &str, args: &[Value]) {
        self.write_event(Level::Warn, msg, args);
    }

    #[inline(never)]
    pub fn error(&self, msg: &str, args: &[Value]) {
        self.write_event(Level::Error, msg, args);
    }

    /// Logs at fatal severity; the process keeps running
    #[inline(never)]
    pub fn fatal(&self, msg: &str, args: &[Value]) {
        self.write_event(Level::Fatal, msg, args);
    }

    #[inline(never)]
    pub fn log(&self, level: Level, msg: &str, args: &[Value]) {
        self.write_event(level, msg, args);
    }

    #[inline(never)]
    fn write_event(&self, level: Level, msg: &str, args: &[Value]) {
        let mut buf = String::with_capacity(128);
        self.formatter.format(&mut buf, level, msg, args);

        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        // A failing destination must not fail the caller
        if writer.write_all(buf.as_bytes()).is_ok() {
            let _ = writer.flush();
        }
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("formatter", &self.formatter)
            .finish_non_exhaustive()
    }
}

/// Loggers by name; at most one instance is ever kept per name
#[derive(Debug, Default)]
pub struct Registry {
    loggers: Mutex<HashMap<String, Arc<Logger>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the logger registered under `name`, creating it with `make`
    /// first if needed. Concurrent first calls all get the same instance.
    pub fn get_or_create<F>(&self, name: &str, make: F) -> Arc<Logger>
    where
        F: FnOnce(&str) -> Logger,
    {
        let mut loggers = self.loggers.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = loggers.get(name) {
            return Arc::clone(existing);
        }
        let logger = Arc::new(make(name));
        loggers.insert(name.to_string(), Arc::clone(&logger));
        logger
    }

    pub fn get(&self, name: &str) -> Option<Arc<Logger>> {
        self.loggers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.loggers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
