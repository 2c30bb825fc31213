// tests/common/mod.rs
// Shared test utilities for integration tests
#![allow(dead_code)]

use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex};

use happylog::{DevFormatter, Level, Logger, SharedWriter, Theme, Value};

/// Run the happylog binary with the given arguments and a clean color
/// environment
pub fn run_happylog(args: &[&str]) -> (String, String, i32) {
    run_happylog_with_env(args, &[])
}

/// Run the happylog binary with extra environment variables
pub fn run_happylog_with_env(args: &[&str], env: &[(&str, &str)]) -> (String, String, i32) {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_happylog"));
    cmd.args(args)
        .env_remove("NO_COLOR")
        .env_remove("FORCE_COLOR")
        .env_remove("HAPPYLOG_COLORS")
        .env_remove("HAPPYLOG_COLOR")
        .env_remove("HAPPYLOG_SEPARATOR")
        // Keep a user's config file out of the picture
        .env("XDG_CONFIG_HOME", std::env::temp_dir().join("happylog-tests-no-config"))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for (key, value) in env {
        cmd.env(key, value);
    }

    let output = cmd.output().expect("Failed to execute happylog");

    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}

/// In-memory destination for loggers under test
#[derive(Clone, Default)]
pub struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    pub fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).expect("log output should be UTF-8")
    }

    pub fn writer(&self) -> SharedWriter {
        Arc::new(Mutex::new(Box::new(self.clone())))
    }
}

impl Write for Capture {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Uncolored logger writing into a capture buffer
pub fn capture_logger(name: &str) -> (Logger, Capture) {
    let capture = Capture::default();
    let formatter = DevFormatter::new(name, Arc::new(Theme::plain()));
    (Logger::with_writer(formatter, capture.writer()), capture)
}

/// Format one event with an uncolored formatter
pub fn format_plain(name: &str, level: Level, msg: &str, args: &[Value]) -> String {
    let formatter = DevFormatter::new(name, Arc::new(Theme::plain()));
    let mut buf = String::new();
    formatter.format(&mut buf, level, msg, args);
    buf
}

/// Everything after the message field of an uncolored line, without the
/// final newline
pub fn tail_after_message<'a>(line: &'a str, msg: &str) -> &'a str {
    let marker = format!(" m={}", msg);
    let start = line.find(&marker).expect("line should contain the message") + marker.len();
    line[start..].trim_end_matches('\n')
}
