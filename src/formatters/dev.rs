use std::fmt::Write as _;
use std::sync::Arc;

use chrono::Local;

use crate::colors::Theme;
use crate::error::TracedError;
use crate::level::Level;
use crate::stack::{self, ENTRY_DEPTH};
use crate::value::{Value, ValueKind};

/// Microsecond precision local time
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

pub const DEFAULT_SEPARATOR: &str = " ";

pub const IMBALANCED_MARKER: &str = "IMBALANCED_PAIRS=>";

// Developer formatter - one colorized `key=value` line per event
//
// Field order is fixed: t, n, l, m, c (only when there is context), then the
// caller's pairs. Warnings get the calling frame as context, errors and
// fatals the whole trace. Malformed argument lists are flagged inline
// instead of failing.
#[derive(Debug, Clone)]
pub struct DevFormatter {
    name: String,
    theme: Arc<Theme>,
    separator: String,
    entry_depth: usize,
    caller_skip: usize,
}

impl DevFormatter {
    pub fn new(name: impl Into<String>, theme: Arc<Theme>) -> Self {
        Self {
            name: name.into(),
            theme,
            separator: DEFAULT_SEPARATOR.to_string(),
            entry_depth: ENTRY_DEPTH,
            caller_skip: 0,
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Frames from `format` up to the code whose location should be
    /// reported, for binaries without symbol names. Defaults to
    /// [`ENTRY_DEPTH`], which is right when events come through a `Logger`.
    /// Calling `format` directly from the code of interest needs `1`.
    pub fn with_entry_depth(mut self, entry_depth: usize) -> Self {
        self.entry_depth = entry_depth;
        self
    }

    /// Extra frames to skip above the logger entry point, for callers that
    /// log through helper functions of their own
    pub fn with_caller_skip(mut self, caller_skip: usize) -> Self {
        self.caller_skip = caller_skip;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn entry_depth(&self) -> usize {
        self.entry_depth
    }

    pub fn caller_skip(&self) -> usize {
        self.caller_skip
    }

    /// Append one complete event line, newline included, to `buf`.
    ///
    /// Stack context starts at the first frame outside the logging
    /// machinery, plus `caller_skip` frames.
    #[inline(never)]
    pub fn format(&self, buf: &mut String, level: Level, msg: &str, args: &[Value]) {
        let theme = &*self.theme;

        self.write_key(buf, "t");
        let now = Local::now();
        self.write_colored(buf, &theme.value, |buf| {
            let _ = write!(buf, "{}", now.format(TIMESTAMP_FORMAT));
        });

        self.write_text_field(buf, "n", &self.name, &theme.value);

        let color = theme.level_color(level);
        let context = match level {
            Level::Debug | Level::Info => String::new(),
            Level::Warn => stack::trace_from(self.caller_skip, self.entry_depth)
                .first()
                .map(|frame| frame.to_string())
                .unwrap_or_default(),
            Level::Error | Level::Fatal => {
                stack::format_trace(&stack::trace_from(self.caller_skip, self.entry_depth))
            }
        };

        self.write_text_field(buf, "l", level.label(), color);
        self.write_text_field(buf, "m", msg, color);
        if !context.is_empty() {
            self.write_text_field(buf, "c", &context, color);
        }

        if args.len() % 2 == 0 {
            for (i, pair) in args.chunks_exact(2).enumerate() {
                let position = i * 2;
                match pair[0].as_key() {
                    Some(key) => self.write_field(buf, key, &pair[1], &theme.value),
                    None => {
                        let name_key = format!("BADKEY_NAME_{}", position + 1);
                        let value_key = format!("BADKEY_VALUE_{}", position + 2);
                        self.write_field(buf, &name_key, &pair[0], &theme.error);
                        self.write_field(buf, &value_key, &pair[1], &theme.error);
                    }
                }
            }
        } else {
            buf.push_str(&self.separator);
            buf.push_str(&theme.error);
            buf.push_str(IMBALANCED_MARKER);
            buf.push_str(&theme.warn);
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    buf.push(' ');
                }
                let _ = write!(buf, "{}", arg);
            }
            buf.push_str(&theme.reset);
        }

        buf.push('\n');
    }

    /// Append `<sep>key=value`, coloring the value with `color_code`.
    ///
    /// An error without a stack gets one captured here, starting at the code
    /// that issued the log call; an error that already carries a stack is
    /// rendered as is.
    #[inline(never)]
    pub fn write_field(&self, buf: &mut String, key: &str, value: &Value, color_code: &str) {
        buf.push_str(&self.separator);
        self.write_key(buf, key);
        if !color_code.is_empty() {
            buf.push_str(color_code);
        }
        match value.kind() {
            ValueKind::Plain(plain) => {
                let _ = write!(buf, "{}", plain);
            }
            ValueKind::Error(err) => {
                // write_field sits one frame above format
                let traced = TracedError::at_call_site(
                    Arc::clone(err),
                    self.caller_skip,
                    self.entry_depth + 1,
                );
                self.write_error(buf, &traced);
            }
            ValueKind::Traced(traced) => self.write_error(buf, traced),
        }
        if !color_code.is_empty() {
            buf.push_str(&self.theme.reset);
        }
    }

    fn write_text_field(&self, buf: &mut String, key: &str, text: &str, color_code: &str) {
        buf.push_str(&self.separator);
        self.write_key(buf, key);
        self.write_colored(buf, color_code, |buf| buf.push_str(text));
    }

    fn write_key(&self, buf: &mut String, key: &str) {
        buf.push_str(&self.theme.key);
        buf.push_str(key);
        buf.push_str(&self.theme.reset);
        buf.push('=');
    }

    fn write_colored(&self, buf: &mut String, color_code: &str, body: impl FnOnce(&mut String)) {
        if !color_code.is_empty() {
            buf.push_str(color_code);
        }
        body(buf);
        if !color_code.is_empty() {
            buf.push_str(&self.theme.reset);
        }
    }

    fn write_error(&self, buf: &mut String, err: &TracedError) {
        buf.push_str(&self.theme.error);
        buf.push_str(err.message());
        buf.push('\n');
        buf.push_str(&err.stack());
        buf.push_str(&self.theme.reset);
    }
}
