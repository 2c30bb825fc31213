//! Call stack capture for warning and error context.
//!
//! Frames that belong to the logging machinery (this module, the formatter,
//! `Logger` entry points, the `log` bridge and the `log` crate itself) are
//! recognized by symbol name and dropped, so `skip = 0` is the first frame of
//! the code that asked for the stack. Counting frames is only the fallback
//! for binaries without symbol names. Frames below the runtime entry point
//! (`main` start-up, thread and test harness start-up) are cut off.

use std::fmt;
use std::path::PathBuf;

/// Frames between a capture made inside `DevFormatter::format` and the code
/// that called a `Logger` entry point:
/// `DevFormatter::format` <- `Logger::write_event` <- `Logger::{log,info,..}` <- caller.
///
/// Only used when the binary carries no symbol names to recognize those
/// frames by. Every layer added to that chain must raise the depth it passes
/// to the formatter (see `DevFormatter::with_entry_depth`).
pub const ENTRY_DEPTH: usize = 3;

/// Symbol prefixes of the frames a log call passes through before a stack is
/// captured
const INTERNAL_PREFIXES: &[&str] = &[
    "happylog::stack::caller",
    "happylog::stack::trace",
    "happylog::error::TracedError::",
    "happylog::formatters::dev::DevFormatter::",
    "happylog::logger::Logger::",
    // v0 mangling renders inherent methods as `<Type>::method`
    "<happylog::error::TracedError>::",
    "<happylog::formatters::dev::DevFormatter>::",
    "<happylog::logger::Logger>::",
    "<happylog::bridge::LogBridge as log::Log>::",
    "log::",
    "<log::",
];

/// Frames at which the program's own code ends and runtime start-up begins
const RUNTIME_BOUNDARIES: &[&str] = &["std::rt::lang_start", "test::"];

/// One resolved call stack entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub function: Option<String>,
    pub file: Option<PathBuf>,
    pub line: Option<u32>,
}

impl Frame {
    pub fn new(function: &str, file: &str, line: u32) -> Self {
        Self {
            function: Some(function.to_string()),
            file: Some(PathBuf::from(file)),
            line: Some(line),
        }
    }

    fn is_internal(&self) -> bool {
        self.function
            .as_deref()
            .is_some_and(|name| INTERNAL_PREFIXES.iter().any(|p| name.starts_with(p)))
    }

    fn is_runtime_boundary(&self) -> bool {
        self.function
            .as_deref()
            .is_some_and(|name| {
                name.contains("__rust_begin_short_backtrace")
                    || RUNTIME_BOUNDARIES.iter().any(|b| name.starts_with(b))
            })
    }

    /// Standard library glue such as `FnOnce::call_once` shims. Unresolved
    /// frames are not runtime: stripped binaries still show them.
    fn is_runtime(&self) -> bool {
        let Some(name) = self.function.as_deref() else {
            return false;
        };
        // `<T as core::ops::FnOnce>::call_once` is judged by its trait path
        let path = match name.strip_prefix('<') {
            Some(qualified) => qualified.rsplit(" as ").next().unwrap_or(qualified),
            None => name,
        };
        ["std::", "core::", "alloc::"]
            .iter()
            .any(|p| path.starts_with(p))
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}:{}", file.display(), self.line.unwrap_or(0))?,
            None => f.write_str("<unknown>:0")?,
        }
        write!(f, " ({})", self.function.as_deref().unwrap_or("<unknown>"))
    }
}

/// The frame `skip` levels above the function calling `caller`
#[inline(never)]
pub fn caller(skip: usize) -> Option<Frame> {
    capture(skip, 1).into_iter().next()
}

/// Every frame from `skip` levels above the function calling `trace` down to
/// the runtime boundary. Returns fewer frames, possibly none, when the stack
/// is shallower than `skip`.
#[inline(never)]
pub fn trace(skip: usize) -> Vec<Frame> {
    capture(skip, 1)
}

/// Like [`trace`], for code inside the logging machinery. `depth` is the
/// number of frames, starting with the function calling `trace_from`, that
/// are dropped when symbol names are unavailable.
#[inline(never)]
pub(crate) fn trace_from(skip: usize, depth: usize) -> Vec<Frame> {
    capture(skip, depth + 1)
}

/// Render a trace for the `c=` field: one frame stays inline, several frames
/// each go on their own tab-indented line followed by a final newline.
pub fn format_trace(frames: &[Frame]) -> String {
    match frames {
        [] => String::new(),
        [only] => only.to_string(),
        many => {
            let mut out = String::new();
            for frame in many {
                out.push_str("\n\t");
                out.push_str(&frame.to_string());
            }
            out.push('\n');
            out
        }
    }
}

/// Frames above the function calling `capture`, minus the logging machinery,
/// minus `skip` more. `fallback_depth` frames are treated as machinery when
/// the stack has no symbol names.
#[inline(never)]
fn capture(skip: usize, fallback_depth: usize) -> Vec<Frame> {
    let anchor = capture as *const () as usize;
    let mut physical: Vec<(usize, Vec<Frame>)> = Vec::new();

    backtrace::trace(|frame| {
        let mut symbols = Vec::new();
        backtrace::resolve_frame(frame, |symbol| {
            symbols.push(Frame {
                function: symbol.name().map(|name| format!("{:#}", name)),
                file: symbol.filename().map(PathBuf::from),
                line: symbol.lineno(),
            });
        });
        if symbols.is_empty() {
            symbols.push(Frame {
                function: None,
                file: None,
                line: None,
            });
        }
        physical.push((frame.symbol_address() as usize, symbols));
        true
    });

    // Drop everything up to and including this function's own frame
    let start = physical
        .iter()
        .position(|(address, symbols)| {
            *address == anchor
                || symbols.iter().any(|s| {
                    s.function
                        .as_deref()
                        .is_some_and(|name| name.ends_with("stack::capture"))
                })
        })
        .map(|index| index + 1)
        .unwrap_or(0);

    let frames: Vec<Frame> = physical
        .into_iter()
        .skip(start)
        .flat_map(|(_, symbols)| symbols)
        .collect();

    select(frames, skip, fallback_depth)
}

/// Cut a raw stack (innermost first) down to the frames worth reporting
fn select(mut frames: Vec<Frame>, skip: usize, fallback_depth: usize) -> Vec<Frame> {
    let named = frames.first().is_some_and(|f| f.function.is_some());
    let internal = if named {
        frames.iter().take_while(|f| f.is_internal()).count()
    } else {
        fallback_depth
    };

    if let Some(boundary) = frames.iter().position(Frame::is_runtime_boundary) {
        frames.truncate(boundary);
    }
    while frames.last().is_some_and(Frame::is_runtime) {
        frames.pop();
    }

    let first = internal.saturating_add(skip);
    if first >= frames.len() {
        return Vec::new();
    }
    frames.split_off(first)
}
