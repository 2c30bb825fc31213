use std::error::Error;
use std::fmt;
use std::sync::Arc;

use crate::stack::{self, Frame};

/// An error annotated with the call stack where it was captured.
///
/// Once wrapped, the stack travels with the error: passing a `TracedError`
/// through another log call renders the original capture site instead of
/// taking a new one.
#[derive(Debug)]
pub struct TracedError {
    message: String,
    frames: Vec<Frame>,
    source: Option<Arc<dyn Error + Send + Sync + 'static>>,
}

impl TracedError {
    /// New error whose stack starts at the function calling `new`
    #[inline(never)]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            frames: stack::trace_from(0, 1),
            source: None,
        }
    }

    /// Wrap `err`, capturing the stack `skip` frames above the function
    /// calling `wrap` (`skip = 0` starts at that function).
    #[inline(never)]
    pub fn wrap<E>(err: E, skip: usize) -> Self
    where
        E: Into<Box<dyn Error + Send + Sync + 'static>>,
    {
        let err: Arc<dyn Error + Send + Sync> = Arc::from(err.into());
        Self {
            message: err.to_string(),
            frames: stack::trace_from(skip, 1),
            source: Some(err),
        }
    }

    /// Same as [`TracedError::wrap`] for an error that is already shared
    #[inline(never)]
    pub fn wrap_shared(err: Arc<dyn Error + Send + Sync + 'static>, skip: usize) -> Self {
        Self {
            message: err.to_string(),
            frames: stack::trace_from(skip, 1),
            source: Some(err),
        }
    }

    /// Wrap `err` with the stack of the code that called into the logger,
    /// `skip` frames further up. `depth` counts the logger frames from the
    /// function calling this one and only matters when symbol names are
    /// unavailable.
    #[inline(never)]
    pub(crate) fn at_call_site(
        err: Arc<dyn Error + Send + Sync + 'static>,
        skip: usize,
        depth: usize,
    ) -> Self {
        Self {
            message: err.to_string(),
            frames: stack::trace_from(skip, depth + 1),
            source: Some(err),
        }
    }

    /// Attach an already captured stack, e.g. one recorded elsewhere
    pub fn with_frames(message: impl Into<String>, frames: Vec<Frame>) -> Self {
        Self {
            message: message.into(),
            frames,
            source: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// One tab-indented line per frame
    pub fn stack(&self) -> String {
        let mut out = String::new();
        for frame in &self.frames {
            out.push('\t');
            out.push_str(&frame.to_string());
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for TracedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for TracedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn Error + 'static))
    }
}
