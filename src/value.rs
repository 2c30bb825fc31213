use std::error::Error;
use std::fmt;
use std::sync::Arc;

use crate::error::TracedError;

/// One entry of the key/value argument list of a log call
#[derive(Debug, Clone)]
pub enum Value {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Null,
    Json(serde_json::Value),
    Error(Arc<dyn Error + Send + Sync>),
    Traced(Arc<TracedError>),
}

/// How a field value gets rendered, with the data each branch needs
#[derive(Debug, Clone, Copy)]
pub enum ValueKind<'a> {
    Plain(&'a Value),
    /// Error without a captured stack; one is captured when written
    Error(&'a Arc<dyn Error + Send + Sync>),
    /// Error that already carries its stack
    Traced(&'a TracedError),
}

impl Value {
    /// Wrap any error so it is rendered with a call stack
    pub fn error<E>(err: E) -> Self
    where
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        let boxed: Box<dyn Error + Send + Sync> = err.into();
        Value::Error(Arc::from(boxed))
    }

    pub fn kind(&self) -> ValueKind<'_> {
        match self {
            Value::Error(err) => ValueKind::Error(err),
            Value::Traced(traced) => ValueKind::Traced(traced),
            plain => ValueKind::Plain(plain),
        }
    }

    /// Text content when this value can serve as a key
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            Value::Json(serde_json::Value::String(s)) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Int(n) => write!(f, "{}", n),
            Value::UInt(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Null => f.write_str("<nil>"),
            Value::Json(serde_json::Value::String(s)) => f.write_str(s),
            Value::Json(v) => write!(f, "{}", v),
            Value::Error(e) => write!(f, "{}", e),
            Value::Traced(e) => write!(f, "{}", e),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Str(s.clone())
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Str(c.to_string())
    }
}

macro_rules! impl_from_int {
    ($variant:ident, $target:ty, $($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::$variant(n as $target)
                }
            }
        )*
    };
}

impl_from_int!(Int, i64, i8, i16, i32, i64, isize);
impl_from_int!(UInt, u64, u8, u16, u32, u64, usize);

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float(n as f64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Json(v)
    }
}

impl From<TracedError> for Value {
    fn from(e: TracedError) -> Self {
        Value::Traced(Arc::new(e))
    }
}

impl From<Arc<TracedError>> for Value {
    fn from(e: Arc<TracedError>) -> Self {
        Value::Traced(e)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

/// Build a `Vec<Value>` from alternating keys and values of any convertible type
///
/// ```
/// use happylog::args;
/// let args = args!["port", 8080, "tls", false];
/// assert_eq!(args.len(), 4);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($item:expr),+ $(,)?) => {
        vec![$($crate::Value::from($item)),+]
    };
}
