use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a log event, ordered by increasing urgency
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl Level {
    pub const ALL: [Level; 5] = [
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Fatal,
    ];

    /// Short display label used for the `l=` field
    pub fn label(self) -> &'static str {
        match self {
            Level::Debug => "DBG",
            Level::Info => "INF",
            Level::Warn => "WRN",
            Level::Error => "ERR",
            Level::Fatal => "FTL",
        }
    }

    /// Whether events at this level carry a full call trace
    pub fn wants_trace(self) -> bool {
        self >= Level::Error
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a level name is not recognized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError(String);

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown log level '{}' (expected debug, info, warn, error or fatal)",
            self.0
        )
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dbg" | "debug" => Ok(Level::Debug),
            "inf" | "info" => Ok(Level::Info),
            "wrn" | "warn" | "warning" => Ok(Level::Warn),
            "err" | "error" => Ok(Level::Error),
            "ftl" | "fatal" => Ok(Level::Fatal),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Level::Error,
            log::Level::Warn => Level::Warn,
            log::Level::Info => Level::Info,
            // No trace severity here; fold it into debug
            log::Level::Debug | log::Level::Trace => Level::Debug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_labels_are_non_empty_and_unique() {
        let labels: HashSet<&str> = Level::ALL.iter().map(|l| l.label()).collect();
        assert_eq!(labels.len(), Level::ALL.len());
        assert!(labels.iter().all(|l| !l.is_empty()));
    }

    #[test]
    fn test_levels_are_ordered_by_urgency() {
        let mut sorted = Level::ALL;
        sorted.sort();
        assert_eq!(sorted, Level::ALL);
        assert!(Level::Debug < Level::Fatal);
    }

    #[test]
    fn test_parse_accepts_labels_and_names() {
        assert_eq!("INF".parse::<Level>().unwrap(), Level::Info);
        assert_eq!("warning".parse::<Level>().unwrap(), Level::Warn);
        assert_eq!(" Fatal ".parse::<Level>().unwrap(), Level::Fatal);
        assert!("verbose".parse::<Level>().is_err());
    }

    #[test]
    fn test_from_log_level_folds_trace() {
        assert_eq!(Level::from(log::Level::Trace), Level::Debug);
        assert_eq!(Level::from(log::Level::Error), Level::Error);
    }

    #[test]
    fn test_only_error_and_fatal_want_trace() {
        let tracing: Vec<Level> = Level::ALL
            .iter()
            .copied()
            .filter(|l| l.wants_trace())
            .collect();
        assert_eq!(tracing, vec![Level::Error, Level::Fatal]);
    }
}
