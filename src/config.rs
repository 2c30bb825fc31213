use anyhow::{anyhow, bail, Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::colors::{parse_theme, Theme, DARK_SCHEME};
use crate::formatters::DEFAULT_SEPARATOR;

pub const ENV_COLORS: &str = "HAPPYLOG_COLORS";
pub const ENV_COLOR_MODE: &str = "HAPPYLOG_COLOR";
pub const ENV_SEPARATOR: &str = "HAPPYLOG_SEPARATOR";

/// Color mode enumeration
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl std::str::FromStr for ColorMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Ok(ColorMode::Auto),
            "always" | "force" => Ok(ColorMode::Always),
            "never" | "off" => Ok(ColorMode::Never),
            other => Err(anyhow!(
                "invalid color mode '{}' (expected auto, always or never)",
                other
            )),
        }
    }
}

/// Formatting configuration shared by every logger of a process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub color: ColorMode,
    pub theme_spec: String,
    pub separator: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            color: ColorMode::Auto,
            theme_spec: DARK_SCHEME.to_string(),
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

impl LogConfig {
    /// Location of the user config file, e.g. `~/.config/happylog/config.ini`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("happylog").join("config.ini"))
    }

    /// Defaults, overridden by the user config file if present, then by the
    /// environment. A broken config file is reported and skipped.
    pub fn load() -> Self {
        let mut config = match Self::default_path() {
            Some(path) if path.exists() => Self::load_from_path(&path).unwrap_or_else(|e| {
                eprintln!("happylog: warning: {:#}", e);
                Self::default()
            }),
            _ => Self::default(),
        };
        config.apply_env();
        config
    }

    /// Defaults overridden by the environment only
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Apply `HAPPYLOG_*` variables. Invalid values are reported and ignored
    /// so that the environment can never stop logging.
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(colors) = lookup(ENV_COLORS) {
            if !colors.is_empty() {
                self.theme_spec = colors;
            }
        }
        if let Some(mode) = lookup(ENV_COLOR_MODE) {
            match mode.parse::<ColorMode>() {
                Ok(mode) => self.color = mode,
                Err(e) => eprintln!("happylog: warning: {}: {}", ENV_COLOR_MODE, e),
            }
        }
        if let Some(separator) = lookup(ENV_SEPARATOR) {
            self.separator = separator;
        }
    }

    /// Read a config file of `key = value` lines. `#` and `;` start comments,
    /// `[section]` headers are accepted and ignored.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut config = Self::default();

        for (index, raw_line) in content.lines().enumerate() {
            let line_number = index + 1;
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            if line.starts_with('[') && line.ends_with(']') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                bail!("line {}: expected 'key = value', got '{}'", line_number, line);
            };
            let value = unquote(value.trim());

            match key.trim() {
                "colors" | "theme" => config.theme_spec = value.to_string(),
                "color" => {
                    config.color = value
                        .parse::<ColorMode>()
                        .with_context(|| format!("line {}", line_number))?;
                }
                "separator" => config.separator = value.to_string(),
                other => bail!("line {}: unknown key '{}'", line_number, other),
            }
        }

        Ok(config)
    }

    pub fn use_colors(&self) -> bool {
        crate::tty::should_use_colors_with_mode(&self.color)
    }

    /// Theme to format with: the configured palette, or no colors at all
    /// when the color mode and terminal say so
    pub fn theme(&self) -> Arc<Theme> {
        if self.use_colors() {
            Arc::new(parse_theme(&self.theme_spec))
        } else {
            Arc::new(Theme::plain())
        }
    }
}

/// Strip one pair of matching surrounding quotes, keeping inner whitespace
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
