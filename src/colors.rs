use indexmap::IndexMap;

use crate::level::Level;

/// Palette for dark terminal backgrounds
pub const DARK_SCHEME: &str = "key=cyan+h,value,DBG,WRN=yellow+h,INF=green+h,ERR=red+h";

/// Palette for light terminal backgrounds
pub const LIGHT_SCHEME: &str = "key=cyan+b,value,DBG,WRN=yellow+b,INF=green+b,ERR=red+b";

pub const RESET: &str = "\x1b[0m";

const ESC_START: &str = "\x1b[";
const NORMAL_FG: u16 = 30;
const HIGH_FG: u16 = 90;
const NORMAL_BG: u16 = 40;
const HIGH_BG: u16 = 100;

/// Semantic role a color is looked up by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Key,
    Value,
    Debug,
    Info,
    Warn,
    Error,
    Reset,
}

impl Role {
    /// Role name as written in a theme spec
    pub fn spec_name(self) -> &'static str {
        match self {
            Role::Key => "key",
            Role::Value => "value",
            Role::Debug => "DBG",
            Role::Info => "INF",
            Role::Warn => "WRN",
            Role::Error => "ERR",
            Role::Reset => "reset",
        }
    }

    /// Role used to color events of a level; fatal shares the error color
    pub fn for_level(level: Level) -> Self {
        match level {
            Level::Debug => Role::Debug,
            Level::Info => Role::Info,
            Level::Warn => Role::Warn,
            Level::Error | Level::Fatal => Role::Error,
        }
    }
}

/// Raw `role=colorname` pairs in the order they were written
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeSpec {
    entries: IndexMap<String, String>,
}

impl ThemeSpec {
    /// Parse a comma separated `role=color` list. Never fails: empty segments
    /// are skipped and a segment without `=` names a role with no color.
    pub fn parse(spec: &str) -> Self {
        let mut entries = IndexMap::new();
        for segment in spec.split(',') {
            if segment.is_empty() {
                continue;
            }
            match segment.split_once('=') {
                Some((role, color)) => entries.insert(role.to_string(), color.to_string()),
                None => entries.insert(segment.to_string(), String::new()),
            };
        }
        Self { entries }
    }

    pub fn get(&self, role: &str) -> Option<&str> {
        self.entries.get(role).map(String::as_str)
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// ANSI color codes per role, built once and shared read-only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub key: String,   // Field names
    pub value: String, // Timestamp, logger name and user values
    pub debug: String,
    pub info: String,
    pub warn: String,
    pub error: String, // Error and fatal events, diagnostics
    pub reset: String,
}

impl Theme {
    pub fn from_spec(spec: &ThemeSpec) -> Self {
        let code = |role: Role| color_code(spec.get(role.spec_name()).unwrap_or(""));
        Self {
            key: code(Role::Key),
            value: code(Role::Value),
            debug: code(Role::Debug),
            info: code(Role::Info),
            warn: code(Role::Warn),
            error: code(Role::Error),
            reset: RESET.to_string(),
        }
    }

    /// Theme with every role empty, including reset, for uncolored output
    pub fn plain() -> Self {
        Self {
            key: String::new(),
            value: String::new(),
            debug: String::new(),
            info: String::new(),
            warn: String::new(),
            error: String::new(),
            reset: String::new(),
        }
    }

    pub fn dark() -> Self {
        parse_theme(DARK_SCHEME)
    }

    pub fn light() -> Self {
        parse_theme(LIGHT_SCHEME)
    }

    pub fn color_code(&self, role: Role) -> &str {
        match role {
            Role::Key => &self.key,
            Role::Value => &self.value,
            Role::Debug => &self.debug,
            Role::Info => &self.info,
            Role::Warn => &self.warn,
            Role::Error => &self.error,
            Role::Reset => &self.reset,
        }
    }

    pub fn level_color(&self, level: Level) -> &str {
        self.color_code(Role::for_level(level))
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

/// Build a theme straight from its textual spec
pub fn parse_theme(spec: &str) -> Theme {
    Theme::from_spec(&ThemeSpec::parse(spec))
}

/// Resolve a built-in palette name, or treat the input as a literal spec
pub fn named_scheme(name: &str) -> &str {
    match name {
        "dark" => DARK_SCHEME,
        "light" => LIGHT_SCHEME,
        other => other,
    }
}

fn color_index(name: &str) -> Option<u16> {
    match name {
        "black" => Some(0),
        "red" => Some(1),
        "green" => Some(2),
        "yellow" => Some(3),
        "blue" => Some(4),
        "magenta" => Some(5),
        "cyan" => Some(6),
        "white" => Some(7),
        "default" => Some(9),
        _ => None,
    }
}

/// Translate a color name such as `red+b` or `yellow+h:blue` into an SGR
/// escape sequence. Empty, `off` and unknown foreground names give "".
pub fn color_code(style: &str) -> String {
    match style {
        "" | "off" => return String::new(),
        "reset" => return RESET.to_string(),
        _ => {}
    }

    let (foreground, background) = match style.split_once(':') {
        Some((fg, bg)) => (fg, Some(bg)),
        None => (style, None),
    };
    let (fg_name, fg_attrs) = foreground.split_once('+').unwrap_or((foreground, ""));

    let mut params: Vec<String> = Vec::new();
    for (flag, code) in [('b', "1"), ('B', "5"), ('u', "4"), ('i', "7"), ('s', "9")] {
        if fg_attrs.contains(flag) {
            params.push(code.to_string());
        }
    }

    if let Ok(n) = fg_name.parse::<u8>() {
        params.push(format!("38;5;{}", n));
    } else if let Some(index) = color_index(fg_name) {
        let base = if fg_attrs.contains('h') { HIGH_FG } else { NORMAL_FG };
        params.push((base + index).to_string());
    } else {
        return String::new();
    }

    if let Some(bg) = background {
        let (bg_name, bg_attrs) = bg.split_once('+').unwrap_or((bg, ""));
        if let Ok(n) = bg_name.parse::<u8>() {
            params.push(format!("48;5;{}", n));
        } else if let Some(index) = color_index(bg_name) {
            let base = if bg_attrs.contains('h') { HIGH_BG } else { NORMAL_BG };
            params.push((base + index).to_string());
        }
    }

    format!("{}{}m", ESC_START, params.join(";"))
}
