// CLI-specific types and structures
// Command-line interface definitions for the happylog binary

use clap::Parser;
use std::path::PathBuf;

use happylog::{ColorMode, Level, Value};

#[derive(Parser, Debug)]
#[command(name = "happylog")]
#[command(about = "Format one log event the way happylog loggers print it")]
#[command(
    long_about = "Format one log event the way happylog loggers print it\n\nARGS are key=value tokens; values are parsed as JSON when possible.\nA token without '=' is passed through as a single argument, so an odd\nnumber of them shows how unbalanced argument lists are reported."
)]
#[command(version)]
pub struct Cli {
    /// Message of the event
    #[arg(required_unless_present = "print_themes")]
    pub message: Option<String>,

    /// Key/value arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// Severity: debug, info, warn, error or fatal
    #[arg(short = 'l', long = "level", default_value = "info", help_heading = "Event Options")]
    pub level: Level,

    /// Logger name
    #[arg(short = 'n', long = "name", default_value = "~", help_heading = "Event Options")]
    pub name: String,

    /// When to use colors
    #[arg(long = "color", value_enum, help_heading = "Display Options")]
    pub color: Option<ColorMode>,

    /// Theme spec (role=color,...) or a built-in palette name: dark, light
    #[arg(long = "theme", help_heading = "Display Options")]
    pub theme: Option<String>,

    /// Text placed between fields
    #[arg(long = "separator", help_heading = "Display Options")]
    pub separator: Option<String>,

    /// Config file to read instead of the default location
    #[arg(long = "config", help_heading = "Configuration")]
    pub config: Option<PathBuf>,

    /// Print the built-in theme specs and exit
    #[arg(long = "print-themes", help_heading = "Configuration")]
    pub print_themes: bool,
}

/// Turn command-line tokens into log arguments: `key=value` gives two
/// entries, anything else one
pub fn parse_event_args(tokens: &[String]) -> Vec<Value> {
    let mut args = Vec::with_capacity(tokens.len() * 2);
    for token in tokens {
        match token.split_once('=') {
            Some((key, value)) => {
                args.push(Value::from(key));
                args.push(parse_value(value));
            }
            None => args.push(parse_value(token)),
        }
    }
    args
}

fn parse_value(raw: &str) -> Value {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(json) => Value::from(json),
        Err(_) => Value::from(raw),
    }
}
