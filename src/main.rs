use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::process;

use happylog::colors::named_scheme;
use happylog::{DevFormatter, LogConfig, DARK_SCHEME, LIGHT_SCHEME};

mod cli;

use cli::{parse_event_args, Cli};

/// Process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExitCode {
    Success = 0,
    GeneralError = 1,
    InvalidUsage = 2,
}

impl ExitCode {
    fn exit(self) -> ! {
        process::exit(self as i32)
    }
}

fn main() {
    // clap reports usage errors and exits with status 2 itself
    let cli = Cli::parse();

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("happylog: Error: {:#}", e);
            ExitCode::InvalidUsage.exit();
        }
    };

    if let Err(e) = run(cli, config) {
        eprintln!("happylog: Error: {:#}", e);
        ExitCode::GeneralError.exit();
    }
    ExitCode::Success.exit();
}

// Kept out of line: warning and error context name this function
#[inline(never)]
fn run(cli: Cli, config: LogConfig) -> Result<()> {
    let mut stdout = io::stdout().lock();

    if cli.print_themes {
        writeln!(stdout, "dark  {}", DARK_SCHEME)?;
        writeln!(stdout, "light {}", LIGHT_SCHEME)?;
        return Ok(());
    }

    let message = cli.message.as_deref().context("missing MESSAGE argument")?;
    let args = parse_event_args(&cli.args);

    // Context of warnings and errors points at this function
    let formatter = DevFormatter::new(cli.name.as_str(), config.theme())
        .with_separator(config.separator)
        .with_entry_depth(1);
    let mut line = String::new();
    formatter.format(&mut line, cli.level, message, &args);

    stdout.write_all(line.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

/// Config file, then environment, then command-line flags. Unlike the
/// library, a broken config file is an error here, default location or not.
fn resolve_config(cli: &Cli) -> Result<LogConfig> {
    let path = match &cli.config {
        Some(path) => Some(path.clone()),
        None => LogConfig::default_path().filter(|path| path.exists()),
    };
    let mut config = match path {
        Some(path) => LogConfig::load_from_path(&path)?,
        None => LogConfig::default(),
    };
    config.apply_env();

    if let Some(color) = cli.color {
        config.color = color;
    }
    if let Some(theme) = &cli.theme {
        config.theme_spec = named_scheme(theme).to_string();
    }
    if let Some(separator) = &cli.separator {
        config.separator = separator.clone();
    }
    Ok(config)
}
