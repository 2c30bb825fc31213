use is_terminal::IsTerminal;

use crate::config::ColorMode;

/// Check if stdout is connected to a TTY
pub fn is_stdout_tty() -> bool {
    std::io::stdout().is_terminal()
}

/// Determine if colors should be used based on the color mode and environment
pub fn should_use_colors_with_mode(color_mode: &ColorMode) -> bool {
    match color_mode {
        ColorMode::Never => false,
        ColorMode::Always => {
            // Even with Always, respect NO_COLOR for accessibility
            std::env::var_os("NO_COLOR").is_none()
        }
        ColorMode::Auto => should_use_colors_auto(),
    }
}

/// Auto color detection logic
fn should_use_colors_auto() -> bool {
    // Respect NO_COLOR environment variable (https://no-color.org/)
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }

    // FORCE_COLOR for CI environments that render escapes without a TTY
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }

    is_stdout_tty()
}
