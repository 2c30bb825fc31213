#![no_main]

use happylog::{parse_theme, ThemeSpec};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Malformed specs must degrade to empty colors, never panic.
        let spec = ThemeSpec::parse(input);
        let theme = parse_theme(input);
        if spec.is_empty() {
            assert_eq!(theme.key, "");
            assert_eq!(theme.error, "");
        }
    }
});
