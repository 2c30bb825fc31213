#![no_main]

use std::sync::Arc;

use happylog::{DevFormatter, Level, Theme, Value};
use libfuzzer_sys::fuzz_target;

const MAX_ARGS: usize = 16;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let level = Level::ALL[data[0] as usize % Level::ALL.len()];
    let arg_count = (data[1] as usize) % (MAX_ARGS + 1);
    let Ok(text) = std::str::from_utf8(&data[2..]) else {
        return;
    };

    let mut parts = text.split('\u{0}');
    let message = parts.next().unwrap_or_default();
    let args: Vec<Value> = parts
        .take(arg_count)
        .enumerate()
        .map(|(i, part)| match i % 3 {
            0 => Value::from(part),
            1 => Value::from(part.len() as i64),
            _ => Value::error(part.to_string()),
        })
        .collect();

    let formatter = DevFormatter::new("fuzz", Arc::new(Theme::plain()));
    let mut buf = String::new();
    formatter.format(&mut buf, level, message, &args);
    assert!(buf.ends_with('\n'));
});
