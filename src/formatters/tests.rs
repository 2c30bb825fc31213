use super::*;
use crate::colors::{Theme, RESET};
use crate::error::TracedError;
use crate::level::Level;
use crate::stack::Frame;
use crate::value::Value;
use crate::args;
use std::sync::Arc;

fn plain(name: &str) -> DevFormatter {
    DevFormatter::new(name, Arc::new(Theme::plain()))
}

fn line(formatter: &DevFormatter, level: Level, msg: &str, args: &[Value]) -> String {
    let mut buf = String::new();
    formatter.format(&mut buf, level, msg, args);
    buf
}

/// Byte offset of each needle, asserting they appear in the given order
fn assert_in_order(haystack: &str, needles: &[&str]) {
    let mut from = 0;
    for needle in needles {
        match haystack[from..].find(needle) {
            Some(pos) => from += pos + needle.len(),
            None => panic!("expected {:?} after byte {} in {:?}", needle, from, haystack),
        }
    }
}

#[test]
fn test_info_event_end_to_end() {
    let out = line(&plain("api"), Level::Info, "server started", &args!["port", 8080]);

    assert!(out.starts_with("t="));
    assert!(out.ends_with('\n'));
    assert_eq!(out.matches('\n').count(), 1);
    assert_in_order(&out, &["t=", " n=api", " l=INF", " m=server started", " port=8080"]);
    assert!(!out.contains(" c="));

    let stamp = &out[2..28];
    assert!(
        chrono::NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).is_ok(),
        "bad timestamp {:?}",
        stamp
    );
}

#[test]
fn test_no_args_ends_after_message() {
    let out = line(&plain("api"), Level::Debug, "tick", &[]);
    assert!(out.ends_with(" l=DBG m=tick\n"));
}

#[test]
fn test_pairs_keep_input_order() {
    let out = line(
        &plain("db"),
        Level::Info,
        "query",
        &args!["table", "users", "rows", 12, "cached", false],
    );
    assert!(out.ends_with(" m=query table=users rows=12 cached=false\n"));
}

#[test]
fn test_imbalanced_pairs_are_dumped_raw() {
    let out = line(&plain("api"), Level::Info, "oops", &args!["a", 1, "b"]);
    assert!(out.ends_with(" m=oops IMBALANCED_PAIRS=>a 1 b\n"), "{:?}", out);
    assert!(!out.contains("a=1"));
}

#[test]
fn test_imbalanced_pairs_colors() {
    let formatter = DevFormatter::new("api", Arc::new(Theme::dark()));
    let out = line(&formatter, Level::Info, "oops", &args!["a"]);
    assert!(out.ends_with(&format!(" \x1b[91m{}\x1b[93ma{}\n", IMBALANCED_MARKER, RESET)));
}

#[test]
fn test_non_text_key_is_flagged() {
    let out = line(&plain("api"), Level::Info, "m", &args![42, "v"]);
    assert!(out.ends_with(" BADKEY_NAME_1=42 BADKEY_VALUE_2=v\n"), "{:?}", out);
}

#[test]
fn test_bad_key_positions_follow_argument_index() {
    let out = line(&plain("api"), Level::Info, "m", &args!["ok", 1, 7.5, "x"]);
    assert!(out.ends_with(" ok=1 BADKEY_NAME_3=7.5 BADKEY_VALUE_4=x\n"), "{:?}", out);
}

#[test]
fn test_bad_key_uses_error_color() {
    let formatter = DevFormatter::new("api", Arc::new(Theme::dark()));
    let out = line(&formatter, Level::Info, "m", &args![true, 1]);
    let key = "\x1b[96mBADKEY_NAME_1\x1b[0m=";
    assert!(out.contains(&format!("{}\x1b[91mtrue\x1b[0m", key)), "{:?}", out);
}

#[test]
fn test_colored_fields() {
    let formatter = DevFormatter::new("api", Arc::new(Theme::dark()));
    let out = line(&formatter, Level::Info, "hi", &args!["k", "v"]);

    assert!(out.starts_with("\x1b[96mt\x1b[0m="));
    assert!(out.contains(" \x1b[96mn\x1b[0m=api"));
    assert!(out.contains(" \x1b[96ml\x1b[0m=\x1b[92mINF\x1b[0m"));
    assert!(out.contains(" \x1b[96mm\x1b[0m=\x1b[92mhi\x1b[0m"));
    // value role has no color in the dark palette
    assert!(out.ends_with(" \x1b[96mk\x1b[0m=v\n"));
}

#[test]
fn test_custom_separator() {
    let formatter = plain("api").with_separator("\t");
    let out = line(&formatter, Level::Info, "hi", &args!["k", "v"]);
    assert!(out.ends_with("\tn=api\tl=INF\tm=hi\tk=v\n"));
    assert!(!out.starts_with('\t'));
}

#[test]
fn test_debug_and_info_have_no_context() {
    for level in [Level::Debug, Level::Info] {
        let out = line(&plain("api").with_entry_depth(1), level, "quiet", &[]);
        assert!(!out.contains(" c="), "{:?}", out);
    }
}

#[test]
fn test_warn_context_is_one_caller_frame() {
    let formatter = plain("api").with_entry_depth(1);
    let mut buf = String::new();
    formatter.format(&mut buf, Level::Warn, "careful", &[]);

    let context = buf
        .split(" c=")
        .nth(1)
        .expect("warn should carry context")
        .trim_end_matches('\n');
    assert!(!context.contains('\n'));
    assert!(
        context.contains("test_warn_context_is_one_caller_frame"),
        "{:?}",
        context
    );
}

#[test]
fn test_error_context_starts_at_caller() {
    let formatter = plain("api").with_entry_depth(1);
    let mut buf = String::new();
    formatter.format(&mut buf, Level::Error, "failed", &[]);

    let context = buf.split(" c=").nth(1).expect("error should carry context");
    assert!(context.contains("test_error_context_starts_at_caller"));
    assert!(!context.contains("DevFormatter::format"));
}

#[inline(never)]
fn warn_through_helper(formatter: &DevFormatter, buf: &mut String) {
    formatter.format(buf, Level::Warn, "via helper", &[]);
}

#[test]
fn test_caller_skip_steps_over_helpers() {
    let mut buf = String::new();
    warn_through_helper(&plain("api").with_caller_skip(1), &mut buf);
    let context = buf.split(" c=").nth(1).expect("warn should carry context");
    assert!(
        context.contains("test_caller_skip_steps_over_helpers"),
        "{:?}",
        context
    );

    let mut buf = String::new();
    warn_through_helper(&plain("api"), &mut buf);
    let context = buf.split(" c=").nth(1).expect("warn should carry context");
    assert!(context.contains("warn_through_helper"), "{:?}", context);
}

#[test]
fn test_entry_depth_does_not_shift_named_frames() {
    // Frames are recognized by name, so a wrong depth is harmless when
    // symbols are present
    let mut buf = String::new();
    plain("api")
        .with_entry_depth(7)
        .format(&mut buf, Level::Warn, "careful", &[]);
    let context = buf.split(" c=").nth(1).expect("warn should carry context");
    assert!(
        context.contains("test_entry_depth_does_not_shift_named_frames"),
        "{:?}",
        context
    );
}

#[test]
fn test_warn_with_shallow_stack_degrades() {
    let formatter = plain("api").with_caller_skip(10_000);
    let out = line(&formatter, Level::Warn, "careful", &[]);
    assert!(!out.contains(" c="));
    assert!(out.ends_with(" l=WRN m=careful\n"));

    let out = line(&formatter, Level::Fatal, "dead", &[]);
    assert!(!out.contains(" c="));
    assert!(out.ends_with(" l=FTL m=dead\n"));
}

#[test]
fn test_plain_error_value_gets_stack() {
    let formatter = plain("api").with_entry_depth(1);
    let mut buf = String::new();
    formatter.format(
        &mut buf,
        Level::Info,
        "dial",
        &args!["err", Value::error("connection refused")],
    );

    assert!(buf.contains(" err=connection refused\n\t"), "{:?}", buf);
    let stack = buf.split("connection refused\n").nth(1).unwrap_or("");
    assert!(
        stack.contains("test_plain_error_value_gets_stack"),
        "{:?}",
        stack
    );
}

#[test]
fn test_traced_error_is_not_captured_again() {
    let traced = TracedError::with_frames(
        "disk full",
        vec![Frame::new("app::save", "src/save.rs", 10)],
    );
    let out = line(&plain("api"), Level::Info, "write", &args!["err", traced]);
    assert!(out.ends_with(" err=disk full\n\tsrc/save.rs:10 (app::save)\n\n"), "{:?}", out);
    assert_eq!(out.matches('\t').count(), 1);
}

#[test]
fn test_error_value_uses_error_color() {
    let formatter = DevFormatter::new("api", Arc::new(Theme::dark()));
    let traced = TracedError::with_frames("boom", vec![Frame::new("app::f", "src/f.rs", 1)]);
    let out = line(&formatter, Level::Info, "m", &args!["err", traced]);
    assert!(out.contains("\x1b[91mboom\n\tsrc/f.rs:1 (app::f)\n\x1b[0m"), "{:?}", out);
}

#[test]
fn test_write_field_plain_value() {
    let formatter = plain("api");
    let mut buf = String::new();
    formatter.write_field(&mut buf, "user", &Value::from("alice"), "");
    assert_eq!(buf, " user=alice");
}

#[test]
fn test_write_field_applies_color_around_value() {
    let formatter = DevFormatter::new("api", Arc::new(Theme::dark()));
    let mut buf = String::new();
    formatter.write_field(&mut buf, "n", &Value::from(3), "\x1b[31m");
    assert_eq!(buf, " \x1b[96mn\x1b[0m=\x1b[31m3\x1b[0m");
}

#[test]
fn test_json_value() {
    let out = line(
        &plain("api"),
        Level::Info,
        "m",
        &args!["req", serde_json::json!({"id": 7})],
    );
    assert!(out.ends_with(" req={\"id\":7}\n"), "{:?}", out);
}
