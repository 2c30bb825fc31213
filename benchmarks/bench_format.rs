use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};

use happylog::{args, parse_theme, DevFormatter, Level, Theme, DARK_SCHEME};

fn bench_parse_theme(c: &mut Criterion) {
    c.bench_function("parse_theme_dark", |b| {
        b.iter(|| {
            black_box(parse_theme(black_box(DARK_SCHEME)));
        });
    });
}

fn bench_format_info_plain(c: &mut Criterion) {
    let formatter = DevFormatter::new("bench", Arc::new(Theme::plain()));
    let args = args!["user", "alice", "status", 200, "elapsed_ms", 12.5];
    let mut buf = String::with_capacity(256);
    c.bench_function("format_info_plain", |b| {
        b.iter(|| {
            buf.clear();
            formatter.format(&mut buf, Level::Info, black_box("request served"), &args);
            black_box(&buf);
        });
    });
}

fn bench_format_info_colored(c: &mut Criterion) {
    let formatter = DevFormatter::new("bench", Arc::new(Theme::dark()));
    let args = args!["user", "alice", "status", 200, "elapsed_ms", 12.5];
    let mut buf = String::with_capacity(256);
    c.bench_function("format_info_colored", |b| {
        b.iter(|| {
            buf.clear();
            formatter.format(&mut buf, Level::Info, black_box("request served"), &args);
            black_box(&buf);
        });
    });
}

fn bench_format_warn_with_caller(c: &mut Criterion) {
    let formatter = DevFormatter::new("bench", Arc::new(Theme::plain())).with_entry_depth(1);
    let mut buf = String::with_capacity(512);
    c.bench_function("format_warn_with_caller", |b| {
        b.iter(|| {
            buf.clear();
            formatter.format(&mut buf, Level::Warn, black_box("slow request"), &[]);
            black_box(&buf);
        });
    });
}

criterion_group!(
    benches,
    bench_parse_theme,
    bench_format_info_plain,
    bench_format_info_colored,
    bench_format_warn_with_caller
);
criterion_main!(benches);
