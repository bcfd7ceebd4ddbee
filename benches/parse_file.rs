//! Benchmarks for file-level parsing.
//!
//! Run with: cargo bench --bench parse_file

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};

use jrdb_parser::app::services::byte_source::decode_bytes;
use jrdb_parser::{FormatTag, JrdbParser, parse_content};

const LINES: usize = 2_000;

/// `count` lines of `width` characters, each starting with a distinct race key
fn synthetic_file(width: usize, count: usize, fill: impl Fn(usize) -> String) -> String {
    (0..count)
        .map(|i| {
            let race = i % 12 + 1;
            let day = i / 12 % 9 + 1;
            let mut line = format!("0626{}{}{:02}{}", i / 108 % 9 + 1, day, race, fill(i));
            let padding = width.saturating_sub(line.chars().count());
            line.push_str(&" ".repeat(padding));
            line
        })
        .collect::<Vec<_>>()
        .join("\r\n")
}

fn bench_race_program(c: &mut Criterion) {
    let content = synthetic_file(110, LINES, |_| "202601041025120011".to_string());

    let mut group = c.benchmark_group("race_program");
    group.throughput(Throughput::Elements(LINES as u64));
    group.bench_function("parse_content", |b| {
        b.iter(|| parse_content(black_box(&content), "BAA"))
    });
    group.finish();
}

fn bench_horse_stats(c: &mut Criterion) {
    let content = synthetic_file(310, LINES, |i| {
        format!("{:02}{}", i % 18 + 1, "005003002010".repeat(23))
    });
    let parser = JrdbParser::new(FormatTag::Kka);

    let mut group = c.benchmark_group("horse_stats");
    group.throughput(Throughput::Elements(LINES as u64));
    group.bench_function("parse_content", |b| {
        b.iter(|| parser.parse_content(black_box(&content)))
    });
    group.finish();
}

fn bench_decode_bytes(c: &mut Criterion) {
    let (bytes, _, _) = encoding_rs::SHIFT_JIS.encode(&"中山芝1200ｍ　良 ".repeat(4_000));
    let bytes = bytes.into_owned();

    let mut group = c.benchmark_group("byte_source");
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("decode_cp932", |b| b.iter(|| decode_bytes(black_box(&bytes))));
    group.finish();
}

criterion_group!(
    benches,
    bench_race_program,
    bench_horse_stats,
    bench_decode_bytes
);
criterion_main!(benches);
