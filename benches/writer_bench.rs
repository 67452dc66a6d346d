//! Criterion benchmark untuk Tape Writer
//!
//! Run dengan: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use structtape::protocol::{begin_len, field_len, END_LEN};
use structtape::{parse_regions, Writer};

fn bench_records(c: &mut Criterion) {
    let mut group = c.benchmark_group("writer");
    let record_bytes = begin_len("Point") + 2 * field_len("x", "int") + END_LEN;
    group.throughput(Throughput::Bytes(record_bytes as u64));

    // Satu struct lengkap: START + 2 FIELD + END
    group.bench_function("describe_point", |b| {
        let mut buf = vec![0u8; 4096];
        b.iter(|| {
            let mut w = Writer::new(&mut buf);
            w.begin(black_box("Point"), black_box(0x1000), 8).ok();
            w.field("x", "int", 0x1000, 4).ok();
            w.field("y", "int", 0x1004, 4).ok();
            w.end().ok();
            black_box(w.len())
        });
    });

    // Writer yang sudah error: semua call harus short-circuit
    group.bench_function("sticky_error", |b| {
        let mut buf = [0u8; 4];
        b.iter(|| {
            let mut w = Writer::new(&mut buf);
            for _ in 0..16 {
                w.begin(black_box("Point"), 0x1000, 8).ok();
            }
            black_box(w.has_error())
        });
    });

    group.finish();
}

fn bench_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill");

    for capacity in [1024usize, 64 * 1024, 1024 * 1024].iter() {
        group.throughput(Throughput::Bytes(*capacity as u64));
        group.bench_function(format!("fill_{}", capacity), |b| {
            let mut buf = vec![0u8; *capacity];
            b.iter(|| {
                let mut w = Writer::new(&mut buf);
                let mut addr = 0u64;
                while w.field("field", "int", addr, 4).is_ok() {
                    addr += 4;
                }
                black_box(w.len())
            });
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut buf = vec![0u8; 64 * 1024];
    let mut w = Writer::new(&mut buf);
    let mut addr = 0u64;
    while w.remaining() > 128 {
        w.begin("Point", addr, 8).ok();
        w.field("x", "int", addr, 4).ok();
        w.field("y", "int", addr + 4, 4).ok();
        w.end().ok();
        addr += 8;
    }
    w.close().ok();

    c.bench_function("parse_regions_64k", |b| {
        b.iter(|| black_box(parse_regions(black_box(&buf)).map(|r| r.len())));
    });
}

criterion_group!(benches, bench_records, bench_fill, bench_decode);
criterion_main!(benches);
