/// Benchmarks for dataframe decoding.
///
/// Covers the three hot paths of a table fetch: parsing the response body into a
/// dataframe, binding every row into a typed record, and decoding a single column.
use std::fmt::Write as _;

use blockwatch_client_sdk::blockchain::Block;
use blockwatch_client_sdk::frame::{Dataframe, DescriptorCache};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

const COLUMNS: &str = r#"[
    {"name": "Height", "code": "height", "type": "uint64"},
    {"name": "Time", "code": "time", "type": "datetime"},
    {"name": "Hash", "code": "hash", "type": "string"},
    {"name": "Orphan", "code": "is_orphan", "type": "boolean"},
    {"name": "Version", "code": "version", "type": "int64"},
    {"name": "Transactions", "code": "n_tx", "type": "uint64"},
    {"name": "Volume", "code": "volume", "type": "float64"},
    {"name": "Fee", "code": "fee", "type": "float64"},
    {"name": "Coinbase", "code": "coinbase", "type": "bytes"}
]"#;

fn table_json(rows: u64) -> String {
    let mut data = String::new();
    for height in 0..rows {
        if height > 0 {
            data.push(',');
        }
        write!(
            data,
            r#"[{height},{time},"{height:064x}",false,536870912,{tx},{height}.5,0.{tx},"03{height:08x}"]"#,
            time = 1_231_006_505_000_u64 + height * 600_000,
            tx = height % 4000 + 1,
        )
        .expect("writing to a String cannot fail");
    }
    format!(r#"{{"columns": {COLUMNS}, "data": [{data}], "count": {rows}}}"#)
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame/parse");

    for rows in [10_u64, 1_000] {
        let json = table_json(rows);
        group.throughput(Throughput::Bytes(json.len() as u64));
        group.bench_with_input(BenchmarkId::new("Dataframe", rows), &json, |b, json| {
            b.iter(|| {
                let _: Dataframe = serde_json::from_str(std::hint::black_box(json))
                    .expect("Deserialization should succeed");
            });
        });
    }

    group.finish();
}

fn bench_bind(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame/bind");
    let cache = DescriptorCache::new();

    for rows in [10_u64, 1_000] {
        let mut frame: Dataframe =
            serde_json::from_str(&table_json(rows)).expect("Deserialization should succeed");
        group.throughput(Throughput::Elements(rows));
        group.bench_function(BenchmarkId::new("Block", rows), |b| {
            b.iter(|| {
                let blocks: Vec<Block> = frame
                    .decode_all(std::hint::black_box(&cache))
                    .expect("Decoding should succeed");
                blocks
            });
        });
    }

    group.finish();
}

fn bench_column(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame/column");

    let frame: Dataframe =
        serde_json::from_str(&table_json(1_000)).expect("Deserialization should succeed");
    group.throughput(Throughput::Elements(1_000));

    group.bench_function("uint64", |b| {
        b.iter(|| {
            frame
                .uint64_column(std::hint::black_box(0))
                .expect("Decoding should succeed")
        });
    });
    group.bench_function("string", |b| {
        b.iter(|| {
            frame
                .string_column(std::hint::black_box(2))
                .expect("Decoding should succeed")
        });
    });
    group.bench_function("by_code", |b| {
        b.iter(|| {
            frame
                .column(std::hint::black_box("volume"))
                .expect("Decoding should succeed")
        });
    });

    group.finish();
}

criterion_group!(frame_benches, bench_parse, bench_bind, bench_column);
criterion_main!(frame_benches);
