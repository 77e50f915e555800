//! Emit throughput through the buffering sink into a no-op downstream sink,
//! for both engines.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use weir::{BufferedSink, OverflowPolicy, Sink, SinkError};

struct Null;

impl Sink<u64> for Null {
    fn consume(&mut self, _record: u64) -> Result<(), SinkError> {
        Ok(())
    }
}

const BATCH: u64 = 10_000;

fn bench_emit(c: &mut Criterion) {
    let mut group = c.benchmark_group("emit");
    group.throughput(Throughput::Elements(BATCH));

    group.bench_function(BenchmarkId::new("channel", BATCH), |b| {
        b.iter_batched(
            || {
                BufferedSink::builder()
                    .capacity(BATCH as usize)
                    .on_full(OverflowPolicy::Block)
                    .build(Null)
                    .unwrap()
            },
            |sink| {
                for record in 0..BATCH {
                    sink.emit(record);
                }
                sink.close();
            },
            criterion::BatchSize::PerIteration,
        )
    });

    group.bench_function(BenchmarkId::new("swap", BATCH), |b| {
        b.iter_batched(
            || {
                BufferedSink::builder()
                    .capacity(BATCH as usize)
                    .on_full(OverflowPolicy::Block)
                    .build_swap(Null)
                    .unwrap()
            },
            |sink| {
                for record in 0..BATCH {
                    sink.emit(record);
                }
                sink.close();
            },
            criterion::BatchSize::PerIteration,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_emit);
criterion_main!(benches);
