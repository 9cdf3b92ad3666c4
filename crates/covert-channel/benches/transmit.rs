use covert_channel::bits;
use covert_channel::{Session, SessionConfig};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_message(len: usize) -> Vec<u8> {
    // printable ASCII, never the zero sentinel
    (0..len).map(|i| b' ' + (i % 95) as u8).collect()
}

// ---------------------------------------------------------------------------
// Benchmark: full transmission over two threads
// ---------------------------------------------------------------------------

fn bench_transmit(c: &mut Criterion) {
    let session = Session::new(SessionConfig::default());

    let mut group = c.benchmark_group("transmit");
    for len in [1usize, 16, 64] {
        let message = make_message(len);
        group.throughput(Throughput::Elements(bits::frame_len(len) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &message, |b, msg| {
            b.iter(|| black_box(session.transmit(msg).unwrap()));
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: tracing overhead
// ---------------------------------------------------------------------------

fn bench_recorded_vs_plain(c: &mut Criterion) {
    let message = make_message(16);
    let plain = Session::default();
    let recorded = Session::new(SessionConfig {
        record_trace: true,
        ..SessionConfig::default()
    });

    let mut group = c.benchmark_group("trace_overhead");
    group.bench_function("plain", |b| {
        b.iter(|| black_box(plain.transmit(&message).unwrap()));
    });
    group.bench_function("recorded", |b| {
        b.iter(|| black_box(recorded.transmit(&message).unwrap()));
    });
    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: bit framing alone
// ---------------------------------------------------------------------------

fn bench_framing(c: &mut Criterion) {
    let message = make_message(4096);
    c.bench_function("frame_4k", |b| {
        b.iter(|| black_box(bits::frame(black_box(&message))));
    });
}

criterion_group!(benches, bench_transmit, bench_recorded_vs_plain, bench_framing);
criterion_main!(benches);
