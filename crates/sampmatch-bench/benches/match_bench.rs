//! Sequence comparison benchmarks.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use libc::c_int;

use sampmatch_abi::sampmatch_match;
use sampmatch_core::{SequenceMatcher, SilentReporter};
use sampmatch_membrane::{BoundaryMode, FloatEnv, HardwareEnv, SimulatedEnv};

const SIZES: &[usize] = &[4, 64, 1024, 16384];

fn waveform(len: usize) -> Vec<f64> {
    (0..len).map(|i| (i as f64 * 0.01).sin()).collect()
}

fn bench_full_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_identical");

    for &size in SIZES {
        let samples = waveform(size);
        group.throughput(Throughput::Elements(size as u64));

        let hardware = HardwareEnv::current();
        hardware.reset_all();
        group.bench_with_input(BenchmarkId::new("hardware", size), &size, |b, &n| {
            let mut matcher =
                SequenceMatcher::with_boundary(&hardware, SilentReporter, BoundaryMode::Inclusive);
            b.iter(|| black_box(matcher.matches(black_box(&samples), &samples, n, 0.0)));
        });

        let simulated = SimulatedEnv::new();
        group.bench_with_input(BenchmarkId::new("simulated", size), &size, |b, &n| {
            let mut matcher =
                SequenceMatcher::with_boundary(&simulated, SilentReporter, BoundaryMode::Inclusive);
            b.iter(|| black_box(matcher.matches(black_box(&samples), &samples, n, 0.0)));
        });

        group.bench_with_input(BenchmarkId::new("abi", size), &size, |b, &n| {
            let bins = c_int::try_from(n).unwrap_or(c_int::MAX);
            b.iter(|| {
                // SAFETY: `samples` holds `n` doubles.
                let r = unsafe { sampmatch_match(samples.as_ptr(), samples.as_ptr(), bins, 0.0) };
                black_box(r);
            });
        });
    }
    group.finish();
}

fn bench_early_exit(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_first_pair_fails");
    let size = 16384;
    let test = waveform(size);
    let mut reference = test.clone();
    reference[0] += 1.0;

    let simulated = SimulatedEnv::new();
    group.bench_function("simulated", |b| {
        let mut matcher =
            SequenceMatcher::with_boundary(&simulated, SilentReporter, BoundaryMode::Inclusive);
        b.iter(|| black_box(matcher.matches(black_box(&test), &reference, size, 0.5)));
    });

    // Fault path: every call stops at pair 0 and invokes the reporter.
    let poisoned = SimulatedEnv::poisoned(sampmatch_membrane::FaultClass::Invalid);
    group.bench_function("poisoned", |b| {
        let mut matcher =
            SequenceMatcher::with_boundary(&poisoned, SilentReporter, BoundaryMode::Inclusive);
        b.iter(|| black_box(matcher.matches(black_box(&test), &test, size, 0.5)));
    });
    group.finish();
}

criterion_group!(benches, bench_full_match, bench_early_exit);
criterion_main!(benches);
