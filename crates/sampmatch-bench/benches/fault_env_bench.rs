//! Fault flag access benchmarks.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use sampmatch_membrane::{FaultClass, FloatEnv, HardwareEnv, SimulatedEnv};

fn bench_flag_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("fault_flag_read");

    let hardware = HardwareEnv::current();
    hardware.reset_all();
    group.bench_function("hardware_is_raised", |b| {
        b.iter(|| black_box(hardware.is_raised(black_box(FaultClass::Invalid))));
    });
    group.bench_function("hardware_raised_all", |b| {
        b.iter(|| black_box(hardware.raised()));
    });

    let simulated = SimulatedEnv::new();
    group.bench_function("simulated_is_raised", |b| {
        b.iter(|| black_box(simulated.is_raised(black_box(FaultClass::Invalid))));
    });
    group.finish();
}

fn bench_raise_reset(c: &mut Criterion) {
    let mut group = c.benchmark_group("fault_flag_raise_reset");

    let hardware = HardwareEnv::current();
    group.bench_function("hardware", |b| {
        b.iter(|| {
            hardware.raise(FaultClass::Invalid.into());
            hardware.reset_all();
        });
    });

    let simulated = SimulatedEnv::new();
    group.bench_function("simulated", |b| {
        b.iter(|| {
            simulated.raise(FaultClass::Invalid.into());
            simulated.reset_all();
        });
    });
    group.finish();
}

criterion_group!(benches, bench_flag_reads, bench_raise_reset);
criterion_main!(benches);
