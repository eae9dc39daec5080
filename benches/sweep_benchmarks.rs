// File: benches/sweep_benchmarks.rs

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use pickupkit::network::find_resonance_peak;
use pickupkit::prelude::*;
use pickupkit::transformer::{compute_bandwidth, TransformerLoad};
use pickupkit::unit::Scale;

fn strat_coil(cal: &Calibration) -> CoilComputedResults {
    let wire = WireParams {
        turns: 7600,
        ..WireParams::default()
    };
    compute_coil_results(&CoilGeometry::default(), &wire, cal).unwrap()
}

fn step_up() -> TransformerParams {
    let mut p = TransformerParams::default();
    p.enabled = true;
    p.winding.primary_turns = 200;
    p.winding.secondary_turns = 2000;
    p
}

// Response sweep cost against sweep density
fn bench_system_response(c: &mut Criterion) {
    let cal = Calibration::default();
    let coil = strat_coil(&cal);
    let load = LoadParams::default();

    let mut group = c.benchmark_group("system_response");
    group.measurement_time(Duration::from_secs(10));

    for &npts in &[100usize, 500, 1000, 5000] {
        let freqs = Frequency::from_log_range(20.0, 100e3, npts, Scale::Base);
        group.throughput(Throughput::Elements(npts as u64));
        group.bench_with_input(BenchmarkId::new("plain_load", npts), &freqs, |b, f| {
            b.iter(|| black_box(system_response(black_box(&coil), &load, f, &cal)));
        });

        let network = step_up().network(&cal);
        group.bench_with_input(BenchmarkId::new("with_transformer", npts), &freqs, |b, f| {
            b.iter(|| {
                black_box(pickupkit::network::transformer_system_response(
                    black_box(&coil),
                    &network,
                    &load,
                    f,
                    &cal,
                ))
            });
        });
    }
    group.finish();
}

// Loaded resonance search: sweep, golden refinement and half-power scan
fn bench_loaded_resonance(c: &mut Criterion) {
    let cal = Calibration::default();
    let coil = strat_coil(&cal);
    let load = LoadParams::default();
    let network = step_up().network(&cal);

    let mut group = c.benchmark_group("loaded_resonance");
    group.sample_size(50);

    group.bench_function("unloaded", |b| {
        b.iter(|| black_box(find_resonance_peak(black_box(&coil), &Unloaded, &cal)))
    });
    group.bench_function("default_load", |b| {
        b.iter(|| black_box(compute_loaded_results(black_box(&coil), &load, &cal)))
    });
    group.bench_function("transformer", |b| {
        let tl = TransformerLoad::new(&network, &load);
        b.iter(|| black_box(find_resonance_peak(black_box(&coil), &tl, &cal)))
    });
    group.finish();
}

// Transformer -3 dB search at increasing sweep density
fn bench_bandwidth(c: &mut Criterion) {
    let load = LoadParams::default();
    let params = step_up();

    let mut group = c.benchmark_group("transformer_bandwidth");
    for &npts in &[500usize, 1000, 2000] {
        let mut cal = Calibration::default();
        cal.bandwidth_sweep.points = npts;
        let network = params.network(&cal);
        group.throughput(Throughput::Elements(npts as u64));
        group.bench_with_input(BenchmarkId::from_parameter(npts), &cal, |b, cal| {
            b.iter(|| black_box(compute_bandwidth(black_box(&network), &load, cal)));
        });
    }
    group.finish();
}

criterion_group!(
    sweep_benches,
    bench_system_response,
    bench_loaded_resonance,
    bench_bandwidth
);
criterion_main!(sweep_benches);
