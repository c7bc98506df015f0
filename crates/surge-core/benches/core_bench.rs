//! Criterion benchmarks for surge-core
//!
//! Run with: cargo bench -p surge-core
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use surge_core::{
    DelayLine, Depopper, GateConfig, InlineRenderer, MeterGraph, MeterMethod, PixelCanvas,
    SurgeFilter, SurgeGate, SurgeSettings, derive_control,
};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

fn generate_test_signal(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect()
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("SurgeFilter");
    let settings = SurgeSettings {
        fade_out_ms: 50.0,
        ..SurgeSettings::default()
    };

    for &block_size in BLOCK_SIZES {
        let left = generate_test_signal(block_size);
        let right = generate_test_signal(block_size);

        group.bench_with_input(
            BenchmarkId::new("stereo", block_size),
            &block_size,
            |b, &n| {
                let mut filter = SurgeFilter::stereo(SAMPLE_RATE).unwrap();
                filter.update_settings(&settings);
                let mut out_l = vec![0.0; n];
                let mut out_r = vec![0.0; n];
                b.iter(|| {
                    filter.process(&[&left, &right], &mut [&mut out_l, &mut out_r]);
                    black_box(out_l[n - 1]);
                });
            },
        );

        group.bench_with_input(BenchmarkId::new("mono", block_size), &block_size, |b, &n| {
            let mut filter = SurgeFilter::mono(SAMPLE_RATE).unwrap();
            filter.update_settings(&settings);
            let mut out = vec![0.0; n];
            b.iter(|| {
                filter.process(&[&left], &mut [&mut out]);
                black_box(out[n - 1]);
            });
        });
    }

    group.bench_function("update_settings", |b| {
        let mut filter = SurgeFilter::stereo(SAMPLE_RATE).unwrap();
        b.iter(|| filter.update_settings(black_box(&settings)));
    });

    group.finish();
}

fn bench_depopper(c: &mut Criterion) {
    let mut group = c.benchmark_group("Depopper");

    for &block_size in BLOCK_SIZES {
        let signal = generate_test_signal(block_size);
        group.bench_with_input(
            BenchmarkId::new("process", block_size),
            &block_size,
            |b, &n| {
                let mut gate = Depopper::new(SAMPLE_RATE);
                gate.configure(&GateConfig::default());
                gate.reconfigure();
                let mut control = vec![0.0; n];
                let mut env = vec![0.0; n];
                b.iter(|| {
                    control.copy_from_slice(&signal);
                    gate.process(&mut env, &mut control);
                    black_box(control[n - 1]);
                });
            },
        );
    }

    group.finish();
}

fn bench_primitives(c: &mut Criterion) {
    let mut group = c.benchmark_group("Primitives");
    let signal = generate_test_signal(1024);
    let other = generate_test_signal(1024);

    group.bench_function("derive_control_stereo", |b| {
        let mut control = vec![0.0; 1024];
        b.iter(|| derive_control(&mut control, [black_box(&signal[..]), black_box(&other[..])]));
    });

    group.bench_function("delay_line", |b| {
        let mut line = DelayLine::new(24000);
        line.set_delay(12000);
        let mut out = vec![0.0; 1024];
        b.iter(|| line.process(&mut out, black_box(&signal)));
    });

    group.bench_function("meter_graph", |b| {
        let mut graph = MeterGraph::new(MeterMethod::AbsMaximum);
        graph.init(640, 375);
        b.iter(|| graph.process(black_box(&signal)));
    });

    group.finish();
}

fn bench_inline_display(c: &mut Criterion) {
    let mut filter = SurgeFilter::stereo(SAMPLE_RATE).unwrap();
    let signal = generate_test_signal(48000);
    let mut out_l = vec![0.0; 48000];
    let mut out_r = vec![0.0; 48000];
    filter.process(&[&signal, &signal], &mut [&mut out_l, &mut out_r]);

    c.bench_function("InlineRenderer/320x197", |b| {
        let mut renderer = InlineRenderer::new();
        let mut canvas = PixelCanvas::new();
        b.iter(|| renderer.render(black_box(&filter.graph_view()), &mut canvas, 320, 320));
    });
}

criterion_group!(
    benches,
    bench_filter,
    bench_depopper,
    bench_primitives,
    bench_inline_display,
);

criterion_main!(benches);
