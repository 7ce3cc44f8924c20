//! Benchmarks for the per-frame binding overhead: validation, channel split
//! and merge, sample conversion and locking.

use std::hint::black_box;

use apm_bridge::config::{EchoCanceller, NoiseSuppression, StreamDelay};
use apm_bridge::sample::{f32_to_s16_slice, s16_to_f32_slice};
use apm_bridge::{Config, DefaultEngine, Handle, Processor, frame_len};
use criterion::{Criterion, criterion_group, criterion_main};

fn config(channels: u16) -> Config {
    Config {
        echo_canceller: Some(EchoCanceller {
            stream_delay: StreamDelay::Fixed { ms: 50 },
            ..Default::default()
        }),
        noise_suppression: Some(NoiseSuppression::default()),
        capture_channels: channels,
        render_channels: channels,
        ..Default::default()
    }
}

fn sine_frame(channels: usize) -> Vec<f32> {
    (0..frame_len(channels))
        .map(|i| (i as f32 * 0.01).sin() * 0.1)
        .collect()
}

fn bench_handle(c: &mut Criterion) {
    let mut group = c.benchmark_group("handle");

    for (name, channels) in [("mono", 1u16), ("stereo", 2)] {
        let mut handle = Handle::<DefaultEngine>::create(&config(channels)).unwrap();
        let nch = usize::from(channels);
        let frame = sine_frame(nch);
        let mut buf = frame.clone();

        group.bench_function(format!("capture_f32_{name}"), |b| {
            b.iter(|| {
                buf.copy_from_slice(&frame);
                handle
                    .process_capture_f32(black_box(&mut buf), nch)
                    .unwrap();
            });
        });

        let pcm = f32_to_s16_slice(&frame);
        let mut buf = pcm.clone();
        group.bench_function(format!("capture_i16_{name}"), |b| {
            b.iter(|| {
                buf.copy_from_slice(&pcm);
                handle
                    .process_capture_i16(black_box(&mut buf), nch)
                    .unwrap();
            });
        });
    }

    group.finish();
}

fn bench_processor(c: &mut Criterion) {
    let mut group = c.benchmark_group("processor");
    let apm = Processor::<DefaultEngine>::new(config(1)).unwrap();
    let frame = sine_frame(1);
    let pcm = f32_to_s16_slice(&frame);

    group.bench_function("render_then_capture", |b| {
        b.iter(|| {
            apm.process_render(black_box(&frame)).unwrap();
            black_box(apm.process_capture(black_box(&frame)).unwrap());
        });
    });

    group.bench_function("capture_i16", |b| {
        b.iter(|| black_box(apm.process_capture_i16(black_box(&pcm)).unwrap()));
    });

    group.finish();
}

fn bench_conversion(c: &mut Criterion) {
    let frame = sine_frame(2);
    let pcm = f32_to_s16_slice(&frame);

    c.bench_function("f32_to_s16_stereo", |b| {
        b.iter(|| black_box(f32_to_s16_slice(black_box(&frame))));
    });
    c.bench_function("s16_to_f32_stereo", |b| {
        b.iter(|| black_box(s16_to_f32_slice(black_box(&pcm))));
    });
}

criterion_group!(benches, bench_handle, bench_processor, bench_conversion);
criterion_main!(benches);
