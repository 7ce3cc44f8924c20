//! Minimal echo cancellation demo.
//!
//! Feeds synthetic stereo render and capture signals through a [`Processor`]
//! for one second and prints the resulting echo statistics.
//!
//! ```sh
//! RUST_LOG=debug cargo run -p apm-bridge --example simple
//! RUST_LOG=debug cargo run -p apm-bridge --features native --example simple
//! ```

use apm_bridge::config::{EchoCanceller, HighPassFilter, NoiseSuppression, StreamDelay};
use apm_bridge::{Config, Processor, SAMPLES_PER_FRAME, frame_len};
use tracing_subscriber::EnvFilter;

const NUM_CHANNELS: u16 = 2;
const NUM_FRAMES: usize = 100;

fn main() -> Result<(), apm_bridge::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config {
        echo_canceller: Some(EchoCanceller {
            stream_delay: StreamDelay::Fixed { ms: 50 },
            ..Default::default()
        }),
        noise_suppression: Some(NoiseSuppression::default()),
        high_pass_filter: Some(HighPassFilter::default()),
        capture_channels: NUM_CHANNELS,
        render_channels: NUM_CHANNELS,
        ..Default::default()
    };
    let apm: Processor = Processor::new(config)?;

    for frame in 0..NUM_FRAMES {
        let (render, capture) = sample_stereo_frame(frame);
        apm.process_render(&render)?;
        let out = apm.process_capture(&capture)?;
        assert_eq!(out.len(), capture.len());
    }

    let stats = apm.statistics();
    println!("echo return loss:             {:.2} dB", stats.echo_return_loss);
    println!(
        "echo return loss enhancement: {:.2} dB",
        stats.echo_return_loss_enhancement
    );
    println!("delay:                        {} ms", stats.delay_ms);

    apm.close();
    Ok(())
}

/// One interleaved stereo frame pair in which the microphone (capture)
/// picks up the speaker (render) output at a fifth of its level.
fn sample_stereo_frame(index: usize) -> (Vec<f32>, Vec<f32>) {
    let nch = usize::from(NUM_CHANNELS);
    let mut render = vec![0.0f32; frame_len(nch)];
    let mut capture = vec![0.0f32; frame_len(nch)];

    for i in 0..SAMPLES_PER_FRAME {
        let t = (index * SAMPLES_PER_FRAME + i) as f32;
        let far = [(t / 40.0).cos() * 0.4, (t / 40.0).cos() * 0.2];
        let near = [(t / 20.0).sin() * 0.1, (t / 20.0).sin() * 0.05];
        for ch in 0..nch {
            render[i * nch + ch] = far[ch];
            capture[i * nch + ch] = near[ch] + far[ch] * 0.2;
        }
    }

    (render, capture)
}
