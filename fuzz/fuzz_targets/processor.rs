#![no_main]

use apm_bridge::config::{
    CaptureLevelAdjustment, EchoCanceller, GainController, HighPassFilter, NoiseSuppression,
    NoiseSuppressionLevel, StreamDelay,
};
use apm_bridge::{Config, Error, Processor, frame_len};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    capture_channels: u8,
    render_channels: u8,
    config: FuzzConfig,
    operations: Vec<FuzzOp>,
}

#[derive(Debug, Arbitrary)]
struct FuzzConfig {
    ec: Option<(bool, Option<i16>)>,
    gc: Option<(bool, f32, f32, f32)>,
    ns_level: Option<u8>,
    hpf: Option<bool>,
    cla: Option<(f32, f32)>,
}

#[derive(Debug, Arbitrary)]
enum FuzzOp {
    Capture(Vec<f32>),
    CaptureI16(Vec<i16>),
    Render(Vec<f32>),
    RenderI16(Vec<i16>),
    FullCapture(f32),
    FullRender(f32),
    Apply(FuzzConfig),
    Initialize,
    Delay(i32),
    AnalogLevel(i32),
    Muted(bool),
    KeyPressed(bool),
    Close,
}

fn to_config(c: &FuzzConfig, capture_channels: u16, render_channels: u16) -> Config {
    Config {
        echo_canceller: c.ec.map(|(mobile_mode, delay)| EchoCanceller {
            mobile_mode,
            stream_delay: delay.map_or(StreamDelay::Agnostic, |ms| StreamDelay::Fixed {
                ms: i32::from(ms),
            }),
        }),
        gain_controller: c
            .gc
            .map(|(input_volume_controller, headroom_db, max_gain_db, fixed_gain_db)| {
                GainController {
                    input_volume_controller,
                    headroom_db,
                    max_gain_db,
                    fixed_gain_db,
                }
            }),
        noise_suppression: c.ns_level.map(|level| NoiseSuppression {
            level: NoiseSuppressionLevel::from_i32(i32::from(level % 4)).unwrap_or_default(),
        }),
        high_pass_filter: c.hpf.map(|apply_in_full_band| HighPassFilter { apply_in_full_band }),
        capture_level_adjustment: c.cla.map(|(pre_gain_factor, post_gain_factor)| {
            CaptureLevelAdjustment {
                pre_gain_factor,
                post_gain_factor,
                analog_mic_gain_emulation: None,
            }
        }),
        capture_channels,
        render_channels,
    }
}

fuzz_target!(|input: FuzzInput| {
    let capture_channels = u16::from(input.capture_channels % 5);
    let render_channels = u16::from(input.render_channels % 5);
    let config = to_config(&input.config, capture_channels, render_channels);

    let apm = match Processor::<apm_bridge::DefaultEngine>::new(config) {
        Ok(apm) => apm,
        Err(err) => {
            assert!(
                capture_channels == 0
                    || render_channels == 0
                    || matches!(err, Error::Create { .. })
            );
            return;
        }
    };
    let capture_len = frame_len(usize::from(capture_channels));
    let render_len = frame_len(usize::from(render_channels));

    for op in input.operations {
        match op {
            FuzzOp::Capture(frame) => match apm.process_capture(&frame) {
                Ok(out) => assert_eq!(out.len(), capture_len),
                Err(err) => assert!(
                    frame.len() != capture_len
                        || apm.is_closed()
                        || matches!(err, Error::Engine { .. })
                ),
            },
            FuzzOp::CaptureI16(frame) => {
                let _ = apm.process_capture_i16(&frame);
            }
            FuzzOp::Render(frame) => {
                let _ = apm.process_render(&frame);
            }
            FuzzOp::RenderI16(frame) => {
                let _ = apm.process_render_i16(&frame);
            }
            FuzzOp::FullCapture(level) => {
                let _ = apm.process_capture(&vec![level; capture_len]);
            }
            FuzzOp::FullRender(level) => {
                let _ = apm.process_render(&vec![level; render_len]);
            }
            FuzzOp::Apply(next) => {
                let _ = apm.apply_config(to_config(&next, capture_channels, render_channels));
            }
            FuzzOp::Initialize => {
                let _ = apm.initialize();
            }
            FuzzOp::Delay(ms) => {
                let _ = apm.set_stream_delay(StreamDelay::Fixed { ms });
            }
            FuzzOp::AnalogLevel(level) => {
                let _ = apm.set_stream_analog_level(level);
            }
            FuzzOp::Muted(muted) => apm.set_output_muted(muted),
            FuzzOp::KeyPressed(pressed) => apm.set_key_pressed(pressed),
            FuzzOp::Close => apm.close(),
        }
        let _ = apm.statistics();
    }
});
