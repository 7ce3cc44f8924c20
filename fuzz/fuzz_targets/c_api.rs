#![no_main]

use apm_bridge_ffi::*;
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    capture_channels: i8,
    render_channels: i8,
    operations: Vec<FuzzOp>,
    samples: Vec<f32>,
}

#[derive(Debug, Arbitrary)]
enum FuzzOp {
    Capture { channels: i8, short_by: u8 },
    CaptureInt { channels: i8 },
    Render { channels: i8 },
    RenderInt { channels: i8, short_by: u8 },
    ApplyConfig { ec: bool, delay: i16, ns: bool, ns_level: i32, gc: bool },
    Initialize,
    SetDelay(i32),
    SetAnalogLevel(i32),
    Muted(bool),
    KeyPressed(bool),
    Statistics,
    Destroy,
}

fuzz_target!(|input: FuzzInput| {
    let mut config = apmb_config_default();
    config.capture_channels = i32::from(input.capture_channels % 5);
    config.render_channels = i32::from(input.render_channels % 5);

    let mut err = APMB_OK;
    let mut apm = apmb_create(config, &mut err);
    if apm.is_null() {
        assert!(!apmb_is_success(err));
        return;
    }

    let per_frame = apmb_num_samples_per_frame();
    let mut floats: Vec<f32> = input
        .samples
        .iter()
        .copied()
        .cycle()
        .take(4 * per_frame)
        .collect();
    floats.resize(4 * per_frame, 0.0);
    let mut ints: Vec<i16> = floats
        .iter()
        .map(|s| (s.clamp(-1.0, 1.0) * 32767.0) as i16)
        .collect();

    for op in &input.operations {
        match *op {
            FuzzOp::Capture { channels, short_by } => {
                let ch = i32::from(channels % 5);
                let len = (ch.max(0) as usize * per_frame).saturating_sub(usize::from(short_by));
                let status = apmb_process_stream(apm, floats.as_mut_ptr(), len, ch);
                if apm.is_null() {
                    assert_eq!(status, APMB_ERROR_CLOSED);
                }
            }
            FuzzOp::CaptureInt { channels } => {
                let ch = i32::from(channels % 5);
                let len = ch.max(0) as usize * per_frame;
                let _ = apmb_process_int_stream(apm, ints.as_mut_ptr(), len, ch);
            }
            FuzzOp::Render { channels } => {
                let ch = i32::from(channels % 5);
                let len = ch.max(0) as usize * per_frame;
                let _ = apmb_process_reverse_stream(apm, floats.as_mut_ptr(), len, ch);
            }
            FuzzOp::RenderInt { channels, short_by } => {
                let ch = i32::from(channels % 5);
                let len = (ch.max(0) as usize * per_frame).saturating_sub(usize::from(short_by));
                let _ = apmb_process_reverse_int_stream(apm, ints.as_mut_ptr(), len, ch);
            }
            FuzzOp::ApplyConfig { ec, delay, ns, ns_level, gc } => {
                let mut next = apmb_config_default();
                next.echo_canceller.enabled = ec;
                next.echo_canceller.stream_delay_ms = i32::from(delay);
                next.noise_suppression.enabled = ns;
                next.noise_suppression.level = ns_level;
                next.gain_controller.enabled = gc;
                let _ = apmb_apply_config(apm, next);
            }
            FuzzOp::Initialize => {
                let _ = apmb_initialize(apm);
            }
            FuzzOp::SetDelay(ms) => apmb_set_stream_delay_ms(apm, ms),
            FuzzOp::SetAnalogLevel(level) => apmb_set_stream_analog_level(apm, level),
            FuzzOp::Muted(muted) => apmb_set_output_will_be_muted(apm, muted),
            FuzzOp::KeyPressed(pressed) => apmb_set_stream_key_pressed(apm, pressed),
            FuzzOp::Statistics => {
                let stats = apmb_get_statistics(apm);
                assert!(stats.delay_ms >= 0);
                let _ = apmb_stream_delay_ms(apm);
                let _ = apmb_recommended_stream_analog_level(apm);
            }
            FuzzOp::Destroy => apmb_destroy(&mut apm),
        }
    }

    apmb_destroy(&mut apm);
    assert!(apm.is_null());
});
