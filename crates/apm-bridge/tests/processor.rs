//! End-to-end behavior of the processor and the handle against the default
//! engine.

use std::f32::consts::PI;

use apm_bridge::config::{EchoCanceller, GainController, NoiseSuppression, StreamDelay};
use apm_bridge::{
    Config, DefaultEngine, Error, Handle, Processor, SAMPLE_RATE_HZ, SAMPLES_PER_FRAME,
    Statistics, frame_len,
};

type Apm = Processor<DefaultEngine>;

fn aec_config(delay: StreamDelay) -> Config {
    Config {
        echo_canceller: Some(EchoCanceller {
            stream_delay: delay,
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn sine_frame(frame: usize, freq_hz: f32, amplitude: f32) -> Vec<f32> {
    (0..SAMPLES_PER_FRAME)
        .map(|i| {
            let n = (frame * SAMPLES_PER_FRAME + i) as f32;
            (2.0 * PI * freq_hz * n / SAMPLE_RATE_HZ as f32).sin() * amplitude
        })
        .collect()
}

/// Drives the statistics path end to end. Against the bypass engine the
/// enhancement is always 0 dB, so this checks plumbing, not cancellation.
#[test]
fn echo_scenario_reports_finite_enhancement() {
    let apm = Apm::new(aec_config(StreamDelay::Fixed { ms: 50 })).unwrap();

    for frame in 0..100 {
        let render = sine_frame(frame, 440.0, 0.4);
        let capture: Vec<f32> = render.iter().map(|s| s * 0.2).collect();
        apm.process_render(&render).unwrap();
        let out = apm.process_capture(&capture).unwrap();
        assert_eq!(out.len(), SAMPLES_PER_FRAME);
    }

    let stats = apm.statistics();
    assert!(stats.echo_return_loss_enhancement.is_finite());
    assert!(stats.echo_return_loss_enhancement >= 0.0);
    assert!(stats.delay_ms >= 0);
    assert!(stats.delay_median_ms >= 0);
    assert!(stats.delay_std_ms >= 0);
}

/// Deterministic white-ish noise in `[-amplitude, amplitude)`.
#[cfg(feature = "native")]
fn noise_frame(state: &mut u32, amplitude: f32) -> Vec<f32> {
    (0..SAMPLES_PER_FRAME)
        .map(|_| {
            *state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            ((*state >> 8) as f32 / (1 << 23) as f32 - 1.0) * amplitude
        })
        .collect()
}

#[cfg(feature = "native")]
#[test]
fn native_engine_removes_pure_echo() {
    let apm = Apm::new(aec_config(StreamDelay::Fixed { ms: 0 })).unwrap();
    let mut state = 0x1234_5678;

    for _ in 0..500 {
        let render = noise_frame(&mut state, 0.3);
        let capture: Vec<f32> = render.iter().map(|s| s * 0.2).collect();
        apm.process_render(&render).unwrap();
        apm.process_capture(&capture).unwrap();
    }

    let stats = apm.statistics();
    assert!(stats.echo_return_loss.is_finite());
    assert!(
        stats.echo_return_loss_enhancement > 0.0,
        "erle = {}",
        stats.echo_return_loss_enhancement
    );
}

#[test]
fn statistics_are_zero_before_first_capture() {
    let apm = Apm::new(aec_config(StreamDelay::Fixed { ms: 20 })).unwrap();
    assert_eq!(apm.statistics(), Statistics::default());
    apm.process_render(&sine_frame(0, 440.0, 0.4)).unwrap();
    assert_eq!(apm.statistics(), Statistics::default());
}

#[test]
fn zero_channels_fail_construction() {
    for (capture, render) in [(0, 1), (1, 0), (0, 0)] {
        let result = Apm::new(Config {
            capture_channels: capture,
            render_channels: render,
            ..Default::default()
        });
        assert_eq!(
            result.map(|_| ()),
            Err(Error::InvalidChannels { capture, render })
        );
    }
}

#[test]
fn wrong_lengths_are_rejected_on_every_path() {
    let apm = Apm::new(Config::default()).unwrap();
    let short_f32 = vec![0.0f32; SAMPLES_PER_FRAME - 1];
    let short_i16 = vec![0i16; SAMPLES_PER_FRAME + 1];

    assert!(matches!(
        apm.process_capture(&short_f32),
        Err(Error::LengthMismatch { .. })
    ));
    assert!(matches!(
        apm.process_render(&short_f32),
        Err(Error::LengthMismatch { .. })
    ));
    assert!(matches!(
        apm.process_capture_i16(&short_i16),
        Err(Error::LengthMismatch { .. })
    ));
    assert!(matches!(
        apm.process_render_i16(&short_i16),
        Err(Error::LengthMismatch { .. })
    ));
}

#[test]
fn handle_rejects_declared_channel_mismatch() {
    let mut handle = Handle::<DefaultEngine>::create(&Config {
        capture_channels: 2,
        render_channels: 2,
        ..Default::default()
    })
    .unwrap();
    let mut frame = vec![0.0f32; frame_len(2)];
    assert_eq!(
        handle.process_capture_f32(&mut frame, 1),
        Err(Error::ChannelMismatch {
            expected: 2,
            actual: 1
        })
    );
    let mut frame = vec![0i16; frame_len(2)];
    assert_eq!(
        handle.process_render_i16(&mut frame, 3),
        Err(Error::ChannelMismatch {
            expected: 2,
            actual: 3
        })
    );
}

#[test]
fn close_is_idempotent_and_final() {
    let apm = Apm::new(Config {
        echo_canceller: Some(EchoCanceller::default()),
        noise_suppression: Some(NoiseSuppression::default()),
        gain_controller: Some(GainController::default()),
        ..Default::default()
    })
    .unwrap();
    apm.process_capture(&[0.1; SAMPLES_PER_FRAME]).unwrap();

    apm.close();
    apm.close();

    assert!(apm.is_closed());
    assert_eq!(apm.statistics(), Statistics::default());
    assert_eq!(
        apm.process_render(&[0.0; SAMPLES_PER_FRAME]),
        Err(Error::Closed)
    );
    assert_eq!(
        apm.process_capture_i16(&[0; SAMPLES_PER_FRAME]),
        Err(Error::Closed)
    );
    assert_eq!(apm.apply_config(Config::default()), Err(Error::Closed));
    assert_eq!(Error::Closed.to_string(), "processor is closed");
}

#[test]
fn hints_round_trip_through_the_engine() {
    let apm = Apm::new(Config {
        echo_canceller: Some(EchoCanceller::default()),
        gain_controller: Some(GainController {
            input_volume_controller: true,
            ..Default::default()
        }),
        ..Default::default()
    })
    .unwrap();

    apm.set_stream_delay(StreamDelay::Fixed { ms: 60 }).unwrap();
    assert_eq!(apm.stream_delay_ms(), Some(60));

    apm.set_stream_analog_level(128).unwrap();
    let level = apm.recommended_stream_analog_level().unwrap();
    assert!((0..=255).contains(&level));

    apm.set_output_muted(true);
    apm.set_key_pressed(true);
    apm.process_capture(&[0.0; SAMPLES_PER_FRAME]).unwrap();
}

#[test]
fn initialize_keeps_configuration() {
    let config = aec_config(StreamDelay::Fixed { ms: 40 });
    let apm = Apm::new(config.clone()).unwrap();
    apm.process_render(&sine_frame(0, 440.0, 0.4)).unwrap();
    apm.initialize().unwrap();
    assert_eq!(apm.config(), config);
    apm.process_capture(&sine_frame(1, 440.0, 0.1)).unwrap();
}
