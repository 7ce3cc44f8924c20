//! Sample encodings and channel layout.
//!
//! The public frame APIs take interleaved buffers; the engine consumes one
//! buffer per channel.
//!
//! ```text
//! Interleaved (stereo, 3 samples):
//! [L0, R0, L1, R1, L2, R2]
//!
//! Deinterleaved:
//! [[L0, L1, L2],
//!  [R0, R1, R2]]
//! ```

const S16_SCALE_IN: f32 = 32768.0;
const S16_SCALE_OUT: f32 = 32767.0;

/// Convert a 16-bit PCM sample to a float in `[-1.0, 1.0)`.
#[inline]
pub fn s16_to_f32(sample: i16) -> f32 {
    f32::from(sample) / S16_SCALE_IN
}

/// Convert a float sample to 16-bit PCM.
///
/// Values outside `[-1.0, 1.0]` are clamped to the boundary and NaN maps to
/// silence, so the conversion never overflows.
#[inline]
pub fn f32_to_s16(sample: f32) -> i16 {
    if sample.is_nan() {
        return 0;
    }
    // The clamped, scaled value is within i16 range.
    (sample.clamp(-1.0, 1.0) * S16_SCALE_OUT).round() as i16
}

/// Convert a whole buffer of 16-bit PCM to floats.
pub fn s16_to_f32_slice(src: &[i16]) -> Vec<f32> {
    src.iter().copied().map(s16_to_f32).collect()
}

/// Convert a whole buffer of floats to 16-bit PCM.
pub fn f32_to_s16_slice(src: &[f32]) -> Vec<i16> {
    src.iter().copied().map(f32_to_s16).collect()
}

/// Split an interleaved buffer into `dst.len()` channel buffers.
///
/// Each channel buffer is resized to `src.len() / dst.len()` samples.
pub fn deinterleave<T: Copy + Default>(src: &[T], dst: &mut [Vec<T>]) {
    let num_channels = dst.len();
    if num_channels == 0 {
        return;
    }
    let num_samples = src.len() / num_channels;
    debug_assert_eq!(src.len(), num_channels * num_samples);
    for (ch, channel) in dst.iter_mut().enumerate() {
        channel.clear();
        channel.extend(src.iter().skip(ch).step_by(num_channels).copied());
        channel.resize(num_samples, T::default());
    }
}

/// Merge channel buffers back into one interleaved buffer.
pub fn interleave<T: Copy>(src: &[Vec<T>], dst: &mut [T]) {
    let num_channels = src.len();
    if num_channels == 0 {
        return;
    }
    for (ch, channel) in src.iter().enumerate() {
        for (slot, &sample) in dst.iter_mut().skip(ch).step_by(num_channels).zip(channel) {
            *slot = sample;
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use test_strategy::proptest;

    use super::*;

    #[test]
    fn s16_extremes() {
        assert_eq!(s16_to_f32(0), 0.0);
        assert_eq!(s16_to_f32(i16::MIN), -1.0);
        assert!(s16_to_f32(i16::MAX) < 1.0);
    }

    #[test]
    fn f32_out_of_range_is_clamped() {
        assert_eq!(f32_to_s16(1.0), 32767);
        assert_eq!(f32_to_s16(2.5), 32767);
        assert_eq!(f32_to_s16(-1.0), -32767);
        assert_eq!(f32_to_s16(-7.0), -32767);
        assert_eq!(f32_to_s16(f32::INFINITY), 32767);
        assert_eq!(f32_to_s16(f32::NEG_INFINITY), -32767);
        assert_eq!(f32_to_s16(f32::NAN), 0);
    }

    #[test]
    fn deinterleave_stereo() {
        let src = [1, 10, 2, 20, 3, 30];
        let mut dst = vec![Vec::new(), Vec::new()];
        deinterleave(&src, &mut dst);
        assert_eq!(dst, vec![vec![1, 2, 3], vec![10, 20, 30]]);
    }

    #[test]
    fn interleave_stereo() {
        let src = vec![vec![1.0f32, 2.0, 3.0], vec![10.0, 20.0, 30.0]];
        let mut dst = [0.0f32; 6];
        interleave(&src, &mut dst);
        assert_eq!(dst, [1.0, 10.0, 2.0, 20.0, 3.0, 30.0]);
    }

    #[test]
    fn deinterleave_reuses_channel_storage() {
        let mut dst = vec![vec![9; 8], vec![9; 8], vec![9; 8]];
        deinterleave(&[1, 2, 3, 4, 5, 6], &mut dst);
        assert_eq!(dst, vec![vec![1, 4], vec![2, 5], vec![3, 6]]);
    }

    #[proptest]
    fn s16_roundtrip_within_one_lsb(sample: i16) {
        let back = f32_to_s16(s16_to_f32(sample));
        prop_assert!((i32::from(back) - i32::from(sample)).abs() <= 1);
    }

    #[proptest]
    fn f32_conversion_never_overflows(#[strategy(-1.0e6f32..1.0e6)] sample: f32) {
        let converted = f32_to_s16(sample);
        prop_assert!((-32767..=32767).contains(&converted));
        if sample >= 1.0 {
            prop_assert_eq!(converted, 32767);
        }
        if sample <= -1.0 {
            prop_assert_eq!(converted, -32767);
        }
    }

    #[proptest]
    fn interleave_inverts_deinterleave(
        #[strategy(1..=8usize)] channels: usize,
        #[strategy(proptest::collection::vec(any::<i16>(), 0..64))] frames: Vec<i16>,
    ) {
        let src: Vec<i16> = frames
            .iter()
            .flat_map(|&s| std::iter::repeat_n(s, channels))
            .enumerate()
            .map(|(i, s)| s.wrapping_add(i as i16))
            .collect();
        let mut split = vec![Vec::new(); channels];
        deinterleave(&src, &mut split);
        let mut merged = vec![0i16; src.len()];
        interleave(&split, &mut merged);
        prop_assert_eq!(merged, src);
    }
}
