// -------------------------------------------------------------------------------------------------

/// Copy the given planar buffer into an interleaved one.
/// The planar buffer's layout defines layout of the interleaved buffer (channel and frame count).
pub fn planar_to_interleaved(planar: &[Vec<f32>], interleaved: &mut [f32]) {
    let channel_count = planar.len();
    match channel_count {
        1 => {
            for (i, p) in interleaved.iter_mut().zip(planar[0].iter()) {
                *i = *p;
            }
        }
        _ => {
            for (channel_index, channel_values) in planar.iter().enumerate() {
                for (frame_index, value) in channel_values.iter().enumerate() {
                    interleaved[frame_index * channel_count + channel_index] = *value;
                }
            }
        }
    }
}

// -------------------------------------------------------------------------------------------------

/// Append a single channel of the given interleaved buffer to `output`.
/// Trailing samples which don't form a complete frame are ignored.
pub fn extend_from_interleaved_channel(
    interleaved: &[f32],
    channel_count: usize,
    channel: usize,
    output: &mut Vec<f32>,
) {
    debug_assert!(channel < channel_count, "Invalid channel index");
    if channel_count == 1 {
        output.extend_from_slice(interleaved);
    } else {
        output.extend(
            interleaved
                .chunks_exact(channel_count)
                .map(|frame| frame[channel]),
        );
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planar_interleaved() {
        let planar_mono = vec![vec![1.0, 2.0, 3.0, 4.0]];
        let mut interleaved = vec![0.0; 4];
        planar_to_interleaved(&planar_mono, &mut interleaved);
        assert_eq!(interleaved, vec![1.0, 2.0, 3.0, 4.0]);

        let planar_general = vec![
            vec![1.0, 2.0, 3.0, 4.0],
            vec![4.0, 3.0, 2.0, 1.0],
            vec![2.0, 1.0, 4.0, 3.0],
        ];
        let mut interleaved = vec![0.0; 12];
        planar_to_interleaved(&planar_general, &mut interleaved);
        assert_eq!(
            interleaved,
            vec![1.0, 4.0, 2.0, 2.0, 3.0, 1.0, 3.0, 2.0, 4.0, 4.0, 1.0, 3.0]
        );
    }

    #[test]
    fn interleaved_channel() {
        let interleaved = [1.0, 4.0, 2.0, 3.0, 3.0, 2.0, 4.0];
        let mut left = vec![0.0];
        extend_from_interleaved_channel(&interleaved, 2, 0, &mut left);
        assert_eq!(left, vec![0.0, 1.0, 2.0, 3.0]);
        let mut right = Vec::new();
        extend_from_interleaved_channel(&interleaved, 2, 1, &mut right);
        assert_eq!(right, vec![4.0, 3.0, 2.0]);
        let mut mono = Vec::new();
        extend_from_interleaved_channel(&interleaved[..3], 1, 0, &mut mono);
        assert_eq!(mono, vec![1.0, 4.0, 2.0]);
    }
}
