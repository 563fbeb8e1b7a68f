use std::f64::consts::FRAC_PI_2;

use crate::Error;

use super::block::RenderedBlock;

// -------------------------------------------------------------------------------------------------

/// Equal-power quarter-sine ramps of the given length: `(fade_out, fade_in)`.
///
/// `x[j] = j * (PI / 2) / overlap`, spaced linearly over `[0, PI / 2)`, with `fade_out = cos(x)`
/// and `fade_in = sin(x)`, so `fade_out[j]^2 + fade_in[j]^2 == 1` for every `j`.
pub fn equal_power_ramps(overlap: usize) -> (Vec<f32>, Vec<f32>) {
    let step = if overlap > 0 {
        FRAC_PI_2 / overlap as f64
    } else {
        0.0
    };
    (0..overlap)
        .map(|j| {
            let x = j as f64 * step;
            (x.cos() as f32, x.sin() as f32)
        })
        .unzip()
}

// -------------------------------------------------------------------------------------------------

/// Equal-power crossfade of two rendered blocks.
///
/// The blocks overlap by `floor(min(len_a, len_b) * fraction)` frames, so the result is
/// `len_a + len_b - overlap` frames long. Frames outside of the overlap are copied unchanged.
/// Channels are faded independently. `fraction` must be in range `(0, 1)` and both blocks must
/// have the same number of channels.
pub fn crossfade(
    a: &RenderedBlock,
    b: &RenderedBlock,
    fraction: f64,
) -> Result<RenderedBlock, Error> {
    validate_fraction(fraction)?;
    if a.channel_count() != b.channel_count() {
        return Err(Error::ParameterError(format!(
            "Can't crossfade blocks with {} and {} channels",
            a.channel_count(),
            b.channel_count()
        )));
    }
    let (len_a, len_b) = (a.frame_count(), b.frame_count());
    let overlap = (len_a.min(len_b) as f64 * fraction).floor() as usize;
    let (fade_out, fade_in) = equal_power_ramps(overlap);

    let channels = a
        .channels()
        .iter()
        .zip(b.channels())
        .map(|(a, b)| {
            let mut output = Vec::with_capacity(len_a + len_b - overlap);
            output.extend_from_slice(&a[..len_a - overlap]);
            let a_tail = &a[len_a - overlap..];
            let b_head = &b[..overlap];
            output.extend(
                a_tail
                    .iter()
                    .zip(b_head)
                    .zip(fade_out.iter().zip(&fade_in))
                    .map(|((a, b), (out, inp))| a * out + b * inp),
            );
            output.extend_from_slice(&b[overlap..]);
            output
        })
        .collect();
    RenderedBlock::from_channels(channels)
}

/// Fold a list of blocks left to right with [`crossfade`].
///
/// A single block is returned unchanged, an empty list is an error.
pub fn crossfade_chain(blocks: Vec<RenderedBlock>, fraction: f64) -> Result<RenderedBlock, Error> {
    validate_fraction(fraction)?;
    let mut blocks = blocks.into_iter();
    let Some(mut result) = blocks.next() else {
        return Err(Error::EmptySelectionError);
    };
    for block in blocks {
        result = crossfade(&result, &block, fraction)?;
    }
    Ok(result)
}

// -------------------------------------------------------------------------------------------------

fn validate_fraction(fraction: f64) -> Result<(), Error> {
    if !(fraction > 0.0 && fraction < 1.0) {
        return Err(Error::ParameterError(format!(
            "Crossfade fraction must be in range (0, 1), but is {fraction}"
        )));
    }
    Ok(())
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize, offset: f32) -> Vec<f32> {
        (0..len).map(|i| offset + i as f32).collect()
    }

    #[test]
    fn length_and_endpoints() {
        let a = RenderedBlock::from_mono(ramp(100, 1.0));
        let b = RenderedBlock::from_mono(ramp(50, 1000.0));
        let output = crossfade(&a, &b, 0.5).unwrap();
        assert_eq!(output.frame_count(), 125);
        assert_eq!(output.channel(0)[0], a.channel(0)[0]);
        assert_eq!(output.channel(0)[124], b.channel(0)[49]);
        // untouched head of a and tail of b
        assert_eq!(&output.channel(0)[..75], &a.channel(0)[..75]);
        assert_eq!(&output.channel(0)[100..], &b.channel(0)[25..]);
        // overlap starts with a's tail at full level
        assert_eq!(output.channel(0)[75], a.channel(0)[75]);
    }

    #[test]
    fn equal_power() {
        let (fade_out, fade_in) = equal_power_ramps(25);
        assert_eq!(fade_out.len(), 25);
        assert_eq!(fade_out[0], 1.0);
        assert_eq!(fade_in[0], 0.0);
        for (out, inp) in fade_out.iter().zip(&fade_in) {
            assert!((out * out + inp * inp - 1.0).abs() < 1e-6);
        }
        assert!(fade_in.windows(2).all(|w| w[0] < w[1]));
        let (fade_out, fade_in) = equal_power_ramps(0);
        assert!(fade_out.is_empty() && fade_in.is_empty());
    }

    #[test]
    fn multi_channel() {
        let a = RenderedBlock::from_channels(vec![vec![1.0; 10], vec![2.0; 10]]).unwrap();
        let b = RenderedBlock::from_channels(vec![vec![3.0; 10], vec![4.0; 10]]).unwrap();
        let output = crossfade(&a, &b, 0.2).unwrap();
        assert_eq!(output.channel_count(), 2);
        assert_eq!(output.frame_count(), 18);
        assert_eq!(output.channel(0)[0], 1.0);
        assert_eq!(output.channel(1)[17], 4.0);

        let mono = RenderedBlock::from_mono(vec![1.0; 10]);
        assert!(crossfade(&a, &mono, 0.5).is_err());
    }

    #[test]
    fn short_overlap_concatenates() {
        let a = RenderedBlock::from_mono(vec![1.0, 2.0]);
        let b = RenderedBlock::from_mono(vec![3.0, 4.0]);
        let output = crossfade(&a, &b, 0.25).unwrap();
        assert_eq!(output.channel(0), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn chains() {
        let blocks = vec![
            RenderedBlock::from_mono(vec![1.0; 40]),
            RenderedBlock::from_mono(vec![1.0; 20]),
            RenderedBlock::from_mono(vec![1.0; 30]),
        ];
        let output = crossfade_chain(blocks, 0.5).unwrap();
        // 40 + 20 - 10 = 50, then 50 + 30 - 15 = 65
        assert_eq!(output.frame_count(), 65);

        let single = crossfade_chain(vec![RenderedBlock::from_mono(vec![1.0; 3])], 0.5).unwrap();
        assert_eq!(single.channel(0), &[1.0; 3]);

        assert!(crossfade_chain(vec![], 0.5).is_err());
        for fraction in [0.0, 1.0, -0.5, f64::NAN] {
            assert!(crossfade(
                &RenderedBlock::from_mono(vec![1.0]),
                &RenderedBlock::from_mono(vec![1.0]),
                fraction
            )
            .is_err());
        }
    }
}
