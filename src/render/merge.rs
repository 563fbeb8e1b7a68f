use crate::{Error, Grain};

use super::{block::RenderedBlock, window::WindowFunction};

// -------------------------------------------------------------------------------------------------

/// Windowed overlap-add of a positioned grain sequence into a new multi-channel block.
///
/// The output block is `max(end_idx)` frames long. Each grain's samples get multiplied with
/// `window.samples(len)` and are added, not written, to its channel at `start_idx..end_idx`,
/// so overlapping grains sum up. NaN and infinite values in the result are replaced with zero.
///
/// Every grain must be positioned, must carry loaded samples which match its frame span, and
/// must target a channel below `channel_count`. The grains are consumed.
pub fn merge<W: WindowFunction + ?Sized>(
    grains: Vec<Grain>,
    channel_count: usize,
    window: &W,
) -> Result<RenderedBlock, Error> {
    if grains.is_empty() {
        return Err(Error::EmptySelectionError);
    }
    let mut frame_count = 0;
    for (index, grain) in grains.iter().enumerate() {
        frame_count = frame_count.max(validate_grain(index, grain, channel_count)?);
    }

    let mut block = RenderedBlock::new(channel_count, frame_count)?;
    for grain in grains {
        let (Some(placement), Some(samples)) = (grain.placement(), grain.samples) else {
            continue; // checked above
        };
        let taper = window.samples(samples.len());
        if taper.len() != samples.len() {
            return Err(Error::ParameterError(format!(
                "Window function returned {} values for a grain with {} samples",
                taper.len(),
                samples.len()
            )));
        }
        let output = &mut block.channel_mut(grain.channel)[placement.start_idx..placement.end_idx];
        for ((o, s), w) in output.iter_mut().zip(samples).zip(taper) {
            *o += s * w;
        }
    }
    block.sanitize();

    log::debug!(
        "Merged grains into {} channels with {} frames",
        block.channel_count(),
        block.frame_count()
    );
    Ok(block)
}

// -------------------------------------------------------------------------------------------------

/// Check a grain's merge preconditions. Returns its end index.
fn validate_grain(index: usize, grain: &Grain, channel_count: usize) -> Result<usize, Error> {
    let Some(placement) = grain.placement() else {
        return Err(Error::ParameterError(format!(
            "Grain #{index} has not been positioned"
        )));
    };
    let Some(samples) = &grain.samples else {
        return Err(Error::ParameterError(format!(
            "Grain #{index} from '{}' has no samples loaded",
            grain.source_ref()
        )));
    };
    if samples.len() != placement.len() {
        return Err(Error::ParameterError(format!(
            "Grain #{index} has {} samples, but spans {} frames",
            samples.len(),
            placement.len()
        )));
    }
    if grain.channel >= channel_count {
        return Err(Error::ParameterError(format!(
            "Grain #{index} targets channel {}, but the output only has {channel_count} channels",
            grain.channel
        )));
    }
    Ok(placement.end_idx)
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{render::window::GrainWindowMode, sequence::position::calculate_positions};

    fn positioned(samples: &[Vec<f32>], distance: i64) -> Vec<Grain> {
        let mut grains = samples
            .iter()
            .map(|s| {
                let mut grain = Grain::with_samples("a.wav", s.clone()).unwrap();
                grain.distance_between_grains = distance;
                grain
            })
            .collect::<Vec<_>>();
        calculate_positions(&mut grains).unwrap();
        grains
    }

    #[test]
    fn single_grain_identity() {
        let samples = vec![0.5, -1.0, 0.25, 1.0, -0.75];
        let grains = positioned(&[samples.clone()], 0);
        let block = merge(grains, 1, &GrainWindowMode::Hann).unwrap();
        assert_eq!(block.frame_count(), 5);
        let window = GrainWindowMode::Hann.samples(5);
        for i in 0..5 {
            assert_eq!(block.channel(0)[i], samples[i] * window[i]);
        }
    }

    #[test]
    fn rectangular_window_concatenates() {
        let samples = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0], vec![6.0, 7.0, 8.0, 9.0]];
        let grains = positioned(&samples, 0);
        let block = merge(grains, 1, &GrainWindowMode::Rectangular).unwrap();
        assert_eq!(block.channel(0), samples.concat().as_slice());
    }

    #[test]
    fn overlaps_are_summed() {
        let grains = positioned(&[vec![1.0; 4], vec![1.0; 4]], -2);
        let block = merge(grains, 1, &GrainWindowMode::Rectangular).unwrap();
        assert_eq!(block.channel(0), &[1.0, 1.0, 2.0, 2.0, 1.0, 1.0]);
    }

    #[test]
    fn channels_and_gaps() {
        let mut grains = positioned(&[vec![1.0; 2], vec![2.0; 2]], 3);
        grains[1].channel = 1;
        let block = merge(grains, 2, &GrainWindowMode::Rectangular).unwrap();
        assert_eq!(block.frame_count(), 7);
        assert_eq!(block.channel(0), &[1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(block.channel(1), &[0.0, 0.0, 0.0, 0.0, 0.0, 2.0, 2.0]);
    }

    #[test]
    fn nan_sanitization() {
        let grains = positioned(&[vec![1.0, f32::NAN, 1.0], vec![f32::INFINITY]], 0);
        let block = merge(grains, 1, &GrainWindowMode::Rectangular).unwrap();
        assert_eq!(block.channel(0), &[1.0, 0.0, 1.0, 0.0]);
        assert!(block.channel(0).iter().all(|s| s.is_finite()));
    }

    #[test]
    fn invalid_grains() {
        assert!(matches!(
            merge(vec![], 1, &GrainWindowMode::Hann),
            Err(Error::EmptySelectionError)
        ));

        let unplaced = vec![Grain::with_samples("a.wav", vec![1.0]).unwrap()];
        assert!(merge(unplaced, 1, &GrainWindowMode::Hann).is_err());

        let mut unloaded = vec![Grain::new("a.wav", 0, 4).unwrap()];
        calculate_positions(&mut unloaded).unwrap();
        assert!(merge(unloaded, 1, &GrainWindowMode::Hann).is_err());

        let mut mismatch = vec![Grain::new("a.wav", 0, 4).unwrap()];
        mismatch[0].samples = Some(vec![1.0; 3]);
        calculate_positions(&mut mismatch).unwrap();
        assert!(merge(mismatch, 1, &GrainWindowMode::Hann).is_err());

        let mut grains = positioned(&[vec![1.0; 2]], 0);
        grains[0].channel = 2;
        assert!(merge(grains, 2, &GrainWindowMode::Hann).is_err());

        let grains = positioned(&[vec![1.0; 2]], 0);
        let short = |_len: usize| vec![1.0f32];
        assert!(merge(grains, 1, &short).is_err());
    }
}
