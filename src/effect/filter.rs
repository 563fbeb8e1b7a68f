use std::f64::consts::PI;

use crate::{
    effect::Effect,
    utils::dsp::biquad::{BiquadFilter, BiquadFilterCoefficients, BiquadFilterType},
    Error, RenderedBlock,
};

// -------------------------------------------------------------------------------------------------

/// Filter type used in `FilterEffect`.
pub type FilterEffectType = BiquadFilterType;

// -------------------------------------------------------------------------------------------------

/// Multi-channel Butterworth style filter: a cascade of `order` SVF biquad stages, which
/// results in a slope of `12 * order` dB/octave.
///
/// Stage resonances are picked from the pole angles of a Butterworth filter of order
/// `2 * order`, so the cascade's passband stays maximally flat.
#[derive(Debug, Clone)]
pub struct FilterEffect {
    stages: Vec<BiquadFilterCoefficients>,
    filters: Vec<Vec<BiquadFilter>>,
}

impl FilterEffect {
    pub const EFFECT_NAME: &'static str = "Filter";
    pub const MAX_ORDER: usize = 8;

    /// Creates a new `FilterEffect`. `cutoff` must be below nyquist, `order` in range
    /// `[1, MAX_ORDER]`.
    pub fn new(
        filter_type: FilterEffectType,
        cutoff: f32,
        order: usize,
        sample_rate: u32,
    ) -> Result<Self, Error> {
        if order == 0 || order > Self::MAX_ORDER {
            return Err(Error::ParameterError(format!(
                "Filter order must be in range [1, {}], but is {order}",
                Self::MAX_ORDER
            )));
        }
        let stages = (1..=order)
            .map(|k| {
                let angle = (2 * k - 1) as f64 * PI / (4 * order) as f64;
                let q = 1.0 / (2.0 * angle.cos());
                BiquadFilterCoefficients::new(filter_type, sample_rate, cutoff, q as f32)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            stages,
            filters: Vec::new(),
        })
    }

    pub fn order(&self) -> usize {
        self.stages.len()
    }

    /// Clear all filter memories.
    pub fn reset(&mut self) {
        self.filters.iter_mut().flatten().for_each(BiquadFilter::reset);
    }
}

impl Effect for FilterEffect {
    fn name(&self) -> &'static str {
        Self::EFFECT_NAME
    }

    fn process(&mut self, block: &mut RenderedBlock) {
        let stage_count = self.stages.len();
        self.filters
            .resize_with(block.channel_count(), || vec![BiquadFilter::new(); stage_count]);
        for (channel, filters) in block.channels_mut().zip(&mut self.filters) {
            for (filter, coefficients) in filters.iter_mut().zip(&self.stages) {
                filter.process(coefficients, channel.iter_mut());
            }
        }
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sine_block(frequency: f64, sample_rate: u32, len: usize) -> RenderedBlock {
        RenderedBlock::from_mono(
            (0..len)
                .map(|i| (2.0 * PI * frequency * i as f64 / sample_rate as f64).sin() as f32)
                .collect(),
        )
    }

    #[test]
    fn butterworth_stages() {
        let filter = FilterEffect::new(FilterEffectType::Lowpass, 1000.0, 1, 44100).unwrap();
        assert!((filter.stages[0].q() - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);

        let filter = FilterEffect::new(FilterEffectType::Lowpass, 1000.0, 2, 44100).unwrap();
        assert_eq!(filter.order(), 2);
        assert!((filter.stages[0].q() - 0.541_196).abs() < 1e-5);
        assert!((filter.stages[1].q() - 1.306_563).abs() < 1e-5);

        assert!(FilterEffect::new(FilterEffectType::Lowpass, 1000.0, 0, 44100).is_err());
        assert!(FilterEffect::new(FilterEffectType::Lowpass, 30000.0, 1, 44100).is_err());
    }

    #[test]
    fn steeper_with_higher_order() {
        let mut gentle = FilterEffect::new(FilterEffectType::Lowpass, 1000.0, 1, 44100).unwrap();
        let mut steep = FilterEffect::new(FilterEffectType::Lowpass, 1000.0, 4, 44100).unwrap();
        let mut a = sine_block(5000.0, 44100, 4410);
        let mut b = a.clone();
        gentle.process(&mut a);
        steep.process(&mut b);
        let tail = 1000..4410;
        let peak = |block: &RenderedBlock| {
            block.channel(0)[tail.clone()]
                .iter()
                .fold(0.0f32, |p, s| p.max(s.abs()))
        };
        assert!(peak(&a) < 0.1);
        assert!(peak(&b) < peak(&a));

        let mut stereo =
            RenderedBlock::from_channels(vec![vec![0.0; 16], vec![1.0; 16]]).unwrap();
        steep.reset();
        steep.process(&mut stereo);
        assert!(stereo.channel(0).iter().all(|s| *s == 0.0));
    }
}
