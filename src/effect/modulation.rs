use std::f64::consts::PI;

use crate::{effect::Effect, Error, RenderedBlock};

// -------------------------------------------------------------------------------------------------

/// A single sine partial of an [`AmplitudeModulationEffect`]'s modulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModulationPartial {
    /// Frequency in Hz.
    pub frequency: f64,
    /// Modulation depth.
    pub mul: f64,
    /// Offset which shifts the modulation away from 0.
    pub add: f64,
}

impl ModulationPartial {
    pub fn new(frequency: f64, mul: f64, add: f64) -> Self {
        Self {
            frequency,
            mul,
            add,
        }
    }
}

// -------------------------------------------------------------------------------------------------

/// Constant amplitude modulation: multiplies all channels with the modulator
/// `sum(mul * sin(2 * PI * frequency * t) + add)` over all partials.
///
/// The modulator's phase continues across subsequent `process` calls.
#[derive(Debug, Clone)]
pub struct AmplitudeModulationEffect {
    partials: Vec<ModulationPartial>,
    sample_rate: u32,
    position: u64,
}

impl AmplitudeModulationEffect {
    pub const EFFECT_NAME: &'static str = "AmplitudeModulation";

    pub fn new(partials: Vec<ModulationPartial>, sample_rate: u32) -> Result<Self, Error> {
        if sample_rate == 0 {
            return Err(Error::ParameterError(
                "Sample rate must be > 0".to_string(),
            ));
        }
        if partials.is_empty() {
            return Err(Error::ParameterError(
                "Amplitude modulation needs at least one partial".to_string(),
            ));
        }
        let nyquist = sample_rate as f64 / 2.0;
        for partial in &partials {
            if !(0.0..nyquist).contains(&partial.frequency)
                || !partial.mul.is_finite()
                || !partial.add.is_finite()
            {
                return Err(Error::ParameterError(format!(
                    "Invalid modulation partial {partial:?}: frequency must be in range \
                    [0, {nyquist}), mul and add must be finite"
                )));
            }
        }
        Ok(Self {
            partials,
            sample_rate,
            position: 0,
        })
    }

    fn modulator(&self, frame: u64) -> f32 {
        let time = frame as f64 / self.sample_rate as f64;
        self.partials
            .iter()
            .map(|p| p.mul * (2.0 * PI * p.frequency * time).sin() + p.add)
            .sum::<f64>() as f32
    }
}

impl Effect for AmplitudeModulationEffect {
    fn name(&self) -> &'static str {
        Self::EFFECT_NAME
    }

    fn process(&mut self, block: &mut RenderedBlock) {
        let frame_count = block.frame_count();
        let modulator = (0..frame_count as u64)
            .map(|frame| self.modulator(self.position + frame))
            .collect::<Vec<_>>();
        for channel in block.channels_mut() {
            for (sample, gain) in channel.iter_mut().zip(&modulator) {
                *sample *= gain;
            }
        }
        self.position += frame_count as u64;
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modulation() {
        // a quarter period per frame at 4 frames per cycle
        let mut effect =
            AmplitudeModulationEffect::new(vec![ModulationPartial::new(1.0, 0.5, 0.5)], 4).unwrap();
        let mut block = RenderedBlock::from_channels(vec![vec![1.0; 4], vec![2.0; 4]]).unwrap();
        effect.process(&mut block);
        let expected = [0.5, 1.0, 0.5, 0.0];
        for (sample, expected) in block.channel(0).iter().zip(expected) {
            assert!((sample - expected).abs() < 1e-6);
        }
        assert!((block.channel(1)[1] - 2.0).abs() < 1e-6);

        // phase continues
        let mut block = RenderedBlock::from_mono(vec![1.0; 2]);
        effect.process(&mut block);
        assert!((block.channel(0)[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn invalid_partials() {
        assert!(AmplitudeModulationEffect::new(vec![], 44100).is_err());
        assert!(
            AmplitudeModulationEffect::new(vec![ModulationPartial::new(30000.0, 1.0, 0.0)], 44100)
                .is_err()
        );
        assert!(
            AmplitudeModulationEffect::new(vec![ModulationPartial::new(5.0, f64::NAN, 0.0)], 44100)
                .is_err()
        );
        assert!(
            AmplitudeModulationEffect::new(vec![ModulationPartial::new(5.0, 1.0, 0.0)], 0).is_err()
        );
    }
}
