use crate::{
    effect::Effect,
    utils::{db_to_linear, linear_to_db},
    Error, RenderedBlock,
};

// -------------------------------------------------------------------------------------------------

/// Multi-channel gain effect that only applies a volume factor.
#[derive(Debug, Clone)]
pub struct GainEffect {
    gain: f32,
}

impl GainEffect {
    pub const EFFECT_NAME: &'static str = "Gain";

    const MIN_DB: f32 = -60.0;
    const MAX_DB: f32 = 24.0;

    /// Creates a new `GainEffect` with the given gain in dB. Gains below -60 dB mute the block.
    pub fn with_gain_db(gain_db: f32) -> Result<Self, Error> {
        if gain_db.is_nan() || gain_db > Self::MAX_DB {
            return Err(Error::ParameterError(format!(
                "Gain must be <= {} dB, but is {gain_db}",
                Self::MAX_DB
            )));
        }
        let gain = if gain_db < Self::MIN_DB {
            0.0
        } else {
            db_to_linear(gain_db)
        };
        Ok(Self { gain })
    }

    /// The applied gain in dB.
    pub fn gain_db(&self) -> f32 {
        linear_to_db(self.gain)
    }
}

impl Effect for GainEffect {
    fn name(&self) -> &'static str {
        Self::EFFECT_NAME
    }

    fn process(&mut self, block: &mut RenderedBlock) {
        if self.gain != 1.0 {
            for sample in block.samples_mut() {
                *sample *= self.gain;
            }
        }
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gain() {
        let mut block =
            RenderedBlock::from_channels(vec![vec![1.0, -0.5], vec![0.25, 0.0]]).unwrap();
        let mut effect = GainEffect::with_gain_db(0.0).unwrap();
        effect.process(&mut block);
        assert_eq!(block.channel(0), &[1.0, -0.5]);

        let mut effect = GainEffect::with_gain_db(-120.0).unwrap();
        effect.process(&mut block);
        assert_eq!(block.peak(), 0.0);

        let effect = GainEffect::with_gain_db(6.0).unwrap();
        assert!((effect.gain_db() - 6.0).abs() < 1e-4);
        assert!(GainEffect::with_gain_db(48.0).is_err());
        assert!(GainEffect::with_gain_db(f32::NAN).is_err());
    }
}
