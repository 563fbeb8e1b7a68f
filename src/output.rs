//! Sinks which persist rendered blocks.

#[cfg(feature = "wav-output")]
pub mod wav;

use crate::Error;

// -------------------------------------------------------------------------------------------------

/// Encoding of written audio files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavOutputSpec {
    pub sample_rate: u32,
    /// 16 or 24 for integer samples, 32 for float samples.
    pub bits_per_sample: u16,
}

impl Default for WavOutputSpec {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            bits_per_sample: 16,
        }
    }
}

impl WavOutputSpec {
    pub fn new(sample_rate: u32, bits_per_sample: u16) -> Self {
        Self {
            sample_rate,
            bits_per_sample,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.sample_rate == 0 {
            return Err(Error::ParameterError(
                "Output sample rate must be > 0".to_string(),
            ));
        }
        if ![16, 24, 32].contains(&self.bits_per_sample) {
            return Err(Error::ParameterError(format!(
                "Output bits per sample must be 16, 24 or 32, but is {}",
                self.bits_per_sample
            )));
        }
        Ok(())
    }
}

// -------------------------------------------------------------------------------------------------
