use std::f64::consts::PI;

use strum::{Display, EnumString};

use crate::Error;

// -------------------------------------------------------------------------------------------------

/// Available responses of the state variable biquad filter.
#[derive(Default, Clone, Copy, PartialEq, Eq, Debug, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum BiquadFilterType {
    #[default]
    Lowpass,
    Highpass,
    Bandpass,
    Bandstop,
}

// -------------------------------------------------------------------------------------------------

/// The coefficients that hold parameters and necessary data to process the filter.
///
/// See [BiquadFilter] for more info about the filter implementation.
#[derive(Debug, Clone, PartialEq)]
pub struct BiquadFilterCoefficients {
    filter_type: BiquadFilterType,
    sample_rate: u32,
    cutoff: f32,
    q: f32,
    a1: f64,
    a2: f64,
    a3: f64,
    m0: f64,
    m1: f64,
    m2: f64,
}

impl BiquadFilterCoefficients {
    /// Calculate new coefficients. `cutoff` must be in range `(0, nyquist)`, `q` must be > 0.
    pub fn new(
        filter_type: BiquadFilterType,
        sample_rate: u32,
        cutoff: f32,
        q: f32,
    ) -> Result<Self, Error> {
        if sample_rate == 0 {
            return Err(Error::ParameterError(format!(
                "Invalid filter sample-rate: must be > 0, but is {sample_rate}"
            )));
        }
        if q.is_nan() || q <= 0.0 {
            return Err(Error::ParameterError(format!(
                "Invalid filter Q: must be > 0, but is {q}"
            )));
        }
        let nyquist = sample_rate as f32 / 2.0;
        if cutoff.is_nan() || cutoff <= 0.0 || cutoff >= nyquist {
            return Err(Error::ParameterError(format!(
                "Invalid filter frequency: must be in range (0, {nyquist}), but is {cutoff}"
            )));
        }

        let g = f64::tan(PI * cutoff as f64 / sample_rate as f64);
        let k = 1.0 / q as f64;
        let a1 = 1.0 / (1.0 + g * (g + k));
        let a2 = g * a1;
        let a3 = g * a2;
        let (m0, m1, m2) = match filter_type {
            BiquadFilterType::Lowpass => (0.0, 0.0, 1.0),
            BiquadFilterType::Highpass => (1.0, -k, -1.0),
            BiquadFilterType::Bandpass => (0.0, 1.0, 0.0),
            BiquadFilterType::Bandstop => (1.0, -k, 0.0),
        };
        Ok(Self {
            filter_type,
            sample_rate,
            cutoff,
            q,
            a1,
            a2,
            a3,
            m0,
            m1,
            m2,
        })
    }

    pub fn filter_type(&self) -> BiquadFilterType {
        self.filter_type
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// The frequency in Hz where the cutoff of the filter should be.
    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    /// The steepness of the filter.
    pub fn q(&self) -> f32 {
        self.q
    }
}

// -------------------------------------------------------------------------------------------------

/// State variable biquad filter, designed by Andrew Simper of Cytomic.
/// See <http://cytomic.com/files/dsp/SvfLinearTrapOptimised2.pdf>
///
/// This is a second-order filter. It has a cutoff slope of 12 dB/octave. Q = 0.707 means no
/// resonant peaking.
#[derive(Debug, Default, Clone)]
pub struct BiquadFilter {
    ic1eq: f64,
    ic2eq: f64,
}

impl BiquadFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process helper function that calls `process_sample` for each sample in a buffer.
    #[inline]
    pub fn process<'a>(
        &mut self,
        coefficients: &BiquadFilterCoefficients,
        output: impl Iterator<Item = &'a mut f32>,
    ) {
        for sample in output {
            *sample = self.process_sample(coefficients, *sample as f64) as f32;
        }
    }

    /// Apply the filter on a single sample.
    #[inline]
    pub fn process_sample(&mut self, coefficients: &BiquadFilterCoefficients, input: f64) -> f64 {
        let v0 = input;
        let v3 = v0 - self.ic2eq;
        let v1 = coefficients.a1 * self.ic1eq + coefficients.a2 * v3;
        let v2 = self.ic2eq + coefficients.a2 * self.ic1eq + coefficients.a3 * v3;
        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;
        coefficients.m0 * v0 + coefficients.m1 * v1 + coefficients.m2 * v2
    }

    /// Reset state of filter.
    #[inline]
    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }
}

// -------------------------------------------------------------------------------------------------
