use std::f64::consts::PI;

// -------------------------------------------------------------------------------------------------

/// Produces a taper of the given length, which gets multiplied with a grain's samples before
/// the grain is summed into the output buffer.
///
/// Implemented for [`GrainWindowMode`] and for plain closures `Fn(usize) -> Vec<f32>`, so custom
/// windows can be passed to the merger as well. Implementations must return exactly `len` values.
pub trait WindowFunction {
    fn samples(&self, len: usize) -> Vec<f32>;
}

impl<F> WindowFunction for F
where
    F: Fn(usize) -> Vec<f32>,
{
    fn samples(&self, len: usize) -> Vec<f32> {
        self(len)
    }
}

// -------------------------------------------------------------------------------------------------

/// Built-in grain window shapes.
///
/// All windows are symmetric and normalized to a peak of 1: a window of length 1 is `[1.0]`,
/// a window of length 0 is empty.
#[derive(
    Default,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    strum::EnumString,
    strum::Display,
    strum::VariantNames,
    strum::EnumCount,
)]
#[strum(ascii_case_insensitive)]
pub enum GrainWindowMode {
    /// Constant 1: no tapering at all.
    Rectangular,
    /// Raised cosine, the default for overlap-add.
    #[default]
    Hann,
    /// Raised cosine which does not reach zero at its edges.
    Hamming,
    /// Steep spectral rolloff with a wider main lobe.
    Blackman,
    /// Linear rise to the center, linear fall, zero at the edges.
    Triangle,
}

impl GrainWindowMode {
    /// Evaluate the window at index `n` of a window with `len` samples, `len` > 1.
    fn value(&self, n: usize, len: usize) -> f64 {
        let m = (len - 1) as f64;
        let phase = n as f64 / m; // [0.0, 1.0]
        match self {
            GrainWindowMode::Rectangular => 1.0,
            GrainWindowMode::Hann => 0.5 - 0.5 * (2.0 * PI * phase).cos(),
            GrainWindowMode::Hamming => 0.54 - 0.46 * (2.0 * PI * phase).cos(),
            GrainWindowMode::Blackman => {
                0.42 - 0.5 * (2.0 * PI * phase).cos() + 0.08 * (4.0 * PI * phase).cos()
            }
            GrainWindowMode::Triangle => 1.0 - ((n as f64 - m / 2.0) / (m / 2.0)).abs(),
        }
    }
}

impl WindowFunction for GrainWindowMode {
    fn samples(&self, len: usize) -> Vec<f32> {
        match len {
            0 => Vec::new(),
            1 => vec![1.0],
            _ => (0..len).map(|n| self.value(n, len) as f32).collect(),
        }
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use strum::VariantNames;

    use super::*;

    #[test]
    fn window_shapes() {
        for name in GrainWindowMode::VARIANTS {
            let mode = name.parse::<GrainWindowMode>().unwrap();
            assert!(mode.samples(0).is_empty());
            assert_eq!(mode.samples(1), vec![1.0]);

            let window = mode.samples(9);
            assert_eq!(window.len(), 9);
            // symmetric with a peak of 1 in the center
            for i in 0..window.len() {
                assert!((window[i] - window[window.len() - 1 - i]).abs() < 1e-6);
            }
            assert!((window[4] - 1.0).abs() < 1e-6);
        }

        assert_eq!(GrainWindowMode::Rectangular.samples(4), vec![1.0; 4]);
        let hann = GrainWindowMode::Hann.samples(5);
        assert!(hann[0].abs() < 1e-6 && hann[4].abs() < 1e-6);
        assert!((hann[1] - 0.5).abs() < 1e-6);
        let triangle = GrainWindowMode::Triangle.samples(5);
        assert_eq!(triangle, vec![0.0, 0.5, 1.0, 0.5, 0.0]);
        let hamming = GrainWindowMode::Hamming.samples(3);
        assert!((hamming[0] - 0.08).abs() < 1e-6);
    }

    #[test]
    fn parse_modes() {
        assert_eq!("hann".parse::<GrainWindowMode>(), Ok(GrainWindowMode::Hann));
        assert_eq!(
            "Blackman".parse::<GrainWindowMode>(),
            Ok(GrainWindowMode::Blackman)
        );
        assert!("kaiser".parse::<GrainWindowMode>().is_err());
        assert_eq!(GrainWindowMode::default().to_string(), "Hann");
    }

    #[test]
    fn closure_windows() {
        let ramp = |len: usize| (0..len).map(|i| i as f32).collect::<Vec<_>>();
        assert_eq!(ramp.samples(3), vec![0.0, 1.0, 2.0]);
    }
}
