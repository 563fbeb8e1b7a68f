use crate::{utils::buffer::planar_to_interleaved, Error};

// -------------------------------------------------------------------------------------------------

/// A dense, planar multi-channel sample buffer: the output of the merger, consumed by the
/// crossfader, effects or an output sink.
///
/// All channels always have the same length. A mono block has a single channel.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedBlock {
    channels: Vec<Vec<f32>>,
}

impl RenderedBlock {
    /// Create a new silent block with the given layout.
    pub fn new(channel_count: usize, frame_count: usize) -> Result<Self, Error> {
        if channel_count == 0 {
            return Err(Error::ParameterError(
                "Channel count must be > 0".to_string(),
            ));
        }
        Ok(Self {
            channels: vec![vec![0.0; frame_count]; channel_count],
        })
    }

    /// Create a new block from the given planar channel buffers.
    pub fn from_channels(channels: Vec<Vec<f32>>) -> Result<Self, Error> {
        let Some(first) = channels.first() else {
            return Err(Error::ParameterError(
                "Channel count must be > 0".to_string(),
            ));
        };
        if channels.iter().any(|c| c.len() != first.len()) {
            return Err(Error::ParameterError(
                "All channels must have the same length".to_string(),
            ));
        }
        Ok(Self { channels })
    }

    /// Create a new mono block.
    pub fn from_mono(samples: Vec<f32>) -> Self {
        Self {
            channels: vec![samples],
        }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Number of sample frames in each channel.
    pub fn frame_count(&self) -> usize {
        self.channels[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.frame_count() == 0
    }

    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    pub fn channel_mut(&mut self, index: usize) -> &mut [f32] {
        &mut self.channels[index]
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Mutable access to all channel buffers. Channels can't be resized, so they always keep
    /// the same length.
    pub fn channels_mut(&mut self) -> impl Iterator<Item = &mut [f32]> {
        self.channels.iter_mut().map(Vec::as_mut_slice)
    }

    pub fn into_channels(self) -> Vec<Vec<f32>> {
        self.channels
    }

    /// Iterate mutably over all samples of all channels.
    pub fn samples_mut(&mut self) -> impl Iterator<Item = &mut f32> {
        self.channels.iter_mut().flatten()
    }

    /// Replace NaN and infinite values with 0.0.
    pub fn sanitize(&mut self) {
        for sample in self.samples_mut() {
            if !sample.is_finite() {
                *sample = 0.0;
            }
        }
    }

    /// Largest absolute sample value of all channels.
    pub fn peak(&self) -> f32 {
        self.channels
            .iter()
            .flatten()
            .fold(0.0f32, |peak, sample| peak.max(sample.abs()))
    }

    /// Copy the block into a new interleaved buffer.
    pub fn to_interleaved(&self) -> Vec<f32> {
        let mut interleaved = vec![0.0; self.channel_count() * self.frame_count()];
        planar_to_interleaved(&self.channels, &mut interleaved);
        interleaved
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout() {
        assert!(RenderedBlock::new(0, 10).is_err());
        assert!(RenderedBlock::from_channels(vec![]).is_err());
        assert!(RenderedBlock::from_channels(vec![vec![0.0; 2], vec![0.0; 3]]).is_err());

        let block = RenderedBlock::new(2, 10).unwrap();
        assert_eq!(block.channel_count(), 2);
        assert_eq!(block.frame_count(), 10);
        assert_eq!(block.peak(), 0.0);
    }

    #[test]
    fn channels_keep_their_length() {
        let mut block = RenderedBlock::new(3, 4).unwrap();
        for (index, channel) in block.channels_mut().enumerate() {
            channel.fill(index as f32);
        }
        assert_eq!(block.channel_count(), 3);
        assert_eq!(block.frame_count(), 4);
        for index in 0..3 {
            assert_eq!(block.channel(index), &[index as f32; 4]);
        }
    }

    #[test]
    fn sanitize_and_interleave() {
        let mut block = RenderedBlock::from_channels(vec![
            vec![1.0, f32::NAN, 3.0],
            vec![f32::INFINITY, -2.0, f32::NEG_INFINITY],
        ])
        .unwrap();
        block.sanitize();
        assert_eq!(block.channel(0), &[1.0, 0.0, 3.0]);
        assert_eq!(block.channel(1), &[0.0, -2.0, 0.0]);
        assert_eq!(block.peak(), 3.0);
        assert_eq!(block.to_interleaved(), vec![1.0, 0.0, 0.0, -2.0, 3.0, 0.0]);
    }
}
