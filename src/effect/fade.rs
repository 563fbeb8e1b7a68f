use crate::{
    effect::Effect,
    render::window::{GrainWindowMode, WindowFunction},
    Error, RenderedBlock,
};

// -------------------------------------------------------------------------------------------------

/// Applies a Hann shaped fade-in and fade-out to the start and end of a block.
///
/// Fades which are longer than the block get shortened to fit: when the fades overlap, both get
/// scaled down proportionally.
#[derive(Debug, Clone)]
pub struct FadeEffect {
    fade_in_frames: usize,
    fade_out_frames: usize,
}

impl FadeEffect {
    pub const EFFECT_NAME: &'static str = "Fade";

    /// Creates a new `FadeEffect` with the given fade lengths in sample frames.
    pub fn new(fade_in_frames: usize, fade_out_frames: usize) -> Result<Self, Error> {
        if fade_in_frames == 0 && fade_out_frames == 0 {
            return Err(Error::ParameterError(
                "Fade-in or fade-out length must be > 0".to_string(),
            ));
        }
        Ok(Self {
            fade_in_frames,
            fade_out_frames,
        })
    }

    /// Fit the fade lengths into the given frame count.
    fn fade_lengths(&self, frame_count: usize) -> (usize, usize) {
        let total = self.fade_in_frames + self.fade_out_frames;
        if total <= frame_count {
            (self.fade_in_frames, self.fade_out_frames)
        } else {
            let fade_in = self.fade_in_frames * frame_count / total;
            (fade_in, frame_count - fade_in)
        }
    }
}

impl Effect for FadeEffect {
    fn name(&self) -> &'static str {
        Self::EFFECT_NAME
    }

    fn process(&mut self, block: &mut RenderedBlock) {
        let frame_count = block.frame_count();
        let (fade_in, fade_out) = self.fade_lengths(frame_count);
        // rising and falling halves of a Hann window of twice the fade length
        let fade_in_ramp = GrainWindowMode::Hann.samples(fade_in * 2);
        let fade_out_ramp = GrainWindowMode::Hann.samples(fade_out * 2);
        for channel in block.channels_mut() {
            for (sample, gain) in channel.iter_mut().zip(&fade_in_ramp[..fade_in]) {
                *sample *= gain;
            }
            let fade_out_start = frame_count - fade_out;
            for (sample, gain) in channel[fade_out_start..]
                .iter_mut()
                .zip(&fade_out_ramp[fade_out..])
            {
                *sample *= gain;
            }
        }
    }
}

// -------------------------------------------------------------------------------------------------
