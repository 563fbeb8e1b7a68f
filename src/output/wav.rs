use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::{output::WavOutputSpec, Error, RenderedBlock};

// -------------------------------------------------------------------------------------------------

/// Write the given block into a new wav file at `file_path`.
///
/// Channels get interleaved. Integer formats scale and clamp samples to the full integer range,
/// float files are written unchanged.
pub fn write_wav<P: AsRef<Path>>(
    file_path: P,
    block: &RenderedBlock,
    spec: WavOutputSpec,
) -> Result<(), Error> {
    spec.validate()?;
    let channels = u16::try_from(block.channel_count()).map_err(|_| {
        Error::ParameterError(format!(
            "Can't write {} channels into a wav file",
            block.channel_count()
        ))
    })?;
    let wav_spec = WavSpec {
        channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        sample_format: if spec.bits_per_sample == 32 {
            SampleFormat::Float
        } else {
            SampleFormat::Int
        },
    };

    let mut writer = WavWriter::create(file_path.as_ref(), wav_spec)?;
    let interleaved = block.to_interleaved();
    match spec.bits_per_sample {
        32 => {
            for sample in interleaved {
                writer.write_sample(sample)?;
            }
        }
        bits => {
            let max = ((1i32 << (bits - 1)) - 1) as f32;
            for sample in interleaved {
                let value = (sample.clamp(-1.0, 1.0) * max).round() as i32;
                writer.write_sample(value)?;
            }
        }
    }
    writer.finalize()?;

    log::info!(
        "Wrote {} frames with {} channels to '{}'",
        block.frame_count(),
        block.channel_count(),
        file_path.as_ref().display()
    );
    Ok(())
}

// -------------------------------------------------------------------------------------------------
