use std::{fs::File, io, path::Path};

use symphonia::core::{
    audio::SampleBuffer,
    codecs::{Decoder, DecoderOptions},
    errors::Error as SymphoniaError,
    formats::{FormatOptions, FormatReader},
    io::MediaSourceStream,
    meta::MetadataOptions,
    probe::Hint,
};

use crate::{utils::buffer::extend_from_interleaved_channel, Error};

// -------------------------------------------------------------------------------------------------

/// Decodes the default track of an audio file into plain `f32` sample buffers.
pub(crate) struct AudioDecoder {
    track_id: u32,
    decoder: Box<dyn Decoder>,
    format: Box<dyn FormatReader>,
}

impl AudioDecoder {
    /// Create a new decoder from the given file path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let file = Box::new(File::open(path.as_ref())?);
        let source_stream = MediaSourceStream::new(file, Default::default());

        let mut hint = Hint::new();
        if let Some(extension) = path.as_ref().extension().and_then(|e| e.to_str()) {
            hint.with_extension(extension);
        }
        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                source_stream,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|err| Error::AudioDecodingError(Box::new(err)))?;

        let format = probed.format;
        let Some(track) = format.default_track() else {
            return Err(Error::AudioDecodingError(
                "Audio file has no default track".into(),
            ));
        };
        let track_id = track.id;

        let decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|err| Error::AudioDecodingError(Box::new(err)))?;

        Ok(Self {
            track_id,
            decoder,
            format,
        })
    }

    /// Sample rate of the decoded track, if known.
    pub fn sample_rate(&self) -> Option<u32> {
        self.decoder.codec_params().sample_rate
    }

    /// Decode all remaining packets and return the given channel's samples.
    ///
    /// Packets which fail to decode because of invalid data are skipped. Channels which
    /// don't exist in the file are an error.
    pub fn decode_channel(&mut self, channel: usize) -> Result<Vec<f32>, Error> {
        let mut output = Vec::new();
        let mut sample_buffer: Option<SampleBuffer<f32>> = None;
        let mut buffer_frames = 0;
        loop {
            let packet = match self.format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(err)) if err.kind() == io::ErrorKind::UnexpectedEof => {
                    break; // End of this stream.
                }
                Err(err) => return Err(Error::AudioDecodingError(Box::new(err))),
            };
            // Skip packets of other tracks.
            if packet.track_id() != self.track_id {
                continue;
            }
            match self.decoder.decode(&packet) {
                Ok(decoded) => {
                    let spec = *decoded.spec();
                    let channel_count = spec.channels.count();
                    if channel >= channel_count {
                        return Err(Error::AudioDecodingError(
                            format!("Audio file has no channel #{channel}").into(),
                        ));
                    }
                    let capacity = decoded.capacity();
                    if buffer_frames < capacity {
                        sample_buffer = None;
                    }
                    let buffer = sample_buffer.get_or_insert_with(|| {
                        buffer_frames = capacity;
                        SampleBuffer::new(capacity as u64, spec)
                    });
                    buffer.copy_interleaved_ref(decoded);
                    extend_from_interleaved_channel(
                        buffer.samples(),
                        channel_count,
                        channel,
                        &mut output,
                    );
                }
                Err(SymphoniaError::IoError(err)) => {
                    log::warn!("Audio file decoder I/O error: {err}");
                    continue;
                }
                Err(SymphoniaError::DecodeError(err)) => {
                    log::warn!("Audio file decoder error: {err}");
                    continue;
                }
                Err(err) => return Err(Error::AudioDecodingError(Box::new(err))),
            }
        }
        Ok(output)
    }
}
