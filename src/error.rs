use std::{error, fmt, io};

// -------------------------------------------------------------------------------------------------

/// Provides an enumeration of all possible errors reported by grainsmith.
#[derive(Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    /// A repository query or assembly input yielded no grains.
    EmptySelectionError,
    /// A repository predicate which can't be evaluated.
    MalformedQueryError(String),
    /// A grain's source file could not be resolved in any of the search roots.
    MissingSourceFileError(String),
    /// A grain's frame range exceeds the decoded source file.
    SourceRangeError {
        source_ref: String,
        start_frame: usize,
        end_frame: usize,
        frame_count: usize,
    },
    AudioDecodingError(Box<dyn error::Error + Send + Sync>),
    OutputError(Box<dyn error::Error + Send + Sync>),
    ParameterError(String),
    WorkerError(String),
    IoError(io::Error),
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySelectionError => write!(f, "Selection contains no grains"),
            Self::MalformedQueryError(str) => write!(f, "Malformed grain query: {str}"),
            Self::MissingSourceFileError(source_ref) => {
                write!(f, "Source file '{source_ref}' not found")
            }
            Self::SourceRangeError {
                source_ref,
                start_frame,
                end_frame,
                frame_count,
            } => write!(
                f,
                "Frame range {start_frame}..{end_frame} exceeds source file '{source_ref}' \
                with {frame_count} frames"
            ),
            Self::AudioDecodingError(err) | Self::OutputError(err) => err.fmt(f),
            Self::ParameterError(str) => write!(f, "Invalid parameter: {str}"),
            Self::WorkerError(str) => write!(f, "Render worker failed: {str}"),
            Self::IoError(err) => err.fmt(f),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::IoError(err)
    }
}

#[cfg(feature = "wav-output")]
impl From<hound::Error> for Error {
    fn from(err: hound::Error) -> Error {
        match err {
            hound::Error::IoError(err) => Error::IoError(err),
            err => Error::OutputError(Box::new(err)),
        }
    }
}
