//! Access to the raw sample data of the recordings grains point into.

mod decoder;

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use dashmap::DashMap;

use crate::{Error, Grain};

use decoder::AudioDecoder;

// -------------------------------------------------------------------------------------------------

/// Loads sample frames of grain source recordings.
///
/// Accessors get shared between render workers, so they must be safe for concurrent read-only
/// use.
pub trait SourceAudioAccessor: Send + Sync {
    /// Load the mono samples of the frame range `start_frame..end_frame` of the given source.
    fn load(&self, source_ref: &str, start_frame: usize, end_frame: usize)
        -> Result<Vec<f32>, Error>;
}

// -------------------------------------------------------------------------------------------------

/// Fill the samples of all given grains from the given accessor.
///
/// Grains are processed grouped by their source, in sequence order within each group. The first
/// failing load aborts the operation.
pub fn load_grain_samples<A: SourceAudioAccessor + ?Sized>(
    grains: &mut [Grain],
    accessor: &A,
) -> Result<(), Error> {
    let mut sources = BTreeMap::<String, Vec<usize>>::new();
    for (index, grain) in grains.iter().enumerate() {
        sources
            .entry(grain.source_ref().to_string())
            .or_default()
            .push(index);
    }
    for (source_ref, indices) in &sources {
        for &index in indices {
            let grain = &mut grains[index];
            let samples = accessor.load(source_ref, grain.start_frame(), grain.end_frame())?;
            grain.samples = Some(samples);
        }
    }
    log::debug!(
        "Loaded samples of {} grains from {} sources",
        grains.len(),
        sources.len()
    );
    Ok(())
}

// -------------------------------------------------------------------------------------------------

/// Resolves grain source references against one or more local search roots and decodes the
/// first channel of the resolved audio files.
///
/// Source references are reduced to their file name (`/` and `\` are both treated as path
/// separators), then the search roots are walked recursively in sorted order. The first file
/// with the same name wins. Resolved paths and decoded files are cached.
pub struct FileSourceAccessor {
    search_roots: Vec<PathBuf>,
    resolved_paths: DashMap<String, PathBuf>,
    decoded_files: DashMap<PathBuf, Arc<Vec<f32>>>,
}

impl FileSourceAccessor {
    pub fn new<P: Into<PathBuf>>(search_roots: impl IntoIterator<Item = P>) -> Self {
        Self {
            search_roots: search_roots.into_iter().map(Into::into).collect(),
            resolved_paths: DashMap::new(),
            decoded_files: DashMap::new(),
        }
    }

    pub fn search_roots(&self) -> &[PathBuf] {
        &self.search_roots
    }

    /// Resolve the given source reference to a local file path.
    pub fn resolve(&self, source_ref: &str) -> Result<PathBuf, Error> {
        if let Some(path) = self.resolved_paths.get(source_ref) {
            return Ok(path.clone());
        }
        let file_name = source_ref.rsplit(['/', '\\']).next().unwrap_or_default();
        if file_name.is_empty() {
            return Err(Error::MissingSourceFileError(source_ref.to_string()));
        }
        for root in &self.search_roots {
            if let Some(path) = find_file(root, file_name) {
                log::debug!("Resolved source '{source_ref}' to '{}'", path.display());
                self.resolved_paths
                    .insert(source_ref.to_string(), path.clone());
                return Ok(path);
            }
        }
        Err(Error::MissingSourceFileError(source_ref.to_string()))
    }

    /// Decoded first channel of the given source.
    fn decoded(&self, source_ref: &str) -> Result<Arc<Vec<f32>>, Error> {
        let path = self.resolve(source_ref)?;
        if let Some(samples) = self.decoded_files.get(&path) {
            return Ok(Arc::clone(&samples));
        }
        let mut decoder = AudioDecoder::from_file(&path)?;
        let samples = decoder.decode_channel(0)?;
        log::debug!(
            "Decoded {} frames at {} Hz from '{}'",
            samples.len(),
            decoder.sample_rate().unwrap_or_default(),
            path.display()
        );
        // another worker may have decoded the same file in the meantime
        let samples = self
            .decoded_files
            .entry(path)
            .or_insert_with(|| Arc::new(samples))
            .clone();
        Ok(samples)
    }
}

impl SourceAudioAccessor for FileSourceAccessor {
    fn load(
        &self,
        source_ref: &str,
        start_frame: usize,
        end_frame: usize,
    ) -> Result<Vec<f32>, Error> {
        let samples = self.decoded(source_ref)?;
        slice_frames(source_ref, &samples, start_frame, end_frame)
    }
}

// -------------------------------------------------------------------------------------------------

/// An accessor for sources which are already present in memory, keyed by source reference.
#[derive(Debug, Default, Clone)]
pub struct MemorySourceAccessor {
    sources: HashMap<String, Vec<f32>>,
}

impl MemorySourceAccessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, source_ref: &str, samples: Vec<f32>) {
        self.sources.insert(source_ref.to_string(), samples);
    }

    pub fn with_source(mut self, source_ref: &str, samples: Vec<f32>) -> Self {
        self.insert(source_ref, samples);
        self
    }
}

impl SourceAudioAccessor for MemorySourceAccessor {
    fn load(
        &self,
        source_ref: &str,
        start_frame: usize,
        end_frame: usize,
    ) -> Result<Vec<f32>, Error> {
        let Some(samples) = self.sources.get(source_ref) else {
            return Err(Error::MissingSourceFileError(source_ref.to_string()));
        };
        slice_frames(source_ref, samples, start_frame, end_frame)
    }
}

// -------------------------------------------------------------------------------------------------

fn slice_frames(
    source_ref: &str,
    samples: &[f32],
    start_frame: usize,
    end_frame: usize,
) -> Result<Vec<f32>, Error> {
    if end_frame <= start_frame || end_frame > samples.len() {
        return Err(Error::SourceRangeError {
            source_ref: source_ref.to_string(),
            start_frame,
            end_frame,
            frame_count: samples.len(),
        });
    }
    Ok(samples[start_frame..end_frame].to_vec())
}

/// Depth-first search for a file with the given name, visiting directory entries sorted by path.
/// Symlinked directories are not followed, so link cycles can't recurse endlessly.
fn find_file(dir: &Path, file_name: &str) -> Option<PathBuf> {
    let mut entries = match fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|entry| {
                let entry = entry.ok()?;
                Some((entry.path(), entry.file_type().ok()?))
            })
            .collect::<Vec<_>>(),
        Err(err) => {
            log::warn!("Failed to read search directory '{}': {err}", dir.display());
            return None;
        }
    };
    entries.sort_by(|(a, _), (b, _)| a.cmp(b));
    for (path, file_type) in entries {
        if file_type.is_dir() {
            if let Some(found) = find_file(&path, file_name) {
                return Some(found);
            }
        } else if file_type.is_symlink() && path.is_dir() {
            log::debug!("Skipping symlinked search directory '{}'", path.display());
        } else if path.file_name().is_some_and(|name| name == file_name) {
            return Some(path);
        }
    }
    None
}

// -------------------------------------------------------------------------------------------------
