use rand::Rng;

use crate::{
    grain::GrainParameter,
    sequence::{
        assemble::assemble_repeat,
        interpolate::interpolate_sections,
        mutate::{randomize_param, spread_across_channels, swap_random_pair},
        position::calculate_positions,
    },
    source::{load_grain_samples, SourceAudioAccessor},
    utils::db_to_linear,
    Error, Grain,
};

use super::{block::RenderedBlock, merge::merge, window::GrainWindowMode};

// -------------------------------------------------------------------------------------------------

/// Parameters of [`render_sections`].
///
/// Defaults are tuned for grains of 4096 frames: the default distance makes consecutive grains
/// overlap by all but 75 frames.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Number of random grains which get picked from each category.
    pub unique_grains_per_section: usize,
    /// Number of times the picked grains of a category get repeated.
    pub repetitions: usize,
    /// Initial distance between grains, before randomization.
    pub distance_between_grains: i64,
    /// Number of output channels grains get spread across.
    pub channel_count: usize,
    /// Fraction of adjacent sections which get interpolated, in range `[0, 1]`.
    pub section_overlap: f64,
    /// Probability of swapping adjacent grains, in range `[0, 1]`.
    pub swap_probability: f64,
    /// Maximum random deviation of the distance between grains.
    pub distance_deviation: u32,
    /// Level adjustment of each grain in dB.
    pub grain_level_db: f32,
    /// Window applied to each grain when merging.
    pub window: GrainWindowMode,
    /// Grains whose source reference contains one of these strings never get picked.
    pub excluded_sources: Vec<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            unique_grains_per_section: 10,
            repetitions: 200,
            distance_between_grains: -4096 + 75,
            channel_count: 2,
            section_overlap: 0.95,
            swap_probability: 0.2,
            distance_deviation: 50,
            grain_level_db: -6.0,
            window: GrainWindowMode::Hann,
            excluded_sources: Vec::new(),
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.unique_grains_per_section == 0 || self.repetitions == 0 {
            return Err(Error::ParameterError(
                "Unique grains per section and repetitions must be > 0".to_string(),
            ));
        }
        if self.channel_count == 0 {
            return Err(Error::ParameterError(
                "Channel count must be > 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.section_overlap) {
            return Err(Error::ParameterError(format!(
                "Section overlap must be in range [0, 1], but is {}",
                self.section_overlap
            )));
        }
        if !(0.0..=1.0).contains(&self.swap_probability) {
            return Err(Error::ParameterError(format!(
                "Swap probability must be in range [0, 1], but is {}",
                self.swap_probability
            )));
        }
        if !self.grain_level_db.is_finite() {
            return Err(Error::ParameterError(format!(
                "Grain level must be finite, but is {}",
                self.grain_level_db
            )));
        }
        Ok(())
    }

    fn is_excluded(&self, grain: &Grain) -> bool {
        self.excluded_sources
            .iter()
            .any(|excluded| grain.source_ref().contains(excluded.as_str()))
    }
}

// -------------------------------------------------------------------------------------------------

/// Render a list of grain categories into a single block, interpolating from category to
/// category.
///
/// For each category, `unique_grains_per_section` grains get picked at random (with
/// replacement; picks of excluded sources are dropped) and are repeated `repetitions` times.
/// The resulting sections get chained with [`interpolate_sections`], then adjacent grains are
/// randomly swapped, distances randomized and grains spread across channels. Finally all grains
/// are positioned, loaded from the accessor, leveled and merged.
pub fn render_sections<A, R>(
    categories: &[Vec<Grain>],
    config: &RenderConfig,
    accessor: &A,
    rng: &mut R,
) -> Result<RenderedBlock, Error>
where
    A: SourceAudioAccessor + ?Sized,
    R: Rng + ?Sized,
{
    config.validate()?;
    if categories.is_empty() {
        return Err(Error::EmptySelectionError);
    }

    let mut sections = Vec::with_capacity(categories.len());
    for (index, category) in categories.iter().enumerate() {
        if category.is_empty() {
            log::warn!("Grain category #{index} is empty");
            return Err(Error::EmptySelectionError);
        }
        let mut picked = Vec::with_capacity(config.unique_grains_per_section);
        for _ in 0..config.unique_grains_per_section {
            let grain = &category[rng.random_range(0..category.len())];
            if !config.is_excluded(grain) {
                picked.push(grain.clone());
            }
        }
        log::debug!(
            "Picked {} of {} grains from category #{index}",
            picked.len(),
            category.len()
        );
        sections.push(assemble_repeat(
            &picked,
            config.repetitions,
            config.distance_between_grains,
        )?);
    }

    let mut grains = interpolate_sections(sections, config.section_overlap)?;
    swap_random_pair(&mut grains, config.swap_probability, rng)?;
    randomize_param(
        &mut grains,
        GrainParameter::DistanceBetweenGrains,
        rng,
        config.distance_deviation,
        false,
    )?;
    spread_across_channels(&mut grains, config.channel_count)?;
    calculate_positions(&mut grains)?;
    log::info!(
        "Assembled {} grains from {} categories",
        grains.len(),
        categories.len()
    );

    load_grain_samples(&mut grains, accessor)?;
    let level = db_to_linear(config.grain_level_db);
    for samples in grains.iter_mut().filter_map(|grain| grain.samples.as_mut()) {
        for sample in samples {
            *sample *= level;
        }
    }

    let block = merge(grains, config.channel_count, &config.window)?;
    log::info!(
        "Rendered {} frames with {} channels",
        block.frame_count(),
        block.channel_count()
    );
    Ok(block)
}

// -------------------------------------------------------------------------------------------------
