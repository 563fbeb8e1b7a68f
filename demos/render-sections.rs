//! Renders a few candidates of an interpolated grain texture in parallel and writes them as
//! wav files. Grains are picked from an in-memory repository by frequency, moving from low to
//! high and back again.

use std::{f64::consts::PI, path::PathBuf};

use rand::{rngs::SmallRng, Rng, SeedableRng};

use grainsmith::{
    apply_effects,
    effects::{FadeEffect, FilterEffect, FilterEffectType, GainEffect},
    render_candidates, render_sections, write_wav, Effect, Error, FileSourceAccessor,
    GrainFeatures, GrainQuery, GrainRecord, GrainRepository, MemoryGrainRepository,
    MemorySourceAccessor, RenderConfig, SourceAudioAccessor, WavOutputSpec,
};

// -------------------------------------------------------------------------------------------------

// Common demo code
#[path = "./common/arguments.rs"]
mod arguments;

// -------------------------------------------------------------------------------------------------

const SAMPLE_RATE: u32 = 44100;
const GRAIN_LENGTH: usize = 2048;
const SOURCE_FREQUENCIES: [f64; 4] = [110.0, 220.0, 440.0, 880.0];

// -------------------------------------------------------------------------------------------------

/// Create a few seconds of noisy sine tones and a record for every half grain of them.
fn synthetic_sources() -> (MemorySourceAccessor, MemoryGrainRepository) {
    let mut rng = SmallRng::seed_from_u64(0x5eed);
    let mut accessor = MemorySourceAccessor::new();
    let mut repository = MemoryGrainRepository::new();
    let frame_count = SAMPLE_RATE as usize * 2;
    for (source_index, frequency) in SOURCE_FREQUENCIES.into_iter().enumerate() {
        let source_ref = format!("recordings/tone-{frequency}.wav");
        let samples = (0..frame_count)
            .map(|frame| {
                let phase = 2.0 * PI * frequency * frame as f64 / SAMPLE_RATE as f64;
                (0.8 * phase.sin() + 0.1 * rng.random_range(-1.0..1.0)) as f32
            })
            .collect::<Vec<_>>();
        for (index, start_frame) in (0..frame_count - GRAIN_LENGTH)
            .step_by(GRAIN_LENGTH / 2)
            .enumerate()
        {
            let grain = &samples[start_frame..start_frame + GRAIN_LENGTH];
            let energy = grain.iter().map(|s| s * s).sum::<f32>() / GRAIN_LENGTH as f32;
            repository.insert(GrainRecord {
                id: (source_index * 1000 + index) as u64,
                source_ref: source_ref.clone(),
                start_frame,
                end_frame: start_frame + GRAIN_LENGTH,
                sample_rate: SAMPLE_RATE,
                features: GrainFeatures::new()
                    .with("frequency", frequency)
                    .with("energy", energy as f64),
                tags: vec!["tone".to_string()],
            });
        }
        accessor.insert(&source_ref, samples);
    }
    (accessor, repository)
}

/// Final effect chain, applied to each rendered candidate.
fn effect_chain() -> Result<Vec<Box<dyn Effect>>, Error> {
    let effects: Vec<Box<dyn Effect>> = vec![
        Box::new(FilterEffect::new(
            FilterEffectType::Lowpass,
            2000.0,
            1,
            SAMPLE_RATE,
        )?),
        Box::new(FilterEffect::new(
            FilterEffectType::Highpass,
            80.0,
            4,
            SAMPLE_RATE,
        )?),
        Box::new(FadeEffect::new(
            SAMPLE_RATE as usize / 2,
            SAMPLE_RATE as usize / 2,
        )?),
        Box::new(GainEffect::with_gain_db(-6.0)?),
    ];
    Ok(effects)
}

// -------------------------------------------------------------------------------------------------

fn main() -> Result<(), Error> {
    let args = arguments::parse();

    let output_dir = args.output_dir.unwrap_or_else(|| PathBuf::from("."));
    let candidates = args.candidates.unwrap_or(3);
    let seed = args.seed.unwrap_or(0);

    // Grain records and sources. The repository is always synthetic here, but grain sources
    // can be resolved from disk, when the repository's source refs exist in the given dir.
    let (memory_accessor, repository) = synthetic_sources();
    let accessor: Box<dyn SourceAudioAccessor> = match args.source_dir {
        Some(source_dir) => Box::new(FileSourceAccessor::new([source_dir])),
        None => Box::new(memory_accessor),
    };

    // One grain category per section: low to high and back
    let categories = [110.0, 220.0, 440.0, 880.0, 440.0, 110.0]
        .into_iter()
        .map(|frequency| {
            let query = GrainQuery::new()
                .with_length(GRAIN_LENGTH)
                .with_range("frequency", frequency..=frequency)
                .with_greater_than("energy", 0.01)
                .with_tag("tone");
            repository.fetch_grains(&query)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let config = RenderConfig {
        unique_grains_per_section: 6,
        repetitions: 40,
        distance_between_grains: -(GRAIN_LENGTH as i64) + 300,
        ..RenderConfig::default()
    };

    let results = render_candidates(candidates, seed, |index, rng| {
        let mut block = render_sections(&categories, &config, accessor.as_ref(), rng)?;
        apply_effects(&mut block, &mut effect_chain()?);
        let path = output_dir.join(format!("grains_{}.wav", index + 1));
        write_wav(&path, &block, WavOutputSpec::new(SAMPLE_RATE, 24))?;
        Ok(path)
    })?;

    for (index, result) in results.iter().enumerate() {
        match result {
            Ok(path) => println!("Candidate #{} written to '{}'", index + 1, path.display()),
            Err(err) => println!("Candidate #{} failed: {err}", index + 1),
        }
    }
    Ok(())
}
