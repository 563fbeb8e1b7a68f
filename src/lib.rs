#![doc = include_str!("../README.md")]

// private mods (will be partly re-exported)
mod error;
mod grain;
mod repository;
mod source;

// public, flat re-exports
pub use error::Error;

pub use grain::{Grain, GrainFeatures, GrainParameter, GrainPlacement};

pub use repository::{GrainQuery, GrainRecord, GrainRepository, MemoryGrainRepository};

pub use source::{
    load_grain_samples, FileSourceAccessor, MemorySourceAccessor, SourceAudioAccessor,
};

pub use render::{
    block::RenderedBlock,
    crossfade::{crossfade, crossfade_chain},
    merge::merge,
    pipeline::{render_sections, RenderConfig},
    pool::{render_candidates, render_candidates_with_threads},
    window::{GrainWindowMode, WindowFunction},
};

pub use effect::{apply_effects, Effect};

pub use output::WavOutputSpec;
#[cfg(feature = "wav-output")]
pub use output::wav::write_wav;

// public mods
pub mod effect;
pub mod output;
pub mod render;
pub mod sequence;
pub mod utils;

pub mod effects {
    //! Set of basic offline effect implementations for rendered blocks.

    pub use super::effect::{
        fade::FadeEffect,
        filter::{FilterEffect, FilterEffectType},
        gain::GainEffect,
        modulation::{AmplitudeModulationEffect, ModulationPartial},
    };
}
