//! Common, shared DSP tools for effects.

pub mod biquad;
