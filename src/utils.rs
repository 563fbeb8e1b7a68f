//! Common, shared helpers for rendering and effects.

pub mod buffer;
pub mod dsp;

use std::sync::atomic::{AtomicUsize, Ordering};

// -------------------------------------------------------------------------------------------------

const MINUS_INF_IN_DB: f32 = -200.0f32;

// -------------------------------------------------------------------------------------------------

/// Generates a unique usize number, by simply counting atomically upwards from 1.
pub fn unique_usize_id() -> usize {
    static ID_COUNTER: AtomicUsize = AtomicUsize::new(1);
    ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

// -------------------------------------------------------------------------------------------------

/// Convert a linear amplitude to decibels. Values at or below -200 dB are treated as silence.
pub fn linear_to_db(value: f32) -> f32 {
    if value == 1.0 {
        return 0.0; // avoid rounding errors at exactly 0 dB
    } else if value > 1e-10f32 {
        return 20.0 * value.log10();
    }
    MINUS_INF_IN_DB
}

/// Convert decibels to a linear amplitude. -200 dB and below is silence.
pub fn db_to_linear(value: f32) -> f32 {
    if value == 0.0f32 {
        return 1.0f32; // avoid rounding errors at exactly 0 dB
    } else if value > MINUS_INF_IN_DB {
        return 10.0f32.powf(value / 20.0);
    }
    0.0f32
}

// -------------------------------------------------------------------------------------------------
