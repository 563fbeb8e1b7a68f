//! Grain sequence assembly and post-processing.
//!
//! A [`Sequence`] is built by one of the [`assemble`] strategies, optionally reshaped via
//! [`interpolate`] and the [`mutate`] operators, and then frozen into absolute output positions
//! by [`position::calculate_positions`] before it's rendered.

use crate::Grain;

// -------------------------------------------------------------------------------------------------

pub mod assemble;
pub mod interleave;
pub mod interpolate;
pub mod mutate;
pub mod position;

// -------------------------------------------------------------------------------------------------

/// An ordered list of grains. Order is significant: it defines the grains' placement order.
pub type Sequence = Vec<Grain>;
