//! Offline effects which get applied to rendered blocks, outside of the grain engine.

use crate::RenderedBlock;

// -------------------------------------------------------------------------------------------------

pub mod fade;
pub mod filter;
pub mod gain;
pub mod modulation;

// -------------------------------------------------------------------------------------------------

/// Effects manipulate rendered blocks in-place.
///
/// Effects validate their parameters when they get created, so processing can't fail. An effect
/// may keep state across `process` calls (e.g. filter memory). Effects may be moved into render
/// workers, so they must be `Send`.
pub trait Effect: Send {
    /// A unique, static name for the effect, used for logging.
    fn name(&self) -> &'static str;

    /// Process the given block in-place.
    fn process(&mut self, block: &mut RenderedBlock);
}

// -------------------------------------------------------------------------------------------------

/// Apply the given effect chain to the block, in order.
pub fn apply_effects(block: &mut RenderedBlock, effects: &mut [Box<dyn Effect>]) {
    for effect in effects {
        log::debug!(
            "Applying effect '{}' to {} frames",
            effect.name(),
            block.frame_count()
        );
        effect.process(block);
    }
}

// -------------------------------------------------------------------------------------------------
