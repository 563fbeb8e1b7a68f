//! Absolute grain placement.

use crate::{grain::GrainPlacement, Error, Grain};

// -------------------------------------------------------------------------------------------------

/// Calculate the absolute output placement of each grain in the given sequence.
///
/// The first grain starts at frame 0. Every following grain starts at the previous grain's end
/// plus its own `distance_between_grains`, so negative distances make it overlap with its
/// predecessor. Each grain spans `end_frame - start_frame` frames.
///
/// Placements are frozen once set: sequences which contain already positioned grains are
/// rejected, as are distances which would move a grain before the sequence's start. Nothing is
/// modified when an error is returned.
pub fn calculate_positions(grains: &mut [Grain]) -> Result<(), Error> {
    if grains.is_empty() {
        return Err(Error::EmptySelectionError);
    }
    if let Some(index) = grains.iter().position(Grain::is_placed) {
        return Err(Error::ParameterError(format!(
            "Grain #{index} already got positioned"
        )));
    }

    // calculate all placements first, so we don't leave the sequence half positioned on errors
    let mut placements = Vec::with_capacity(grains.len());
    let mut end_idx = grains[0].frame_count();
    placements.push(GrainPlacement {
        start_idx: 0,
        end_idx,
    });
    for (index, grain) in grains.iter().enumerate().skip(1) {
        let start_idx = end_idx as i64 + grain.distance_between_grains;
        if start_idx < 0 {
            return Err(Error::ParameterError(format!(
                "Grain #{index} would start at {start_idx}, before the sequence start. \
                Its distance {} is too large an overlap",
                grain.distance_between_grains
            )));
        }
        let start_idx = start_idx as usize;
        end_idx = start_idx + grain.frame_count();
        placements.push(GrainPlacement { start_idx, end_idx });
    }

    for (grain, placement) in grains.iter_mut().zip(placements) {
        grain.place(placement)?;
    }
    Ok(())
}

// -------------------------------------------------------------------------------------------------
