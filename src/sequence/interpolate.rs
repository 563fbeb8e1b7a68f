//! Gradual transitions from one sequence to another.

use crate::Error;

use super::interleave::interleave;

// -------------------------------------------------------------------------------------------------

/// Default number of interpolation steps for sequences of the given lengths:
/// `ceil(sqrt(2 * min(len1, len2)))`.
pub fn default_interpolation_steps(len1: usize, len2: usize) -> usize {
    ((2 * len1.min(len2)) as f64).sqrt().ceil() as usize
}

// -------------------------------------------------------------------------------------------------

/// Split both sequences into `steps` chunk pairs, whose composition gradually shifts from
/// `seq1` to `seq2`.
///
/// Chunk sizes of `seq1` fall linearly from `2 * len1 / steps` to zero, chunk sizes of `seq2`
/// rise linearly from zero to `2 * len2 / steps`. Items which are left over after applying the
/// schedules get distributed round-robin across the chunks, starting with the first one, so no
/// item is ever dropped.
///
/// When `steps` is `None`, [`default_interpolation_steps`] is used. Explicitly passing zero
/// steps is an error.
pub fn interpolation_chunks<T>(
    seq1: Vec<T>,
    seq2: Vec<T>,
    steps: Option<usize>,
) -> Result<Vec<(Vec<T>, Vec<T>)>, Error> {
    let steps = match steps {
        Some(0) => {
            return Err(Error::ParameterError(
                "Number of interpolation steps must be > 0".to_string(),
            ))
        }
        Some(steps) => steps,
        None => default_interpolation_steps(seq1.len(), seq2.len()).max(1),
    };
    let chunks1 = split_linear(seq1, steps, Slope::Falling);
    let chunks2 = split_linear(seq2, steps, Slope::Rising);
    Ok(chunks1.into_iter().zip(chunks2).collect())
}

/// Create a new sequence which interpolates linearly from `seq1` to `seq2`: its early portion
/// is dominated by items of `seq1`, its late portion by items of `seq2`.
///
/// Each chunk pair from [`interpolation_chunks`] is combined via [`interleave`] when both chunks
/// are non-empty, else concatenated. The result always contains every item of both inputs
/// exactly once. When one of the inputs is empty, the result is the concatenation of both.
pub fn interpolate<T>(seq1: Vec<T>, seq2: Vec<T>, steps: Option<usize>) -> Result<Vec<T>, Error> {
    if steps == Some(0) {
        return Err(Error::ParameterError(
            "Number of interpolation steps must be > 0".to_string(),
        ));
    }
    if seq1.is_empty() || seq2.is_empty() {
        let mut combined = seq1;
        combined.extend(seq2);
        return Ok(combined);
    }
    let total_len = seq1.len() + seq2.len();
    let mut combined = Vec::with_capacity(total_len);
    for (chunk1, chunk2) in interpolation_chunks(seq1, seq2, steps)? {
        if !chunk1.is_empty() && !chunk2.is_empty() {
            combined.append(&mut interleave(chunk1, chunk2));
        } else {
            combined.extend(chunk1);
            combined.extend(chunk2);
        }
    }
    debug_assert_eq!(combined.len(), total_len);
    Ok(combined)
}

// -------------------------------------------------------------------------------------------------

/// Join a list of sections into a single sequence, interpolating between adjacent sections.
///
/// For each next section, `k = floor(min(len(joined), len(next)) * overlap_fraction)` items
/// from the tail of the already joined sequence get interpolated with the first `k` items of
/// the next section. The remaining items of the next section are appended unchanged.
/// Sections are simply concatenated when `k` is zero.
pub fn interpolate_sections<T>(
    sections: Vec<Vec<T>>,
    overlap_fraction: f64,
) -> Result<Vec<T>, Error> {
    if !(0.0..=1.0).contains(&overlap_fraction) {
        return Err(Error::ParameterError(format!(
            "Section overlap fraction must be in range [0, 1], but is {overlap_fraction}"
        )));
    }
    let mut sections = sections.into_iter();
    let mut joined = sections.next().unwrap_or_default();
    for mut next in sections {
        let overlap = (joined.len().min(next.len()) as f64 * overlap_fraction).floor() as usize;
        if overlap == 0 {
            joined.append(&mut next);
            continue;
        }
        let tail = joined.split_off(joined.len() - overlap);
        let rest = next.split_off(overlap);
        joined.append(&mut interpolate(tail, next, None)?);
        joined.extend(rest);
    }
    Ok(joined)
}

// -------------------------------------------------------------------------------------------------

#[derive(Clone, Copy, PartialEq, Eq)]
enum Slope {
    Falling,
    Rising,
}

/// Split the given sequence into `steps` chunks with linearly changing sizes.
fn split_linear<T>(sequence: Vec<T>, steps: usize, slope: Slope) -> Vec<Vec<T>> {
    debug_assert!(steps > 0);
    let len = sequence.len();
    let height = 2.0 * len as f64 / steps as f64;
    let delta = height / steps as f64;

    let mut items = sequence.into_iter();
    let mut chunks = Vec::with_capacity(steps);
    let mut start = 0;
    for step in 0..steps {
        let size = match slope {
            Slope::Falling => height - delta * step as f64,
            Slope::Rising => delta * step as f64,
        };
        let end = (start as f64 + size).min(len as f64) as usize;
        let count = end.saturating_sub(start);
        chunks.push(items.by_ref().take(count).collect::<Vec<_>>());
        start += count;
    }

    // pad existing chunks with leftovers
    for (item, chunk_index) in items.zip((0..steps).cycle()) {
        chunks[chunk_index].push(item);
    }
    chunks
}

// -------------------------------------------------------------------------------------------------
