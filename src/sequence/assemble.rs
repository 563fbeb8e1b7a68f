//! Strategies which build raw, unplaced grain sequences from a pool of template grains.
//!
//! All assemblers copy the given templates, so every occurrence of a grain in the resulting
//! sequence can be mutated and positioned independently. They assign a uniform
//! `distance_between_grains` and channel 0 to each copy.

use rand::{seq::SliceRandom, Rng};

use crate::{Error, Grain};

use super::Sequence;

// -------------------------------------------------------------------------------------------------

/// Repeat a grain, or a list of grains, `n` times.
///
/// Pass a single grain via `std::slice::from_ref`. For lists each repetition is a full pass over
/// the list, so the result is `grains` concatenated `n` times.
pub fn assemble_repeat(
    grains: &[Grain],
    n: usize,
    distance_between_grains: i64,
) -> Result<Sequence, Error> {
    if grains.is_empty() || n == 0 {
        return Err(Error::EmptySelectionError);
    }
    let mut sequence = Vec::with_capacity(grains.len() * n);
    for _ in 0..n {
        sequence.extend(grains.iter().map(Grain::to_unplaced));
    }
    apply_uniform_layout(&mut sequence, distance_between_grains);
    Ok(sequence)
}

/// Use each grain of the pool exactly once, sorted by the given feature names.
///
/// Sorting is applied successively and stable: first by feature 0, then by feature 1 and so on,
/// so the last feature ends up as the primary sort key. Rounding features before may help to get
/// musically meaningful results. Grains which miss one of the features are an error.
pub fn assemble_sorted(
    grains: &[Grain],
    features: &[&str],
    distance_between_grains: i64,
) -> Result<Sequence, Error> {
    if grains.is_empty() {
        return Err(Error::EmptySelectionError);
    }
    for feature in features {
        if let Some(grain) = grains.iter().find(|g| !g.features().contains(feature)) {
            return Err(Error::ParameterError(format!(
                "Grain from '{}' has no feature named '{feature}'",
                grain.source_ref()
            )));
        }
    }
    let mut sequence = grains.iter().map(Grain::to_unplaced).collect::<Vec<_>>();
    for feature in features {
        sequence.sort_by(|a, b| {
            let a = a.feature(feature).unwrap_or_default();
            let b = b.feature(feature).unwrap_or_default();
            a.total_cmp(&b)
        });
    }
    apply_uniform_layout(&mut sequence, distance_between_grains);
    Ok(sequence)
}

/// Use each grain of the pool `n` times in random order.
///
/// The pool gets repeated `n` times, then the whole sequence is shuffled `n` times in a row with
/// the given random generator.
pub fn assemble_stochastic<R: Rng + ?Sized>(
    grains: &[Grain],
    n: usize,
    distance_between_grains: i64,
    rng: &mut R,
) -> Result<Sequence, Error> {
    let mut sequence = assemble_repeat(grains, n, distance_between_grains)?;
    for _ in 0..n {
        sequence.shuffle(rng);
    }
    Ok(sequence)
}

// -------------------------------------------------------------------------------------------------

fn apply_uniform_layout(sequence: &mut [Grain], distance_between_grains: i64) {
    for grain in sequence {
        grain.distance_between_grains = distance_between_grains;
        grain.channel = 0;
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use rand::{rngs::SmallRng, SeedableRng};

    use super::*;
    use crate::GrainFeatures;

    fn pool() -> Vec<Grain> {
        [(1, 2.0, 1.0), (2, 1.0, 2.0), (3, 2.0, 0.0), (4, 1.0, 1.0)]
            .into_iter()
            .map(|(id, frequency, energy)| {
                Grain::new("a.wav", id * 10, id * 10 + 5)
                    .unwrap()
                    .with_id(id as u64)
                    .with_features(
                        GrainFeatures::new()
                            .with("frequency", frequency)
                            .with("energy", energy),
                    )
            })
            .collect()
    }

    fn ids(sequence: &[Grain]) -> Vec<u64> {
        sequence.iter().map(|g| g.id().unwrap()).collect()
    }

    #[test]
    fn repeat() {
        let mut pool = pool();
        pool[0].channel = 3;
        let single = assemble_repeat(std::slice::from_ref(&pool[0]), 3, -2).unwrap();
        assert_eq!(ids(&single), vec![1, 1, 1]);
        assert!(single
            .iter()
            .all(|g| g.distance_between_grains == -2 && g.channel == 0));

        let mut sequence = assemble_repeat(&pool[..2], 2, 5).unwrap();
        assert_eq!(ids(&sequence), vec![1, 2, 1, 2]);
        // copies are independent
        sequence[0].distance_between_grains = 100;
        assert_eq!(sequence[2].distance_between_grains, 5);
        assert_eq!(pool[0].distance_between_grains, 0);

        assert!(matches!(
            assemble_repeat(&[], 2, 0),
            Err(Error::EmptySelectionError)
        ));
    }

    #[test]
    fn sorted() {
        let pool = pool();
        let sequence = assemble_sorted(&pool, &["frequency"], 0).unwrap();
        assert_eq!(ids(&sequence), vec![2, 4, 1, 3]);

        // last sort key dominates, ties keep the previous key's order
        let sequence = assemble_sorted(&pool, &["frequency", "energy"], 7).unwrap();
        assert_eq!(ids(&sequence), vec![3, 4, 1, 2]);
        assert!(sequence.iter().all(|g| g.distance_between_grains == 7));

        assert!(assemble_sorted(&pool, &["centroid"], 0).is_err());
        assert!(matches!(
            assemble_sorted(&[], &["frequency"], 0),
            Err(Error::EmptySelectionError)
        ));
    }

    #[test]
    fn stochastic() {
        let pool = pool();
        let mut rng = SmallRng::seed_from_u64(0x1234);
        let sequence = assemble_stochastic(&pool, 3, -1, &mut rng).unwrap();
        assert_eq!(sequence.len(), 12);
        let mut sorted_ids = ids(&sequence);
        sorted_ids.sort();
        assert_eq!(sorted_ids, vec![1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4, 4]);

        // reproducible with the same seed
        let mut rng = SmallRng::seed_from_u64(0x1234);
        let other = assemble_stochastic(&pool, 3, -1, &mut rng).unwrap();
        assert_eq!(ids(&sequence), ids(&other));
    }

    #[test]
    fn stochastic_shuffles_n_times() {
        let pool = pool();
        let mut rng = SmallRng::seed_from_u64(99);
        let sequence = assemble_stochastic(&pool, 4, 0, &mut rng).unwrap();

        // replay: the repeated pool is shuffled once per repetition
        let mut replay_rng = SmallRng::seed_from_u64(99);
        let mut expected = assemble_repeat(&pool, 4, 0).unwrap();
        for _ in 0..4 {
            expected.shuffle(&mut replay_rng);
        }
        assert_eq!(ids(&sequence), ids(&expected));
        assert_eq!(rng.random::<u64>(), replay_rng.random::<u64>());
    }
}
