//! Deterministic and randomized operators which reshape an assembled sequence before its grains
//! get positioned.

use rand::{seq::IndexedRandom, Rng};

use crate::{grain::GrainParameter, Error, Grain};

// -------------------------------------------------------------------------------------------------

/// Number of weighted coin flips drawn per pair in [`swap_random_pair`].
const SWAP_DRAW_COUNT: usize = 10;

// -------------------------------------------------------------------------------------------------

/// Delete every `n`th item, starting at index `n`.
///
/// Deletion happens in a single forward pass on the shrinking sequence: after removing the item
/// at index `i`, the next removal happens at `i + n - 1`. So `n = 2` removes every second item
/// starting at index 2, and `n = 1` removes everything but the first item.
pub fn delete_nth<T>(items: &mut Vec<T>, n: usize) -> Result<(), Error> {
    validate_stride("delete_nth", n, items.len())?;
    let mut index = n;
    while index < items.len() {
        items.remove(index);
        index += n - 1;
    }
    Ok(())
}

/// Swap each `n`th adjacent pair: items `i` and `i + 1` for `i` in `0, n, 2n...`.
pub fn swap_nth_adjacent_pair<T>(items: &mut [T], n: usize) -> Result<(), Error> {
    validate_stride("swap_nth_adjacent_pair", n, items.len())?;
    for index in (0..items.len().saturating_sub(1)).step_by(n) {
        items.swap(index, index + 1);
    }
    Ok(())
}

/// Swap each `n`th pair of items which are `m` items apart: items `i` and `i + m` for `i` in
/// `0, n, 2n...`.
pub fn swap_nth_m_pair<T>(items: &mut [T], n: usize, m: usize) -> Result<(), Error> {
    validate_stride("swap_nth_m_pair", n, items.len())?;
    if m == 0 || m > items.len() {
        return Err(Error::ParameterError(format!(
            "swap_nth_m_pair: pair distance must be in range [1, {}], but is {m}",
            items.len()
        )));
    }
    for index in (0..items.len() - m).step_by(n) {
        items.swap(index, index + m);
    }
    Ok(())
}

/// Randomly swap adjacent pairs with the given probability.
///
/// For each pair, ten weighted coin flips are drawn with probability `prob` of "swap", then one
/// of the ten outcomes is picked at random. Statistically this is a single Bernoulli trial, but
/// the exact draw sequence is kept, so renders remain reproducible for a given seed.
pub fn swap_random_pair<T, R: Rng + ?Sized>(
    items: &mut [T],
    prob: f64,
    rng: &mut R,
) -> Result<(), Error> {
    validate_probability(prob)?;
    for index in 0..items.len().saturating_sub(1) {
        if draw_swap(prob, rng) {
            items.swap(index, index + 1);
        }
    }
    Ok(())
}

/// List-of-lists variant of [`swap_random_pair`]: each item of a list is randomly swapped with
/// the item at the same index of the next list, using the same two-stage draw. Items which have
/// no counterpart in the next list are skipped.
pub fn swap_random_pair_across<T, R: Rng + ?Sized>(
    lists: &mut [Vec<T>],
    prob: f64,
    rng: &mut R,
) -> Result<(), Error> {
    validate_probability(prob)?;
    for index in 0..lists.len().saturating_sub(1) {
        let (head, tail) = lists.split_at_mut(index + 1);
        let (current, next) = (&mut head[index], &mut tail[0]);
        for (a, b) in current.iter_mut().zip(next.iter_mut()) {
            if draw_swap(prob, rng) {
                std::mem::swap(a, b);
            }
        }
    }
    Ok(())
}

/// Add a random deviation to the given parameter of each grain.
///
/// Deviations are drawn uniformly and independently per grain from `[-max_deviation,
/// max_deviation]`, or `[0, max_deviation]` when `only_positive` is set. When a new value is
/// out of the parameter's range, an error is returned and no grain gets modified.
pub fn randomize_param<R: Rng + ?Sized>(
    grains: &mut [Grain],
    param: GrainParameter,
    rng: &mut R,
    max_deviation: u32,
    only_positive: bool,
) -> Result<(), Error> {
    let max_deviation = max_deviation as i64;
    let min_deviation = if only_positive { 0 } else { -max_deviation };
    // draw and validate all values first, so we don't leave the sequence half modified
    let values = grains
        .iter()
        .map(|grain| {
            let value = grain.param(param) + rng.random_range(min_deviation..=max_deviation);
            param.validate(value).map(|_| value)
        })
        .collect::<Result<Vec<_>, Error>>()?;
    for (grain, value) in grains.iter_mut().zip(values) {
        grain.set_param(param, value)?;
    }
    Ok(())
}

/// Distribute grains across channels in a round-robin fashion: `channel[i] = i % num_channels`.
pub fn spread_across_channels(grains: &mut [Grain], num_channels: usize) -> Result<(), Error> {
    if num_channels == 0 {
        return Err(Error::ParameterError(
            "Number of channels must be > 0".to_string(),
        ));
    }
    for (index, grain) in grains.iter_mut().enumerate() {
        grain.channel = index % num_channels;
    }
    Ok(())
}

// -------------------------------------------------------------------------------------------------

fn validate_stride(operation: &str, n: usize, len: usize) -> Result<(), Error> {
    if n == 0 || n > len {
        return Err(Error::ParameterError(format!(
            "{operation}: stride must be in range [1, {len}], but is {n}"
        )));
    }
    Ok(())
}

fn validate_probability(prob: f64) -> Result<(), Error> {
    if !(0.0..=1.0).contains(&prob) {
        return Err(Error::ParameterError(format!(
            "Swap probability must be in range [0, 1], but is {prob}"
        )));
    }
    Ok(())
}

fn draw_swap<R: Rng + ?Sized>(prob: f64, rng: &mut R) -> bool {
    let swaps: [bool; SWAP_DRAW_COUNT] = std::array::from_fn(|_| rng.random_bool(prob));
    swaps.choose(rng).copied().unwrap_or(false)
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use rand::{rngs::SmallRng, SeedableRng};

    use super::*;

    fn grains(count: usize) -> Vec<Grain> {
        (0..count)
            .map(|i| Grain::new("a.wav", i, i + 10).unwrap())
            .collect()
    }

    #[test]
    fn delete_nth_shifting_stride() {
        let mut items = (0..10).collect::<Vec<i32>>();
        delete_nth(&mut items, 3).unwrap();
        // removes original items 3, 6 and 9: index 3, then 5 and 7 on the shrunk list
        assert_eq!(items, vec![0, 1, 2, 4, 5, 7, 8]);

        let mut items = (0..10).collect::<Vec<i32>>();
        delete_nth(&mut items, 2).unwrap();
        assert_eq!(items, vec![0, 1, 3, 5, 7, 9]);

        // a stride of 1 keeps removing at index 1 until only the first item is left
        let mut items = (0..10).collect::<Vec<i32>>();
        delete_nth(&mut items, 1).unwrap();
        assert_eq!(items, vec![0]);

        let mut items = (0..4).collect::<Vec<i32>>();
        delete_nth(&mut items, 4).unwrap();
        assert_eq!(items, vec![0, 1, 2, 3]);

        assert!(delete_nth(&mut (0..4).collect::<Vec<i32>>(), 0).is_err());
        assert!(delete_nth(&mut (0..4).collect::<Vec<i32>>(), 5).is_err());
    }

    #[test]
    fn swap_nth_pairs() {
        let mut items = (0..7).collect::<Vec<i32>>();
        swap_nth_adjacent_pair(&mut items, 2).unwrap();
        assert_eq!(items, vec![1, 0, 3, 2, 5, 4, 6]);

        let mut items = (0..7).collect::<Vec<i32>>();
        swap_nth_adjacent_pair(&mut items, 3).unwrap();
        assert_eq!(items, vec![1, 0, 2, 4, 3, 5, 6]);

        let mut items = (0..8).collect::<Vec<i32>>();
        swap_nth_m_pair(&mut items, 4, 2).unwrap();
        assert_eq!(items, vec![2, 1, 0, 3, 6, 5, 4, 7]);

        assert!(swap_nth_adjacent_pair(&mut [1, 2], 3).is_err());
        assert!(swap_nth_m_pair(&mut [1, 2, 3], 1, 4).is_err());
        assert!(swap_nth_m_pair(&mut [1, 2, 3], 0, 1).is_err());
    }

    #[test]
    fn swap_random() {
        let mut rng = SmallRng::seed_from_u64(42);

        let mut items = (0..20).collect::<Vec<i32>>();
        swap_random_pair(&mut items, 0.0, &mut rng).unwrap();
        assert_eq!(items, (0..20).collect::<Vec<i32>>());

        // with prob 1 every pair swaps, which rotates the first item to the end
        swap_random_pair(&mut items, 1.0, &mut rng).unwrap();
        let mut expected = (1..20).collect::<Vec<i32>>();
        expected.push(0);
        assert_eq!(items, expected);

        let mut items = (0..50).collect::<Vec<i32>>();
        swap_random_pair(&mut items, 0.5, &mut rng).unwrap();
        let mut sorted = items.clone();
        sorted.sort();
        assert_eq!(sorted, (0..50).collect::<Vec<i32>>());

        assert!(swap_random_pair(&mut items, 1.5, &mut rng).is_err());
    }

    #[test]
    fn swap_random_draw_sequence() {
        let prob = 0.3;
        let mut items = (0..40).collect::<Vec<i32>>();
        let mut rng = SmallRng::seed_from_u64(1234);
        swap_random_pair(&mut items, prob, &mut rng).unwrap();

        // replay: ten weighted flips per pair, then one of them is picked
        let mut expected = (0..40).collect::<Vec<i32>>();
        let mut replay_rng = SmallRng::seed_from_u64(1234);
        for index in 0..expected.len() - 1 {
            let flips = (0..10)
                .map(|_| replay_rng.random_bool(prob))
                .collect::<Vec<_>>();
            if *flips.choose(&mut replay_rng).unwrap() {
                expected.swap(index, index + 1);
            }
        }
        assert_eq!(items, expected);
        // both generators consumed the same number of draws
        assert_eq!(rng.random::<u64>(), replay_rng.random::<u64>());
    }

    #[test]
    fn swap_random_across() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut lists = vec![vec![1, 2, 3], vec![4, 5], vec![6, 7, 8]];
        swap_random_pair_across(&mut lists, 1.0, &mut rng).unwrap();
        // first pass swaps lists 0 and 1 where possible, then lists 1 and 2
        assert_eq!(lists, vec![vec![4, 5, 3], vec![6, 7], vec![1, 2, 8]]);

        let mut lists = vec![vec![1, 2, 3], vec![4, 5]];
        swap_random_pair_across(&mut lists, 0.0, &mut rng).unwrap();
        assert_eq!(lists, vec![vec![1, 2, 3], vec![4, 5]]);
    }

    #[test]
    fn randomize() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut grains = grains(200);
        for grain in &mut grains {
            grain.distance_between_grains = 100;
        }
        randomize_param(
            &mut grains,
            GrainParameter::DistanceBetweenGrains,
            &mut rng,
            50,
            false,
        )
        .unwrap();
        assert!(grains
            .iter()
            .all(|g| (50..=150).contains(&g.distance_between_grains)));
        assert!(grains.iter().any(|g| g.distance_between_grains < 100));

        randomize_param(&mut grains, GrainParameter::Channel, &mut rng, 3, true).unwrap();
        assert!(grains.iter().all(|g| g.channel <= 3));

        let mut grains = self::grains(50);
        assert!(randomize_param(&mut grains, GrainParameter::Channel, &mut rng, 3, false).is_err());
    }

    #[test]
    fn randomize_failure_keeps_grains() {
        let mut rng = SmallRng::seed_from_u64(3);
        // leading grains can deviate freely, trailing ones can't go below channel 0
        let mut grains = grains(50);
        for grain in &mut grains[..25] {
            grain.channel = 100;
            grain.distance_between_grains = 10;
        }
        let original = grains.clone();
        assert!(randomize_param(&mut grains, GrainParameter::Channel, &mut rng, 3, false).is_err());
        assert_eq!(grains, original);
    }

    #[test]
    fn spread() {
        let mut grains = grains(5);
        spread_across_channels(&mut grains, 2).unwrap();
        let channels = grains.iter().map(|g| g.channel).collect::<Vec<_>>();
        assert_eq!(channels, vec![0, 1, 0, 1, 0]);
        assert!(spread_across_channels(&mut grains, 0).is_err());
    }
}
