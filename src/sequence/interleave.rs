//! Ratio preserving interleaving of two ordered sequences.

// -------------------------------------------------------------------------------------------------

/// Interleave two sequences of possibly different length as evenly as possible.
///
/// The result contains all items of both inputs, and the relative order of each input's items
/// is preserved. Items are taken in batches from the larger and then the smaller input: the
/// first batch takes `round(larger/smaller)` items from the larger input and one from the
/// smaller. Then the larger or smaller batch size grows by one whenever the running ratio of
/// taken items falls below or rises above the ideal ratio. Batch sizes persist across
/// iterations. Once one input is exhausted, the rest of the other one is appended.
///
/// When one of the inputs is empty, the result is the concatenation of both.
pub fn interleave<T>(list1: Vec<T>, list2: Vec<T>) -> Vec<T> {
    if list1.is_empty() || list2.is_empty() {
        let mut combined = list1;
        combined.extend(list2);
        return combined;
    }

    let (larger, smaller) = if list1.len() < list2.len() {
        (list2, list1)
    } else {
        (list1, list2)
    };
    let larger_len = larger.len();
    let smaller_len = smaller.len();
    let ideal_ratio = larger_len as f64 / smaller_len as f64;

    let mut combined = Vec::with_capacity(larger_len + smaller_len);
    let mut larger_iter = larger.into_iter();
    let mut smaller_iter = smaller.into_iter();

    // first batch. ratio is >= 1, so this takes at least one item
    let mut larger_batch_size = ideal_ratio.round_ties_even() as usize;
    let mut smaller_batch_size = 1;
    combined.extend(larger_iter.by_ref().take(larger_batch_size));
    combined.extend(smaller_iter.by_ref().take(smaller_batch_size));
    let mut larger_taken = larger_batch_size.min(larger_len);
    let mut smaller_taken = smaller_batch_size;

    // adjust batch sizes until one or both lists are exhausted
    while larger_taken < larger_len && smaller_taken < smaller_len {
        let current_ratio = larger_taken as f64 / smaller_taken as f64;
        if current_ratio < ideal_ratio {
            larger_batch_size += 1;
        } else if current_ratio > ideal_ratio {
            smaller_batch_size += 1;
        }
        let larger_count = larger_batch_size.min(larger_len - larger_taken);
        let smaller_count = smaller_batch_size.min(smaller_len - smaller_taken);

        combined.extend(larger_iter.by_ref().take(larger_count));
        combined.extend(smaller_iter.by_ref().take(smaller_count));
        larger_taken += larger_count;
        smaller_taken += smaller_count;
    }

    // add remaining items
    combined.extend(larger_iter);
    combined.extend(smaller_iter);
    combined
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn is_subsequence(needle: &[i32], haystack: &[i32]) -> bool {
        let filtered = haystack
            .iter()
            .copied()
            .filter(|v| needle.contains(v))
            .collect::<Vec<_>>();
        filtered == needle
    }

    #[test]
    fn worked_example() {
        let list1 = (1..=10).collect::<Vec<i32>>();
        let list2 = vec![11, 12, 13];
        let combined = interleave(list1.clone(), list2.clone());
        assert_eq!(combined.len(), 13);
        assert_eq!(&combined[..4], &[1, 2, 3, 11]);
        assert!(is_subsequence(&list1, &combined));
        assert!(is_subsequence(&list2, &combined));
        assert_eq!(combined, vec![1, 2, 3, 11, 4, 5, 6, 7, 12, 8, 9, 10, 13]);
    }

    #[test]
    fn larger_list_comes_first_in_batches() {
        let combined = interleave(vec![11, 12, 13], (1..=10).collect());
        assert_eq!(&combined[..4], &[1, 2, 3, 11]);
        assert_eq!(combined.len(), 13);
    }

    #[test]
    fn equal_lengths() {
        let combined = interleave(vec![1, 2, 3, 4], vec![5, 6, 7, 8]);
        assert_eq!(combined, vec![1, 5, 2, 6, 3, 7, 4, 8]);
    }

    #[test]
    fn empty_inputs() {
        assert_eq!(interleave(Vec::<i32>::new(), vec![1, 2]), vec![1, 2]);
        assert_eq!(interleave(vec![1, 2], Vec::new()), vec![1, 2]);
        assert!(interleave(Vec::<i32>::new(), Vec::new()).is_empty());
    }

    #[test]
    fn length_and_order_preserved() {
        for len1 in 1..25 {
            for len2 in 1..25 {
                let list1 = (0..len1).collect::<Vec<i32>>();
                let list2 = (100..100 + len2).collect::<Vec<i32>>();
                let combined = interleave(list1.clone(), list2.clone());
                assert_eq!(combined.len(), (len1 + len2) as usize);
                assert!(is_subsequence(&list1, &combined));
                assert!(is_subsequence(&list2, &combined));
            }
        }
    }
}
