//! Deterministic train/test hold-out split.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

#[derive(Debug, Clone)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..count` with a seeded RNG and reserve `test_fraction` of it as
/// the test split. The training split keeps at least one sample whenever the
/// dataset is non-empty.
pub fn split_indices(count: usize, test_fraction: f32, seed: u64) -> SplitIndices {
    let mut order: Vec<usize> = (0..count).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);

    let test_len = (count as f32 * test_fraction.clamp(0.0, 1.0)).round() as usize;
    let test_len = test_len.min(count.saturating_sub(1));
    let test = order.split_off(count - test_len);
    SplitIndices { train: order, test }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_is_deterministic_for_a_seed() {
        let a = split_indices(50, 0.2, 7);
        let b = split_indices(50, 0.2, 7);
        assert_eq!(a.train, b.train);
        assert_eq!(a.test, b.test);
    }

    #[test]
    fn split_sizes_match_fraction() {
        let s = split_indices(50, 0.2, 7);
        assert_eq!(s.test.len(), 10);
        assert_eq!(s.train.len(), 40);
    }

    #[test]
    fn splits_are_disjoint_and_cover_all_indices() {
        let s = split_indices(23, 0.3, 1);
        let mut all: Vec<usize> = s.train.iter().chain(s.test.iter()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..23).collect::<Vec<_>>());
    }

    #[test]
    fn training_split_never_empties() {
        let s = split_indices(3, 1.0, 0);
        assert_eq!(s.train.len(), 1);
        assert_eq!(s.test.len(), 2);
    }

    #[test]
    fn empty_dataset_splits_empty() {
        let s = split_indices(0, 0.5, 0);
        assert!(s.train.is_empty());
        assert!(s.test.is_empty());
    }
}
