//! Seeded train/validation split.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use tracing::debug;

/// Shuffle `items` with a fixed seed and split off a validation share.
///
/// The validation side receives `ceil(len * validation_fraction)` items.
pub fn train_validation_split<T>(
    mut items: Vec<T>,
    validation_fraction: f64,
    seed: u64,
) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);
    items.shuffle(&mut rng);

    let total = items.len();
    let validation = ((total as f64) * validation_fraction.clamp(0.0, 1.0)).ceil() as usize;
    let validation_items = items.split_off(total - validation.min(total));

    debug!(
        train = items.len(),
        validation = validation_items.len(),
        "split dataset"
    );
    (items, validation_items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_follow_fraction() {
        let (train, val) = train_validation_split((0..100).collect(), 0.2, 42);
        assert_eq!(train.len(), 80);
        assert_eq!(val.len(), 20);

        let (train, val) = train_validation_split((0..7).collect::<Vec<_>>(), 0.2, 42);
        assert_eq!((train.len(), val.len()), (5, 2));
    }

    #[test]
    fn same_seed_same_split() {
        let a = train_validation_split((0..50).collect::<Vec<u32>>(), 0.3, 7);
        let b = train_validation_split((0..50).collect::<Vec<u32>>(), 0.3, 7);
        assert_eq!(a, b);
    }

    #[test]
    fn nothing_is_lost() {
        let (mut train, val) = train_validation_split((0..31).collect::<Vec<u32>>(), 0.25, 1);
        train.extend(val);
        train.sort_unstable();
        assert_eq!(train, (0..31).collect::<Vec<_>>());
    }

    #[test]
    fn empty_input() {
        let (train, val) = train_validation_split(Vec::<u8>::new(), 0.2, 42);
        assert!(train.is_empty() && val.is_empty());
    }
}
