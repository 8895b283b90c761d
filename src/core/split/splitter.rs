//! Train/validation partitioning.
//!
//! The rule is fixed: shuffle the whole list with a generator seeded from
//! the configured seed, then slice by position. The first
//! `validation_count` shuffled items form the validation subset and the
//! remainder the training subset. Same input order, seed and ratio always
//! give the same assignment.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetSplit {
    Train,
    Val,
}

impl DatasetSplit {
    pub fn as_str(&self) -> &str {
        match self {
            DatasetSplit::Train => "train",
            DatasetSplit::Val => "val",
        }
    }

    pub fn all() -> [DatasetSplit; 2] {
        [DatasetSplit::Train, DatasetSplit::Val]
    }
}

/// Two disjoint subsets whose union is the input list
#[derive(Debug, Clone, PartialEq)]
pub struct Split<T> {
    pub train: Vec<T>,
    pub val: Vec<T>,
}

impl<T> Split<T> {
    pub fn len(&self) -> usize {
        self.train.len() + self.val.len()
    }

    pub fn subset(&self, split: DatasetSplit) -> &[T] {
        match split {
            DatasetSplit::Train => &self.train,
            DatasetSplit::Val => &self.val,
        }
    }
}

/// Number of validation items: `round(ratio * total)`, never more than `total`
pub fn validation_count(total: usize, val_ratio: f64) -> usize {
    let count = (total as f64 * val_ratio).round();
    if count <= 0.0 {
        0
    } else {
        (count as usize).min(total)
    }
}

/// Shuffle `items` with a generator seeded from `seed` and slice off the
/// validation subset from the front.
pub fn split_items<T>(mut items: Vec<T>, val_ratio: f64, seed: u64) -> Split<T> {
    let mut rng = StdRng::seed_from_u64(seed);
    items.shuffle(&mut rng);

    let total = items.len();
    let val_len = validation_count(total, val_ratio);

    // split_off leaves [0..val_len] in `items`
    let train = items.split_off(val_len);
    let val = items;

    debug!(
        "Dataset split: {} training, {} validation (seed {}, ratio {})",
        train.len(),
        val.len(),
        seed,
        val_ratio
    );

    Split { train, val }
}
