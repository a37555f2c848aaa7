//! Word selection: uniform picks and weighted spaced-repetition picks.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// How long ago a word's level was current, measured in levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Current,
    Recent,
    Past,
    Ancient,
}

impl Bucket {
    pub fn from_distance(levels_back: usize) -> Self {
        match levels_back {
            0 => Bucket::Current,
            1 => Bucket::Recent,
            2..=3 => Bucket::Past,
            _ => Bucket::Ancient,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketWeights {
    pub current: f64,
    pub recent: f64,
    pub past: f64,
    pub ancient: f64,
}

impl Default for BucketWeights {
    fn default() -> Self {
        Self {
            current: 1.0,
            recent: 0.5,
            past: 0.1,
            ancient: 0.05,
        }
    }
}

impl BucketWeights {
    /// Negative and NaN weights count as zero.
    pub fn weight(&self, bucket: Bucket) -> f64 {
        let w = match bucket {
            Bucket::Current => self.current,
            Bucket::Recent => self.recent,
            Bucket::Past => self.past,
            Bucket::Ancient => self.ancient,
        };
        if w.is_finite() && w > 0.0 {
            w
        } else {
            0.0
        }
    }
}

pub fn pick_uniform<'a, T, R: Rng + ?Sized>(items: &'a [T], rng: &mut R) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    Some(&items[rng.gen_range(0..items.len())])
}

/// Cumulative-weight sampling over `(item, bucket)` pairs.
pub fn pick_weighted<'a, T, R: Rng + ?Sized>(
    candidates: &'a [(T, Bucket)],
    weights: &BucketWeights,
    rng: &mut R,
) -> Option<&'a T> {
    let total: f64 = candidates.iter().map(|(_, b)| weights.weight(*b)).sum();
    if total <= 0.0 {
        return None;
    }
    let target = rng.gen::<f64>() * total;
    let mut cumulative = 0.0;
    let mut last_positive = None;
    for (item, bucket) in candidates {
        let w = weights.weight(*bucket);
        if w <= 0.0 {
            continue;
        }
        cumulative += w;
        last_positive = Some(item);
        if target < cumulative {
            return Some(item);
        }
    }
    // Float rounding can leave target a hair above the final sum
    last_positive
}
