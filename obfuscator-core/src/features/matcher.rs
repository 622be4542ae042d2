//! Brute-force Hamming matcher.
//!
//! For every query descriptor the matcher finds the `k` nearest train
//! descriptors by Hamming distance. A query descriptor counts as a good match
//! when its nearest neighbour is clearly closer than the second nearest
//! (Lowe's ratio test).

use super::{hamming_distance, Descriptor};

/// Maximum ratio between nearest and second-nearest distance for a good match.
pub const RATIO_TEST_THRESHOLD: f32 = 0.75;

/// One neighbour of a query descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighbourMatch {
    pub query_idx: usize,
    pub train_idx: usize,
    pub distance: u32,
}

/// Exhaustive k-nearest-neighbour matcher over binary descriptors.
#[derive(Debug, Clone)]
pub struct BruteForceMatcher {
    ratio: f32,
}

impl Default for BruteForceMatcher {
    fn default() -> Self {
        Self {
            ratio: RATIO_TEST_THRESHOLD,
        }
    }
}

impl BruteForceMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// For each query descriptor, returns up to `k` train neighbours ordered
    /// by increasing distance. Equal distances keep the lower train index first.
    pub fn knn_match(
        &self,
        query: &[Descriptor],
        train: &[Descriptor],
        k: usize,
    ) -> Vec<Vec<NeighbourMatch>> {
        query
            .iter()
            .enumerate()
            .map(|(query_idx, q)| {
                let mut nearest: Vec<NeighbourMatch> = Vec::with_capacity(k + 1);
                if k == 0 {
                    return nearest;
                }
                for (train_idx, t) in train.iter().enumerate() {
                    let distance = hamming_distance(q, t);
                    if nearest.len() == k && distance >= nearest[k - 1].distance {
                        continue;
                    }
                    let pos = nearest
                        .iter()
                        .position(|m| distance < m.distance)
                        .unwrap_or(nearest.len());
                    nearest.insert(
                        pos,
                        NeighbourMatch {
                            query_idx,
                            train_idx,
                            distance,
                        },
                    );
                    nearest.truncate(k);
                }
                nearest
            })
            .collect()
    }

    /// Counts query descriptors whose two nearest train neighbours pass the
    /// ratio test. Queries with fewer than two neighbours never count.
    pub fn count_good_matches(&self, query: &[Descriptor], train: &[Descriptor]) -> usize {
        if query.is_empty() || train.len() < 2 {
            return 0;
        }
        self.knn_match(query, train, 2)
            .iter()
            .filter(|neighbours| match neighbours.as_slice() {
                [nearest, second, ..] => passes_ratio_test(nearest, second, self.ratio),
                _ => false,
            })
            .count()
    }
}

/// Lowe's ratio test: `nearest.distance < ratio * second.distance`, strictly.
pub fn passes_ratio_test(nearest: &NeighbourMatch, second: &NeighbourMatch, ratio: f32) -> bool {
    (nearest.distance as f32) < ratio * second.distance as f32
}
