// ============================================================================
// obfuscator-core/src/features/mod.rs
// ============================================================================
//
// FEATURES: Keypoint Detection, Description and Matching
//
// A pure-Rust ORB pipeline: FAST-9 corners with non-maximum suppression,
// intensity-centroid orientation, steered BRIEF descriptors, and a
// brute-force Hamming k-nearest-neighbour matcher with Lowe's ratio test.
//
// KEY COMPONENTS:
// - Keypoint / Descriptor / DescriptorSet: detection output
// - FastDetector: corner detection (fast.rs)
// - OrbDetector: multi-level detect-and-compute (orb.rs)
// - BruteForceMatcher: k-NN matching and good-match counting (matcher.rs)

pub mod fast;
pub mod matcher;
pub mod orb;

pub use fast::FastDetector;
pub use matcher::{BruteForceMatcher, NeighbourMatch, RATIO_TEST_THRESHOLD};
pub use orb::{OrbConfig, OrbDetector};

/// Length of an ORB descriptor in bytes (256 bits).
pub const DESCRIPTOR_BYTES: usize = 32;

/// 256-bit binary descriptor.
pub type Descriptor = [u8; DESCRIPTOR_BYTES];

/// A detected keypoint, in level-0 (full resolution) pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    /// FAST corner response. Higher is stronger.
    pub score: f32,
    /// Orientation in radians.
    pub angle: f32,
    /// Pyramid level the keypoint was detected on.
    pub level: usize,
    /// Diameter of the described patch at level 0.
    pub size: f32,
}

/// Keypoints and their descriptors for one image.
///
/// `keypoints[i]` is described by `descriptors[i]`.
#[derive(Debug, Clone, Default)]
pub struct DescriptorSet {
    keypoints: Vec<Keypoint>,
    descriptors: Vec<Descriptor>,
}

impl DescriptorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            keypoints: Vec::with_capacity(capacity),
            descriptors: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, keypoint: Keypoint, descriptor: Descriptor) {
        self.keypoints.push(keypoint);
        self.descriptors.push(descriptor);
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn keypoints(&self) -> &[Keypoint] {
        &self.keypoints
    }

    pub fn descriptors(&self) -> &[Descriptor] {
        &self.descriptors
    }
}

impl FromIterator<(Keypoint, Descriptor)> for DescriptorSet {
    fn from_iter<I: IntoIterator<Item = (Keypoint, Descriptor)>>(iter: I) -> Self {
        let mut set = DescriptorSet::new();
        for (keypoint, descriptor) in iter {
            set.push(keypoint, descriptor);
        }
        set
    }
}

/// Number of differing bits between two descriptors.
pub fn hamming_distance(a: &Descriptor, b: &Descriptor) -> u32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x ^ y).count_ones()).sum()
}
