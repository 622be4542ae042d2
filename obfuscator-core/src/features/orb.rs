//! ORB (Oriented FAST and Rotated BRIEF) detector and descriptor.
//!
//! Detection runs FAST on every pyramid level and keeps the strongest
//! corners, distributing the feature budget across levels by area.
//! Orientation is the intensity centroid of a circular patch; the descriptor
//! is a BRIEF test pattern rotated by that orientation and evaluated on a
//! Gaussian-smoothed copy of the level.
//!
//! The BRIEF pattern comes from a fixed-seed generator so reference images
//! and captured frames are always described with the same tests.

use super::fast::{Corner, FastDetector};
use super::{Descriptor, DescriptorSet, Keypoint, DESCRIPTOR_BYTES};

use image::imageops::{self, FilterType};
use image::GrayImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seed of the BRIEF sampling pattern.
const PATTERN_SEED: u64 = 0x0B5_0BF5;

/// Number of binary tests per descriptor.
const PATTERN_PAIRS: usize = DESCRIPTOR_BYTES * 8;

/// Sigma of the smoothing applied before the BRIEF tests.
const DESCRIPTOR_BLUR_SIGMA: f32 = 2.0;

/// ORB tuning parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbConfig {
    /// Maximum number of keypoints kept per image.
    pub n_features: usize,
    /// Downscale factor between pyramid levels.
    pub scale_factor: f32,
    /// Number of pyramid levels.
    pub n_levels: usize,
    /// Border (in pixels) where no keypoints are detected.
    pub edge_threshold: u32,
    /// Diameter of the oriented BRIEF patch.
    pub patch_size: u32,
    /// FAST intensity threshold.
    pub fast_threshold: u8,
}

impl Default for OrbConfig {
    // One level, FAST threshold 10: tuned for flat game UI elements.
    fn default() -> Self {
        Self {
            n_features: 500,
            scale_factor: 1.2,
            n_levels: 1,
            edge_threshold: 31,
            patch_size: 31,
            fast_threshold: 10,
        }
    }
}

/// One BRIEF test: compare the smoothed intensity at two patch offsets.
#[derive(Debug, Clone, Copy)]
struct PointPair {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
}

/// ORB feature detector and descriptor extractor.
#[derive(Debug, Clone)]
pub struct OrbDetector {
    config: OrbConfig,
    fast: FastDetector,
    pattern: Vec<PointPair>,
    /// Half-width of the circular orientation patch for each row offset.
    umax: Vec<i32>,
}

impl OrbDetector {
    pub fn new(config: OrbConfig) -> Self {
        let fast = FastDetector::new(config.fast_threshold, 9);
        let pattern = brief_pattern(config.patch_size);
        let umax = circular_patch_extents(config.patch_size / 2);
        Self {
            config,
            fast,
            pattern,
            umax,
        }
    }

    /// Detects keypoints and computes their descriptors.
    ///
    /// Pixels where `mask` is zero never produce keypoints. The mask must have
    /// the same dimensions as the image.
    pub fn detect_and_compute(
        &self,
        image: &GrayImage,
        mask: Option<&GrayImage>,
    ) -> DescriptorSet {
        let budgets = features_per_level(
            self.config.n_features,
            self.config.n_levels.max(1),
            self.config.scale_factor,
        );

        let mut result = DescriptorSet::with_capacity(self.config.n_features);
        let mut scale = 1.0f32;

        for (level, budget) in budgets.into_iter().enumerate() {
            if level > 0 {
                scale *= self.config.scale_factor;
            }
            if budget == 0 {
                continue;
            }

            let level_image = scale_to_level(image, scale, FilterType::Triangle);
            let level_mask = mask.map(|m| scale_to_level(m, scale, FilterType::Nearest));

            let mut corners = self
                .fast
                .detect(&level_image, self.config.edge_threshold, level_mask.as_ref());
            retain_strongest(&mut corners, budget);
            if corners.is_empty() {
                continue;
            }

            let smoothed = imageops::blur(&level_image, DESCRIPTOR_BLUR_SIGMA);
            for corner in corners {
                let angle = self.orientation(&level_image, corner.x, corner.y);
                let descriptor = self.describe(&smoothed, corner.x, corner.y, angle);
                let keypoint = Keypoint {
                    x: corner.x as f32 * scale,
                    y: corner.y as f32 * scale,
                    score: corner.score,
                    angle,
                    level,
                    size: self.config.patch_size as f32 * scale,
                };
                result.push(keypoint, descriptor);
            }
        }

        result
    }

    /// Intensity-centroid orientation of the circular patch around (x, y).
    fn orientation(&self, image: &GrayImage, x: u32, y: u32) -> f32 {
        let half = self.umax.len() as i32 - 1;
        let mut m01 = 0i64;
        let mut m10 = 0i64;

        for v in -half..=half {
            let extent = self.umax[v.unsigned_abs() as usize];
            for u in -extent..=extent {
                let intensity = pixel_or_zero(image, x as i32 + u, y as i32 + v) as i64;
                m10 += u as i64 * intensity;
                m01 += v as i64 * intensity;
            }
        }

        (m01 as f32).atan2(m10 as f32)
    }

    /// Steered BRIEF descriptor at (x, y).
    fn describe(&self, smoothed: &GrayImage, x: u32, y: u32, angle: f32) -> Descriptor {
        let (sin_a, cos_a) = angle.sin_cos();
        let cx = x as f32;
        let cy = y as f32;
        let mut descriptor = [0u8; DESCRIPTOR_BYTES];

        for (i, pair) in self.pattern.iter().enumerate() {
            let (rx1, ry1) = rotate(pair.x1, pair.y1, sin_a, cos_a);
            let (rx2, ry2) = rotate(pair.x2, pair.y2, sin_a, cos_a);
            let v1 = sample(smoothed, cx + rx1, cy + ry1);
            let v2 = sample(smoothed, cx + rx2, cy + ry2);
            if v1 < v2 {
                descriptor[i / 8] |= 1 << (i % 8);
            }
        }

        descriptor
    }
}

impl Default for OrbDetector {
    fn default() -> Self {
        Self::new(OrbConfig::default())
    }
}

fn rotate(x: f32, y: f32, sin_a: f32, cos_a: f32) -> (f32, f32) {
    (x * cos_a - y * sin_a, x * sin_a + y * cos_a)
}

fn sample(image: &GrayImage, x: f32, y: f32) -> u8 {
    pixel_or_zero(image, x.round() as i32, y.round() as i32)
}

fn pixel_or_zero(image: &GrayImage, x: i32, y: i32) -> u8 {
    if x >= 0 && y >= 0 && (x as u32) < image.width() && (y as u32) < image.height() {
        image.get_pixel(x as u32, y as u32)[0]
    } else {
        0
    }
}

/// Fixed BRIEF test pattern, offsets spread over the whole patch.
///
/// Rotated offsets may leave the patch near its corners; those samples read
/// the smoothed level image around it.
fn brief_pattern(patch_size: u32) -> Vec<PointPair> {
    let mut rng = StdRng::seed_from_u64(PATTERN_SEED);
    let reach = (patch_size / 2).max(1) as i32;

    (0..PATTERN_PAIRS)
        .map(|_| PointPair {
            x1: rng.gen_range(-reach..=reach) as f32,
            y1: rng.gen_range(-reach..=reach) as f32,
            x2: rng.gen_range(-reach..=reach) as f32,
            y2: rng.gen_range(-reach..=reach) as f32,
        })
        .collect()
}

/// For each row offset `v` in `0..=radius`, the largest `u` inside the circle.
fn circular_patch_extents(radius: u32) -> Vec<i32> {
    let r = radius as i32;
    (0..=r)
        .map(|v| (((r * r - v * v) as f32).sqrt()).round() as i32)
        .collect()
}

/// Splits the feature budget across levels as a geometric series of level areas.
fn features_per_level(n_features: usize, n_levels: usize, scale_factor: f32) -> Vec<usize> {
    if n_levels == 1 {
        return vec![n_features];
    }

    let factor = 1.0 / scale_factor;
    let mut desired = n_features as f32 * (1.0 - factor) / (1.0 - factor.powi(n_levels as i32));
    let mut budgets = Vec::with_capacity(n_levels);
    let mut assigned = 0usize;

    for _ in 0..n_levels - 1 {
        let count = (desired.round() as usize).min(n_features - assigned);
        budgets.push(count);
        assigned += count;
        desired *= factor;
    }
    budgets.push(n_features - assigned);
    budgets
}

fn scale_to_level(image: &GrayImage, scale: f32, filter: FilterType) -> GrayImage {
    if scale == 1.0 {
        return image.clone();
    }
    let width = ((image.width() as f32 / scale).round() as u32).max(1);
    let height = ((image.height() as f32 / scale).round() as u32).max(1);
    imageops::resize(image, width, height, filter)
}

fn retain_strongest(corners: &mut Vec<Corner>, budget: usize) {
    if corners.len() > budget {
        corners.sort_by(|a, b| b.score.total_cmp(&a.score));
        corners.truncate(budget);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    /// Deterministic blocky texture with plenty of corners.
    fn textured_image(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            let h = ((x / 8).wrapping_mul(0x9E37_79B1) ^ (y / 8).wrapping_mul(0x85EB_CA77))
                .wrapping_mul(0xC2B2_AE3D);
            Luma([(h >> 24) as u8])
        })
    }

    #[test]
    fn test_budget_single_level() {
        assert_eq!(features_per_level(500, 1, 1.2), vec![500]);
    }

    #[test]
    fn test_budget_sums_to_total() {
        let budgets = features_per_level(500, 8, 1.2);
        assert_eq!(budgets.len(), 8);
        assert_eq!(budgets.iter().sum::<usize>(), 500);
        assert!(budgets[0] > budgets[7]);
    }

    #[test]
    fn test_pattern_is_deterministic() {
        let a = brief_pattern(31);
        let b = brief_pattern(31);
        assert_eq!(a.len(), 256);
        for (p, q) in a.iter().zip(b.iter()) {
            assert_eq!((p.x1, p.y1, p.x2, p.y2), (q.x1, q.y1, q.x2, q.y2));
        }
    }

    #[test]
    fn test_pattern_covers_whole_patch() {
        let pattern = brief_pattern(31);
        let widest = pattern
            .iter()
            .flat_map(|p| [p.x1, p.y1, p.x2, p.y2])
            .fold(0f32, |acc, v| acc.max(v.abs()));
        assert_eq!(widest, 15.0);
    }

    #[test]
    fn test_detect_respects_feature_budget() {
        let orb = OrbDetector::new(OrbConfig {
            n_features: 25,
            ..OrbConfig::default()
        });
        let set = orb.detect_and_compute(&textured_image(160, 160), None);
        assert!(!set.is_empty());
        assert!(set.len() <= 25);
    }

    #[test]
    fn test_same_image_gives_same_descriptors() {
        let orb = OrbDetector::default();
        let img = textured_image(128, 128);
        let a = orb.detect_and_compute(&img, None);
        let b = orb.detect_and_compute(&img, None);
        assert_eq!(a.descriptors(), b.descriptors());
    }

    #[test]
    fn test_zero_mask_yields_no_keypoints() {
        let orb = OrbDetector::default();
        let mask = GrayImage::from_pixel(128, 128, Luma([0]));
        let set = orb.detect_and_compute(&textured_image(128, 128), Some(&mask));
        assert!(set.is_empty());
    }

    #[test]
    fn test_keypoints_stay_out_of_border() {
        let orb = OrbDetector::default();
        let set = orb.detect_and_compute(&textured_image(128, 128), None);
        for kp in set.keypoints() {
            assert!(kp.x >= 31.0 && kp.x < 97.0);
            assert!(kp.y >= 31.0 && kp.y < 97.0);
        }
    }

    #[test]
    fn test_multi_level_keypoints_are_in_full_resolution() {
        let orb = OrbDetector::new(OrbConfig {
            n_levels: 3,
            ..OrbConfig::default()
        });
        let set = orb.detect_and_compute(&textured_image(240, 240), None);
        for kp in set.keypoints() {
            assert!(kp.x < 240.0 && kp.y < 240.0);
        }
    }
}
