//! FAST corner detector (Features from Accelerated Segment Test).
//!
//! Each pixel is compared against 16 pixels on a Bresenham circle of radius
//! 3. It is a corner when at least `arc_length` contiguous circle pixels are
//! all brighter than `center + threshold` or all darker than
//! `center - threshold`. Contiguity wraps around the circle.

use image::GrayImage;

/// Bresenham circle of radius 3, clockwise from 12 o'clock.
#[rustfmt::skip]
const CIRCLE_OFFSETS: [(i32, i32); 16] = [
    (0, -3), (1, -3), (2, -2), (3, -1),
    (3, 0), (3, 1), (2, 2), (1, 3),
    (0, 3), (-1, 3), (-2, 2), (-3, 1),
    (-3, 0), (-3, -1), (-2, -2), (-1, -3),
];

/// Radius of the sampling circle.
pub const CIRCLE_RADIUS: u32 = 3;

/// A FAST corner in the coordinates of the image it was detected on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corner {
    pub x: u32,
    pub y: u32,
    /// Sum of `|circle - center| - threshold` over the qualifying pixels.
    pub score: f32,
}

/// FAST-N corner detector.
#[derive(Debug, Clone)]
pub struct FastDetector {
    /// Intensity difference a circle pixel needs to count as brighter/darker.
    pub threshold: u8,
    /// Minimum number of contiguous circle pixels, 9..=12.
    pub arc_length: usize,
}

impl Default for FastDetector {
    fn default() -> Self {
        Self {
            threshold: 20,
            arc_length: 9,
        }
    }
}

impl FastDetector {
    pub fn new(threshold: u8, arc_length: usize) -> Self {
        Self {
            threshold,
            arc_length: arc_length.clamp(9, 12),
        }
    }

    /// Detects corners, skipping `border` pixels on each side and every pixel
    /// where `mask` is zero. Returns corners after 3x3 non-maximum suppression.
    pub fn detect(&self, image: &GrayImage, border: u32, mask: Option<&GrayImage>) -> Vec<Corner> {
        let (width, height) = image.dimensions();
        let border = border.max(CIRCLE_RADIUS);
        if width <= 2 * border || height <= 2 * border {
            return Vec::new();
        }

        let mut scores = vec![0f32; (width * height) as usize];
        let mut candidates = Vec::new();

        for y in border..height - border {
            for x in border..width - border {
                if let Some(m) = mask {
                    if m.get_pixel(x, y)[0] == 0 {
                        continue;
                    }
                }
                if let Some(score) = self.corner_score(image, x, y) {
                    scores[(y * width + x) as usize] = score;
                    candidates.push(Corner { x, y, score });
                }
            }
        }

        non_max_suppression(&candidates, &scores, width, height)
    }

    /// Returns the corner score at (x, y) if it is a corner.
    ///
    /// The caller guarantees the whole circle lies inside the image.
    fn corner_score(&self, image: &GrayImage, x: u32, y: u32) -> Option<f32> {
        let center = image.get_pixel(x, y)[0] as i16;
        let thresh = self.threshold as i16;

        let mut bright_mask: u32 = 0;
        let mut dark_mask: u32 = 0;
        let mut bright_score = 0f32;
        let mut dark_score = 0f32;

        for (i, &(dx, dy)) in CIRCLE_OFFSETS.iter().enumerate() {
            let px = (x as i32 + dx) as u32;
            let py = (y as i32 + dy) as u32;
            let diff = image.get_pixel(px, py)[0] as i16 - center;
            if diff > thresh {
                bright_mask |= 1 << i;
                bright_score += (diff - thresh) as f32;
            } else if diff < -thresh {
                dark_mask |= 1 << i;
                dark_score += (-diff - thresh) as f32;
            }
        }

        let bright = has_contiguous_run(bright_mask, self.arc_length);
        let dark = has_contiguous_run(dark_mask, self.arc_length);
        match (bright, dark) {
            (true, true) => Some(bright_score.max(dark_score)),
            (true, false) => Some(bright_score),
            (false, true) => Some(dark_score),
            (false, false) => None,
        }
    }
}

/// Whether the 16-bit circular mask contains `n` contiguous set bits.
fn has_contiguous_run(mask16: u32, n: usize) -> bool {
    if mask16.count_ones() < n as u32 {
        return false;
    }
    // Duplicate the circle so wrap-around runs become linear runs.
    let mut run = mask16 | (mask16 << 16);
    for _ in 1..n {
        run &= run >> 1;
    }
    run != 0
}

/// Keeps corners whose score is the maximum of their 3x3 neighbourhood.
///
/// Ties are broken in raster order so a plateau keeps exactly one corner.
pub fn non_max_suppression(
    candidates: &[Corner],
    scores: &[f32],
    width: u32,
    height: u32,
) -> Vec<Corner> {
    candidates
        .iter()
        .filter(|c| {
            let own_index = (c.y * width + c.x) as usize;
            for dy in -1i32..=1 {
                for dx in -1i32..=1 {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    let nx = c.x as i32 + dx;
                    let ny = c.y as i32 + dy;
                    if nx < 0 || ny < 0 || nx >= width as i32 || ny >= height as i32 {
                        continue;
                    }
                    let index = (ny as u32 * width + nx as u32) as usize;
                    let other = scores[index];
                    if other > c.score || (other == c.score && index < own_index) {
                        return false;
                    }
                }
            }
            true
        })
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    /// Dark image with a single bright square; its corners are FAST corners.
    fn square_image() -> GrayImage {
        let mut img = GrayImage::from_pixel(64, 64, Luma([20]));
        for y in 24..40 {
            for x in 24..40 {
                img.put_pixel(x, y, Luma([220]));
            }
        }
        img
    }

    #[test]
    fn test_contiguous_run_wraps_around() {
        // Bits 12..16 and 0..5 set: a run of 9 across the wrap point.
        let mask = 0b1111_0000_0000_0000 | 0b1_1111;
        assert!(has_contiguous_run(mask, 9));
        assert!(!has_contiguous_run(mask, 10));
    }

    #[test]
    fn test_contiguous_run_rejects_split_arcs() {
        // 10 bits set but longest run is 5.
        let mask = 0b0001_1111_0001_1111;
        assert!(!has_contiguous_run(mask, 9));
    }

    #[test]
    fn test_flat_image_has_no_corners() {
        let img = GrayImage::from_pixel(64, 64, Luma([128]));
        assert!(FastDetector::new(10, 9).detect(&img, 3, None).is_empty());
    }

    #[test]
    fn test_square_corners_are_detected() {
        let corners = FastDetector::new(10, 9).detect(&square_image(), 3, None);
        assert!(!corners.is_empty());
        // Every corner sits near one of the four square corners.
        for c in &corners {
            let near_x = (c.x as i32 - 24).abs() <= 2 || (c.x as i32 - 39).abs() <= 2;
            let near_y = (c.y as i32 - 24).abs() <= 2 || (c.y as i32 - 39).abs() <= 2;
            assert!(near_x && near_y, "unexpected corner at ({}, {})", c.x, c.y);
        }
    }

    #[test]
    fn test_mask_suppresses_corners() {
        let mask = GrayImage::from_pixel(64, 64, Luma([0]));
        let corners = FastDetector::new(10, 9).detect(&square_image(), 3, Some(&mask));
        assert!(corners.is_empty());
    }

    #[test]
    fn test_image_smaller_than_border() {
        let img = GrayImage::from_pixel(10, 10, Luma([0]));
        assert!(FastDetector::new(10, 9).detect(&img, 31, None).is_empty());
    }

    #[test]
    fn test_non_max_suppression_keeps_one_of_plateau() {
        let width = 5;
        let height = 5;
        let mut scores = vec![0f32; 25];
        let a = Corner { x: 2, y: 2, score: 7.0 };
        let b = Corner { x: 3, y: 2, score: 7.0 };
        scores[12] = 7.0;
        scores[13] = 7.0;

        let kept = non_max_suppression(&[a, b], &scores, width, height);
        assert_eq!(kept, vec![a]);
    }
}
