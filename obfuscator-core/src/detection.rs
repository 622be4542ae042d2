// ============================================================================
// obfuscator-core/src/detection.rs
// ============================================================================
//
// DETECTION: Per-Frame Reference Image Detection
//
// One detection cycle turns a captured frame into a DetectionSignal:
//
//   1. Mask the frame (pixels where the mask is zero become zero)
//   2. Convert to grayscale and run ORB, passing the mask again
//   3. k=2 Hamming matching against each reference, ratio test 0.75
//   4. Present as soon as one reference exceeds the required good matches
//
// KEY COMPONENTS:
// - DetectionSignal: Present / Absent / NoFrame
// - apply_mask, decide: the pure steps of the pipeline
// - Detector: owns references, mask and detector settings
// - DebugOverlay: writes a half-scale keypoint image for troubleshooting

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};
use crate::features::{BruteForceMatcher, DescriptorSet, Keypoint, OrbDetector};
use crate::resources::{Mask, ReferenceImage, ReferenceSet};

// ---- External crate imports ----
use image::imageops::{self, FilterType};
use image::{GrayImage, Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_circle_mut;
use log::{debug, warn};

// ---- Standard library imports ----
use std::path::{Path, PathBuf};

/// A captured screen frame.
pub type Frame = RgbaImage;

/// File name of the debug overlay inside the debug directory.
pub const DEBUG_FRAME_FILE_NAME: &str = "obs-obfuscator-debug.png";

/// Outcome of one detection cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionSignal {
    /// A reference image exceeded the required good matches.
    Present { good_matches: usize },
    /// No reference image exceeded the required good matches. Carries the
    /// count of the last reference checked.
    Absent { good_matches: usize },
    /// No frame was available this tick.
    NoFrame,
}

impl DetectionSignal {
    pub fn is_present(&self) -> bool {
        matches!(self, DetectionSignal::Present { .. })
    }

    /// Good match count, if a frame was evaluated.
    pub fn good_matches(&self) -> Option<usize> {
        match self {
            DetectionSignal::Present { good_matches }
            | DetectionSignal::Absent { good_matches } => Some(*good_matches),
            DetectionSignal::NoFrame => None,
        }
    }
}

/// Zeroes every channel of the pixels where the mask is zero.
///
/// The mask must have the frame's dimensions.
pub fn apply_mask(frame: &Frame, mask: &Mask) -> CoreResult<Frame> {
    if frame.dimensions() != mask.dimensions() {
        return Err(CoreError::Capture(format!(
            "Frame is {}x{} but the mask is {}x{}",
            frame.width(),
            frame.height(),
            mask.dimensions().0,
            mask.dimensions().1
        )));
    }

    let mut masked = frame.clone();
    for (pixel, mask_pixel) in masked.pixels_mut().zip(mask.image().pixels()) {
        if mask_pixel[0] == 0 {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }
    Ok(masked)
}

/// Decides whether any reference is present among the frame descriptors.
///
/// The good match count starts at zero, so an empty reference set or a frame
/// without keypoints is `Absent { good_matches: 0 }`.
pub fn decide(
    frame: &DescriptorSet,
    references: &ReferenceSet,
    required_good_matches: usize,
    matcher: &BruteForceMatcher,
) -> DetectionSignal {
    decide_with(frame, references, required_good_matches, matcher, |_, _| {})
}

/// Same as [`decide`], reporting each reference's good match count to `observe`.
pub fn decide_with<F>(
    frame: &DescriptorSet,
    references: &ReferenceSet,
    required_good_matches: usize,
    matcher: &BruteForceMatcher,
    mut observe: F,
) -> DetectionSignal
where
    F: FnMut(&ReferenceImage, usize),
{
    let mut good_matches = 0;
    for reference in references {
        good_matches =
            matcher.count_good_matches(frame.descriptors(), reference.descriptors.descriptors());
        observe(reference, good_matches);
        if good_matches > required_good_matches {
            return DetectionSignal::Present { good_matches };
        }
    }
    DetectionSignal::Absent { good_matches }
}

/// Writes detected keypoints over a half-scale copy of the masked frame.
#[derive(Debug, Clone)]
pub struct DebugOverlay {
    path: PathBuf,
}

impl DebugOverlay {
    /// Overlay written to [`DEBUG_FRAME_FILE_NAME`] inside `dir`.
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(DEBUG_FRAME_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Draws the overlay and saves it, replacing the previous frame.
    pub fn render(&self, masked: &Frame, keypoints: &[Keypoint]) -> CoreResult<()> {
        let mut canvas = imageops::resize(
            masked,
            (masked.width() / 2).max(1),
            (masked.height() / 2).max(1),
            FilterType::Triangle,
        );
        let color = Rgba([0, 255, 0, 255]);
        for kp in keypoints {
            let center = ((kp.x / 2.0).round() as i32, (kp.y / 2.0).round() as i32);
            let radius = ((kp.size / 4.0).round() as i32).max(2);
            draw_hollow_circle_mut(&mut canvas, center, radius, color);
        }
        canvas.save(&self.path)?;
        Ok(())
    }
}

/// Runs detection cycles against a fixed set of references.
#[derive(Debug)]
pub struct Detector {
    orb: OrbDetector,
    matcher: BruteForceMatcher,
    references: ReferenceSet,
    mask: Mask,
    required_good_matches: usize,
    debug: Option<DebugOverlay>,
}

impl Detector {
    pub fn new(
        orb: OrbDetector,
        references: ReferenceSet,
        mask: Mask,
        required_good_matches: usize,
    ) -> Self {
        Self {
            orb,
            matcher: BruteForceMatcher::new(),
            references,
            mask,
            required_good_matches,
            debug: None,
        }
    }

    /// Enables the debug overlay and per-reference match logging.
    pub fn with_debug_overlay(mut self, overlay: DebugOverlay) -> Self {
        self.debug = Some(overlay);
        self
    }

    pub fn references(&self) -> &ReferenceSet {
        &self.references
    }

    pub fn required_good_matches(&self) -> usize {
        self.required_good_matches
    }

    /// Evaluates one captured frame. `None` means no frame was captured.
    ///
    /// Fails with a capture error when the frame and mask sizes differ.
    pub fn evaluate(&self, frame: Option<&Frame>) -> CoreResult<DetectionSignal> {
        let Some(frame) = frame else {
            return Ok(DetectionSignal::NoFrame);
        };

        let masked = apply_mask(frame, &self.mask)?;
        let gray: GrayImage = imageops::grayscale(&masked);
        let descriptors = self.orb.detect_and_compute(&gray, Some(self.mask.image()));

        let signal = match &self.debug {
            None => decide(
                &descriptors,
                &self.references,
                self.required_good_matches,
                &self.matcher,
            ),
            Some(overlay) => {
                if let Err(e) = overlay.render(&masked, descriptors.keypoints()) {
                    warn!("Failed to write debug frame {}: {}", overlay.path().display(), e);
                }
                decide_with(
                    &descriptors,
                    &self.references,
                    self.required_good_matches,
                    &self.matcher,
                    |reference, count| debug!("Num matches for {}: {}", reference.name, count),
                )
            }
        };

        Ok(signal)
    }
}
