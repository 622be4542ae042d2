// ============================================================================
// obfuscator-core/src/resources.rs
// ============================================================================
//
// RESOURCES: Reference Images and Mask Loading
//
// Game resources are stored per screen format:
//
//     {resource_dir}/{profile}/*.png     reference images
//     {resource_dir}/mask-{profile}.png  region mask
//
// Everything is loaded once at startup. Reference images are converted to
// grayscale and described with the same ORB detector later used on frames.
//
// KEY COMPONENTS:
// - ResourceLayout: path resolution for one resolution profile
// - Mask: grayscale region mask, zero pixels are excluded from matching
// - ReferenceImage / ReferenceSet: reference rasters and their descriptors
// - load_resources: validates the layout and loads everything

// ---- Internal crate imports ----
use crate::config::ResolutionProfile;
use crate::error::{CoreError, CoreResult};
use crate::features::{DescriptorSet, OrbDetector};

// ---- External crate imports ----
use image::GrayImage;
use log::{debug, info, warn};

// ---- Standard library imports ----
use std::fs;
use std::path::{Path, PathBuf};

/// Resolves resource paths for one resolution profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLayout {
    root: PathBuf,
    profile: ResolutionProfile,
}

impl ResourceLayout {
    pub fn new(root: impl Into<PathBuf>, profile: ResolutionProfile) -> Self {
        Self {
            root: root.into(),
            profile,
        }
    }

    pub fn profile(&self) -> ResolutionProfile {
        self.profile
    }

    /// Directory holding the reference images, `{root}/{profile}`.
    pub fn image_dir(&self) -> PathBuf {
        self.root.join(self.profile.as_str())
    }

    /// Mask file, `{root}/mask-{profile}.png`.
    pub fn mask_path(&self) -> PathBuf {
        self.root.join(format!("mask-{}.png", self.profile.as_str()))
    }

    /// Checks that the image directory and the mask file exist.
    pub fn verify(&self) -> CoreResult<()> {
        let image_dir = self.image_dir();
        if !image_dir.is_dir() {
            return Err(CoreError::Configuration(format!(
                "Reference image directory not found: {}",
                image_dir.display()
            )));
        }
        let mask_path = self.mask_path();
        if !mask_path.is_file() {
            return Err(CoreError::Configuration(format!(
                "Mask file not found: {}",
                mask_path.display()
            )));
        }
        Ok(())
    }
}

/// Region mask applied to every captured frame.
#[derive(Debug, Clone)]
pub struct Mask {
    image: GrayImage,
}

impl Mask {
    pub fn new(image: GrayImage) -> Self {
        Self { image }
    }

    /// Loads a mask file, converting it to grayscale.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let image = image::open(path).map_err(|e| {
            CoreError::Configuration(format!("Failed to read mask '{}': {}", path.display(), e))
        })?;
        Ok(Self::new(image.to_luma8()))
    }

    pub fn image(&self) -> &GrayImage {
        &self.image
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// A reference image and its ORB descriptors.
#[derive(Debug, Clone)]
pub struct ReferenceImage {
    pub name: String,
    pub image: GrayImage,
    pub descriptors: DescriptorSet,
}

impl ReferenceImage {
    /// Describes `image` with `orb`, without a mask.
    pub fn describe(name: impl Into<String>, image: GrayImage, orb: &OrbDetector) -> Self {
        let descriptors = orb.detect_and_compute(&image, None);
        Self {
            name: name.into(),
            image,
            descriptors,
        }
    }
}

/// All reference images of one resolution profile, in file name order.
#[derive(Debug, Clone, Default)]
pub struct ReferenceSet {
    images: Vec<ReferenceImage>,
}

impl ReferenceSet {
    pub fn new(images: Vec<ReferenceImage>) -> Self {
        Self { images }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReferenceImage> {
        self.images.iter()
    }
}

impl<'a> IntoIterator for &'a ReferenceSet {
    type Item = &'a ReferenceImage;
    type IntoIter = std::slice::Iter<'a, ReferenceImage>;

    fn into_iter(self) -> Self::IntoIter {
        self.images.iter()
    }
}

/// Loads the reference images and the mask for `layout`.
///
/// Both the image directory and the mask are checked before anything is
/// decoded. Entries of the image directory that are not regular files are
/// skipped. Every failure here is a configuration error.
pub fn load_resources(
    layout: &ResourceLayout,
    orb: &OrbDetector,
) -> CoreResult<(ReferenceSet, Mask)> {
    layout.verify()?;

    let image_dir = layout.image_dir();
    let mut paths: Vec<PathBuf> = fs::read_dir(&image_dir)
        .map_err(|e| {
            CoreError::Configuration(format!(
                "Failed to read reference image directory '{}': {}",
                image_dir.display(),
                e
            ))
        })?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    if paths.is_empty() {
        return Err(CoreError::Configuration(format!(
            "No reference images for format {} in {}",
            layout.profile().as_str(),
            image_dir.display()
        )));
    }

    let mut images = Vec::with_capacity(paths.len());
    for path in &paths {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let gray = image::open(path)
            .map_err(|e| {
                CoreError::Configuration(format!(
                    "Failed to read reference image '{}': {}",
                    path.display(),
                    e
                ))
            })?
            .to_luma8();

        let reference = ReferenceImage::describe(name, gray, orb);
        if reference.descriptors.is_empty() {
            warn!("Reference image {} has no features and will never match", reference.name);
        } else {
            debug!(
                "Reference image {}: {} descriptors",
                reference.name,
                reference.descriptors.len()
            );
        }
        images.push(reference);
    }

    let mask = Mask::load(&layout.mask_path())?;
    info!(
        "Loaded {} reference images and {}x{} mask for {}",
        images.len(),
        mask.dimensions().0,
        mask.dimensions().1,
        layout.profile()
    );

    Ok((ReferenceSet::new(images), mask))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_paths() {
        let layout = ResourceLayout::new("/res", ResolutionProfile::P1440);
        assert_eq!(layout.image_dir(), PathBuf::from("/res/1440p"));
        assert_eq!(layout.mask_path(), PathBuf::from("/res/mask-1440p.png"));
    }

    #[test]
    fn test_verify_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ResourceLayout::new(dir.path(), ResolutionProfile::P720);
        match layout.verify() {
            Err(CoreError::Configuration(msg)) => assert!(msg.contains("720p")),
            other => panic!("expected configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_mask_load_converts_color_to_gray() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mask-1080p.png");
        let mut img = image::RgbImage::new(4, 3);
        img.put_pixel(1, 2, image::Rgb([255, 255, 255]));
        img.save(&path).unwrap();

        let mask = Mask::load(&path).unwrap();
        assert_eq!(mask.dimensions(), (4, 3));
        assert_eq!(mask.image().get_pixel(1, 2)[0], 255);
        assert_eq!(mask.image().get_pixel(0, 0)[0], 0);
    }
}
