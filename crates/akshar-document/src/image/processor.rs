// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — loading, grayscale conversion, upscaling, and encoding of
// page bitmaps. Operates on in-memory images using the `image` crate.

use std::path::Path;

use akshar_core::error::AksharError;
use image::imageops::FilterType;
use image::{DynamicImage, GrayImage};
use tracing::{debug, info, instrument};

/// Image processing pipeline operating on a single in-memory image.
///
/// Each transformation consumes `self` and returns a new `ImageProcessor`,
/// enabling method chaining.
///
/// ```ignore
/// let gray = ImageProcessor::open("letter.jpg")?
///     .grayscale()
///     .upscale(1.5)
///     .into_luma8();
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AksharError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AksharError::InputNotFound(path.to_path_buf()));
        }
        let img = image::open(path).map_err(|err| {
            AksharError::ImageError(format!("failed to open {}: {}", path.display(), err))
        })?;
        info!(width = img.width(), height = img.height(), "Image loaded");
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    /// Consume the processor and return an 8-bit grayscale buffer.
    ///
    /// Already-grayscale images are unwrapped without a colour conversion.
    pub fn into_luma8(self) -> GrayImage {
        match self.image {
            DynamicImage::ImageLuma8(gray) => gray,
            other => other.to_luma8(),
        }
    }

    // -- Transformations (consume self, return new Self) -----------------------

    /// Convert the image to grayscale (luma). A no-op for `Luma8` input.
    #[instrument(skip(self))]
    pub fn grayscale(self) -> Self {
        if matches!(self.image, DynamicImage::ImageLuma8(_)) {
            debug!("Image already grayscale");
            return self;
        }
        info!("Converting to grayscale");
        Self {
            image: DynamicImage::ImageLuma8(self.image.to_luma8()),
        }
    }

    /// Scale both dimensions by `factor` with linear interpolation.
    ///
    /// Factors within 0.01 of 1.0, non-finite or non-positive factors, and
    /// empty images are returned unchanged.
    #[instrument(skip(self), fields(factor))]
    pub fn upscale(self, factor: f32) -> Self {
        let (width, height) = (self.image.width(), self.image.height());
        if !factor.is_finite() || factor <= 0.0 || (factor - 1.0).abs() < 0.01 || width == 0 || height == 0 {
            return self;
        }
        let new_w = scaled_dimension(width, factor);
        let new_h = scaled_dimension(height, factor);
        info!(from_w = width, from_h = height, new_w, new_h, "Scaling image");
        Self {
            image: self.image.resize_exact(new_w, new_h, FilterType::Triangle),
        }
    }
}

/// Scaled pixel count, never below one.
pub(crate) fn scaled_dimension(value: u32, factor: f32) -> u32 {
    ((value as f32 * factor).round() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, RgbImage};

    #[test]
    fn open_missing_file_is_input_not_found() {
        let result = ImageProcessor::open("/definitely/not/here.png");
        assert!(matches!(result, Err(AksharError::InputNotFound(_))));
    }

    #[test]
    fn grayscale_converts_rgb() {
        let rgb = RgbImage::from_pixel(4, 3, Rgb([255, 255, 255]));
        let gray = ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(rgb)).grayscale();
        let dynamic = gray.into_dynamic();
        assert!(matches!(dynamic, DynamicImage::ImageLuma8(_)));
        assert_eq!(dynamic.to_luma8().get_pixel(0, 0).0[0], 255);
    }

    #[test]
    fn upscale_by_one_and_a_half() {
        let gray = GrayImage::from_pixel(10, 20, Luma([128]));
        let scaled = ImageProcessor::from_dynamic(DynamicImage::ImageLuma8(gray))
            .upscale(1.5)
            .into_luma8();
        assert_eq!(scaled.dimensions(), (15, 30));
    }

    #[test]
    fn upscale_identity_and_invalid_factors() {
        let gray = GrayImage::from_pixel(7, 9, Luma([0]));
        let dynamic = DynamicImage::ImageLuma8(gray);
        for factor in [1.0, 0.0, -2.0, f32::NAN] {
            let out = ImageProcessor::from_dynamic(dynamic.clone())
                .upscale(factor)
                .into_luma8();
            assert_eq!(out.dimensions(), (7, 9), "factor {factor}");
        }
    }

    #[test]
    fn open_decodes_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.png");
        GrayImage::from_pixel(3, 2, Luma([42])).save(&path).unwrap();
        let gray = ImageProcessor::open(&path).unwrap().into_luma8();
        assert_eq!(gray.dimensions(), (3, 2));
        assert_eq!(gray.get_pixel(0, 0).0[0], 42);
    }

    #[test]
    fn corrupt_file_is_image_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();
        assert!(matches!(
            ImageProcessor::open(&path),
            Err(AksharError::ImageError(_))
        ));
    }
}
