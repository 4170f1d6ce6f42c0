// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR preprocessing pipeline — grayscale conversion, Otsu binarization,
// grayscale morphology, and median denoising for scanned page images.

use akshar_core::PreprocessConfig;
use image::{DynamicImage, GrayImage, Luma};
use imageproc::contrast::{ThresholdType, threshold};
use imageproc::filter::median_filter;
use imageproc::map::map_colors2;
use imageproc::morphology::{Mask, grayscale_close, grayscale_dilate};
use tracing::{debug, info, instrument};

use crate::image::processor::ImageProcessor;

/// Turns raw page bitmaps into binary images tuned for the OCR engine.
///
/// Two paths are provided:
///
/// - [`prepare_body_text`](Self::prepare_body_text) combines a plain Otsu
///   binarization (regular text) with a dilated, inverted Otsu binarization
///   (large or bold text) using a pixel-wise OR.
/// - [`prepare_large_text`](Self::prepare_large_text) inverts the page, closes
///   gaps in thick strokes, and median-filters the result. Used to isolate
///   headers.
///
/// Both paths upscale the grayscale page first; the output always has the
/// upscaled dimensions.
#[derive(Debug, Clone, Default)]
pub struct Preprocessor {
    config: PreprocessConfig,
}

impl Preprocessor {
    pub fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }

    // -- Shared steps ---------------------------------------------------------

    /// Grayscale and upscale a page. Already-grayscale input skips the colour
    /// conversion.
    pub fn to_grayscale(&self, image: &DynamicImage) -> GrayImage {
        ImageProcessor::from_dynamic(image.clone())
            .grayscale()
            .upscale(self.config.upscale)
            .into_luma8()
    }

    // -- Pipelines ------------------------------------------------------------

    /// Combined body-text preprocessing.
    ///
    /// 1. Grayscale + upscale
    /// 2. Otsu binarization (normal-scale text)
    /// 3. Dilation followed by inverted Otsu binarization (large text)
    /// 4. Pixel-wise OR of both binaries
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn prepare_body_text(&self, image: &DynamicImage) -> GrayImage {
        let gray = self.to_grayscale(image);

        let normal_level = otsu_threshold(&gray);
        let normal = threshold(&gray, normal_level, ThresholdType::Binary);

        let thickened = grayscale_dilate(&gray, &square_mask(self.config.dilate_kernel));
        let large_level = otsu_threshold(&thickened);
        let large = threshold(&thickened, large_level, ThresholdType::BinaryInverted);

        debug!(normal_level, large_level, "Otsu levels computed");
        let combined = combine_or(&normal, &large);
        info!(
            width = combined.width(),
            height = combined.height(),
            "Body-text preprocessing complete"
        );
        combined
    }

    /// Large-text (header) preprocessing.
    ///
    /// 1. Grayscale + upscale
    /// 2. Invert
    /// 3. Morphological closing (dilate then erode, same kernel)
    /// 4. Median denoise
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn prepare_large_text(&self, image: &DynamicImage) -> GrayImage {
        let mut gray = self.to_grayscale(image);
        image::imageops::invert(&mut gray);

        let closed = grayscale_close(&gray, &square_mask(self.config.close_kernel));
        let radius = self.config.median_radius;
        let denoised = if radius == 0 {
            closed
        } else {
            median_filter(&closed, radius, radius)
        };

        info!(
            width = denoised.width(),
            height = denoised.height(),
            "Large-text preprocessing complete"
        );
        denoised
    }
}

// -- Thresholding -------------------------------------------------------------

/// Compute the Otsu threshold for a grayscale image.
///
/// Finds the level that maximises the between-class variance of the dark and
/// light pixel groups, which is the same as minimising the intra-class
/// variance. Pixels at or below the returned level form the dark class.
pub fn otsu_threshold(gray: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for pixel in gray.pixels() {
        histogram[pixel.0[0] as usize] += 1;
    }

    let total_pixels = gray.width() as u64 * gray.height() as u64;
    if total_pixels == 0 {
        return 128;
    }

    let sum_total: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &count)| i as f64 * count as f64)
        .sum();

    let mut sum_background: f64 = 0.0;
    let mut weight_background: u64 = 0;
    let mut max_variance: f64 = 0.0;
    let mut best_threshold: u8 = 0;

    for (t, &count) in histogram.iter().enumerate() {
        weight_background += count;
        if weight_background == 0 {
            continue;
        }
        let weight_foreground = total_pixels - weight_background;
        if weight_foreground == 0 {
            break;
        }

        sum_background += t as f64 * count as f64;
        let mean_background = sum_background / weight_background as f64;
        let mean_foreground = (sum_total - sum_background) / weight_foreground as f64;

        let between_variance = weight_background as f64
            * weight_foreground as f64
            * (mean_background - mean_foreground).powi(2);

        if between_variance > max_variance {
            max_variance = between_variance;
            best_threshold = t as u8;
        }
    }

    best_threshold
}

/// Pixel-wise bitwise OR of two equally sized images.
pub fn combine_or(a: &GrayImage, b: &GrayImage) -> GrayImage {
    map_colors2(a, b, |p, q| Luma([p.0[0] | q.0[0]]))
}

// -- Grayscale morphology -----------------------------------------------------

/// Square structuring element with side `kernel`. Even sides round up to the
/// next odd one; 0 and 1 give the single-pixel (identity) element.
pub fn square_mask(kernel: u32) -> Mask {
    Mask::square(u8::try_from(kernel / 2).unwrap_or(u8::MAX))
}

// -- Tests --------------------------------------------------------------------
