// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// akshar-document — Document processing for the Akshar OCR tool.
//
// Provides image loading, PDF page counting and rasterization, the OCR
// preprocessing pipeline (Otsu binarization, grayscale morphology, median
// denoising), Tesseract invocation, and the English-only post-filter.

pub mod image;
pub mod pdf;
pub mod pipeline;
pub mod scan;

// Re-export the primary structs so callers can use `akshar_document::Pipeline` etc.
pub use image::processor::ImageProcessor;
pub use pdf::raster::{PageRasterizer, Pdftoppm};
pub use pdf::reader::PdfReader;
pub use pipeline::{Pipeline, PipelineOptions};
pub use scan::enhance::Preprocessor;
pub use scan::filter::{EnglishFilter, filter_english_lines};
pub use scan::ocr::{TesseractCli, TextRecognizer};
