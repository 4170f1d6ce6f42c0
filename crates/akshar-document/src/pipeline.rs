// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// End-to-end extraction: load -> preprocess -> recognise -> filter, once per
// page.

use akshar_core::error::{AksharError, Result};
use akshar_core::{AppConfig, DocumentType, Extraction, OcrRequest, PageText, SourceDocument};
use image::{DynamicImage, GrayImage};
use tracing::{debug, info, instrument};

use crate::image::processor::ImageProcessor;
use crate::pdf::raster::PageRasterizer;
use crate::scan::enhance::Preprocessor;
use crate::scan::filter::EnglishFilter;
use crate::scan::ocr::TextRecognizer;

/// Behaviour switches for a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    pub dpi: u32,
    /// Apply the English-only filter to every OCR result.
    pub english_only: bool,
    /// Recognise PDF body text in addition to headers.
    pub pdf_body_text: bool,
    /// Run the preprocessing pipeline; plain grayscale otherwise.
    pub preprocess: bool,
}

impl From<&AppConfig> for PipelineOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            dpi: config.dpi,
            english_only: config.english_only,
            pdf_body_text: config.pdf_body_text,
            preprocess: config.preprocess,
        }
    }
}

/// Runs a source document through the recognition stages.
///
/// The OCR engine and the rasterizer are borrowed trait objects so callers
/// (and tests) decide what backs them.
pub struct Pipeline<'a> {
    recognizer: &'a dyn TextRecognizer,
    rasterizer: &'a dyn PageRasterizer,
    preprocessor: Preprocessor,
    filter: Option<EnglishFilter>,
    options: PipelineOptions,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        recognizer: &'a dyn TextRecognizer,
        rasterizer: &'a dyn PageRasterizer,
        preprocessor: Preprocessor,
        options: PipelineOptions,
    ) -> Self {
        Self {
            recognizer,
            rasterizer,
            preprocessor,
            filter: options.english_only.then(EnglishFilter::new),
            options,
        }
    }

    /// Build a pipeline from the application config.
    pub fn from_config(
        config: &AppConfig,
        recognizer: &'a dyn TextRecognizer,
        rasterizer: &'a dyn PageRasterizer,
    ) -> Self {
        Self::new(
            recognizer,
            rasterizer,
            Preprocessor::new(config.preprocess_config),
            PipelineOptions::from(config),
        )
    }

    /// Extract the text of `source`.
    pub fn run(&self, source: &SourceDocument) -> Result<Extraction> {
        self.run_with_progress(source, |_, _| {})
    }

    /// Extract the text of `source`, calling `on_page(done, total)` after each
    /// page. A failure on any page aborts the whole run.
    #[instrument(skip(self, on_page), fields(path = %source.path.display(), kind = ?source.kind))]
    pub fn run_with_progress(
        &self,
        source: &SourceDocument,
        mut on_page: impl FnMut(usize, usize),
    ) -> Result<Extraction> {
        if !source.path.is_file() {
            return Err(AksharError::InputNotFound(source.path.clone()));
        }

        let extraction = match source.kind {
            DocumentType::Image => {
                let image = ImageProcessor::open(&source.path)?.into_dynamic();
                let text = self.recognize_image(&image)?;
                on_page(1, 1);
                Extraction {
                    pages: vec![PageText {
                        page_number: 1,
                        text,
                    }],
                }
            }
            DocumentType::Pdf => {
                let bitmaps = self.rasterizer.rasterize(&source.path, self.options.dpi)?;
                let total = bitmaps.len();
                let mut pages = Vec::with_capacity(total);
                for (index, bitmap) in bitmaps.iter().enumerate() {
                    let page_number = index as u32 + 1;
                    debug!(page_number, total, "Recognising PDF page");
                    pages.push(PageText {
                        page_number,
                        text: self.recognize_pdf_page(bitmap)?,
                    });
                    on_page(index + 1, total);
                }
                Extraction { pages }
            }
        };

        info!(pages = extraction.page_count(), "Extraction complete");
        Ok(extraction)
    }

    /// Single images: combined preprocessing, uniform text block.
    fn recognize_image(&self, image: &DynamicImage) -> Result<String> {
        let bitmap = self.body_text_bitmap(image);
        self.recognize(&bitmap, &OcrRequest::body_text())
    }

    /// PDF pages: headers from the large-text bitmap, then (optionally) body
    /// text from the combined bitmap.
    fn recognize_pdf_page(&self, page: &DynamicImage) -> Result<String> {
        let header_bitmap = if self.options.preprocess {
            self.preprocessor.prepare_large_text(page)
        } else {
            self.preprocessor.to_grayscale(page)
        };
        let headers = self.recognize(&header_bitmap, &OcrRequest::headers())?;

        if !self.options.pdf_body_text {
            return Ok(headers);
        }

        let body_bitmap = self.body_text_bitmap(page);
        let body = self.recognize(&body_bitmap, &OcrRequest::body_text())?;
        Ok([headers, body]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n"))
    }

    fn body_text_bitmap(&self, image: &DynamicImage) -> GrayImage {
        if self.options.preprocess {
            self.preprocessor.prepare_body_text(image)
        } else {
            self.preprocessor.to_grayscale(image)
        }
    }

    /// One engine call, trailing whitespace and form feeds stripped, filter
    /// applied when enabled.
    fn recognize(&self, bitmap: &GrayImage, request: &OcrRequest) -> Result<String> {
        let raw = self.recognizer.recognize(bitmap, request)?;
        let text = raw.trim_end_matches(|c: char| c.is_whitespace() || c == '\u{c}');
        Ok(match &self.filter {
            Some(filter) => filter.filter(text),
            None => text.to_string(),
        })
    }
}
