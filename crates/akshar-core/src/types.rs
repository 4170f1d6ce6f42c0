// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Akshar OCR pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Leading part of every page marker, for locating page boundaries in output.
pub const PAGE_MARKER_PREFIX: &str = "\n--- Page ";

/// Marker placed before the text of `page_number`, on every page but the first.
///
/// A document of N pages renders with exactly N-1 markers.
pub fn page_marker(page_number: u32) -> String {
    format!("{PAGE_MARKER_PREFIX}{page_number} ---\n")
}

/// Supported input document types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    /// Multi-page PDF, rasterized before recognition.
    Pdf,
    /// Any raster format the image decoder understands.
    Image,
}

impl DocumentType {
    /// Infer document type from file extension. Everything that is not a
    /// `.pdf` is handed to the image decoder.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Self::Pdf,
            _ => Self::Image,
        }
    }

    /// Infer document type from a path, defaulting to [`DocumentType::Image`]
    /// when the path has no extension.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Image)
    }
}

/// An input file together with its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub path: PathBuf,
    pub kind: DocumentType,
}

impl SourceDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let kind = DocumentType::from_path(&path);
        Self { path, kind }
    }

    /// File stem used to name default output files (`scan.png` -> `scan`).
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "ocr-output".to_string())
    }
}

/// Language models understood by the OCR engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    English,
    Hindi,
}

impl Language {
    /// Tesseract traineddata code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "eng",
            Self::Hindi => "hin",
        }
    }
}

/// Tesseract page-segmentation mode (`--psm`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSegMode {
    /// Assume a single uniform block of text.
    SingleBlock,
    /// Find as much text as possible in no particular order.
    SparseText,
}

impl PageSegMode {
    pub fn value(&self) -> u8 {
        match self {
            Self::SingleBlock => 6,
            Self::SparseText => 11,
        }
    }
}

/// Tesseract OCR engine mode (`--oem`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineMode {
    /// Whatever is available: legacy + LSTM.
    Default,
}

impl EngineMode {
    pub fn value(&self) -> u8 {
        match self {
            Self::Default => 3,
        }
    }
}

/// Everything the OCR engine needs besides the bitmap itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrRequest {
    /// Ordered language models; the first is the primary one.
    pub languages: Vec<Language>,
    pub psm: PageSegMode,
    pub oem: EngineMode,
    pub preserve_interword_spaces: bool,
}

impl OcrRequest {
    /// Body text: English first, uniform block, spacing preserved.
    pub fn body_text() -> Self {
        Self {
            languages: vec![Language::English, Language::Hindi],
            psm: PageSegMode::SingleBlock,
            oem: EngineMode::Default,
            preserve_interword_spaces: true,
        }
    }

    /// Large headers on PDF pages: Hindi first, sparse layout.
    pub fn headers() -> Self {
        Self {
            languages: vec![Language::Hindi, Language::English],
            psm: PageSegMode::SparseText,
            oem: EngineMode::Default,
            preserve_interword_spaces: false,
        }
    }

    /// Language argument in the engine's `eng+hin` form.
    pub fn language_spec(&self) -> String {
        self.languages
            .iter()
            .map(Language::code)
            .collect::<Vec<_>>()
            .join("+")
    }
}

/// Recognised text of a single page (1-indexed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    pub page_number: u32,
    pub text: String,
}

/// The result of running the pipeline over one source document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    pub pages: Vec<PageText>,
}

impl Extraction {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Join all pages into the final output text, each page after the first
    /// introduced by its numbered marker.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (index, page) in self.pages.iter().enumerate() {
            if index > 0 {
                out.push_str(&page_marker(page.page_number));
            }
            out.push_str(&page.text);
        }
        out
    }
}
