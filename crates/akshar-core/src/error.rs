// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Akshar.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all Akshar operations.
#[derive(Debug, Error)]
pub enum AksharError {
    // -- Input errors --
    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    // -- Document errors --
    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("PDF rasterization failed: {0}")]
    RasterizeError(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("OCR failed: {0}")]
    OcrError(String),

    // -- Configuration / filesystem --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, AksharError>;
