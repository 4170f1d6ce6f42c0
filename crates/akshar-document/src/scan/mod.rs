// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Recognition pipeline stages — preprocessing, OCR invocation, and the
// English-only post-filter.

pub mod enhance;
pub mod filter;
pub mod ocr;

pub use enhance::Preprocessor;
pub use filter::EnglishFilter;
pub use ocr::{TesseractCli, TextRecognizer};
