// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — page counting and rasterization of PDF input.

pub mod raster;
pub mod reader;

pub use raster::{PageRasterizer, Pdftoppm};
pub use reader::PdfReader;
