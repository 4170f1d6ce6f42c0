// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF rasterization — renders every page of a PDF to a bitmap through
// poppler's `pdftoppm`.

use std::path::{Path, PathBuf};
use std::process::Command;

use akshar_core::error::{AksharError, Result};
use image::DynamicImage;
use tracing::{debug, info, instrument, warn};

use crate::image::processor::ImageProcessor;
use crate::pdf::reader::PdfReader;

const PDFTOPPM: &str = "pdftoppm";
const PAGE_PREFIX: &str = "page";

/// Anything that can turn a PDF into an ordered list of page bitmaps.
pub trait PageRasterizer {
    /// Render every page of `pdf` at `dpi`, first page first.
    fn rasterize(&self, pdf: &Path, dpi: u32) -> Result<Vec<DynamicImage>>;
}

/// Rasterizer backed by the `pdftoppm` binary from poppler.
#[derive(Debug, Clone, Default)]
pub struct Pdftoppm {
    /// Directory holding the poppler binaries. `None` searches `PATH`.
    poppler_path: Option<PathBuf>,
}

impl Pdftoppm {
    pub fn new(poppler_path: Option<PathBuf>) -> Self {
        Self { poppler_path }
    }

    /// The binary that will be executed.
    pub fn binary(&self) -> PathBuf {
        match &self.poppler_path {
            Some(dir) => dir.join(PDFTOPPM),
            None => PathBuf::from(PDFTOPPM),
        }
    }

    /// Check that the binary can be executed (`pdftoppm -v`).
    pub fn version(&self) -> Result<String> {
        let binary = self.binary();
        let output = Command::new(&binary).arg("-v").output().map_err(|err| {
            AksharError::RasterizeError(format!("failed to invoke {}: {}", binary.display(), err))
        })?;
        // pdftoppm prints its version banner on stderr.
        let banner = if output.stderr.is_empty() {
            output.stdout
        } else {
            output.stderr
        };
        Ok(String::from_utf8_lossy(&banner)
            .lines()
            .next()
            .unwrap_or_default()
            .trim()
            .to_string())
    }
}

impl PageRasterizer for Pdftoppm {
    #[instrument(skip(self), fields(pdf = %pdf.display(), dpi))]
    fn rasterize(&self, pdf: &Path, dpi: u32) -> Result<Vec<DynamicImage>> {
        if !pdf.is_file() {
            return Err(AksharError::InputNotFound(pdf.to_path_buf()));
        }
        // lopdf only cross-checks the page count; poppler renders files
        // (encrypted, damaged xref) that lopdf refuses.
        let expected = match PdfReader::open(pdf) {
            Ok(reader) => Some(reader.page_count()),
            Err(err) => {
                warn!(%err, "Page count unavailable, trusting pdftoppm output");
                None
            }
        };
        if expected == Some(0) {
            return Err(AksharError::PdfError(format!(
                "{} has no pages",
                pdf.display()
            )));
        }

        let out_dir = tempfile::Builder::new().prefix("akshar-pages").tempdir()?;
        let prefix = out_dir.path().join(PAGE_PREFIX);
        let binary = self.binary();

        info!(pages = ?expected, "Rasterizing PDF");
        let output = Command::new(&binary)
            .arg("-r")
            .arg(dpi.to_string())
            .arg("-png")
            .arg(pdf)
            .arg(&prefix)
            .output()
            .map_err(|err| {
                AksharError::RasterizeError(format!(
                    "failed to invoke {}: {}; is poppler-utils installed?",
                    binary.display(),
                    err
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AksharError::RasterizeError(format!(
                "{} exited with {}: {}",
                binary.display(),
                output.status,
                stderr.trim()
            )));
        }

        let rendered = collect_rendered_pages(out_dir.path())?;
        check_page_count(expected, rendered.len())?;

        let pages = rendered
            .iter()
            .map(|path| ImageProcessor::open(path).map(ImageProcessor::into_dynamic))
            .collect::<Result<Vec<_>>>()?;
        debug!(pages = pages.len(), "Rasterization complete");
        Ok(pages)
    }
}

/// The rasterizer must produce at least one page, and exactly as many as the
/// document declares when that is known.
fn check_page_count(expected: Option<usize>, rendered: usize) -> Result<()> {
    match expected {
        _ if rendered == 0 => Err(AksharError::RasterizeError(
            "pdftoppm produced no pages".to_string(),
        )),
        Some(expected) if expected != rendered => Err(AksharError::RasterizeError(format!(
            "expected {expected} rendered pages, found {rendered}"
        ))),
        _ => Ok(()),
    }
}

/// List the PNGs written by `pdftoppm` in page order.
///
/// Files are named `page-<n>.png`, with `<n>` zero-padded to the width of the
/// last page number, so ordering is by the parsed number rather than the name.
fn collect_rendered_pages(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut pages: Vec<(u32, PathBuf)> = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if let Some(number) = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(page_number_from_file_name)
        {
            pages.push((number, path));
        }
    }
    pages.sort_by_key(|(number, _)| *number);
    Ok(pages.into_iter().map(|(_, path)| path).collect())
}

/// `page-007.png` -> `Some(7)`.
fn page_number_from_file_name(name: &str) -> Option<u32> {
    name.strip_prefix(PAGE_PREFIX)?
        .strip_prefix('-')?
        .strip_suffix(".png")?
        .parse()
        .ok()
}
