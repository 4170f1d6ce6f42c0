// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR (Optical Character Recognition) invocation for Akshar.
//
// Recognition is delegated to the Tesseract command-line tool. The bitmap is
// written to a temporary PNG and Tesseract prints the recognised text on
// stdout. Language packs for English (`eng`) and Hindi (`hin`) must be
// installed alongside the binary:
//
//   ```sh
//   apt install tesseract-ocr tesseract-ocr-eng tesseract-ocr-hin
//   ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use akshar_core::error::{AksharError, Result};
use akshar_core::OcrRequest;
use image::GrayImage;
use tracing::{debug, info, instrument};

/// Anything that can turn a prepared bitmap into text.
pub trait TextRecognizer {
    /// Recognise the text in `image` using the language models and layout
    /// assumptions in `request`.
    ///
    /// Implementations must fail loudly: an engine that is missing or
    /// misconfigured is an error, never an empty string.
    fn recognize(&self, image: &GrayImage, request: &OcrRequest) -> Result<String>;
}

/// Tesseract driven through its command-line interface.
#[derive(Debug, Clone)]
pub struct TesseractCli {
    /// Binary name (looked up on `PATH`) or absolute path.
    command: PathBuf,
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

impl TesseractCli {
    pub fn new(command: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Query the installed engine version (first line of `tesseract --version`).
    pub fn version(&self) -> Result<String> {
        let output = Command::new(&self.command)
            .arg("--version")
            .output()
            .map_err(|err| {
                AksharError::OcrError(format!(
                    "failed to invoke {}: {}",
                    self.command.display(),
                    err
                ))
            })?;
        if !output.status.success() {
            return Err(AksharError::OcrError(format!(
                "{} --version exited with {}",
                self.command.display(),
                output.status
            )));
        }
        // Older releases print the banner on stderr.
        let banner = if output.stdout.is_empty() {
            output.stderr
        } else {
            output.stdout
        };
        Ok(String::from_utf8_lossy(&banner)
            .lines()
            .next()
            .unwrap_or_default()
            .trim()
            .to_string())
    }
}

impl TextRecognizer for TesseractCli {
    #[instrument(skip_all, fields(
        width = image.width(),
        height = image.height(),
        lang = %request.language_spec(),
        psm = request.psm.value(),
    ))]
    fn recognize(&self, image: &GrayImage, request: &OcrRequest) -> Result<String> {
        if image.width() == 0 || image.height() == 0 {
            return Err(AksharError::ImageError(format!(
                "cannot recognise an empty {}x{} bitmap",
                image.width(),
                image.height()
            )));
        }

        let work_dir = tempfile::Builder::new().prefix("akshar-ocr").tempdir()?;
        let input = work_dir.path().join("page.png");
        image.save(&input).map_err(|err| {
            AksharError::ImageError(format!("failed to write OCR input {}: {}", input.display(), err))
        })?;

        info!("Starting OCR text recognition");
        let output = Command::new(&self.command)
            .args(tesseract_args(&input, request))
            .output()
            .map_err(|err| {
                AksharError::OcrError(format!(
                    "failed to invoke {}: {}",
                    self.command.display(),
                    err
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AksharError::OcrError(format!(
                "{} exited with {}: {}",
                self.command.display(),
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8(output.stdout).map_err(|err| {
            AksharError::OcrError(format!("engine produced invalid UTF-8: {}", err))
        })?;

        debug!(
            line_count = text.lines().count(),
            char_count = text.chars().count(),
            "OCR recognition complete"
        );
        Ok(text)
    }
}

/// Command-line arguments for one recognition call.
///
/// `tesseract <input> stdout -l <langs> --oem <n> --psm <n> -c preserve_interword_spaces=<0|1>`
pub fn tesseract_args(input: &Path, request: &OcrRequest) -> Vec<OsString> {
    vec![
        input.as_os_str().to_owned(),
        "stdout".into(),
        "-l".into(),
        request.language_spec().into(),
        "--oem".into(),
        request.oem.value().to_string().into(),
        "--psm".into(),
        request.psm.value().to_string().into(),
        "-c".into(),
        format!(
            "preserve_interword_spaces={}",
            u8::from(request.preserve_interword_spaces)
        )
        .into(),
    ]
}
