// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Environment diagnostics: is everything the pipeline shells out to present?
//
// Runs every check (they are independent) and reports what to do about each
// failure.

use std::io::Write;
use std::path::Path;

use akshar_core::AppConfig;
use akshar_document::{Pdftoppm, TesseractCli};

/// Result of a single diagnostic step.
#[derive(Debug, Clone)]
pub struct StepResult {
    /// Step name shown to the user.
    pub name: String,
    pub passed: bool,
    /// What was found.
    pub detail: String,
    /// What to do if the step failed.
    pub fix: Option<String>,
}

/// Full diagnostic report.
#[derive(Debug, Clone)]
pub struct DiagnosticReport {
    pub steps: Vec<StepResult>,
}

impl DiagnosticReport {
    pub fn all_passed(&self) -> bool {
        self.steps.iter().all(|step| step.passed)
    }

    /// Plain-text rendering, one line per step plus fixes.
    pub fn write_to(&self, out: &mut impl Write) -> std::io::Result<()> {
        for step in &self.steps {
            let mark = if step.passed { "ok" } else { "!!" };
            writeln!(out, "[{mark}] {}: {}", step.name, step.detail)?;
            if let Some(fix) = &step.fix {
                writeln!(out, "     -> {fix}")?;
            }
        }
        Ok(())
    }
}

/// Check the OCR engine, the rasterizer, and the log file.
pub fn run_diagnostics(config: &AppConfig, log_path: Option<&Path>) -> DiagnosticReport {
    let tesseract = TesseractCli::new(&config.tesseract_cmd);
    let pdftoppm = Pdftoppm::new(config.poppler_path.clone());

    let mut steps = Vec::new();

    steps.push(match tesseract.version() {
        Ok(version) => StepResult {
            name: "OCR engine".into(),
            passed: true,
            detail: version,
            fix: None,
        },
        Err(err) => StepResult {
            name: "OCR engine".into(),
            passed: false,
            detail: err.to_string(),
            fix: Some(
                "Install Tesseract with the `eng` and `hin` language packs, or set `tesseract_cmd`."
                    .into(),
            ),
        },
    });

    steps.push(match pdftoppm.version() {
        Ok(version) => StepResult {
            name: "PDF rasterizer".into(),
            passed: true,
            detail: version,
            fix: None,
        },
        Err(err) => StepResult {
            name: "PDF rasterizer".into(),
            passed: false,
            detail: err.to_string(),
            fix: Some("Install poppler (`poppler-utils`), or set `poppler_path`.".into()),
        },
    });

    steps.push(match log_path {
        Some(path) => StepResult {
            name: "Log file".into(),
            passed: true,
            detail: path.display().to_string(),
            fix: None,
        },
        None => StepResult {
            name: "Log file".into(),
            passed: false,
            detail: "the executable's directory is not writable".into(),
            fix: Some("Errors will only be shown on screen.".into()),
        },
    });

    DiagnosticReport { steps }
}
