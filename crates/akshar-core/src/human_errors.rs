// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages shown when a run aborts.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The full technical detail goes to the log file.

use crate::error::AksharError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// User must do something (fix a path, install a tool).
    ActionRequired,
    /// The input itself cannot be processed.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    pub severity: Severity,
}

/// Convert an `AksharError` into something a non-technical user can act on.
pub fn humanize_error(err: &AksharError) -> HumanError {
    match err {
        AksharError::InputNotFound(path) => HumanError {
            message: "We couldn't find that file.".into(),
            suggestion: format!(
                "Check the path and try again. (Looked for: {})",
                path.display()
            ),
            severity: Severity::ActionRequired,
        },

        AksharError::PdfError(_) => HumanError {
            message: "We couldn't read this PDF.".into(),
            suggestion: "The file may be damaged or password-protected. Try opening and re-saving it in a PDF viewer.".into(),
            severity: Severity::Permanent,
        },

        AksharError::RasterizeError(detail) => humanize_tool_error(
            "We couldn't turn the PDF pages into images.",
            "pdftoppm",
            "Install poppler (the `poppler-utils` package) or set `poppler_path` in the config file.",
            detail,
        ),

        AksharError::ImageError(_) => HumanError {
            message: "We couldn't read this image.".into(),
            suggestion: "The file may be damaged or in an unusual format. Try saving it as PNG or JPEG.".into(),
            severity: Severity::Permanent,
        },

        AksharError::OcrError(detail) => humanize_tool_error(
            "Text recognition failed.",
            "tesseract",
            "Install Tesseract with the English and Hindi language packs (`eng`, `hin`), or set `tesseract_cmd` in the config file.",
            detail,
        ),

        AksharError::Config(detail) => HumanError {
            message: "The settings file has a problem.".into(),
            suggestion: format!("Fix or delete the config file and try again. ({detail})"),
            severity: Severity::ActionRequired,
        },

        AksharError::Io(io) => HumanError {
            message: "We couldn't read or write a file.".into(),
            suggestion: format!("Check that the folder exists and that you may write to it. ({io})"),
            severity: Severity::ActionRequired,
        },
    }
}

/// External tool failures: distinguish "not installed" from "ran and failed".
fn humanize_tool_error(message: &str, tool: &str, install_hint: &str, detail: &str) -> HumanError {
    let lower = detail.to_lowercase();
    if lower.contains("not found") || lower.contains("failed to invoke") || lower.contains("no such file") {
        HumanError {
            message: format!("{message} `{tool}` doesn't seem to be installed."),
            suggestion: install_hint.to_string(),
            severity: Severity::ActionRequired,
        }
    } else if lower.contains("failed loading language") || lower.contains("traineddata") {
        HumanError {
            message: format!("{message} A language pack is missing."),
            suggestion: install_hint.to_string(),
            severity: Severity::ActionRequired,
        }
    } else {
        HumanError {
            message: message.to_string(),
            suggestion: format!("Try again with a clearer scan. (Detail: {detail})"),
            severity: Severity::Permanent,
        }
    }
}
