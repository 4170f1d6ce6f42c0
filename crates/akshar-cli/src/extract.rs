// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The extract command: gather input and destination (flags first, prompts for
// whatever is missing), run the pipeline, write the result.

use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;

use akshar_core::error::{AksharError, Result};
use akshar_core::{AppConfig, SourceDocument};
use akshar_document::{PageRasterizer, Pipeline, TextRecognizer};
use clap::Args;
use tracing::{info, instrument};

use crate::output::{Destination, OutputMode, write_output};
use crate::progress::{ProgressDisplay, ProgressEvent};
use crate::prompt::Prompter;

#[derive(Args, Debug, Clone, Default)]
pub struct ExtractArgs {
    /// Image or PDF to read (prompted for when omitted)
    pub input: Option<PathBuf>,

    /// Write the text to this file (".txt" is appended when missing)
    #[arg(short, long, conflicts_with_all = ["download", "print"])]
    pub output: Option<PathBuf>,

    /// Save as <input name>.txt in the Downloads folder
    #[arg(short, long, conflicts_with = "print")]
    pub download: bool,

    /// Print the text instead of saving it
    #[arg(short, long)]
    pub print: bool,

    /// Keep only lines detected as English
    #[arg(long)]
    pub english_only: bool,

    /// For PDFs, also recognise body text (headers only by default)
    #[arg(long)]
    pub pdf_body: bool,

    /// Skip image preprocessing and OCR the plain grayscale page
    #[arg(long)]
    pub no_preprocess: bool,

    /// Do not ask for confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Disable the progress display
    #[arg(short, long)]
    pub quiet: bool,
}

impl ExtractArgs {
    /// The output mode chosen on the command line, if any.
    pub fn output_mode(&self) -> Option<OutputMode> {
        if let Some(path) = &self.output {
            Some(OutputMode::FilePath(path.clone()))
        } else if self.download {
            Some(OutputMode::DownloadsDefault)
        } else if self.print {
            Some(OutputMode::Stdout)
        } else {
            None
        }
    }

    /// Apply flag overrides on top of the loaded config.
    pub fn apply(&self, config: &AppConfig) -> AppConfig {
        AppConfig {
            english_only: config.english_only || self.english_only,
            pdf_body_text: config.pdf_body_text || self.pdf_body,
            preprocess: config.preprocess && !self.no_preprocess,
            ..config.clone()
        }
    }
}

/// The external collaborators an extraction needs.
pub struct Engines<'a> {
    pub recognizer: &'a dyn TextRecognizer,
    pub rasterizer: &'a dyn PageRasterizer,
}

/// How an extract run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Written(Destination),
    Cancelled,
}

/// Run one extraction.
///
/// An input given as a flag must exist (no retry); a prompted input is asked
/// for again until it does.
#[instrument(skip_all)]
pub fn run_extract<R: BufRead, W: Write>(
    args: &ExtractArgs,
    config: &AppConfig,
    engines: Engines<'_>,
    prompter: &mut Prompter<R, W>,
) -> Result<Outcome> {
    let config = args.apply(config);

    let input = match &args.input {
        Some(path) if path.is_file() => path.clone(),
        Some(path) => return Err(AksharError::InputNotFound(path.clone())),
        None => prompter.input_path()?,
    };
    let source = SourceDocument::new(input);

    let mode = match args.output_mode() {
        Some(mode) => mode,
        None => prompter.output_mode()?,
    };
    let destination = mode.resolve(&source, config.downloads_dir.as_deref());
    info!(input = %source.path.display(), kind = ?source.kind, %destination, "Extraction requested");

    if !args.yes {
        let question = format!(
            "Text from {} will go to {}. Proceed?",
            source.path.display(),
            destination
        );
        if !prompter.confirm(&question)? {
            writeln!(prompter.output(), "Cancelled.")?;
            info!("Extraction cancelled by user");
            return Ok(Outcome::Cancelled);
        }
    }

    writeln!(prompter.output(), "Processing file: {}", source.path.display())?;

    let pipeline = Pipeline::from_config(&config, engines.recognizer, engines.rasterizer);
    let display = ProgressDisplay::spawn(
        !args.quiet && std::io::stderr().is_terminal(),
        "Recognising text",
    );
    let events = display.sender();
    let result = pipeline.run_with_progress(&source, |done, total| {
        let _ = events.send(ProgressEvent::Page { done, total });
    });
    drop(events);
    display.finish();

    let text = result?.render();
    write_output(&destination, &text, prompter.output())?;
    Ok(Outcome::Written(destination))
}

#[cfg(test)]
mod tests {
    use super::*;
    use akshar_core::{OcrRequest, PAGE_MARKER_PREFIX, PageSegMode};
    use image::{DynamicImage, GrayImage, Luma};
    use std::cell::RefCell;
    use std::io::Cursor;
    use std::path::Path;

    struct FakeRecognizer {
        calls: RefCell<Vec<OcrRequest>>,
    }

    impl FakeRecognizer {
        fn new() -> Self {
            Self {
                calls: RefCell::default(),
            }
        }
    }

    impl TextRecognizer for FakeRecognizer {
        fn recognize(&self, _image: &GrayImage, request: &OcrRequest) -> Result<String> {
            self.calls.borrow_mut().push(request.clone());
            Ok(format!("Page text {}\n", self.calls.borrow().len()))
        }
    }

    struct FakeRasterizer(usize);

    impl PageRasterizer for FakeRasterizer {
        fn rasterize(&self, _pdf: &Path, _dpi: u32) -> Result<Vec<DynamicImage>> {
            Ok((0..self.0)
                .map(|_| DynamicImage::ImageLuma8(GrayImage::from_pixel(10, 10, Luma([250u8]))))
                .collect())
        }
    }

    fn prompter(script: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(script.as_bytes().to_vec()), Vec::new())
    }

    fn scanned_letter(dir: &Path) -> PathBuf {
        let path = dir.join("letter.png");
        GrayImage::from_fn(30, 20, |x, _| Luma([if x % 5 == 0 { 0 } else { 255 }]))
            .save(&path)
            .unwrap();
        path
    }

    fn config_with_downloads(dir: &Path) -> AppConfig {
        AppConfig {
            downloads_dir: Some(dir.join("Downloads")),
            ..AppConfig::default()
        }
    }

    #[test]
    fn image_goes_to_downloads_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let input = scanned_letter(dir.path());
        let config = config_with_downloads(dir.path());
        let ocr = FakeRecognizer::new();
        let raster = FakeRasterizer(0);
        let args = ExtractArgs {
            input: Some(input),
            yes: true,
            quiet: true,
            ..ExtractArgs::default()
        };
        // No output flag: the menu default (empty answer) picks Downloads.
        let mut p = prompter("\n");

        let outcome = run_extract(
            &args,
            &config,
            Engines {
                recognizer: &ocr,
                rasterizer: &raster,
            },
            &mut p,
        )
        .unwrap();

        let expected = dir.path().join("Downloads").join("letter.txt");
        assert_eq!(outcome, Outcome::Written(Destination::File(expected.clone())));
        assert_eq!(std::fs::read_to_string(expected).unwrap(), "Page text 1");

        let calls = ocr.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].psm, PageSegMode::SingleBlock);
    }

    #[test]
    fn three_page_pdf_printed_with_two_page_markers() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("report.pdf");
        std::fs::write(&pdf, b"%PDF-1.5 stub").unwrap();
        let ocr = FakeRecognizer::new();
        let raster = FakeRasterizer(3);
        let args = ExtractArgs {
            input: Some(pdf),
            print: true,
            yes: true,
            quiet: true,
            ..ExtractArgs::default()
        };
        let mut p = prompter("");

        let outcome = run_extract(
            &args,
            &AppConfig::default(),
            Engines {
                recognizer: &ocr,
                rasterizer: &raster,
            },
            &mut p,
        )
        .unwrap();

        assert_eq!(outcome, Outcome::Written(Destination::Stdout));
        assert_eq!(ocr.calls.borrow().len(), 3);
        assert!(
            ocr.calls
                .borrow()
                .iter()
                .all(|req| req.psm == PageSegMode::SparseText)
        );
        let shown = String::from_utf8(p.output().clone()).unwrap();
        assert_eq!(shown.matches(PAGE_MARKER_PREFIX).count(), 2);
        assert!(shown.contains("\n--- Page 2 ---\nPage text 2"));
        assert!(shown.contains("\n--- Page 3 ---\nPage text 3"));
    }

    #[test]
    fn missing_flag_input_aborts_without_ocr() {
        let ocr = FakeRecognizer::new();
        let raster = FakeRasterizer(1);
        let args = ExtractArgs {
            input: Some(PathBuf::from("/no/such/scan.png")),
            print: true,
            yes: true,
            ..ExtractArgs::default()
        };
        let err = run_extract(
            &args,
            &AppConfig::default(),
            Engines {
                recognizer: &ocr,
                rasterizer: &raster,
            },
            &mut prompter(""),
        )
        .unwrap_err();

        assert!(matches!(err, AksharError::InputNotFound(_)));
        assert!(ocr.calls.borrow().is_empty());
    }

    #[test]
    fn interactive_flow_with_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let input = scanned_letter(dir.path());
        let target = dir.path().join("out").join("result");
        let script = format!(
            "/no/such/file.png\n{}\n2\n{}\ny\n",
            input.display(),
            target.display()
        );
        let ocr = FakeRecognizer::new();
        let raster = FakeRasterizer(0);
        let mut p = prompter(&script);

        let outcome = run_extract(
            &ExtractArgs {
                quiet: true,
                ..ExtractArgs::default()
            },
            &AppConfig::default(),
            Engines {
                recognizer: &ocr,
                rasterizer: &raster,
            },
            &mut p,
        )
        .unwrap();

        let written = dir.path().join("out").join("result.txt");
        assert_eq!(outcome, Outcome::Written(Destination::File(written.clone())));
        assert!(written.is_file());
    }

    #[test]
    fn declining_confirmation_skips_ocr() {
        let dir = tempfile::tempdir().unwrap();
        let input = scanned_letter(dir.path());
        let ocr = FakeRecognizer::new();
        let raster = FakeRasterizer(0);
        let args = ExtractArgs {
            input: Some(input),
            print: true,
            ..ExtractArgs::default()
        };

        let outcome = run_extract(
            &args,
            &AppConfig::default(),
            Engines {
                recognizer: &ocr,
                rasterizer: &raster,
            },
            &mut prompter("n\n"),
        )
        .unwrap();

        assert_eq!(outcome, Outcome::Cancelled);
        assert!(ocr.calls.borrow().is_empty());
    }

    #[test]
    fn flags_override_config() {
        let args = ExtractArgs {
            english_only: true,
            pdf_body: true,
            no_preprocess: true,
            ..ExtractArgs::default()
        };
        let merged = args.apply(&AppConfig::default());
        assert!(merged.english_only);
        assert!(merged.pdf_body_text);
        assert!(!merged.preprocess);

        let untouched = ExtractArgs::default().apply(&AppConfig::default());
        assert_eq!(untouched, AppConfig::default());
    }
}
