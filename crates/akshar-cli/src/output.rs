// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output routing — choose where the recognised text goes and write it there.

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

use akshar_core::error::Result;
use akshar_core::SourceDocument;
use tracing::info;

/// Where the user asked the text to go. Exactly one mode is chosen per run;
/// "not chosen yet" is `Option::None` at the call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// An explicit file path; `.txt` is appended when missing.
    FilePath(PathBuf),
    /// `<downloads>/<input stem>.txt`.
    DownloadsDefault,
    /// Print to the terminal.
    Stdout,
}

/// A resolved, concrete destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    File(PathBuf),
    Stdout,
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Stdout => f.write_str("the screen"),
        }
    }
}

impl OutputMode {
    /// Turn the chosen mode into a destination for `source`.
    ///
    /// `downloads_dir` overrides the platform downloads folder.
    pub fn resolve(&self, source: &SourceDocument, downloads_dir: Option<&Path>) -> Destination {
        match self {
            Self::FilePath(path) => Destination::File(with_txt_extension(path)),
            Self::DownloadsDefault => {
                let dir = downloads_dir
                    .map(Path::to_path_buf)
                    .unwrap_or_else(default_downloads_dir);
                Destination::File(dir.join(format!("{}.txt", source.stem())))
            }
            Self::Stdout => Destination::Stdout,
        }
    }
}

/// Append `.txt` unless the path already ends in it (case-insensitive).
///
/// `notes` -> `notes.txt`, `notes.md` -> `notes.md.txt`, `NOTES.TXT` unchanged.
pub fn with_txt_extension(path: &Path) -> PathBuf {
    let has_txt = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));
    if has_txt {
        return path.to_path_buf();
    }
    let mut name = OsString::from(path.as_os_str());
    name.push(".txt");
    PathBuf::from(name)
}

/// The platform downloads folder, or `~/Downloads` when the platform does not
/// define one.
pub fn default_downloads_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
        .unwrap_or_else(|| PathBuf::from("Downloads"))
}

/// Write `text` to `destination`. Terminal output goes to `terminal`.
pub fn write_output(destination: &Destination, text: &str, terminal: &mut impl Write) -> Result<()> {
    match destination {
        Destination::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, text)?;
            info!(path = %path.display(), bytes = text.len(), "Output written");
            writeln!(terminal, "OCR output saved to: {}", path.display())?;
        }
        Destination::Stdout => {
            writeln!(terminal, "\n=== OCR Output ===\n")?;
            writeln!(terminal, "{text}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn txt_is_appended_when_missing() {
        for (input, expected) in [
            ("out", "out.txt"),
            ("out.md", "out.md.txt"),
            ("dir/out.txt", "dir/out.txt"),
            ("OUT.TXT", "OUT.TXT"),
        ] {
            let resolved = with_txt_extension(Path::new(input));
            assert_eq!(resolved, PathBuf::from(expected));
            assert!(resolved.to_string_lossy().to_lowercase().ends_with(".txt"));
        }
    }

    #[test]
    fn file_path_mode_resolves_with_txt() {
        let source = SourceDocument::new("scan.png");
        let dest = OutputMode::FilePath(PathBuf::from("/tmp/result")).resolve(&source, None);
        assert_eq!(dest, Destination::File(PathBuf::from("/tmp/result.txt")));
    }

    #[test]
    fn downloads_mode_uses_input_stem() {
        let source = SourceDocument::new("/home/me/scans/letter.jpeg");
        let dest = OutputMode::DownloadsDefault.resolve(&source, Some(Path::new("/data/dl")));
        assert_eq!(dest, Destination::File(PathBuf::from("/data/dl/letter.txt")));
    }

    #[test]
    fn stdout_mode() {
        let source = SourceDocument::new("a.pdf");
        assert_eq!(OutputMode::Stdout.resolve(&source, None), Destination::Stdout);
    }

    #[test]
    fn writes_file_and_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.txt");
        let mut terminal = Vec::new();

        write_output(&Destination::File(path.clone()), "नमस्ते\nhello", &mut terminal).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "नमस्ते\nhello");
        assert!(String::from_utf8(terminal).unwrap().contains("OCR output saved to"));
    }

    #[test]
    fn prints_to_terminal() {
        let mut terminal = Vec::new();
        write_output(&Destination::Stdout, "hello", &mut terminal).unwrap();
        let shown = String::from_utf8(terminal).unwrap();
        assert!(shown.contains("=== OCR Output ==="));
        assert!(shown.ends_with("hello\n"));
    }
}
