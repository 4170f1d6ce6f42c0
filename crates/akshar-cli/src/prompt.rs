// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Interactive prompts for the values not given on the command line.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use akshar_core::error::{AksharError, Result};
use tracing::debug;

use crate::output::OutputMode;

/// Line-oriented question/answer over any reader and writer.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// The terminal side, for messages that are not questions.
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// Ask for the input file until an existing path is given.
    pub fn input_path(&mut self) -> Result<PathBuf> {
        loop {
            let answer = self.ask("Path to the image or PDF: ")?;
            if answer.is_empty() {
                continue;
            }
            let path = PathBuf::from(unquote(&answer));
            if path.is_file() {
                return Ok(path);
            }
            debug!(path = %path.display(), "Prompted input not found");
            writeln!(self.output, "Error: file does not exist: {}", path.display())?;
        }
    }

    /// Ask where the text should go.
    pub fn output_mode(&mut self) -> Result<OutputMode> {
        loop {
            writeln!(self.output, "Where should the text go?")?;
            writeln!(self.output, "  1) Downloads folder (default)")?;
            writeln!(self.output, "  2) A file path of my choice")?;
            writeln!(self.output, "  3) Print it on screen")?;
            match self.ask("Choice [1]: ")?.as_str() {
                "" | "1" => return Ok(OutputMode::DownloadsDefault),
                "2" => {
                    let answer = self.ask("Output file path: ")?;
                    if !answer.is_empty() {
                        return Ok(OutputMode::FilePath(PathBuf::from(unquote(&answer))));
                    }
                }
                "3" => return Ok(OutputMode::Stdout),
                other => writeln!(self.output, "Please answer 1, 2 or 3 (got {other:?}).")?,
            }
        }
    }

    /// `Y/n` gate; an empty answer means yes.
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        loop {
            let answer = self.ask(&format!("{question} [Y/n]: "))?;
            match answer.to_ascii_lowercase().as_str() {
                "" | "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.output, "Please answer y or n.")?,
            }
        }
    }

    /// Print `question` and read one trimmed line. End of input is an error so
    /// a closed stdin cannot spin the loops above forever.
    fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{question}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(AksharError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for an answer",
            )));
        }
        Ok(line.trim().to_string())
    }
}

/// Strip one pair of matching quotes, as left by drag-and-drop into a terminal.
fn unquote(answer: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = answer
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    answer
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(script: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(script.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn reprompts_until_path_exists() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("scan.png");
        std::fs::write(&real, b"x").unwrap();

        let script = format!("/no/such/file.png\n\n\"{}\"\n", real.display());
        let mut p = prompter(&script);
        assert_eq!(p.input_path().unwrap(), real);

        let shown = String::from_utf8(p.output().clone()).unwrap();
        assert!(shown.contains("file does not exist"));
    }

    #[test]
    fn closed_input_is_an_error() {
        let mut p = prompter("");
        assert!(matches!(p.input_path(), Err(AksharError::Io(_))));
    }

    #[test]
    fn output_mode_menu() {
        assert_eq!(prompter("\n").output_mode().unwrap(), OutputMode::DownloadsDefault);
        assert_eq!(prompter("3\n").output_mode().unwrap(), OutputMode::Stdout);
        assert_eq!(
            prompter("9\n2\nresult\n").output_mode().unwrap(),
            OutputMode::FilePath(PathBuf::from("result"))
        );
    }

    #[test]
    fn confirm_defaults_to_yes() {
        assert!(prompter("\n").confirm("Go?").unwrap());
        assert!(prompter("Y\n").confirm("Go?").unwrap());
        assert!(!prompter("maybe\nn\n").confirm("Go?").unwrap());
    }

    #[test]
    fn unquote_strips_matching_pairs_only() {
        assert_eq!(unquote("\"a b\""), "a b");
        assert_eq!(unquote("'a'"), "a");
        assert_eq!(unquote("\"a'"), "\"a'");
    }
}
