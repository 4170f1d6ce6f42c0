// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// English-only post-filter for recognised text.

use tracing::debug;
use whatlang::{Detector, Lang, Script};

/// Lines with fewer non-whitespace characters than this are too short to
/// classify and are always kept.
pub const MIN_CLASSIFIABLE_CHARS: usize = 3;

/// Drops recognised lines that are not English.
///
/// Each line goes through the full whatlang detector (every supported
/// language), so German, French and other Latin-script text is told apart
/// from English rather than only non-Latin scripts. Short English lines are
/// often scored as a neighbouring language with low confidence; those are
/// kept when they read as words. Detection is deterministic, so the same
/// input always yields the same output.
pub struct EnglishFilter {
    detector: Detector,
}

impl Default for EnglishFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl EnglishFilter {
    pub fn new() -> Self {
        Self {
            detector: Detector::new(),
        }
    }

    /// Whether a single line should be kept.
    ///
    /// - short lines are kept;
    /// - lines with no detectable script, or a script other than Latin, are
    ///   dropped;
    /// - English is kept, any other language reported reliably is dropped;
    /// - an unreliable non-English verdict keeps the line only if it reads as
    ///   words (OCR noise such as `xq zvkw` does not).
    pub fn is_english(&self, line: &str) -> bool {
        let significant = line.chars().filter(|c| !c.is_whitespace()).count();
        if significant < MIN_CLASSIFIABLE_CHARS {
            return true;
        }
        let Some(info) = self.detector.detect(line) else {
            return false;
        };
        if info.script() != Script::Latin {
            return false;
        }
        if info.lang() == Lang::Eng {
            return true;
        }
        !info.is_reliable() && reads_as_words(line)
    }

/// Keep only the English lines of `text`, joined with `\n`.
    pub fn filter(&self, text: &str) -> String {
        let total = text.lines().count();
        let kept: Vec<&str> = text.lines().filter(|line| self.is_english(line)).collect();
        debug!(total, kept = kept.len(), "English filter applied");
        kept.join("\n")
    }
}

/// At least half of the alphabetic words carry a vowel.
fn reads_as_words(line: &str) -> bool {
    let (words, voiced) = line
        .split_whitespace()
        .filter(|word| word.chars().any(char::is_alphabetic))
        .fold((0usize, 0usize), |(words, voiced), word| {
            let has_vowel = word
                .chars()
                .any(|c| matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u' | 'y'));
            (words + 1, voiced + usize::from(has_vowel))
        });
    words > 0 && voiced * 2 >= words
}

/// Convenience wrapper around [`EnglishFilter::filter`].
pub fn filter_english_lines(text: &str) -> String {
    EnglishFilter::new().filter(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_short_and_english_lines() {
        let out = filter_english_lines("a\nbb\nHello world\nनमस्ते");
        assert_eq!(out, "a\nbb\nHello world");
    }

    #[test]
    fn short_lines_kept_regardless_of_script() {
        let filter = EnglishFilter::new();
        assert!(filter.is_english("न"));
        assert!(filter.is_english(" x y "));
        assert!(filter.is_english(""));
    }

    #[test]
    fn unclassifiable_lines_are_dropped() {
        let filter = EnglishFilter::new();
        assert!(!filter.is_english("12345 67890"));
        assert!(!filter.is_english("--- *** ---"));
    }

    #[test]
    fn hindi_sentence_is_dropped() {
        let filter = EnglishFilter::new();
        assert!(!filter.is_english("यह एक हिंदी वाक्य है"));
        assert!(filter.is_english("This is an English sentence about documents."));
    }

    #[test]
    fn other_latin_languages_are_dropped() {
        let filter = EnglishFilter::new();
        assert!(!filter.is_english(
            "Der Bericht wurde gestern von der Verwaltung geprüft und genehmigt"
        ));
        assert!(!filter.is_english(
            "Le rapport a été envoyé à la direction hier après-midi"
        ));
        assert!(filter.is_english("The report was sent to the office yesterday afternoon"));
    }

    #[test]
    fn ocr_noise_is_dropped() {
        let filter = EnglishFilter::new();
        assert!(!filter.is_english("xq zvkw rrtp lmnbq"));
        assert_eq!(
            filter.filter("Please find the attached invoice\nxq zvkw rrtp lmnbq"),
            "Please find the attached invoice"
        );
    }

    #[test]
    fn vowel_check_counts_alphabetic_words_only() {
        assert!(reads_as_words("Hello world"));
        assert!(reads_as_words("Total: 42 items"));
        assert!(!reads_as_words("xq zvkw rrtp"));
        assert!(!reads_as_words("12 34"));
    }

    #[test]
    fn filtering_is_deterministic() {
        let input = "Invoice number 42\nकुल राशि\nThank you for your business\n::\nदिनांक";
        let first = filter_english_lines(input);
        for _ in 0..10 {
            assert_eq!(filter_english_lines(input), first);
        }
    }
}
