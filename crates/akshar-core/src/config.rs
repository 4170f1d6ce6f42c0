// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{AksharError, Result};

const CONFIG_DIR: &str = "akshar";
const CONFIG_FILE: &str = "config.json";

/// Tuning knobs for the preprocessing pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Scale factor applied to the grayscale page before thresholding.
    pub upscale: f32,
    /// Side length of the square element used to thicken strokes (odd; even
    /// sizes round up).
    pub dilate_kernel: u32,
    /// Side length of the square element used for closing in large-text mode
    /// (odd; even sizes round up).
    pub close_kernel: u32,
    /// Median filter radius (1 => 3x3 window).
    pub median_radius: u32,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            upscale: 1.5,
            dilate_kernel: 3,
            close_kernel: 5,
            median_radius: 1,
        }
    }
}

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Resolution used when rasterizing PDF pages.
    pub dpi: u32,
    /// Name or path of the tesseract binary.
    pub tesseract_cmd: String,
    /// Directory containing the poppler binaries (`pdftoppm`). `None` uses `PATH`.
    pub poppler_path: Option<PathBuf>,
    /// Where "save to downloads" writes. `None` uses the platform downloads folder.
    pub downloads_dir: Option<PathBuf>,
    /// Drop recognised lines that are not detected as English.
    pub english_only: bool,
    /// Also recognise body text on PDF pages (headers only otherwise).
    pub pdf_body_text: bool,
    /// Run the preprocessing pipeline before OCR.
    pub preprocess: bool,
    pub preprocess_config: PreprocessConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dpi: 300,
            tesseract_cmd: "tesseract".to_string(),
            poppler_path: None,
            downloads_dir: None,
            english_only: false,
            pdf_body_text: false,
            preprocess: true,
            preprocess_config: PreprocessConfig::default(),
        }
    }
}

impl AppConfig {
    /// Default location of the config file (`<config dir>/akshar/config.json`).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load the config from `path`. A missing file yields the defaults; a
    /// malformed one is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        serde_json::from_str(&data).map_err(|err| {
            AksharError::Config(format!("invalid config file {}: {}", path.display(), err))
        })
    }

    /// Load from the default location, or defaults when none can be resolved.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.dpi, 300);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "english_only": true, "dpi": 200 }"#).unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert!(config.english_only);
        assert_eq!(config.dpi, 200);
        assert_eq!(config.tesseract_cmd, "tesseract");
        assert_eq!(config.preprocess_config, PreprocessConfig::default());
    }

    #[test]
    fn malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, AksharError::Config(_)));
    }

    #[test]
    fn nested_preprocess_and_tool_paths_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{
                "poppler_path": "/opt/poppler/bin",
                "pdf_body_text": true,
                "preprocess_config": { "close_kernel": 5 }
            }"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.poppler_path, Some(PathBuf::from("/opt/poppler/bin")));
        assert!(config.pdf_body_text);
        assert_eq!(config.preprocess_config.close_kernel, 5);
        assert_eq!(
            config.preprocess_config.dilate_kernel,
            PreprocessConfig::default().dilate_kernel
        );
    }
}
