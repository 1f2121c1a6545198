// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanner configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::CaptureOptions;

/// File name of the persisted configuration inside the data directory.
pub const CONFIG_FILE: &str = "config.json";

/// Geometry of the zoomed preview shown while a corner is dragged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MagnifierGeometry {
    /// Diameter of the circular zoom container.
    pub container_size: f64,
    pub border_width: f64,
    /// Length of each crosshair arm.
    pub cursor_size: f64,
    /// Thickness of the crosshair lines.
    pub cursor_border: f64,
}

impl Default for MagnifierGeometry {
    fn default() -> Self {
        Self {
            container_size: 120.0,
            border_width: 2.0,
            cursor_size: 10.0,
            cursor_border: 1.0,
        }
    }
}

/// Geometry of the draggable corner handles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandleGeometry {
    /// Side of the square touch target centred on each corner.
    pub container_size: f64,
    /// Diameter of the visible dot.
    pub point_size: f64,
}

impl Default for HandleGeometry {
    fn default() -> Self {
        Self {
            container_size: 40.0,
            point_size: 20.0,
        }
    }
}

/// Persistent scanner settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Extra options forwarded to the camera, layered over the defaults.
    pub capture_options: CaptureOptions,
    /// Upper bound on a single camera capture.
    pub capture_timeout_secs: u64,
    /// Upper bound on a single edge detection.
    pub detect_timeout_secs: u64,
    /// Upper bound on a single crop.
    pub crop_timeout_secs: u64,
    pub magnifier: MagnifierGeometry,
    pub handles: HandleGeometry,
    /// Where cropped photos are written. `None` uses the platform cache.
    pub output_dir: Option<PathBuf>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            capture_options: CaptureOptions::empty(),
            capture_timeout_secs: 30,
            detect_timeout_secs: 15,
            crop_timeout_secs: 30,
            magnifier: MagnifierGeometry::default(),
            handles: HandleGeometry::default(),
            output_dir: None,
        }
    }
}

impl ScannerConfig {
    pub fn capture_timeout(&self) -> Duration {
        Duration::from_secs(self.capture_timeout_secs)
    }

    pub fn detect_timeout(&self) -> Duration {
        Duration::from_secs(self.detect_timeout_secs)
    }

    pub fn crop_timeout(&self) -> Duration {
        Duration::from_secs(self.crop_timeout_secs)
    }

    /// The options actually handed to the camera: defaults, then ours.
    pub fn effective_capture_options(&self) -> CaptureOptions {
        CaptureOptions::default().merged(&self.capture_options)
    }

    /// Load `config.json` from `data_dir`, or `None` if it is missing or
    /// unreadable.
    pub fn load(data_dir: &Path) -> Option<Self> {
        let path = data_dir.join(CONFIG_FILE);
        let data = std::fs::read_to_string(&path).ok()?;
        serde_json::from_str(&data).ok()
    }

    /// Write this configuration to `config.json` in `data_dir`.
    pub fn persist(&self, data_dir: &Path) -> Result<()> {
        let path = data_dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persist_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ScannerConfig::default();
        config.crop_timeout_secs = 5;
        config
            .capture_options
            .0
            .insert("quality".into(), serde_json::json!(0.5));

        config.persist(dir.path()).unwrap();
        let loaded = ScannerConfig::load(dir.path()).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.crop_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: ScannerConfig =
            serde_json::from_str(r#"{ "detect_timeout_secs": 3 }"#).unwrap();
        assert_eq!(config.detect_timeout_secs, 3);
        assert_eq!(config.capture_timeout_secs, 30);
        assert_eq!(config.magnifier, MagnifierGeometry::default());
    }

    #[test]
    fn load_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ScannerConfig::load(dir.path()).is_none());
    }

    #[test]
    fn effective_options_keep_defaults() {
        let options = ScannerConfig::default().effective_capture_options();
        assert_eq!(options.get("fixOrientation"), Some(&serde_json::Value::Bool(true)));
    }
}
