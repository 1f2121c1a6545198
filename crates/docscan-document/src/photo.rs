// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Transient photo storage: the working directory where captured and cropped
// photos live for the duration of a scan. Files are referenced by path only.

use std::path::{Path, PathBuf};

use docscan_core::error::{Result, ScanError};
use docscan_core::types::{CapturedPhoto, PhotoRef};
use image::DynamicImage;
use tracing::{debug, info};
use uuid::Uuid;

/// A directory holding the photos of the current scan.
#[derive(Debug, Clone)]
pub struct PhotoStore {
    dir: PathBuf,
}

impl PhotoStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Copy an existing image into the store, as a camera would write a fresh
    /// capture. The copy keeps the source extension.
    pub fn import(&self, source: &Path) -> Result<CapturedPhoto> {
        let (width, height) = image::image_dimensions(source).map_err(|err| {
            ScanError::ImageError(format!("failed to read {}: {}", source.display(), err))
        })?;

        let ext = source
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("jpg")
            .to_ascii_lowercase();
        let target = self.fresh_path("photo", &ext);
        std::fs::copy(source, &target)?;

        info!(
            source = %source.display(),
            target = %target.display(),
            width,
            height,
            "photo imported"
        );
        Ok(CapturedPhoto {
            photo: PhotoRef::new(format!("file://{}", target.display())),
            width,
            height,
        })
    }

    /// Encode `image` as PNG into the store and return its reference.
    pub fn save_png(&self, prefix: &str, image: &DynamicImage) -> Result<PhotoRef> {
        let target = self.fresh_path(prefix, "png");
        image.save(&target).map_err(|err| {
            ScanError::ImageError(format!(
                "failed to save image to {}: {}",
                target.display(),
                err
            ))
        })?;
        debug!(path = %target.display(), "image written");
        Ok(PhotoRef::new(target.display().to_string()))
    }

    fn fresh_path(&self, prefix: &str, ext: &str) -> PathBuf {
        self.dir.join(format!("{prefix}-{}.{ext}", Uuid::new_v4()))
    }
}
