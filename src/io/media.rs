// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image file loading.
//!
//! This module decodes image files into RGBA pixels suitable for upload as
//! an egui texture, and reports their pixel dimensions.

use anyhow::{ensure, Context, Result};
use std::path::Path;

/// Default extensions offered by the open dialog.
pub const DEFAULT_IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// A decoded image.
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    /// RGBA8, row major
    pub pixels: Vec<u8>,
}

/// Load and decode an image file.
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    let img = image::open(path)
        .with_context(|| format!("Failed to decode image {}", path.display()))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    ensure!(
        width > 0 && height > 0,
        "Image {} has no pixels",
        path.display()
    );

    Ok(LoadedImage {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}
