// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides conversions between pixel-space boxes and the
//! normalized center/size form stored in label files.

use crate::models::annotation::Rect;

/// A box as center and size, each divided by the image dimension on its axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedBox {
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
    pub height: f64,
}

/// Convert a pixel rectangle to normalized center/size form.
pub fn normalize_rect(rect: &Rect, width: u32, height: u32) -> NormalizedBox {
    let center = rect.center();
    NormalizedBox {
        center_x: center.x / width as f64,
        center_y: center.y / height as f64,
        width: rect.width / width as f64,
        height: rect.height / height as f64,
    }
}

/// Convert a normalized box back to a top-left pixel rectangle.
pub fn denormalize_rect(norm: &NormalizedBox, width: u32, height: u32) -> Rect {
    let center_x = norm.center_x * width as f64;
    let center_y = norm.center_y * height as f64;
    let w = norm.width * width as f64;
    let h = norm.height * height as f64;
    Rect::new(center_x - w / 2.0, center_y - h / 2.0, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_denormalize_roundtrip() {
        let rect = Rect::new(123.5, 40.25, 310.0, 97.75);
        let norm = normalize_rect(&rect, 1920, 1080);
        let back = denormalize_rect(&norm, 1920, 1080);

        assert!((back.left - rect.left).abs() < 0.0001);
        assert!((back.top - rect.top).abs() < 0.0001);
        assert!((back.width - rect.width).abs() < 0.0001);
        assert!((back.height - rect.height).abs() < 0.0001);
    }

    #[test]
    fn test_normalize_full_frame() {
        let norm = normalize_rect(&Rect::new(0.0, 0.0, 1920.0, 1080.0), 1920, 1080);
        assert_eq!(norm.center_x, 0.5);
        assert_eq!(norm.center_y, 0.5);
        assert_eq!(norm.width, 1.0);
        assert_eq!(norm.height, 1.0);
    }

    #[test]
    fn test_normalize_uses_axis_dimension() {
        // 800x600 image, box (100,100)-(300,300)
        let norm = normalize_rect(&Rect::new(100.0, 100.0, 200.0, 200.0), 800, 600);
        assert_eq!(norm.center_x, 0.25);
        assert_eq!(norm.width, 0.25);
        assert!((norm.center_y - 1.0 / 3.0).abs() < 1e-12);
        assert!((norm.height - 1.0 / 3.0).abs() < 1e-12);
    }
}
