// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data structures.
//!
//! This module defines the labeled bounding box and its direct-manipulation
//! geometry: resize-handle hit testing and the bounded resize transform.
//! Rendering is left to the UI layer, which reads the state exposed here.

use serde::{Deserialize, Serialize};

/// Minimum width and height of a committed box, in image pixels.
pub const MIN_SIZE: f64 = 5.0;

/// Distance in pixels from an edge within which a handle is grabbed.
pub const HANDLE_MARGIN: f64 = 8.0;

/// Gap between the top of the box and the bottom of its label text.
pub const LABEL_MARGIN: f64 = 2.0;

/// A 2D point in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Zero-area rectangle at `point`.
    pub fn at(point: Point) -> Self {
        Self::new(point.x, point.y, 0.0, 0.0)
    }

    /// Rectangle spanning two corner points, normalized so that width and
    /// height are non-negative.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.left + self.width / 2.0,
            self.top + self.height / 2.0,
        )
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x <= self.right()
            && point.y >= self.top
            && point.y <= self.bottom()
    }

    /// Whether both sides reach [`MIN_SIZE`].
    pub fn meets_minimum(&self) -> bool {
        self.width >= MIN_SIZE && self.height >= MIN_SIZE
    }
}

/// Clean up user-typed label text so it survives the whitespace-split label
/// file: trimmed, with inner whitespace runs replaced by `_`.
pub fn normalize_label(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Resize handle on the border of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Left,
    Right,
    Top,
    Bottom,
}

impl Handle {
    pub fn moves_left(self) -> bool {
        matches!(self, Handle::TopLeft | Handle::BottomLeft | Handle::Left)
    }

    pub fn moves_right(self) -> bool {
        matches!(self, Handle::TopRight | Handle::BottomRight | Handle::Right)
    }

    pub fn moves_top(self) -> bool {
        matches!(self, Handle::TopLeft | Handle::TopRight | Handle::Top)
    }

    pub fn moves_bottom(self) -> bool {
        matches!(self, Handle::BottomLeft | Handle::BottomRight | Handle::Bottom)
    }
}

/// Snapshot taken when a resize drag starts.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ResizeState {
    handle: Handle,
    anchor: Point,
    original: Rect,
}

/// A labeled bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    rect: Rect,
    pub label: String,
    /// Index into [`crate::models::session::PALETTE`].
    pub color: usize,
    resize: Option<ResizeState>,
}

impl Annotation {
    /// Create a new annotation. The rectangle may be zero-area.
    pub fn new(rect: Rect, label: impl Into<String>, color: usize) -> Self {
        Self {
            rect,
            label: label.into(),
            color,
            resize: None,
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Replace the geometry.
    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub fn is_labeled(&self) -> bool {
        !self.label.is_empty()
    }

    /// Top-left position of the label text: directly above the box's
    /// top-left corner, outside the box.
    pub fn label_position(&self, text_height: f64) -> Point {
        Point::new(self.rect.left, self.rect.top - text_height - LABEL_MARGIN)
    }

    /// Which resize handle, if any, lies under `point`.
    ///
    /// Corners are checked before edges. Edge handles only match strictly
    /// between the two adjacent corners.
    pub fn hit_test_handle(&self, point: Point) -> Option<Handle> {
        let r = &self.rect;
        let (left, right, top, bottom) = (r.left, r.right(), r.top, r.bottom());
        let near = |a: f64, b: f64| (a - b).abs() <= HANDLE_MARGIN;

        if near(point.x, left) && near(point.y, top) {
            return Some(Handle::TopLeft);
        }
        if near(point.x, right) && near(point.y, top) {
            return Some(Handle::TopRight);
        }
        if near(point.x, left) && near(point.y, bottom) {
            return Some(Handle::BottomLeft);
        }
        if near(point.x, right) && near(point.y, bottom) {
            return Some(Handle::BottomRight);
        }

        let within_y = top < point.y && point.y < bottom;
        let within_x = left < point.x && point.x < right;
        if near(point.x, left) && within_y {
            return Some(Handle::Left);
        }
        if near(point.x, right) && within_y {
            return Some(Handle::Right);
        }
        if near(point.y, top) && within_x {
            return Some(Handle::Top);
        }
        if near(point.y, bottom) && within_x {
            return Some(Handle::Bottom);
        }
        None
    }

    pub fn is_resizing(&self) -> bool {
        self.resize.is_some()
    }

    /// Start a resize drag from `start` using `handle`.
    pub fn begin_resize(&mut self, handle: Handle, start: Point) {
        self.resize = Some(ResizeState {
            handle,
            anchor: start,
            original: self.rect,
        });
    }

    /// Recompute the geometry for the pointer at `current`.
    ///
    /// Always derived from the snapshot taken by [`Self::begin_resize`], so
    /// repeated calls never accumulate drift. The dragged edges follow the
    /// pointer; a side shorter than [`MIN_SIZE`] grows right or down from
    /// its left or top edge.
    pub fn apply_resize(&mut self, current: Point) {
        let Some(state) = self.resize else {
            return;
        };
        let dx = current.x - state.anchor.x;
        let dy = current.y - state.anchor.y;
        let orig = state.original;

        let mut left = orig.left;
        let mut right = orig.right();
        let mut top = orig.top;
        let mut bottom = orig.bottom();

        if state.handle.moves_left() {
            left += dx;
        }
        if state.handle.moves_right() {
            right += dx;
        }
        if state.handle.moves_top() {
            top += dy;
        }
        if state.handle.moves_bottom() {
            bottom += dy;
        }

        let width = (right - left).max(MIN_SIZE);
        let height = (bottom - top).max(MIN_SIZE);
        self.set_rect(Rect::new(left, top, width, height));
    }

    /// Finish the resize drag.
    pub fn end_resize(&mut self) {
        self.resize = None;
    }
}
