// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Process-wide labeling state.
//!
//! A [`Session`] lives for the whole run of the application. It is created
//! once at startup and survives every image switch; nothing in it is reset
//! by loading an image or a label file.

/// The 10-color palette boxes cycle through, as RGB.
pub const PALETTE: [[u8; 3]; 10] = [
    [0xe6, 0x19, 0x4b], // red
    [0x3c, 0xb4, 0x4b], // green
    [0xff, 0xe1, 0x19], // yellow
    [0x00, 0x82, 0xc8], // blue
    [0xf5, 0x82, 0x31], // orange
    [0x91, 0x1e, 0xb4], // purple
    [0x46, 0xf0, 0xf0], // cyan
    [0xf0, 0x32, 0xe6], // magenta
    [0xd2, 0xf5, 0x3c], // lime
    [0xfa, 0xbe, 0xbe], // pink
];

/// RGB triple for a palette index. Out-of-range indices wrap.
pub fn palette_color(index: usize) -> [u8; 3] {
    PALETTE[index % PALETTE.len()]
}

/// Cyclic cursor into [`PALETTE`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorCursor {
    index: usize,
}

impl ColorCursor {
    /// Index the next constructed box will receive.
    pub fn peek(&self) -> usize {
        self.index
    }

    /// Return the current index and advance.
    pub fn next_color(&mut self) -> usize {
        let color = self.index;
        self.index = (self.index + 1) % PALETTE.len();
        color
    }
}

/// Sticky label plus color cursor.
#[derive(Debug, Clone, Default)]
pub struct Session {
    sticky_label: String,
    colors: ColorCursor,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent label the user explicitly confirmed.
    pub fn sticky_label(&self) -> &str {
        &self.sticky_label
    }

    pub fn set_sticky_label(&mut self, label: impl Into<String>) {
        self.sticky_label = label.into();
        log::debug!("Sticky label is now {:?}", self.sticky_label);
    }

    /// Palette index for a newly constructed box.
    pub fn next_color(&mut self) -> usize {
        self.colors.next_color()
    }

    pub fn color_cursor(&self) -> usize {
        self.colors.peek()
    }
}
