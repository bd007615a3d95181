// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canvas configuration.

use trellis_event_state::double_click::DEFAULT_TIME_THRESHOLD_MS;
use trellis_widget_tree::WrapMode;

/// An 8-bit straight-alpha RGBA color.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha; 255 is opaque.
    pub a: u8,
}

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);
    /// The default window background.
    pub const GRAY: Self = Self::rgb(0xc0, 0xc0, 0xc0);

    /// Create a color with alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 0xff)
    }

    /// `[r, g, b, a]`.
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Build from `[r, g, b, a]`.
    pub const fn from_array(px: [u8; 4]) -> Self {
        Self::rgba(px[0], px[1], px[2], px[3])
    }
}

/// Double-click recognition settings.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DoubleClickConfig {
    /// Longest time from the first press to the second release, in milliseconds.
    pub time_threshold_ms: u64,
    /// Largest pointer travel between the two presses; `None` disables the check.
    pub distance_threshold: Option<f64>,
}

impl Default for DoubleClickConfig {
    fn default() -> Self {
        Self {
            time_threshold_ms: DEFAULT_TIME_THRESHOLD_MS,
            distance_threshold: None,
        }
    }
}

/// Settings fixed at canvas creation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CanvasConfig {
    /// Color used when clearing damaged regions.
    pub background: Color,
    /// Double-click recognition.
    pub double_click: DoubleClickConfig,
    /// Whether Tab traversal wraps at the end of the tree.
    pub focus_wrap: WrapMode,
    /// Glyph atlas size in pixels.
    pub glyph_atlas: (u32, u32),
    /// Icon atlas size in pixels.
    pub icon_atlas: (u32, u32),
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            background: Color::GRAY,
            double_click: DoubleClickConfig::default(),
            focus_wrap: WrapMode::Never,
            glyph_atlas: (256, 256),
            icon_atlas: (256, 256),
        }
    }
}

impl CanvasConfig {
    /// Set the background color.
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    /// Set double-click recognition.
    pub fn with_double_click(mut self, double_click: DoubleClickConfig) -> Self {
        self.double_click = double_click;
        self
    }

    /// Set Tab traversal wrapping.
    pub fn with_focus_wrap(mut self, focus_wrap: WrapMode) -> Self {
        self.focus_wrap = focus_wrap;
        self
    }

    /// Set both atlas sizes.
    pub fn with_atlas_sizes(mut self, glyph: (u32, u32), icon: (u32, u32)) -> Self {
        self.glyph_atlas = glyph;
        self.icon_atlas = icon;
        self
    }
}
