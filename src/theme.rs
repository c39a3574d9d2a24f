//! Light/dark theme colors for the overlay drawn on top of the trails.
//!
//! The theme only affects presentation. Simulation math never reads it.

use glam::Vec4;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Theme from the host's dark-mode flag.
    pub fn from_dark(is_dark: bool) -> Self {
        if is_dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    #[inline]
    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    /// Overlay colors for this theme.
    pub fn overlay(self) -> OverlayStyle {
        match self {
            Theme::Dark => OverlayStyle {
                foreground: rgba(0xff, 0xff, 0xff, 1.0),
                background: rgba(0x0b, 0x0b, 0x0b, 1.0),
                grid: rgba(0x66, 0x66, 0x66, 1.0),
                panel: rgba(0x00, 0x00, 0x00, 0.3),
                border: rgba(0xff, 0xff, 0xff, 0.1),
                control: rgba(0x2f, 0x2f, 0x2f, 1.0),
            },
            Theme::Light => OverlayStyle {
                foreground: rgba(0x11, 0x11, 0x11, 1.0),
                background: rgba(0xff, 0xff, 0xff, 1.0),
                grid: rgba(0xcc, 0xcc, 0xcc, 1.0),
                panel: rgba(0xff, 0xff, 0xff, 0.5),
                border: rgba(0x00, 0x00, 0x00, 0.1),
                control: rgba(0xe5, 0xe5, 0xe5, 1.0),
            },
        }
    }
}

/// RGBA colors (components in `[0, 1]`) for overlay elements.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayStyle {
    /// Text and labels.
    pub foreground: Vec4,
    /// Viewport clear color.
    pub background: Vec4,
    /// Axis/grid lines.
    pub grid: Vec4,
    /// Translucent control panel fill.
    pub panel: Vec4,
    /// Control panel border.
    pub border: Vec4,
    /// Slider tracks and inactive buttons.
    pub control: Vec4,
}

fn rgba(r: u8, g: u8, b: u8, a: f32) -> Vec4 {
    Vec4::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a)
}
