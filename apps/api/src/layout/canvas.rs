//! Canvas geometry, colors and font sizes shared by every composed page.
//!
//! A `CanvasSpec` is loaded once at startup (built-in defaults or a JSON
//! file) and read by every composition afterwards.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CanvasError {
    #[error("canvas dimensions must be positive, got {width}x{height}")]
    NonPositiveSize { width: i32, height: i32 },

    #[error("margins of {margin}px leave no text width on a {width}px canvas")]
    NoTextWidth { margin: i32, width: i32 },

    #[error("line height must be positive, got {0}")]
    NonPositiveLineHeight(i32),

    #[error("safe zone bottom {safe_zone_bottom} lies outside a canvas of height {height}")]
    SafeZoneOutsideCanvas { safe_zone_bottom: i32, height: i32 },

    #[error("font size for {0} must be positive")]
    NonPositiveFontSize(&'static str),
}

/// RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasColors {
    pub background: Rgb,
    pub text: Rgb,
    pub header: Rgb,
    pub border: Rgb,
    pub footer_text: Rgb,
}

/// Font sizes in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSizes {
    pub title: f32,
    pub subtitle: f32,
    pub body: f32,
    pub footer: f32,
}

/// Vertical positions of the page chrome, in pixels from the top edge
/// unless noted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChromeOffsets {
    /// Top of the title line.
    pub title_top: i32,
    /// Distance from the title to the subtitle.
    pub subtitle_step: i32,
    /// Distance from the subtitle to the separator rule.
    pub separator_step: i32,
    /// Distance from the separator to the first body line on aggregate pages.
    pub aggregate_body_step: i32,
    /// Distance from the separator to the first body line on single-unit pages.
    pub single_body_step: i32,
    /// Distance of the footer line from the bottom edge.
    pub footer_from_bottom: i32,
    /// Inset of the border rectangle from every edge.
    pub border_inset: i32,
    pub border_width: i32,
    pub separator_width: i32,
}

/// Fixed page geometry.
///
/// `margins` is the horizontal text padding on both sides, so wrapped lines
/// get `width - 2 * margins` pixels. Content whose cursor has moved past
/// `safe_zone_bottom` is truncated rather than overflowed to another page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasSpec {
    pub width: i32,
    pub height: i32,
    pub margins: i32,
    pub line_height: i32,
    pub inter_block_gap: i32,
    pub safe_zone_bottom: i32,
    pub colors: CanvasColors,
    pub font_sizes: FontSizes,
    pub chrome: ChromeOffsets,
}

impl Default for CanvasSpec {
    fn default() -> Self {
        let height = 2400;
        Self {
            width: 800,
            height,
            margins: 60,
            line_height: 40,
            inter_block_gap: 20,
            safe_zone_bottom: height - 100,
            colors: CanvasColors {
                background: Rgb(255, 250, 245),
                text: Rgb(40, 40, 40),
                header: Rgb(4, 71, 142),
                border: Rgb(4, 71, 142),
                footer_text: Rgb(150, 150, 150),
            },
            font_sizes: FontSizes {
                title: 48.0,
                subtitle: 36.0,
                body: 32.0,
                footer: 16.0,
            },
            chrome: ChromeOffsets {
                title_top: 60,
                subtitle_step: 70,
                separator_step: 60,
                aggregate_body_step: 30,
                single_body_step: 40,
                footer_from_bottom: 60,
                border_inset: 20,
                border_width: 3,
                separator_width: 2,
            },
        }
    }
}

impl CanvasSpec {
    /// Usable width for wrapped text.
    pub fn text_width(&self) -> f32 {
        (self.width - 2 * self.margins) as f32
    }

    /// Y of the separator rule, which is where the body cursor starts from.
    pub fn separator_y(&self) -> i32 {
        self.chrome.title_top + self.chrome.subtitle_step + self.chrome.separator_step
    }

    pub fn footer_y(&self) -> i32 {
        self.height - self.chrome.footer_from_bottom
    }

    /// Rejects geometry that would make composition meaningless.
    pub fn validate(&self) -> Result<(), CanvasError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(CanvasError::NonPositiveSize {
                width: self.width,
                height: self.height,
            });
        }
        if self.width - 2 * self.margins <= 0 {
            return Err(CanvasError::NoTextWidth {
                margin: self.margins,
                width: self.width,
            });
        }
        if self.line_height <= 0 {
            return Err(CanvasError::NonPositiveLineHeight(self.line_height));
        }
        if self.safe_zone_bottom <= 0 || self.safe_zone_bottom > self.height {
            return Err(CanvasError::SafeZoneOutsideCanvas {
                safe_zone_bottom: self.safe_zone_bottom,
                height: self.height,
            });
        }
        let sizes = [
            ("title", self.font_sizes.title),
            ("subtitle", self.font_sizes.subtitle),
            ("body", self.font_sizes.body),
            ("footer", self.font_sizes.footer),
        ];
        for (name, size) in sizes {
            if size.is_nan() || size <= 0.0 {
                return Err(CanvasError::NonPositiveFontSize(name));
            }
        }
        Ok(())
    }
}
