//! Text width measurement for the layout engine.
//!
//! Glyph rasterization lives outside this crate. The composer only needs a
//! width for a run of text at a given pixel size, which it asks of a
//! [`TextMeasurer`]. The built-in [`GlyphTableMeasurer`] answers from static
//! em-width tables; a renderer with real font access can supply its own.
//!
//! Widths are in em units (relative to font size) and multiplied by the
//! requested size in pixels. The results approximate real shaping and are
//! stable across runs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ────────────────────────────────────────────────────────────────────────────
// Measurement capability
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeasureError {
    #[error("no glyph metrics for {ch:?} in {text:?}")]
    MissingGlyph { ch: char, text: String },

    #[error("measured width for {text:?} is not a finite number")]
    NonFiniteWidth { text: String },
}

/// Width-measurement capability injected into the layout engine.
///
/// Implementations must be pure with respect to their inputs: the same text
/// and size always yield the same width.
pub trait TextMeasurer: Send + Sync {
    fn measure(&self, text: &str, font_size_px: f32) -> Result<f32, MeasureError>;
}

/// How the static measurer treats characters it has no metrics for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlyphCoverage {
    /// Unknown characters measure as `average_char_width`.
    #[default]
    Lenient,
    /// Unknown characters fail the measurement with `MissingGlyph`.
    Strict,
}

// ────────────────────────────────────────────────────────────────────────────
// Static metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static em-width table for a Hebrew-capable sans-serif face.
///
/// `ascii[i]` = width of `(i + 32) as char`, covering 0x20 through 0x7E.
/// `hebrew[i]` = width of `U+05D0 + i`, covering א through ת including the
/// final forms (27 slots).
pub struct FontMetricTable {
    ascii: [f32; 95],
    hebrew: [f32; 27],
    /// Maqaf, paseq, sof pasuq and the geresh/gershayim marks.
    pub hebrew_punctuation_width: f32,
    /// Fallback width for characters outside every covered range.
    pub average_char_width: f32,
}

impl FontMetricTable {
    /// Width in em of a single character, or `None` if the table has no entry.
    pub fn char_width(&self, c: char) -> Option<f32> {
        let code = c as u32;
        match code {
            0x20..=0x7E => Some(self.ascii[(code - 0x20) as usize]),
            0x05D0..=0x05EA => Some(self.hebrew[(code - 0x05D0) as usize]),
            // Points and cantillation marks stack on the base letter.
            0x0591..=0x05BD | 0x05BF | 0x05C1 | 0x05C2 | 0x05C4 | 0x05C5 | 0x05C7 => Some(0.0),
            0x05BE | 0x05C0 | 0x05C3 | 0x05C6 | 0x05F3 | 0x05F4 => {
                Some(self.hebrew_punctuation_width)
            }
            // Ligature forms (yiddish digraphs) render about as wide as two narrow letters.
            0x05F0..=0x05F2 => Some(self.hebrew[0x05D5 - 0x05D0] * 2.0),
            // Directional marks, embeddings, isolates and joiners.
            0x200B..=0x200F | 0x202A..=0x202E | 0x2066..=0x2069 | 0xFEFF => Some(0.0),
            0x00A0 => Some(self.ascii[0]),
            _ => None,
        }
    }
}

/// Arial-like proportions; the only table shipped.
#[rustfmt::skip]
static HEBREW_SANS_TABLE: FontMetricTable = FontMetricTable {
    ascii: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.28, 0.28, 0.36, 0.56, 0.56, 0.89, 0.67, 0.19, 0.33, 0.33, 0.39, 0.58, 0.28, 0.33, 0.28, 0.28,
        // 0     1     2     3     4     5     6     7     8     9
        0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56,
        // :     ;     <     =     >     ?     @
        0.28, 0.28, 0.58, 0.58, 0.58, 0.56, 1.02,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        0.67, 0.67, 0.72, 0.72, 0.67, 0.61, 0.78, 0.72, 0.28, 0.50, 0.67, 0.56, 0.83,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        0.72, 0.78, 0.67, 0.78, 0.72, 0.67, 0.61, 0.72, 0.67, 0.94, 0.67, 0.67, 0.61,
        // [     \     ]     ^     _     `
        0.28, 0.28, 0.28, 0.47, 0.56, 0.33,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        0.56, 0.56, 0.50, 0.56, 0.56, 0.28, 0.56, 0.56, 0.22, 0.22, 0.50, 0.22, 0.83,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        0.56, 0.56, 0.56, 0.56, 0.33, 0.50, 0.28, 0.56, 0.50, 0.72, 0.50, 0.50, 0.50,
        // {     |     }     ~
        0.33, 0.26, 0.33, 0.58,
    ],
    hebrew: [
        // א     ב     ג     ד     ה     ו     ז     ח     ט     י
        0.61, 0.56, 0.42, 0.52, 0.60, 0.24, 0.33, 0.60, 0.60, 0.24,
        // ך     כ     ל     ם     מ     ן     נ     ס     ע     ף
        0.52, 0.50, 0.52, 0.60, 0.61, 0.24, 0.37, 0.59, 0.56, 0.55,
        // פ     ץ     צ     ק     ר     ש     ת
        0.56, 0.52, 0.54, 0.58, 0.52, 0.69, 0.60,
    ],
    hebrew_punctuation_width: 0.30,
    average_char_width: 0.55,
};

/// Returns the built-in metric table.
pub fn hebrew_sans_metrics() -> &'static FontMetricTable {
    &HEBREW_SANS_TABLE
}

/// [`TextMeasurer`] backed by a static [`FontMetricTable`].
#[derive(Clone, Copy)]
pub struct GlyphTableMeasurer {
    table: &'static FontMetricTable,
    coverage: GlyphCoverage,
}

impl GlyphTableMeasurer {
    pub fn new(coverage: GlyphCoverage) -> Self {
        Self {
            table: hebrew_sans_metrics(),
            coverage,
        }
    }

    /// Width in em units, before scaling by font size.
    pub fn measure_em(&self, text: &str) -> Result<f32, MeasureError> {
        let mut total = 0.0_f32;
        for c in text.chars() {
            let w = match (self.table.char_width(c), self.coverage) {
                (Some(w), _) => w,
                (None, GlyphCoverage::Lenient) => self.table.average_char_width,
                (None, GlyphCoverage::Strict) => {
                    return Err(MeasureError::MissingGlyph {
                        ch: c,
                        text: text.to_string(),
                    })
                }
            };
            total += w;
        }
        Ok(total)
    }
}

impl Default for GlyphTableMeasurer {
    fn default() -> Self {
        Self::new(GlyphCoverage::default())
    }
}

impl TextMeasurer for GlyphTableMeasurer {
    fn measure(&self, text: &str, font_size_px: f32) -> Result<f32, MeasureError> {
        let width = self.measure_em(text)? * font_size_px;
        if !width.is_finite() {
            return Err(MeasureError::NonFiniteWidth {
                text: text.to_string(),
            });
        }
        Ok(width)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
