//! Page composition. Turns titles and sanitized unit text into one
//! fixed-size page layout.
//!
//! # Modes
//! - **Aggregate**: every unit of a chapter on one page, each prefixed with
//!   its ordinal label (`"א. "`) and wrapped into its own numbered block.
//! - **Single**: one unit per page, wrapped without a label; the subtitle
//!   carries the chapter and unit numbers instead.
//!
//! # Truncation
//! A page never overflows to a second page. The body cursor starts below the
//! separator and advances one `line_height` per line (plus
//! `inter_block_gap` after each aggregate block). Aggregate pages stop taking
//! units once the cursor has passed `safe_zone_bottom`; single pages stop
//! taking lines. What was left out is reported in [`Truncation`]. The footer
//! is pinned to the bottom edge regardless, so it may overlap the last lines.

use serde::{Deserialize, Serialize};

use crate::layout::canvas::CanvasSpec;
use crate::layout::font_metrics::{MeasureError, TextMeasurer};
use crate::layout::line_breaker::{wrap, Line};
use crate::layout::numerals::encode;

/// Attribution printed at the bottom of every page.
pub const FOOTER_TEXT: &str = "מקור: ספריא | Powered by Sefaria.org";

// ────────────────────────────────────────────────────────────────────────────
// Layout types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Horizontal rule from `x_start` to `x_end` at `y`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub x_start: f32,
    pub x_end: f32,
    pub y: f32,
    pub stroke: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub stroke: i32,
}

/// A wrapped line with its top-left drawing origin.
///
/// `origin.x` right-aligns the line against the right margin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedLine {
    #[serde(flatten)]
    pub line: Line,
    pub origin: Point,
}

/// One unit's text on a page. `label` is `None` on single-unit pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberedBlock {
    pub label: Option<String>,
    pub lines: Vec<PlacedLine>,
}

/// Positions of everything on the page that is not body text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageChrome {
    pub border: Rect,
    pub title_origin: Point,
    pub subtitle_origin: Point,
    pub separator: Rule,
    pub footer_origin: Point,
}

/// Complete description of one renderable page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    pub title: String,
    pub subtitle: String,
    pub blocks: Vec<NumberedBlock>,
    pub footer: String,
    pub chrome: PageChrome,
}

/// Content left off a page by the truncation policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Truncation {
    /// Aggregate pages: ordinals of units that were not placed.
    pub omitted_ordinals: Vec<u32>,
    /// Single pages: wrapped lines that fell below the safe zone.
    pub dropped_lines: usize,
}

impl Truncation {
    pub fn is_empty(&self) -> bool {
        self.omitted_ordinals.is_empty() && self.dropped_lines == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposedPage {
    pub layout: PageLayout,
    pub truncation: Truncation,
}

// ────────────────────────────────────────────────────────────────────────────
// Requests
// ────────────────────────────────────────────────────────────────────────────

/// Sanitized text of one unit together with its 1-based ordinal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitBody {
    pub ordinal: u32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PageBody {
    Aggregate { units: Vec<UnitBody> },
    Single { text: String },
}

/// Everything needed to compose one page, independent of any other page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRequest {
    pub title: String,
    pub subtitle: String,
    pub body: PageBody,
}

// ────────────────────────────────────────────────────────────────────────────
// Composition
// ────────────────────────────────────────────────────────────────────────────

/// Composes one page. Fails only if the measurer fails.
pub fn compose(
    request: &PageRequest,
    canvas: &CanvasSpec,
    measurer: &dyn TextMeasurer,
) -> Result<ComposedPage, MeasureError> {
    let chrome = compose_chrome(&request.title, &request.subtitle, canvas, measurer)?;

    let (blocks, truncation) = match &request.body {
        PageBody::Aggregate { units } => compose_aggregate_body(units, canvas, measurer)?,
        PageBody::Single { text } => compose_single_body(text, canvas, measurer)?,
    };

    Ok(ComposedPage {
        layout: PageLayout {
            title: request.title.clone(),
            subtitle: request.subtitle.clone(),
            blocks,
            footer: FOOTER_TEXT.to_string(),
            chrome,
        },
        truncation,
    })
}

fn compose_aggregate_body(
    units: &[UnitBody],
    canvas: &CanvasSpec,
    measurer: &dyn TextMeasurer,
) -> Result<(Vec<NumberedBlock>, Truncation), MeasureError> {
    let mut cursor = canvas.separator_y() + canvas.chrome.aggregate_body_step;
    let mut blocks = Vec::with_capacity(units.len());
    let mut truncation = Truncation::default();

    for (i, unit) in units.iter().enumerate() {
        if cursor > canvas.safe_zone_bottom {
            truncation.omitted_ordinals = units[i..].iter().map(|u| u.ordinal).collect();
            break;
        }

        let label = encode(unit.ordinal as i64);
        let prefixed = format!("{label}. {}", unit.text);
        let lines = wrap_body(&prefixed, canvas, measurer)?;

        let mut placed = Vec::with_capacity(lines.len());
        for line in lines {
            placed.push(place_line(line, cursor, canvas));
            cursor += canvas.line_height;
        }
        cursor += canvas.inter_block_gap;

        blocks.push(NumberedBlock {
            label: Some(label),
            lines: placed,
        });
    }

    Ok((blocks, truncation))
}

fn compose_single_body(
    text: &str,
    canvas: &CanvasSpec,
    measurer: &dyn TextMeasurer,
) -> Result<(Vec<NumberedBlock>, Truncation), MeasureError> {
    let mut cursor = canvas.separator_y() + canvas.chrome.single_body_step;
    let lines = wrap_body(text, canvas, measurer)?;
    let total = lines.len();

    let mut placed = Vec::with_capacity(total);
    for line in lines {
        if cursor > canvas.safe_zone_bottom {
            break;
        }
        placed.push(place_line(line, cursor, canvas));
        cursor += canvas.line_height;
    }

    let truncation = Truncation {
        omitted_ordinals: Vec::new(),
        dropped_lines: total - placed.len(),
    };
    let block = NumberedBlock {
        label: None,
        lines: placed,
    };
    Ok((vec![block], truncation))
}

fn wrap_body(
    text: &str,
    canvas: &CanvasSpec,
    measurer: &dyn TextMeasurer,
) -> Result<Vec<Line>, MeasureError> {
    let size = canvas.font_sizes.body;
    wrap(text, canvas.text_width(), |s| measurer.measure(s, size))
}

/// Right-aligns a line against the right margin at height `y`.
fn place_line(line: Line, y: i32, canvas: &CanvasSpec) -> PlacedLine {
    let x = (canvas.width - canvas.margins) as f32 - line.measured_width;
    PlacedLine {
        line,
        origin: Point { x, y: y as f32 },
    }
}

fn compose_chrome(
    title: &str,
    subtitle: &str,
    canvas: &CanvasSpec,
    measurer: &dyn TextMeasurer,
) -> Result<PageChrome, MeasureError> {
    let c = &canvas.chrome;
    let title_y = c.title_top;
    let subtitle_y = title_y + c.subtitle_step;
    let separator_y = canvas.separator_y();

    Ok(PageChrome {
        border: Rect {
            left: c.border_inset as f32,
            top: c.border_inset as f32,
            right: (canvas.width - c.border_inset) as f32,
            bottom: (canvas.height - c.border_inset) as f32,
            stroke: c.border_width,
        },
        title_origin: Point {
            x: centered_x(title, canvas.font_sizes.title, canvas, measurer)?,
            y: title_y as f32,
        },
        subtitle_origin: Point {
            x: centered_x(subtitle, canvas.font_sizes.subtitle, canvas, measurer)?,
            y: subtitle_y as f32,
        },
        separator: Rule {
            x_start: canvas.margins as f32,
            x_end: (canvas.width - canvas.margins) as f32,
            y: separator_y as f32,
            stroke: c.separator_width,
        },
        footer_origin: Point {
            x: centered_x(FOOTER_TEXT, canvas.font_sizes.footer, canvas, measurer)?,
            y: canvas.footer_y() as f32,
        },
    })
}

fn centered_x(
    text: &str,
    font_size: f32,
    canvas: &CanvasSpec,
    measurer: &dyn TextMeasurer,
) -> Result<f32, MeasureError> {
    let width = measurer.measure(text, font_size)?;
    Ok(((canvas.width as f32 - width) / 2.0).floor())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
