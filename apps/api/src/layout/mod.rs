// Page layout: numerals, text cleanup, glyph metrics, line wrapping and
// page composition. Everything here is synchronous and CPU-bound; callers on
// the async runtime go through tokio::task::spawn_blocking.

pub mod canvas;
pub mod composer;
pub mod font_metrics;
pub mod line_breaker;
pub mod numerals;
pub mod sanitize;
