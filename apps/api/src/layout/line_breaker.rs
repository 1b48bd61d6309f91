//! Greedy word wrapping against a measured width.
//!
//! # Algorithm
//! Tokens are the whitespace-split words of the input, kept in order. Each
//! token is tried against the current line (`line + " " + token`); if the
//! candidate fits it is accepted, otherwise the current line is emitted and
//! the token starts the next one. A token that is wider than `max_width` on
//! its own becomes an over-width line; words are never split or hyphenated.

use serde::{Deserialize, Serialize};

use crate::layout::font_metrics::MeasureError;

/// One wrapped line and the width it measured at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub text: String,
    pub measured_width: f32,
}

/// Wraps `text` into lines no wider than `max_width`.
///
/// `measure` is called with candidate line strings. Empty or all-whitespace
/// text yields no lines; any text with at least one token yields at least one.
/// The first measurement error aborts the wrap.
pub fn wrap<F>(text: &str, max_width: f32, mut measure: F) -> Result<Vec<Line>, MeasureError>
where
    F: FnMut(&str) -> Result<f32, MeasureError>,
{
    let mut lines = Vec::new();
    // Accepted text of the current line and its measured width.
    let mut current = String::new();
    let mut current_width = 0.0_f32;

    for token in text.split_whitespace() {
        let candidate = if current.is_empty() {
            token.to_string()
        } else {
            format!("{current} {token}")
        };
        let candidate_width = measure(&candidate)?;

        if candidate_width <= max_width {
            current = candidate;
            current_width = candidate_width;
        } else if current.is_empty() {
            // A lone token too wide for the line keeps its own over-width line.
            lines.push(Line {
                text: candidate,
                measured_width: candidate_width,
            });
        } else {
            lines.push(Line {
                text: std::mem::take(&mut current),
                measured_width: current_width,
            });
            current_width = measure(token)?;
            current = token.to_string();
        }
    }

    if !current.is_empty() {
        lines.push(Line {
            text: current,
            measured_width: current_width,
        });
    }

    Ok(lines)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::{GlyphCoverage, GlyphTableMeasurer, TextMeasurer};

    /// One unit of width per character.
    fn char_count(s: &str) -> Result<f32, MeasureError> {
        Ok(s.chars().count() as f32)
    }

    fn texts(lines: &[Line]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn test_empty_text_has_no_lines() {
        assert!(wrap("", 10.0, char_count).unwrap().is_empty());
        assert!(wrap("   \n ", 10.0, char_count).unwrap().is_empty());
    }

    #[test]
    fn test_short_text_is_one_line() {
        let lines = wrap("אב גד", 10.0, char_count).unwrap();
        assert_eq!(texts(&lines), vec!["אב גד"]);
        assert_eq!(lines[0].measured_width, 5.0);
    }

    #[test]
    fn test_wraps_at_width() {
        // "aaa bbb" = 7 fits at 7, "aaa bbb ccc" = 11 does not.
        let lines = wrap("aaa bbb ccc dd", 7.0, char_count).unwrap();
        assert_eq!(texts(&lines), vec!["aaa bbb", "ccc dd"]);
    }

    #[test]
    fn test_exact_fit_is_accepted() {
        let lines = wrap("abcde", 5.0, char_count).unwrap();
        assert_eq!(texts(&lines), vec!["abcde"]);
    }

    #[test]
    fn test_overwide_token_gets_own_line() {
        let lines = wrap("ab abcdefghij cd", 5.0, char_count).unwrap();
        assert_eq!(texts(&lines), vec!["ab", "abcdefghij", "cd"]);
        assert_eq!(lines[1].measured_width, 10.0);
    }

    #[test]
    fn test_overwide_first_token() {
        let lines = wrap("abcdefgh ab", 5.0, char_count).unwrap();
        assert_eq!(texts(&lines), vec!["abcdefgh", "ab"]);
    }

    #[test]
    fn test_widths_within_budget_except_lone_tokens() {
        let text = "one two three four five sixsixsixsix seven eight nine ten eleven";
        let lines = wrap(text, 12.0, char_count).unwrap();
        for line in &lines {
            if line.measured_width > 12.0 {
                assert_eq!(line.text.split_whitespace().count(), 1, "over-width line {:?}", line.text);
            }
        }
    }

    #[test]
    fn test_token_stream_round_trip() {
        let text = "מתי קורין את שמע בערבית משעה שהכהנים נכנסים לאכול בתרומתן עד סוף האשמורה הראשונה";
        let measurer = GlyphTableMeasurer::new(GlyphCoverage::Strict);
        for width in [40.0_f32, 120.0, 300.0, 680.0] {
            let lines = wrap(text, width, |s| measurer.measure(s, 32.0)).unwrap();
            let rebuilt: Vec<&str> = lines.iter().flat_map(|l| l.text.split_whitespace()).collect();
            let original: Vec<&str> = text.split_whitespace().collect();
            assert_eq!(rebuilt, original, "width {width}");
        }
    }

    #[test]
    fn test_deterministic() {
        let text = "a bb ccc dddd eeeee ffffff";
        let first = wrap(text, 8.0, char_count).unwrap();
        let second = wrap(text, 8.0, char_count).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_measure_error_propagates() {
        let failing = |s: &str| {
            if s.contains('x') {
                Err(MeasureError::MissingGlyph {
                    ch: 'x',
                    text: s.to_string(),
                })
            } else {
                Ok(1.0)
            }
        };
        assert!(wrap("a b x", 10.0, failing).is_err());
    }
}
