//! Caption wrapping for the fixed-width text bubble.
//!
//! There is no font-metrics query at this layer, so [`wrap_to_fit`] uses an
//! average glyph width of `0.55 * font_size` to decide where long runs of
//! non-space characters may break. It is an approximation and can both
//! under- and over-estimate real glyph advances. Hosts that can measure text
//! should call [`wrap_to_fit_measured`] with their own [`TextMeasure`].

use crate::geometry::SizePx;

/// Zero-width break opportunity inserted into long runs.
pub const BREAK_MARKER: char = '\u{200B}';

/// Empirical average glyph width as a fraction of the font size.
pub const AVG_GLYPH_WIDTH_RATIO: f32 = 0.55;

/// Fraction of the viewport the bubble may span.
pub const BUBBLE_VIEWPORT_RATIO: f32 = 0.72;

/// Upper bound on the bubble width in pixels.
pub const BUBBLE_MAX_WIDTH: f32 = 320.0;

pub const BUBBLE_PADDING_X: f32 = 12.0;
pub const BUBBLE_PADDING_Y: f32 = 8.0;
pub const LINE_HEIGHT_RATIO: f32 = 1.25;

// ============================================================================
// Sanitizing
// ============================================================================

/// Removes inserted break markers and normalizes control characters.
///
/// Tabs, carriage returns and other control characters become spaces.
/// Newlines are user line breaks and are kept.
pub fn strip_breaks(text: &str) -> String {
    text.chars()
        .filter(|&c| c != BREAK_MARKER)
        .map(|c| if c != '\n' && c.is_control() { ' ' } else { c })
        .collect()
}

// ============================================================================
// Wrapping
// ============================================================================

/// Supplies glyph advances for [`wrap_to_fit_measured`].
pub trait TextMeasure {
    /// Horizontal advance of `ch` at `font_size` pixels.
    fn advance(&self, ch: char, font_size: f32) -> f32;
}

/// The heuristic measure: every glyph is `0.55 * font_size` wide.
#[derive(Debug, Clone, Copy, Default)]
pub struct AverageGlyphWidth;

impl TextMeasure for AverageGlyphWidth {
    fn advance(&self, _ch: char, font_size: f32) -> f32 {
        font_size * AVG_GLYPH_WIDTH_RATIO
    }
}

/// Number of non-space characters allowed between break opportunities.
///
/// Returns `None` when the inputs cannot describe a real layout.
pub fn chars_per_chunk(font_size: f32, max_width: f32) -> Option<usize> {
    if !(font_size > 0.0 && max_width > 0.0) || !font_size.is_finite() || !max_width.is_finite() {
        return None;
    }
    let chunk = (max_width / (font_size * AVG_GLYPH_WIDTH_RATIO)).floor() as usize;
    Some(chunk.max(1))
}

/// Inserts a [`BREAK_MARKER`] every `floor(max_width / (font_size * 0.55))`
/// non-space characters.
///
/// The input is passed through [`strip_breaks`] first, so re-wrapping
/// already wrapped text gives the same result as wrapping it once.
pub fn wrap_to_fit(text: &str, font_size: f32, max_width: f32) -> String {
    let clean = strip_breaks(text);
    let Some(chunk) = chars_per_chunk(font_size, max_width) else {
        return clean;
    };

    let mut out = String::with_capacity(clean.len() + clean.len() / chunk * 3);
    let mut run = 0usize;
    for ch in clean.chars() {
        if ch.is_whitespace() {
            run = 0;
        } else {
            if run == chunk {
                out.push(BREAK_MARKER);
                run = 0;
            }
            run += 1;
        }
        out.push(ch);
    }
    out
}

/// Like [`wrap_to_fit`], but breaks a run where its measured width would
/// exceed `max_width`.
pub fn wrap_to_fit_measured(
    text: &str,
    font_size: f32,
    max_width: f32,
    measure: &impl TextMeasure,
) -> String {
    let clean = strip_breaks(text);
    if chars_per_chunk(font_size, max_width).is_none() {
        return clean;
    }

    let mut out = String::with_capacity(clean.len());
    let mut run_width = 0.0f32;
    let mut run_len = 0usize;
    for ch in clean.chars() {
        if ch.is_whitespace() {
            run_width = 0.0;
            run_len = 0;
        } else {
            let advance = measure.advance(ch, font_size);
            if run_len > 0 && run_width + advance > max_width {
                out.push(BREAK_MARKER);
                run_width = 0.0;
                run_len = 0;
            }
            run_width += advance;
            run_len += 1;
        }
        out.push(ch);
    }
    out
}

// ============================================================================
// Bubble Layout
// ============================================================================

/// Width of the caption bubble for a viewport: `min(viewport * 0.72, 320)`.
pub fn bubble_width(viewport_width: f32) -> f32 {
    (viewport_width * BUBBLE_VIEWPORT_RATIO).min(BUBBLE_MAX_WIDTH).max(0.0)
}

/// A wrapped caption and the estimated size of its bubble.
#[derive(Debug, Clone, PartialEq)]
pub struct BubbleLayout {
    /// Caption with break markers inserted.
    pub text: String,
    pub size: SizePx,
    pub line_count: usize,
}

/// Wraps a caption for the bubble and estimates the bubble's size.
///
/// Line count is derived from the same average glyph width the wrap uses;
/// the height is `lines * font_size * 1.25` plus vertical padding.
pub fn layout_bubble(text: &str, font_size: f32, viewport_width: f32) -> BubbleLayout {
    let width = bubble_width(viewport_width);
    let inner = (width - 2.0 * BUBBLE_PADDING_X).max(0.0);
    let wrapped = wrap_to_fit(text, font_size, inner);

    let line_count = match chars_per_chunk(font_size, inner) {
        Some(per_line) => strip_breaks(&wrapped)
            .split('\n')
            .map(|line| line.chars().count().div_ceil(per_line).max(1))
            .sum(),
        None => 1,
    };

    let height =
        line_count as f32 * font_size.max(0.0) * LINE_HEIGHT_RATIO + 2.0 * BUBBLE_PADDING_Y;
    BubbleLayout {
        text: wrapped,
        size: SizePx::new(width, height),
        line_count,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn markers(text: &str) -> usize {
        text.chars().filter(|&c| c == BREAK_MARKER).count()
    }

    #[test]
    fn strip_removes_markers_and_control_chars() {
        let raw = format!("ab{BREAK_MARKER}cd\tef\r\ngh");
        assert_eq!(strip_breaks(&raw), "abcd ef \ngh");
    }

    #[test]
    fn chunk_size_uses_average_glyph_width() {
        // 111 / (20 * 0.55) = 10.09
        assert_eq!(chars_per_chunk(20.0, 111.0), Some(10));
        // Narrower than one glyph still allows one character per chunk.
        assert_eq!(chars_per_chunk(20.0, 5.0), Some(1));
        assert_eq!(chars_per_chunk(0.0, 100.0), None);
        assert_eq!(chars_per_chunk(16.0, -1.0), None);
    }

    #[test]
    fn long_runs_get_break_opportunities() {
        let wrapped = wrap_to_fit("abcdefghijklmnopqrstuvwxy", 20.0, 111.0);
        assert_eq!(markers(&wrapped), 2);
        assert_eq!(
            wrapped,
            format!("abcdefghij{BREAK_MARKER}klmnopqrst{BREAK_MARKER}uvwxy")
        );
    }

    #[test]
    fn spaces_reset_the_run() {
        let wrapped = wrap_to_fit("hello world again", 20.0, 111.0);
        assert_eq!(markers(&wrapped), 0);
    }

    #[test]
    fn exact_multiple_has_no_trailing_marker() {
        let wrapped = wrap_to_fit("abcdefghij", 20.0, 111.0);
        assert_eq!(wrapped, "abcdefghij");
    }

    #[test]
    fn rewrap_after_strip_is_idempotent() {
        let samples = [
            "supercalifragilisticexpialidocious and more",
            "tabs\tand\rreturns\nline two withaverylongwordinside",
            "",
            "  leading and trailing  ",
            "emoji🙂🙂🙂🙂🙂🙂🙂🙂🙂🙂🙂🙂🙂🙂",
        ];
        for text in samples {
            for (font, width) in [(16.0, 200.0), (24.0, 80.0), (12.0, 30.0)] {
                let once = wrap_to_fit(text, font, width);
                let again = wrap_to_fit(&strip_breaks(&once), font, width);
                assert_eq!(once, again, "text {text:?} font {font} width {width}");
                assert_eq!(wrap_to_fit(&once, font, width), once);
            }
        }
    }

    #[test]
    fn invalid_geometry_returns_sanitized_text() {
        assert_eq!(wrap_to_fit("a\tb", 0.0, 100.0), "a b");
    }

    #[test]
    fn measured_wrap_matches_heuristic_for_average_widths() {
        let text = "abcdefghijklmnopqrstuvwxyz0123456789";
        assert_eq!(
            wrap_to_fit_measured(text, 20.0, 100.0, &AverageGlyphWidth),
            wrap_to_fit(text, 20.0, 100.0)
        );
    }

    #[test]
    fn measured_wrap_respects_narrow_glyphs() {
        struct Narrow;
        impl TextMeasure for Narrow {
            fn advance(&self, ch: char, font_size: f32) -> f32 {
                if ch == 'i' { font_size * 0.25 } else { font_size * 0.5 }
            }
        }
        // 40px fits eight 'i' glyphs at 20px but only four 'm' glyphs.
        let wrapped = wrap_to_fit_measured("iiiiiiiiii", 20.0, 40.0, &Narrow);
        assert_eq!(wrapped, format!("iiiiiiii{BREAK_MARKER}ii"));
        let wrapped = wrap_to_fit_measured("mmmmmm", 20.0, 40.0, &Narrow);
        assert_eq!(wrapped, format!("mmmm{BREAK_MARKER}mm"));
    }

    #[test]
    fn bubble_width_policy() {
        assert!((bubble_width(300.0) - 216.0).abs() < 1e-3);
        assert_eq!(bubble_width(1024.0), 320.0);
        assert_eq!(bubble_width(-10.0), 0.0);
    }

    #[test]
    fn bubble_height_grows_with_lines() {
        let short = layout_bubble("hi", 18.0, 390.0);
        let long = layout_bubble(&"word ".repeat(40), 18.0, 390.0);
        assert_eq!(short.line_count, 1);
        assert!(long.line_count > 1);
        assert!(long.size.height > short.size.height);
        assert_eq!(short.size.width, bubble_width(390.0));
    }
}
