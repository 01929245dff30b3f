use crate::config::{HorizontalPadding, StatementConfig};

/// Marker appended to labels cut short by [`fit_text`].
pub const ELLIPSIS: &str = "...";

/// Maps text to its rendered width in pixels.
pub trait TextMeasure {
    fn measure(&self, text: &str) -> f32;

    /// Width of the first `prefix_len` characters of `text`.
    fn measure_prefix(&self, text: &str, prefix_len: usize) -> f32 {
        let end = text
            .char_indices()
            .nth(prefix_len)
            .map(|(idx, _)| idx)
            .unwrap_or(text.len());
        self.measure(&text[..end])
    }
}

impl<T: TextMeasure + ?Sized> TextMeasure for &T {
    fn measure(&self, text: &str) -> f32 {
        (**self).measure(text)
    }

    fn measure_prefix(&self, text: &str, prefix_len: usize) -> f32 {
        (**self).measure_prefix(text, prefix_len)
    }
}

/// Headless metrics from a calibrated per-character width table.
#[derive(Debug, Clone, Copy)]
pub struct GlyphTable {
    pub font_size: f32,
}

impl GlyphTable {
    pub fn new(font_size: f32) -> Self {
        Self { font_size }
    }
}

impl TextMeasure for GlyphTable {
    fn measure(&self, text: &str) -> f32 {
        text.chars()
            .filter(|ch| *ch != '\n')
            .map(char_width_factor)
            .sum::<f32>()
            * self.font_size
    }
}

/// Every character advances by the same amount.
#[derive(Debug, Clone, Copy)]
pub struct MonospaceMetrics {
    pub char_width: f32,
}

impl TextMeasure for MonospaceMetrics {
    fn measure(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.char_width
    }

    fn measure_prefix(&self, text: &str, prefix_len: usize) -> f32 {
        text.chars().count().min(prefix_len) as f32 * self.char_width
    }
}

pub(crate) fn char_width_factor(ch: char) -> f32 {
    // Advance widths relative to the font size for a Roboto-like sans face.
    match ch {
        ' ' => 0.248,
        '\t' => 0.992,
        '.' | ',' | ':' | ';' | '\'' | '|' | '!' => 0.245,
        '(' | ')' | '[' | ']' | '{' | '}' => 0.342,
        '"' => 0.320,
        '-' => 0.276,
        '>' | '<' | '=' | '+' => 0.505,
        '_' | '/' | '\\' => 0.410,
        '*' => 0.431,
        'A' => 0.652,
        'B' => 0.622,
        'C' => 0.650,
        'D' => 0.655,
        'E' => 0.568,
        'F' => 0.553,
        'G' => 0.681,
        'H' => 0.713,
        'I' => 0.272,
        'J' => 0.552,
        'K' => 0.627,
        'L' => 0.538,
        'M' => 0.873,
        'N' => 0.713,
        'O' => 0.688,
        'P' => 0.631,
        'Q' => 0.688,
        'R' => 0.616,
        'S' => 0.593,
        'T' => 0.597,
        'U' => 0.648,
        'V' => 0.636,
        'W' => 0.887,
        'X' => 0.627,
        'Y' => 0.601,
        'Z' => 0.599,
        'a' => 0.544,
        'b' => 0.561,
        'c' => 0.523,
        'd' => 0.564,
        'e' => 0.530,
        'f' => 0.347,
        'g' => 0.561,
        'h' => 0.551,
        'i' | 'l' => 0.243,
        'j' => 0.239,
        'k' => 0.507,
        'm' => 0.876,
        'n' => 0.552,
        'o' => 0.570,
        'p' => 0.561,
        'q' => 0.568,
        'r' => 0.338,
        's' => 0.515,
        't' => 0.327,
        'u' => 0.551,
        'v' => 0.484,
        'w' => 0.751,
        'x' => 0.496,
        'y' => 0.473,
        'z' => 0.496,
        '0'..='9' => 0.561,
        '@' | '#' | '%' | '&' => 0.880,
        _ => 0.568,
    }
}

/// A label that fits its box, and the width the box commits to.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedText {
    pub text: String,
    pub width: f32,
}

/// Fits `text` between `min_width` and `max_width`.
///
/// Short labels still get `min_width`. Labels that overflow `max_width` are
/// cut to the longest prefix whose padded width stays strictly below
/// `max_width`, minus room for [`ELLIPSIS`], and commit to `max_width`.
///
/// Fitting the output again keeps its text, but a truncated label then
/// measures below `max_width` and reports its natural width instead.
pub fn fit_text<M: TextMeasure + ?Sized>(
    text: &str,
    min_width: f32,
    max_width: f32,
    padding: HorizontalPadding,
    metrics: &M,
) -> FittedText {
    let natural = padding.left + metrics.measure(text) + padding.right;
    if natural <= min_width {
        return FittedText {
            text: text.to_string(),
            width: min_width,
        };
    }
    if natural <= max_width {
        return FittedText {
            text: text.to_string(),
            width: natural,
        };
    }

    let len = text.chars().count();
    let fits = (2..len)
        .rev()
        .find(|&i| padding.left + metrics.measure_prefix(text, i) + padding.right < max_width)
        .unwrap_or(0);
    let kept = fits.saturating_sub(ELLIPSIS.len());
    let mut truncated: String = text.chars().take(kept).collect();
    truncated.push_str(ELLIPSIS);
    tracing::trace!(original = text, truncated = %truncated, "label truncated");
    FittedText {
        text: truncated,
        width: max_width,
    }
}

/// [`fit_text`] with the statement width bounds and padding.
pub fn fit_statement_text<M: TextMeasure + ?Sized>(
    text: &str,
    statement: &StatementConfig,
    metrics: &M,
) -> FittedText {
    fit_text(
        text,
        statement.width,
        statement.max_width,
        statement.padding,
        metrics,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const MONO: MonospaceMetrics = MonospaceMetrics { char_width: 10.0 };
    const PAD: HorizontalPadding = HorizontalPadding {
        left: 5.0,
        right: 5.0,
    };

    #[test]
    fn short_text_gets_min_width() {
        let fitted = fit_text("abc", 100.0, 200.0, PAD, &MONO);
        assert_eq!(fitted.text, "abc");
        assert_eq!(fitted.width, 100.0);
    }

    #[test]
    fn text_exactly_at_min_width_keeps_min() {
        // 9 chars * 10 + 10 padding = 100
        let fitted = fit_text("abcdefghi", 100.0, 200.0, PAD, &MONO);
        assert_eq!(fitted.width, 100.0);
    }

    #[test]
    fn medium_text_gets_natural_width() {
        let fitted = fit_text("abcdefghijklmno", 100.0, 200.0, PAD, &MONO);
        assert_eq!(fitted.text, "abcdefghijklmno");
        assert_eq!(fitted.width, 160.0);
    }

    #[test]
    fn text_exactly_at_max_width_is_not_truncated() {
        // 19 chars * 10 + 10 = 200
        let text = "abcdefghijklmnopqrs";
        let fitted = fit_text(text, 100.0, 200.0, PAD, &MONO);
        assert_eq!(fitted.text, text);
        assert_eq!(fitted.width, 200.0);
    }

    #[test]
    fn long_text_is_truncated_with_ellipsis() {
        // Largest prefix with 10 * i + 10 < 200 is i = 18, keeping 15 chars.
        let text = "abcdefghijklmnopqrstuvwxyz";
        let fitted = fit_text(text, 100.0, 200.0, PAD, &MONO);
        assert_eq!(fitted.text, "abcdefghijklmno...");
        assert_eq!(fitted.width, 200.0);
    }

    #[test]
    fn degenerate_budget_yields_bare_ellipsis() {
        let fitted = fit_text("abcdefgh", 5.0, 15.0, PAD, &MONO);
        assert_eq!(fitted.text, ELLIPSIS);
        assert_eq!(fitted.width, 15.0);
    }

    #[test]
    fn width_never_exceeds_max() {
        for text in ["", "a", "short label", "a considerably longer label than fits"] {
            let fitted = fit_text(text, 50.0, 120.0, PAD, &MONO);
            assert!(fitted.width >= 50.0 && fitted.width <= 120.0, "{text:?}");
        }
    }

    #[test]
    fn refitting_untruncated_output_is_stable() {
        for text in ["x", "medium text", "abcdefghijklmnopqrs"] {
            let first = fit_text(text, 100.0, 200.0, PAD, &MONO);
            let second = fit_text(&first.text, 100.0, 200.0, PAD, &MONO);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn refitting_truncated_output_keeps_text() {
        let first = fit_text("abcdefghijklmnopqrstuvwxyz", 100.0, 200.0, PAD, &MONO);
        assert_eq!(first.width, 200.0);
        let second = fit_text(&first.text, 100.0, 200.0, PAD, &MONO);
        assert_eq!(second.text, first.text);
        // 18 chars at 10px plus 10px padding
        assert_eq!(second.width, 190.0);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let text = "ééééééééééééééééééééééééé";
        let fitted = fit_text(text, 100.0, 200.0, PAD, &MONO);
        assert_eq!(fitted.text.chars().count(), 15 + ELLIPSIS.len());
    }

    #[test]
    fn default_prefix_measure_stops_at_char_boundary() {
        let table = GlyphTable::new(10.0);
        assert_eq!(table.measure_prefix("aé", 1), table.measure("a"));
        assert_eq!(table.measure_prefix("ab", 10), table.measure("ab"));
    }

    #[test]
    fn glyph_table_scales_with_font_size() {
        let w14 = GlyphTable::new(14.0).measure("Hello");
        let w28 = GlyphTable::new(28.0).measure("Hello");
        assert!((w28 - w14 * 2.0).abs() < 0.01);
    }

    #[test]
    fn glyph_widths_are_positive() {
        for ch in ['a', 'Z', ' ', '0', '@', '-', '\u{4e2d}'] {
            assert!(char_width_factor(ch) > 0.0, "char {:?} has zero width", ch);
        }
    }
}
