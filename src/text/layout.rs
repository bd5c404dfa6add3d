use smallvec::SmallVec;

use crate::text::typeface::{TextAttrs, Typeface};

/// Line-height multiplier over the font size.
pub const LINE_HEIGHT_FACTOR: f32 = 1.2;

/// A wrapped caption: ordered lines plus the metrics the painter needs.
///
/// Recomputed on every redraw from the caption text, font attributes and
/// maximum width; never cached across font or width changes.
#[derive(Clone, Debug, Default)]
pub struct TextLayout {
    /// Wrapped lines in paint order. Blank paragraphs survive as empty lines.
    pub lines: SmallVec<[String; 4]>,
    /// Vertical distance between line baselines, `size_px * 1.2`.
    pub line_height: f32,
    /// Measured width of the widest line.
    pub max_line_width: f32,
}

impl TextLayout {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Split `text` on explicit newlines, word-wrap each paragraph to
/// `max_width`, and measure the result.
///
/// Wrapping is greedy: words are packed into the current line until adding
/// the next one would exceed `max_width`. A single word wider than
/// `max_width` is not split; it overflows on its own line.
pub fn layout_caption(
    text: &str,
    max_width: f32,
    typeface: &dyn Typeface,
    attrs: &TextAttrs,
) -> TextLayout {
    let mut lines: SmallVec<[String; 4]> = SmallVec::new();

    for paragraph in text.split('\n') {
        if paragraph.trim().is_empty() {
            lines.push(String::new());
        } else {
            wrap_paragraph(paragraph, max_width, typeface, attrs, &mut lines);
        }
    }

    let max_line_width = lines
        .iter()
        .map(|l| typeface.measure_line(l, attrs))
        .fold(0.0f32, f32::max);

    TextLayout {
        lines,
        line_height: attrs.size_px * LINE_HEIGHT_FACTOR,
        max_line_width,
    }
}

fn wrap_paragraph(
    paragraph: &str,
    max_width: f32,
    typeface: &dyn Typeface,
    attrs: &TextAttrs,
    out: &mut SmallVec<[String; 4]>,
) {
    let mut current = String::new();

    for word in paragraph.split(' ') {
        let test = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if typeface.measure_line(&test, attrs) > max_width && !current.is_empty() {
            out.push(std::mem::take(&mut current));
            current = word.to_string();
        } else {
            current = test;
        }
    }

    if !current.is_empty() {
        out.push(current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::typeface::LineRaster;

    /// Fixed-advance typeface: every char is `advance` px wide.
    struct FixedAdvance {
        advance: f32,
    }

    impl Typeface for FixedAdvance {
        fn measure_line(&self, text: &str, _attrs: &TextAttrs) -> f32 {
            text.chars().count() as f32 * self.advance
        }

        fn raster_line(&self, _text: &str, _attrs: &TextAttrs) -> LineRaster {
            LineRaster::default()
        }
    }

    const TEN: FixedAdvance = FixedAdvance { advance: 10.0 };

    #[test]
    fn explicit_newlines_split_first() {
        let layout = layout_caption("Hello\nWorld", 1000.0, &TEN, &TextAttrs::new(28.0));
        assert_eq!(layout.lines.as_slice(), ["Hello", "World"]);
        assert!((layout.line_height - 33.6).abs() < 1e-5);
        assert!((layout.max_line_width - 50.0).abs() < 1e-5);
    }

    #[test]
    fn blank_paragraphs_become_empty_lines() {
        let layout = layout_caption("a\n\nb", 1000.0, &TEN, &TextAttrs::new(20.0));
        assert_eq!(layout.lines.as_slice(), ["a", "", "b"]);
    }

    #[test]
    fn greedy_wrap_packs_words() {
        // "aaa bbb" is 70px; limit 75 keeps it on one line, limit 65 splits.
        let attrs = TextAttrs::new(16.0);
        let one = layout_caption("aaa bbb", 75.0, &TEN, &attrs);
        assert_eq!(one.lines.as_slice(), ["aaa bbb"]);
        let two = layout_caption("aaa bbb", 65.0, &TEN, &attrs);
        assert_eq!(two.lines.as_slice(), ["aaa", "bbb"]);
    }

    #[test]
    fn wrapped_lines_never_exceed_max_width_except_long_words() {
        let attrs = TextAttrs::new(16.0);
        let text = "one two three four five six seven eight nine ten supercalifragilistic";
        let max_width = 80.0;
        let layout = layout_caption(text, max_width, &TEN, &attrs);
        for line in &layout.lines {
            let single_word = !line.contains(' ');
            let w = TEN.measure_line(line, &attrs);
            assert!(
                w <= max_width || single_word,
                "line '{line}' is {w}px wide against a {max_width}px limit"
            );
        }
    }

    #[test]
    fn oversized_single_word_overflows_unsplit() {
        let layout = layout_caption("abcdefghij", 30.0, &TEN, &TextAttrs::new(16.0));
        assert_eq!(layout.lines.as_slice(), ["abcdefghij"]);
        assert!(layout.max_line_width > 30.0);
    }

    #[test]
    fn empty_text_yields_single_blank_line() {
        let layout = layout_caption("", 100.0, &TEN, &TextAttrs::new(16.0));
        assert_eq!(layout.lines.as_slice(), [""]);
    }
}
