use std::{iter, str::Split};

use glam::{vec2, Vec2};

use crate::{
    config::{LineAdvance, RenderConfig},
    document::{Page, PlacedLine, Style, TextAlign},
    error::Diagnostic,
    font::Typeface,
};

/// Vertical write position, measured downwards from the top edge of the page.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct RenderCursor {
    pub y: f32,
    pub page_index: usize,
}

/// Places lines one after another, breaking pages when a line would cross the
/// bottom margin.
pub struct TextFlow<'t, 'a> {
    typeface: &'t Typeface<'a>,
    page_size: Vec2,
    margin: f32,
    line_advance: LineAdvance,
    max_pages: usize,
    cursor: RenderCursor,
    pages: Vec<Page>,
    dropped_lines: usize,
}

/// The result of flowing a document: positioned lines, split into pages.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub pages: Vec<Page>,
    pub page_size: Vec2,
    pub diagnostics: Vec<Diagnostic>,
}

/// Anything that can measure the rendered width of a run of text.
pub trait Measure {
    fn text_width(&self, text: &str) -> f32;
}

impl<F: Fn(&str) -> f32> Measure for F {
    fn text_width(&self, text: &str) -> f32 {
        self(text)
    }
}

/// Measures text in one face of a typeface.
#[derive(Clone, Copy)]
pub struct StyledFace<'t, 'a> {
    pub typeface: &'t Typeface<'a>,
    pub style: Style,
}

impl Measure for StyledFace<'_, '_> {
    fn text_width(&self, text: &str) -> f32 {
        self.typeface.text_width(text, self.style)
    }
}

impl<'t, 'a> TextFlow<'t, 'a> {
    pub fn new(typeface: &'t Typeface<'a>, config: &RenderConfig) -> Self {
        Self {
            typeface,
            page_size: config.page_size.dimensions(),
            margin: config.margin,
            line_advance: config.line_advance,
            max_pages: config.max_pages,
            cursor: RenderCursor {
                y: config.margin,
                page_index: 0,
            },
            pages: vec![Page::default()],
            dropped_lines: 0,
        }
    }

    pub fn cursor(&self) -> RenderCursor {
        self.cursor
    }

    fn bottom(&self) -> f32 {
        self.page_size.y - self.margin
    }

    /// Places a single line at the cursor, starting a new page first if the
    /// line does not fit above the bottom margin.
    pub fn emit_line(&mut self, text: &str, style: Style, align: TextAlign) {
        debug_assert!(style.font_size > 0.0, "font size must be positive");

        if self.dropped_lines > 0 {
            self.dropped_lines += 1;
            return;
        }

        // A line taller than the printable area goes on the page it starts on.
        let page_has_lines = !self.pages[self.cursor.page_index].lines.is_empty();
        if self.cursor.y + style.font_size > self.bottom() && page_has_lines && !self.new_page() {
            self.dropped_lines += 1;
            return;
        }

        let text = text.replace('\t', " ");
        let width = self.typeface.text_width(&text, style);
        // Lines wider than the page start at the left margin.
        let x = match align {
            TextAlign::Left => self.margin,
            TextAlign::Center => ((self.page_size.x - width) / 2.0).max(self.margin),
        };

        self.pages[self.cursor.page_index].lines.push(PlacedLine {
            text,
            style,
            origin: vec2(x, self.cursor.y),
            width,
        });

        self.skip(self.line_advance.advance(style.font_size));
    }

    /// Moves the cursor by `gap`, keeping it between the top and bottom margins.
    ///
    /// Once the cursor is within a font size of the bottom no line fits, so
    /// clamping does not change where the next page starts.
    pub fn skip(&mut self, gap: f32) {
        self.cursor.y = (self.cursor.y + gap).max(self.margin).min(self.bottom());
    }

    /// Wraps `text` to `max_width` in the given style.
    pub fn wrap_text<'s>(
        &self,
        text: &'s str,
        style: Style,
        max_width: f32,
    ) -> WrapLines<'s, StyledFace<'t, 'a>> {
        let measure = StyledFace {
            typeface: self.typeface,
            style,
        };
        wrap_text(text, max_width, measure)
    }

    /// Wraps `text` and places every resulting line.
    pub fn emit_wrapped(&mut self, text: &str, style: Style, align: TextAlign, max_width: f32) {
        for line in self.wrap_text(text, style, max_width) {
            self.emit_line(line, style, align);
        }
    }

    fn new_page(&mut self) -> bool {
        if self.pages.len() >= self.max_pages {
            return false;
        }

        self.pages.push(Page::default());
        self.cursor = RenderCursor {
            y: self.margin,
            page_index: self.pages.len() - 1,
        };
        log::debug!("starting page {}", self.cursor.page_index + 1);
        true
    }

    pub fn finish(self) -> Layout {
        let mut diagnostics = Vec::new();
        if self.dropped_lines > 0 {
            let diagnostic = Diagnostic::RenderOverflow {
                max_pages: self.max_pages,
                dropped_lines: self.dropped_lines,
            };
            log::warn!("{diagnostic}");
            diagnostics.push(diagnostic);
        }

        Layout {
            pages: self.pages,
            page_size: self.page_size,
            diagnostics,
        }
    }
}

/// Lines of wrapped text, produced on demand.
///
/// Newlines in the input start new paragraphs and a blank paragraph yields an
/// empty line. Words are never split unless a single word is wider than the
/// wrap width, in which case it is broken between characters.
pub struct WrapLines<'s, M> {
    paragraphs: Option<Split<'s, char>>,
    rest: Option<&'s str>,
    measure: M,
    max_width: f32,
}

pub fn wrap_text<M: Measure>(text: &str, max_width: f32, measure: M) -> WrapLines<'_, M> {
    let text = text.trim();
    WrapLines {
        paragraphs: (!text.is_empty()).then(|| text.split('\n')),
        rest: None,
        measure,
        max_width,
    }
}

impl<'s, M: Measure> Iterator for WrapLines<'s, M> {
    type Item = &'s str;

    fn next(&mut self) -> Option<&'s str> {
        loop {
            let paragraph = match self.rest.take() {
                Some(rest) => rest.trim_start(),
                None => {
                    let paragraph = self.paragraphs.as_mut()?.next()?.trim();
                    if paragraph.is_empty() {
                        return Some(paragraph);
                    }
                    paragraph
                }
            };
            if paragraph.is_empty() {
                continue;
            }

            let (line, rest) = paragraph.split_at(self.line_end(paragraph));
            self.rest = Some(rest);
            return Some(line);
        }
    }
}

impl<M: Measure> WrapLines<'_, M> {
    /// Byte offset where the line starting at `paragraph` ends.
    fn line_end(&self, paragraph: &str) -> usize {
        let mut end = 0;
        for word_end in word_ends(paragraph) {
            if self.measure.text_width(&paragraph[..word_end]) > self.max_width {
                break;
            }
            end = word_end;
        }

        if end == 0 {
            end = self.split_word(paragraph);
        }
        end
    }

    /// The longest prefix that fits, but at least one character.
    fn split_word(&self, word: &str) -> usize {
        let mut end = 0;
        for (i, c) in word.char_indices() {
            let next = i + c.len_utf8();
            if end > 0 && self.measure.text_width(&word[..next]) > self.max_width {
                break;
            }
            end = next;
        }
        end
    }
}

/// Byte offsets just past the end of each whitespace-separated word.
fn word_ends(text: &str) -> impl Iterator<Item = usize> + '_ {
    let mut chars = text.char_indices().peekable();
    iter::from_fn(move || {
        while let Some((i, c)) = chars.next() {
            if c.is_whitespace() {
                continue;
            }
            match chars.peek() {
                Some(&(_, next)) if !next.is_whitespace() => continue,
                _ => return Some(i + c.len_utf8()),
            }
        }
        None
    })
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use crate::{
        config::{LineAdvance, PageSize, RenderConfig},
        document::{Style, TextAlign},
        error::Diagnostic,
        font::Typeface,
        text_layout::{word_ends, wrap_text, TextFlow},
    };

    /// Every character is 5 units wide.
    fn monospace(text: &str) -> f32 {
        text.chars().count() as f32 * 5.0
    }

    fn small_page() -> RenderConfig {
        RenderConfig {
            page_size: PageSize::Custom {
                width: 200.0,
                height: 100.0,
            },
            margin: 10.0,
            line_advance: LineAdvance::Fixed { decrement: 2.0 },
            ..RenderConfig::default()
        }
    }

    #[test]
    fn test_word_ends() {
        assert_eq!(word_ends("ab  cd e").collect::<Vec<_>>(), [2, 6, 8]);
        assert_eq!(word_ends("  ").count(), 0);
        assert_eq!(word_ends("héllo wörld").collect::<Vec<_>>(), [6, 13]);
    }

    #[test]
    fn test_wrap_respects_width() {
        let text = "The quick brown fox jumps over the lazy dog and keeps running \
                    until the end of the paragraph is reached";
        let lines = wrap_text(text, 60.0, monospace).collect::<Vec<_>>();

        assert!(lines.len() > 1);
        for line in &lines {
            assert!(monospace(line) <= 60.0, "{line:?} is too wide");
        }
        assert_eq!(lines.iter().join(" "), text.split_whitespace().join(" "));
    }

    #[test]
    fn test_wrap_normalises_whitespace() {
        let text = "  Go,   SQL,\tRust  ";
        let lines = wrap_text(text, 1000.0, monospace).collect::<Vec<_>>();
        assert_eq!(lines, ["Go,   SQL,\tRust"]);
        assert_eq!(
            lines.iter().join(" ").split_whitespace().join(" "),
            "Go, SQL, Rust"
        );
    }

    #[test]
    fn test_wrap_paragraphs() {
        let lines = wrap_text("English\n\nGerman\r\nFrench\n", 1000.0, monospace).collect::<Vec<_>>();
        assert_eq!(lines, ["English", "", "German", "French"]);
    }

    #[test]
    fn test_wrap_empty() {
        assert_eq!(wrap_text("", 100.0, monospace).count(), 0);
        assert_eq!(wrap_text(" \n \n", 100.0, monospace).count(), 0);
    }

    #[test]
    fn test_wrap_long_word() {
        let lines = wrap_text("abcdefghij xy", 20.0, monospace).collect::<Vec<_>>();
        assert_eq!(lines, ["abcd", "efgh", "ij", "xy"]);

        // A single character wider than the limit still makes progress.
        let lines = wrap_text("abc", 1.0, monospace).collect::<Vec<_>>();
        assert_eq!(lines, ["a", "b", "c"]);
    }

    #[test]
    fn test_emit_line_advances_cursor() {
        let typeface = Typeface::Standard;
        let config = small_page();
        let mut flow = TextFlow::new(&typeface, &config);

        assert_eq!(flow.cursor().y, 10.0);
        flow.emit_line("Jane Doe", Style::bold(14.0), TextAlign::Left);
        assert_eq!(flow.cursor().y, 22.0);
        flow.emit_line("jane@example.com", Style::regular(10.0), TextAlign::Left);
        assert_eq!(flow.cursor().y, 30.0);

        let layout = flow.finish();
        assert_eq!(layout.pages.len(), 1);
        assert_eq!(layout.pages[0].lines[0].origin.x, 10.0);
        assert_eq!(layout.pages[0].lines[1].origin.y, 22.0);
    }

    #[test]
    fn test_center_alignment() {
        let typeface = Typeface::Standard;
        let config = small_page();
        let mut flow = TextFlow::new(&typeface, &config);

        flow.emit_line("Jane Doe", Style::bold(14.0), TextAlign::Center);
        let layout = flow.finish();
        let line = &layout.pages[0].lines[0];
        assert!((line.origin.x * 2.0 + line.width - 200.0).abs() < 1e-3);
    }

    #[test]
    fn test_negative_gap_stops_at_top_margin() {
        let typeface = Typeface::Standard;
        let config = small_page();
        let mut flow = TextFlow::new(&typeface, &config);

        flow.emit_line("Jane Doe", Style::bold(14.0), TextAlign::Left);
        flow.skip(-100.0);
        assert_eq!(flow.cursor().y, 10.0);
        flow.skip(f32::INFINITY);
        assert_eq!(flow.cursor().y, 90.0);
    }

    #[test]
    fn test_wide_centred_line_starts_at_margin() {
        let typeface = Typeface::Standard;
        let config = small_page();
        let mut flow = TextFlow::new(&typeface, &config);

        let name = "Jane Alexandra Montgomery-Fitzwilliam Doe";
        flow.emit_line(name, Style::bold(14.0), TextAlign::Center);
        let layout = flow.finish();
        let line = &layout.pages[0].lines[0];
        assert!(line.width > 200.0);
        assert_eq!(line.origin.x, 10.0);
    }

    #[test]
    fn test_tabs_are_placed_as_spaces() {
        let typeface = Typeface::Standard;
        let config = small_page();
        let mut flow = TextFlow::new(&typeface, &config);

        flow.emit_line("Go,\tSQL", Style::regular(10.0), TextAlign::Left);
        let layout = flow.finish();
        let line = &layout.pages[0].lines[0];
        assert_eq!(line.text, "Go, SQL");
        assert_eq!(line.width, typeface.text_width("Go, SQL", Style::regular(10.0)));
    }

    #[test]
    fn test_cursor_stays_within_margins() {
        let typeface = Typeface::Standard;
        for line_advance in [
            LineAdvance::Fixed { decrement: 2.0 },
            LineAdvance::Relative { factor: 1.5 },
        ] {
            let config = RenderConfig {
                line_advance,
                ..small_page()
            };
            let mut flow = TextFlow::new(&typeface, &config);

            for i in 0..40 {
                let size = [8.0, 12.0, 14.0][i % 3];
                flow.emit_line("line", Style::regular(size), TextAlign::Left);
                let y = flow.cursor().y;
                assert!((10.0..=90.0).contains(&y), "cursor at {y}");
            }

            let layout = flow.finish();
            assert!(layout.pages.len() > 1);
            for line in layout.pages.iter().flat_map(|page| &page.lines) {
                assert!(line.origin.y >= 10.0);
                assert!(line.origin.y + line.style.font_size <= 90.0);
            }
        }
    }

    #[test]
    fn test_page_break_resets_cursor() {
        let typeface = Typeface::Standard;
        let config = small_page();
        let mut flow = TextFlow::new(&typeface, &config);

        // 10 + 7 * 10 = 80; the eighth line would end at 92 > 90.
        for _ in 0..7 {
            flow.emit_line("x", Style::regular(12.0), TextAlign::Left);
        }
        assert_eq!(flow.cursor().page_index, 0);
        flow.emit_line("y", Style::regular(12.0), TextAlign::Left);
        assert_eq!(flow.cursor().page_index, 1);
        assert_eq!(flow.cursor().y, 20.0);

        let layout = flow.finish();
        assert_eq!(layout.pages[0].lines.len(), 7);
        assert_eq!(layout.pages[1].lines[0].text, "y");
        assert_eq!(layout.pages[1].lines[0].origin.y, 10.0);
    }

    #[test]
    fn test_overflow_is_capped() {
        let typeface = Typeface::Standard;
        let config = RenderConfig {
            max_pages: 2,
            ..small_page()
        };
        let mut flow = TextFlow::new(&typeface, &config);

        for _ in 0..20 {
            flow.emit_line("x", Style::regular(12.0), TextAlign::Left);
        }

        let layout = flow.finish();
        assert_eq!(layout.pages.len(), 2);
        assert_eq!(
            layout.diagnostics,
            [Diagnostic::RenderOverflow {
                max_pages: 2,
                dropped_lines: 6,
            }]
        );
    }

    #[test]
    fn test_wrap_in_flow_uses_style() {
        let typeface = Typeface::Standard;
        let config = small_page();
        let flow = TextFlow::new(&typeface, &config);

        let text = "Maintained Maintained Maintained";
        let regular = flow.wrap_text(text, Style::regular(10.0), 105.0).count();
        let bold = flow.wrap_text(text, Style::bold(10.0), 105.0).count();
        assert_eq!(regular, 2);
        assert_eq!(bold, 3);
    }
}
