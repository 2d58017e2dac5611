use glam::Vec2;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

/// Per-line text style. Passed explicitly with every line so there is no
/// "current font" carried between calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub weight: FontWeight,
    pub font_size: f32,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Page {
    pub lines: Vec<PlacedLine>,
}

/// A line of text fixed on a page.
///
/// `origin.y` is the top of the line box measured downwards from the top edge
/// of the page; the PDF writer flips it into PDF space.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub style: Style,
    pub origin: Vec2,
    pub width: f32,
}

impl Style {
    pub const fn regular(font_size: f32) -> Self {
        Self {
            weight: FontWeight::Regular,
            font_size,
        }
    }

    pub const fn bold(font_size: f32) -> Self {
        Self {
            weight: FontWeight::Bold,
            font_size,
        }
    }
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|line| line.text.as_str())
    }
}
