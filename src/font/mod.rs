use std::ops::Mul;

use thiserror::Error;
use ttf_parser::{name_id, Face};

use crate::document::{FontWeight, Style};

use self::standard::StandardFont;

mod generate;
pub mod standard;

/// A TrueType face that gets embedded into the output.
pub struct Font<'a> {
    pub face: Face<'a>,
    pub ps_name: String,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub ascent: f32,
    pub descent: f32,
    pub line_gap: f32,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to parse face: {0}")]
    FaceParsing(#[from] ttf_parser::FaceParsingError),
    #[error("missing post script name")]
    MissingPostScriptName,
    #[error("non-unicode string")]
    NonUnicodeString,
}

/// The pair of faces a resume is set in.
pub enum Typeface<'a> {
    /// Helvetica and Helvetica-Bold, referenced by name.
    Standard,
    Embedded { regular: Font<'a>, bold: Font<'a> },
}

impl<'a> Font<'a> {
    pub fn new(data: &'a [u8]) -> Result<Self, Error> {
        let face = Face::parse(data, 0)?;

        // Fonts often list a Mac Roman record before the Unicode ones.
        let mut ps_names = face
            .names()
            .into_iter()
            .filter(|name| name.name_id == name_id::POST_SCRIPT_NAME)
            .peekable();
        if ps_names.peek().is_none() {
            return Err(Error::MissingPostScriptName);
        }
        let ps_name = ps_names
            .find_map(|name| name.to_string())
            .ok_or(Error::NonUnicodeString)?;

        Ok(Self { face, ps_name })
    }

    /// Converts from font units to thousanths of an em.
    pub fn to_milli_em(&self, units: i16) -> i32 {
        1000 * units as i32 / self.face.units_per_em() as i32
    }

    pub fn metrics(&self) -> TextMetrics {
        let scale = 1.0 / self.face.units_per_em() as f32;
        TextMetrics {
            ascent: self.face.ascender() as f32 * scale,
            descent: self.face.descender() as f32 * scale,
            line_gap: self.face.line_gap() as f32 * scale,
        }
    }

    /// Advance width of `c` in font units. Tabs measure as spaces and missing
    /// glyphs fall back to `.notdef`.
    pub fn advance(&self, c: char) -> u16 {
        let c = if c == '\t' { ' ' } else { c };
        let glyph_id = self.face.glyph_index(c).unwrap_or_default();
        self.face.glyph_hor_advance(glyph_id).unwrap_or(0)
    }

    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| self.advance(c) as u32).sum();
        units as f32 * font_size / self.face.units_per_em() as f32
    }
}

impl<'a> Typeface<'a> {
    pub fn text_width(&self, text: &str, style: Style) -> f32 {
        match self.embedded(style.weight) {
            Some(font) => font.text_width(text, style.font_size),
            None => StandardFont::for_weight(style.weight).text_width(text, style.font_size),
        }
    }

    pub fn metrics(&self, weight: FontWeight) -> TextMetrics {
        match self.embedded(weight) {
            Some(font) => font.metrics(),
            None => StandardFont::for_weight(weight).metrics(),
        }
    }

    /// Name of the page resource the weight is registered under.
    pub fn resource_name(weight: FontWeight) -> &'static str {
        match weight {
            FontWeight::Regular => "F1",
            FontWeight::Bold => "F2",
        }
    }

    pub fn embedded(&self, weight: FontWeight) -> Option<&Font<'a>> {
        match (self, weight) {
            (Self::Standard, _) => None,
            (Self::Embedded { regular, .. }, FontWeight::Regular) => Some(regular),
            (Self::Embedded { bold, .. }, FontWeight::Bold) => Some(bold),
        }
    }
}

impl StandardFont {
    pub fn for_weight(weight: FontWeight) -> Self {
        match weight {
            FontWeight::Regular => Self::Helvetica,
            FontWeight::Bold => Self::HelveticaBold,
        }
    }
}

impl TextMetrics {
    pub fn line_height(&self) -> f32 {
        self.line_gap + self.ascent - self.descent
    }
}

impl Mul<f32> for TextMetrics {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self {
            ascent: self.ascent * rhs,
            descent: self.descent * rhs,
            line_gap: self.line_gap * rhs,
        }
    }
}
