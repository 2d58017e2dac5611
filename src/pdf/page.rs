use std::{collections::BTreeSet, fmt, io::Write};

use crate::{
    char_map::CharMap,
    document::PlacedLine,
    error::{Diagnostic, Error},
    font::{
        standard::{win_ansi, REPLACEMENT},
        Typeface,
    },
};

pub struct PageBuilder {
    content: Vec<u8>,
    page_height: f32,
}

/// Turns text into the byte codes of the page fonts.
pub enum TextEncoder<'a> {
    WinAnsi { unsupported: BTreeSet<char> },
    Mapped(&'a CharMap),
}

/// Formats bytes as a PDF hex string.
pub struct HexStr<'a>(pub &'a [u8]);

impl fmt::Display for HexStr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<")?;
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        write!(f, ">")
    }
}

impl PageBuilder {
    pub fn new(page_height: f32) -> Self {
        Self {
            content: Vec::new(),
            page_height,
        }
    }

    /// Shows one line. `ascent` is the font's ascent in ems, used to put the
    /// baseline below the top of the line box.
    pub fn line(&mut self, line: &PlacedLine, ascent: f32, encoded: &[u8]) -> Result<(), Error> {
        let font_size = line.style.font_size;
        let x = line.origin.x;
        let y = self.page_height - line.origin.y - ascent * font_size;

        writeln!(self.content, "BT")?;
        writeln!(
            self.content,
            "/{font} {font_size} Tf",
            font = Typeface::resource_name(line.style.weight),
        )?;
        writeln!(self.content, "{x:.2} {y:.2} Td")?;
        writeln!(self.content, "{} Tj", HexStr(encoded))?;
        writeln!(self.content, "ET")?;
        Ok(())
    }

    pub fn build(self) -> Vec<u8> {
        self.content
    }
}

impl<'a> TextEncoder<'a> {
    pub fn for_char_map(char_map: Option<&'a CharMap>) -> Self {
        match char_map {
            Some(char_map) => Self::Mapped(char_map),
            None => Self::WinAnsi {
                unsupported: BTreeSet::new(),
            },
        }
    }

    pub fn encode(&mut self, text: &str) -> Vec<u8> {
        match self {
            Self::WinAnsi { unsupported } => text
                .chars()
                .map(|c| {
                    win_ansi(c).unwrap_or_else(|| {
                        unsupported.insert(c);
                        REPLACEMENT
                    })
                })
                .collect(),
            // The map is built from the same pages, so every character is present.
            Self::Mapped(char_map) => text.chars().filter_map(|c| char_map.get(c)).collect(),
        }
    }

    /// Characters that had to be replaced, one report each.
    pub fn finish(self) -> Vec<Diagnostic> {
        match self {
            Self::WinAnsi { unsupported } => unsupported
                .into_iter()
                .map(|character| {
                    let diagnostic = Diagnostic::UnsupportedCharacter { character };
                    log::warn!("{diagnostic}");
                    diagnostic
                })
                .collect(),
            Self::Mapped(_) => Vec::new(),
        }
    }
}
