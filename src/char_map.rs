use crate::{document::Page, error::Error};

/// Defines a mapping from document-specific character numbers to Unicode code points.
///
/// Embedded fonts are addressed with single-byte codes, so a document can use
/// at most 256 distinct characters (code 0 is reserved).
#[derive(Debug, Clone, PartialEq)]
pub struct CharMap {
    pub mappings: Vec<char>,
}

impl CharMap {
    pub fn from_pages(pages: &[Page]) -> Result<Self, Error> {
        let mut char_map = Self {
            mappings: vec!['\0'],
        };
        for page in pages {
            for text in page.texts() {
                for c in text.chars() {
                    char_map.insert(c)?;
                }
            }
        }
        Ok(char_map)
    }

    pub fn insert(&mut self, c: char) -> Result<u8, Error> {
        if let Some(code) = self.get(c) {
            return Ok(code);
        }
        if self.mappings.len() > u8::MAX as usize {
            return Err(Error::CharMapFull(c));
        }
        self.mappings.push(c);
        Ok((self.mappings.len() - 1) as u8)
    }

    pub fn get(&self, c: char) -> Option<u8> {
        self.mappings.iter().position(|&x| x == c).map(|x| x as u8)
    }
}
