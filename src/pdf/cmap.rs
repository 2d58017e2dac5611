use std::fmt::{self, Write};

use crate::{char_map::CharMap, error::Error};

use super::{PDFBuilder, Ref};

/// `beginbfchar` blocks may hold at most 100 entries.
const MAX_BFCHAR_ENTRIES: usize = 100;

impl PDFBuilder {
    /// Writes the `ToUnicode` CMap that lets viewers extract text set with `char_map` codes.
    pub(super) fn to_unicode(&mut self, char_map: &CharMap) -> Result<Ref, Error> {
        let mut cmap = String::new();
        write_cmap(&mut cmap, char_map)?;

        self.stream_object(cmap.as_bytes(), "")
    }
}

fn write_cmap(s: &mut String, char_map: &CharMap) -> Result<(), fmt::Error> {
    // Copied from LibreOffice output
    writeln!(s, "/CIDInit /ProcSet findresource begin")?;
    writeln!(s, "12 dict begin")?;
    writeln!(s, "begincmap")?;
    writeln!(s, "/CIDSystemInfo<<")?;
    writeln!(s, "/Registry (Adobe)")?;
    writeln!(s, "/Ordering (UCS)")?;
    writeln!(s, "/Supplement 0")?;
    writeln!(s, ">> def")?;
    writeln!(s, "/CMapName /Adobe-Identity-UCS def")?;
    writeln!(s, "/CMapType 2 def")?;
    writeln!(s, "1 begincodespacerange")?;
    writeln!(s, "<00> <FF>")?;
    writeln!(s, "endcodespacerange")?;

    for (block, chars) in char_map.mappings.chunks(MAX_BFCHAR_ENTRIES).enumerate() {
        writeln!(s, "{} beginbfchar", chars.len())?;
        for (i, &c) in chars.iter().enumerate() {
            let code = block * MAX_BFCHAR_ENTRIES + i;
            write!(s, "<{code:02x}> <")?;
            for unit in c.encode_utf16(&mut [0; 2]) {
                write!(s, "{unit:04x}")?;
            }
            writeln!(s, ">")?;
        }
        writeln!(s, "endbfchar")?;
    }

    writeln!(s, "endcmap")?;
    writeln!(s, "CMapName currentdict /CMap defineresource pop")?;
    writeln!(s, "end")?;
    writeln!(s, "end")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::char_map::CharMap;

    use super::write_cmap;

    #[test]
    fn test_bfchar_entries() {
        let char_map = CharMap {
            mappings: vec!['\0', 'A', 'Ж', '😀'],
        };
        let mut s = String::new();
        write_cmap(&mut s, &char_map).unwrap();

        assert!(s.contains("4 beginbfchar\n<00> <0000>\n<01> <0041>\n<02> <0416>\n<03> <d83dde00>\nendbfchar"));
    }

    #[test]
    fn test_blocks_of_one_hundred() {
        let char_map = CharMap {
            mappings: ('\u{400}'..).take(250).collect(),
        };
        let mut s = String::new();
        write_cmap(&mut s, &char_map).unwrap();

        assert_eq!(s.matches("beginbfchar").count(), 3);
        assert!(s.contains("50 beginbfchar\n<c8> <04c8>"));
        assert!(s.contains("<f9> <04f9>\nendbfchar"));
    }
}
