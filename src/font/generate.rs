use ttf_parser::{GlyphId, RawFace, Tag, TableRecord};

use crate::char_map::CharMap;

use super::Font;

const FIXED_HEADER_LEN: usize = 12;
const TABLE_RECORD_LEN: usize = 16;

/// Symbolic TrueType fonts look single-byte codes up at `0xF000 + code`.
const SYMBOL_CODE_BASE: u16 = 0xF000;

const CMAP: Tag = Tag::from_bytes(b"cmap");

impl Font<'_> {
    /// Rewrites the font file so its `cmap` maps document codes straight to glyphs.
    pub fn with_char_map(&self, char_map: &CharMap) -> Vec<u8> {
        let glyphs = char_map
            .mappings
            .iter()
            .map(|&c| self.face.glyph_index(c).unwrap_or_default())
            .collect::<Vec<_>>();
        let cmap = symbol_cmap(&glyphs);

        let raw_face = *self.face.raw_face();
        let header_len = FIXED_HEADER_LEN + TABLE_RECORD_LEN * raw_face.table_records.len() as usize;
        let mut contents = raw_face.data[..header_len].to_vec();

        for (index, record) in raw_face.table_records.into_iter().enumerate() {
            pad_to_multiple_of(&mut contents, 4);
            let table = if record.tag == CMAP {
                cmap.as_slice()
            } else {
                table_data(raw_face, record)
            };

            // Checksums are left stale; viewers do not verify them.
            let offset = contents.len() as u32;
            contents.extend_from_slice(table);
            let record = TableRecord {
                offset,
                length: table.len() as u32,
                ..record
            };
            write_table_record(&mut contents, index, record);
        }
        pad_to_multiple_of(&mut contents, 4);

        contents
    }
}

fn table_data<'a>(raw_face: RawFace<'a>, record: TableRecord) -> &'a [u8] {
    let start = record.offset as usize;
    let end = start + record.length as usize;
    raw_face.data.get(start..end).unwrap_or_default()
}

/// A `cmap` table with one Windows Symbol format 4 subtable, mapping
/// `0xF000 + i` to `glyphs[i]`.
fn symbol_cmap(glyphs: &[GlyphId]) -> Vec<u8> {
    let mut cmap = Vec::new();
    cmap.push_u16(0); // version
    cmap.push_u16(1); // number of subtables
    cmap.push_u16(3); // platform: Windows
    cmap.push_u16(0); // encoding: Symbol
    cmap.push_u32(12); // subtable offset

    // One single-code segment per glyph plus the closing 0xFFFF segment.
    let seg_count = glyphs.len() as u16 + 1;
    let entry_selector = 15 - seg_count.leading_zeros() as u16;
    let search_range = 2 << entry_selector;
    let codes = (0..glyphs.len() as u16).map(|i| SYMBOL_CODE_BASE + i);

    let subtable_len = 16 + 8 * seg_count;
    cmap.push_u16(4); // format
    cmap.push_u16(subtable_len);
    cmap.push_u16(0); // language
    cmap.push_u16(2 * seg_count);
    cmap.push_u16(search_range);
    cmap.push_u16(entry_selector);
    cmap.push_u16(2 * seg_count - search_range);

    // End codes, then the reserved pad, then start codes.
    codes.clone().for_each(|code| cmap.push_u16(code));
    cmap.push_u16(u16::MAX);
    cmap.push_u16(0);
    codes.clone().for_each(|code| cmap.push_u16(code));
    cmap.push_u16(u16::MAX);

    for (code, glyph) in codes.zip(glyphs) {
        cmap.push_u16(glyph.0.wrapping_sub(code));
    }
    cmap.push_u16(1); // 0xFFFF + 1 wraps to glyph 0

    // Range offsets are unused.
    for _ in 0..seg_count {
        cmap.push_u16(0);
    }

    cmap
}

fn write_table_record(contents: &mut [u8], index: usize, record: TableRecord) {
    let start = FIXED_HEADER_LEN + TABLE_RECORD_LEN * index;
    let fields = [
        record.tag.0,
        record.check_sum,
        record.offset,
        record.length,
    ];
    for (i, field) in fields.into_iter().enumerate() {
        contents[start + 4 * i..start + 4 * (i + 1)].copy_from_slice(&field.to_be_bytes());
    }
}

fn pad_to_multiple_of(contents: &mut Vec<u8>, alignment: usize) {
    while contents.len() % alignment != 0 {
        contents.push(0);
    }
}

trait VecExt: Extend<u8> {
    fn push_u16(&mut self, value: u16) {
        self.extend(value.to_be_bytes());
    }

    fn push_u32(&mut self, value: u32) {
        self.extend(value.to_be_bytes());
    }
}

impl VecExt for Vec<u8> {}
