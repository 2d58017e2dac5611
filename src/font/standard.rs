//! Metrics for the PDF standard Helvetica faces, which every viewer provides
//! without embedding.

use super::TextMetrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
}

const FIRST_PRINTABLE: u8 = b' ';

/// Advance widths in thousandths of an em for `' '..='~'`.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    278, 278, 584, 584, 584, 556, 1015,
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    278, 278, 278, 469, 556, 333,
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

struct WinAnsiExtra {
    c: char,
    code: u8,
    regular: u16,
    bold: u16,
}

/// Typographic characters WinAnsi places in `0x80..=0x9F`.
const WIN_ANSI_EXTRAS: [WinAnsiExtra; 9] = [
    WinAnsiExtra { c: '€', code: 0x80, regular: 556, bold: 556 },
    WinAnsiExtra { c: '…', code: 0x85, regular: 1000, bold: 1000 },
    WinAnsiExtra { c: '‘', code: 0x91, regular: 222, bold: 278 },
    WinAnsiExtra { c: '’', code: 0x92, regular: 222, bold: 278 },
    WinAnsiExtra { c: '“', code: 0x93, regular: 333, bold: 500 },
    WinAnsiExtra { c: '”', code: 0x94, regular: 333, bold: 500 },
    WinAnsiExtra { c: '•', code: 0x95, regular: 350, bold: 350 },
    WinAnsiExtra { c: '–', code: 0x96, regular: 556, bold: 556 },
    WinAnsiExtra { c: '—', code: 0x97, regular: 1000, bold: 1000 },
];

/// Byte written in place of characters WinAnsi cannot encode.
pub const REPLACEMENT: u8 = b'?';

/// Maps a character to its WinAnsiEncoding byte.
pub fn win_ansi(c: char) -> Option<u8> {
    match c {
        '\t' => Some(b' '),
        ' '..='~' | '\u{a0}'..='\u{ff}' => Some(c as u8),
        _ => WIN_ANSI_EXTRAS
            .iter()
            .find(|extra| extra.c == c)
            .map(|extra| extra.code),
    }
}

impl StandardFont {
    pub fn base_font(self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
        }
    }

    pub fn metrics(self) -> TextMetrics {
        TextMetrics {
            ascent: 0.718,
            descent: -0.207,
            line_gap: 0.0,
        }
    }

    /// Width of an encoded byte in thousandths of an em.
    pub fn byte_width(self, byte: u8) -> u16 {
        let table = match self {
            Self::Helvetica => &HELVETICA_WIDTHS,
            Self::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        };
        match byte {
            b' '..=b'~' => table[(byte - FIRST_PRINTABLE) as usize],
            0xa0 => table[0],
            // Latin-1 letters are approximated by the width of a lowercase letter.
            0xa1..=0xff => 556,
            _ => WIN_ANSI_EXTRAS
                .iter()
                .find(|extra| extra.code == byte)
                .map(|extra| match self {
                    Self::Helvetica => extra.regular,
                    Self::HelveticaBold => extra.bold,
                })
                .unwrap_or(0),
        }
    }

    pub fn text_width(self, text: &str, font_size: f32) -> f32 {
        let milli_em: u32 = text
            .chars()
            .map(|c| self.byte_width(win_ansi(c).unwrap_or(REPLACEMENT)) as u32)
            .sum();
        milli_em as f32 * font_size / 1000.0
    }
}
