use std::{fmt, io::Write};

use glam::Vec2;
use itertools::Itertools;

use crate::{
    char_map::CharMap,
    document::FontWeight,
    error::Error,
    font::{standard::StandardFont, Font, Typeface},
};

pub mod cmap;
pub mod page;

const HEADER: &[u8] = b"%PDF-1.7\n";

/// PDF font descriptor flag for fonts with a custom encoding.
const SYMBOLIC: u32 = 4;

pub struct PDFBuilder {
    content: Vec<u8>,
    xref: Vec<XRefEntry>,
    pages_ref: Ref,
    page_refs: Vec<Ref>,
    root: Ref,
    ascii85: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Ref(u32, u16);

#[derive(Debug)]
enum XRefEntry {
    Free { next_free: u32, generation: u16 },
    InUse { offset: u32, generation: u16 },
}

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} R", self.0, self.1)
    }
}

impl Default for PDFBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PDFBuilder {
    pub fn new() -> Self {
        let mut builder = Self {
            content: HEADER.to_owned(),
            xref: vec![XRefEntry::Free {
                // Will be filled in when XREF table is generated
                next_free: 0,
                generation: u16::MAX,
            }],
            pages_ref: Ref::default(),
            page_refs: Vec::new(),
            root: Ref::default(),
            ascii85: false,
        };
        builder.pages_ref = builder.preallocate_object();
        builder
    }

    /// Encodes every stream with ASCII85 so the file is 7-bit clean.
    pub fn with_ascii85_streams(mut self, ascii85: bool) -> Self {
        self.ascii85 = ascii85;
        self
    }

    fn preallocate_object(&mut self) -> Ref {
        let id = self.xref.len() as u32;
        self.xref.push(XRefEntry::Free {
            next_free: 0,
            generation: u16::MAX,
        });
        Ref(id, 0)
    }

    fn start_object(&mut self) -> Result<Ref, Error> {
        let ref_ = self.preallocate_object();
        self.start_object_with_ref(ref_)?;
        Ok(ref_)
    }

    fn start_object_with_ref(&mut self, ref_: Ref) -> Result<(), Error> {
        let Ref(id, generation) = ref_;

        let offset = self.content.len() as u32;
        self.xref[id as usize] = XRefEntry::InUse { offset, generation };

        writeln!(self.content, "{id} {generation} obj")?;
        Ok(())
    }

    fn end_object(&mut self) -> Result<(), Error> {
        writeln!(self.content, "endobj")?;
        Ok(())
    }

    /// Writes a stream object. `extra` is appended to the stream dictionary.
    fn stream_object(&mut self, content: &[u8], extra: &str) -> Result<Ref, Error> {
        let ref_ = self.start_object()?;
        if self.ascii85 {
            let encoded = ascii85_stream(content);
            writeln!(
                self.content,
                "<< /Length {} /Filter /ASCII85Decode{extra} >>",
                encoded.len(),
            )?;
            writeln!(self.content, "stream")?;
            self.content.extend_from_slice(encoded.as_bytes());
        } else {
            writeln!(self.content, "<< /Length {}{extra} >>", content.len())?;
            writeln!(self.content, "stream")?;
            self.content.extend_from_slice(content);
        }
        write!(self.content, "\nendstream\n")?;
        self.end_object()?;
        Ok(ref_)
    }

    fn standard_font(&mut self, font: StandardFont) -> Result<Ref, Error> {
        let font_ref = self.start_object()?;
        write!(
            self.content,
            "<< /Type /Font /Subtype /Type1 /BaseFont /{base_font} /Encoding /WinAnsiEncoding >>",
            base_font = font.base_font(),
        )?;
        self.end_object()?;
        Ok(font_ref)
    }

    fn embedded_font(&mut self, font: &Font, char_map: &CharMap) -> Result<Ref, Error> {
        let font_data = font.with_char_map(char_map);
        let font_file2 = self.stream_object(&font_data, &format!(" /Length1 {}", font_data.len()))?;

        let font_descriptor = self.start_object()?;
        write!(
            self.content,
            "<< /Type /FontDescriptor /FontName /{ps_name} /Flags {SYMBOLIC} ",
            ps_name = font.ps_name,
        )?;
        let bbox = font.face.global_bounding_box();
        write!(
            self.content,
            "/FontBBox [{x1} {y1} {x2} {y2}] /ItalicAngle {angle} ",
            x1 = font.to_milli_em(bbox.x_min),
            y1 = font.to_milli_em(bbox.y_min),
            x2 = font.to_milli_em(bbox.x_max),
            y2 = font.to_milli_em(bbox.y_max),
            angle = font.face.italic_angle().unwrap_or(0.0),
        )?;
        write!(
            self.content,
            "/Ascent {ascent} /Descent {descent} ",
            ascent = font.to_milli_em(font.face.ascender()),
            descent = font.to_milli_em(font.face.descender()),
        )?;
        write!(
            self.content,
            "/Leading {leading} /CapHeight {cap_height} /StemV {stem_v} /FontFile2 {font_file2} >>",
            leading = (font.metrics().line_height() * 1000.0).round() as i32,
            cap_height = font.to_milli_em(font.face.ascender()),
            stem_v = 100,
        )?;
        self.end_object()?;

        let units_per_em = font.face.units_per_em() as u32;
        let widths_ref = self.start_object()?;
        write!(
            self.content,
            "[ {} ]",
            char_map
                .mappings
                .iter()
                .map(|&c| 1000 * font.advance(c) as u32 / units_per_em)
                .join(" "),
        )?;
        self.end_object()?;

        let to_unicode = self.to_unicode(char_map)?;

        let font_ref = self.start_object()?;
        write!(
            self.content,
            "<< /Type /Font /Subtype /TrueType /BaseFont /{ps_name} /FirstChar 0 /LastChar {last_char} ",
            ps_name = font.ps_name,
            last_char = char_map.mappings.len() - 1,
        )?;
        write!(
            self.content,
            "/Widths {widths_ref} /FontDescriptor {font_descriptor} /ToUnicode {to_unicode} >>",
        )?;
        self.end_object()?;

        Ok(font_ref)
    }

    pub fn page(&mut self, content: &[u8]) -> Result<(), Error> {
        let contents = self.stream_object(content, "")?;

        let page = self.start_object()?;
        write!(
            self.content,
            "<< /Type /Page /Parent {pages} /Contents {contents} >>",
            pages = self.pages_ref,
        )?;
        self.end_object()?;

        self.page_refs.push(page);
        Ok(())
    }

    /// Writes the fonts, the page tree and the document catalog.
    ///
    /// `char_map` is required when the typeface is embedded.
    pub fn catalog(
        &mut self,
        typeface: &Typeface,
        char_map: Option<&CharMap>,
        page_size: Vec2,
    ) -> Result<(), Error> {
        let mut font_refs = Vec::new();
        for weight in [FontWeight::Regular, FontWeight::Bold] {
            let font_ref = match (typeface.embedded(weight), char_map) {
                (Some(font), Some(char_map)) => self.embedded_font(font, char_map)?,
                _ => self.standard_font(StandardFont::for_weight(weight))?,
            };
            font_refs.push((Typeface::resource_name(weight), font_ref));
        }

        self.start_object_with_ref(self.pages_ref)?;
        write!(self.content, "<< /Type /Pages /Kids [ ")?;
        for page_ref in &self.page_refs {
            write!(self.content, "{page_ref} ")?;
        }
        write!(
            self.content,
            "] /Count {page_count} ",
            page_count = self.page_refs.len(),
        )?;
        write!(self.content, "/Resources << /Font << ")?;
        for (name, font_ref) in font_refs {
            write!(self.content, "/{name} {font_ref} ")?;
        }
        write!(
            self.content,
            ">> >> /MediaBox [ 0 0 {width} {height} ] >>",
            width = page_size.x,
            height = page_size.y,
        )?;
        self.end_object()?;

        let catalog = self.start_object()?;
        write!(
            self.content,
            "<< /Type /Catalog /Pages {pages} >>",
            pages = self.pages_ref,
        )?;
        self.end_object()?;

        self.root = catalog;
        Ok(())
    }

    pub fn build(self) -> Result<Vec<u8>, Error> {
        let Self {
            mut content,
            mut xref,
            root,
            ..
        } = self;

        let xref_size = xref.len() as u32;
        xref[0] = XRefEntry::Free {
            next_free: 0,
            generation: u16::MAX,
        };

        let start_xref = content.len();
        writeln!(content, "xref")?;
        writeln!(content, "0 {xref_size}")?;
        for entry in xref {
            let (n, g, c) = match entry {
                XRefEntry::Free {
                    next_free,
                    generation,
                } => (next_free, generation, 'f'),
                XRefEntry::InUse { offset, generation } => (offset, generation, 'n'),
            };
            write!(content, "{n:010} {g:05} {c}\r\n")?;
        }

        writeln!(content, "trailer")?;
        writeln!(content, "<< /Size {xref_size} /Root {root} >>")?;

        writeln!(content, "startxref")?;
        writeln!(content, "{start_xref}")?;
        writeln!(content, "%%EOF")?;

        Ok(content)
    }
}

fn ascii85_stream(data: &[u8]) -> String {
    let encoded = ascii85::encode(data);
    // PDF readers expect the bare data followed by the `~>` end marker.
    let body = encoded.strip_prefix("<~").unwrap_or(&encoded);
    let body = body.strip_suffix("~>").unwrap_or(body);
    format!("{body}~>")
}
