use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    char_map::CharMap,
    config::RenderConfig,
    error::{Diagnostic, Error},
    font::{Font, Typeface},
    pdf::{
        page::{PageBuilder, TextEncoder},
        PDFBuilder,
    },
    record::ResumeRecord,
    sections::layout_resume,
    text_layout::Layout,
};

pub mod char_map;
pub mod config;
pub mod document;
pub mod error;
pub mod font;
pub mod pdf;
pub mod record;
pub mod sections;
pub mod text_layout;

/// A finished document, ready to be saved.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedResume {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub file_name: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Lays out and serialises `record`, loading the configured fonts if any.
pub fn render_resume(record: &ResumeRecord, config: &RenderConfig) -> Result<RenderedResume, Error> {
    match &config.fonts {
        None => render_with_typeface(record, config, &Typeface::Standard),
        Some(paths) => {
            let regular = read_font_file(&paths.regular)?;
            let bold = read_font_file(&paths.bold)?;
            let typeface = Typeface::Embedded {
                regular: Font::new(&regular)?,
                bold: Font::new(&bold)?,
            };
            render_with_typeface(record, config, &typeface)
        }
    }
}

pub fn render_with_typeface(
    record: &ResumeRecord,
    config: &RenderConfig,
    typeface: &Typeface,
) -> Result<RenderedResume, Error> {
    let layout = layout_resume(record, config, typeface);
    let (bytes, encoding_diagnostics) = generate_pdf(&layout, typeface, config.ascii85_streams)?;

    let mut diagnostics = layout.diagnostics;
    diagnostics.extend(encoding_diagnostics);
    log::debug!("rendered {} pages, {} bytes", layout.pages.len(), bytes.len());

    Ok(RenderedResume {
        bytes,
        page_count: layout.pages.len(),
        file_name: config.output_file_name.clone(),
        diagnostics,
    })
}

/// Serialises laid-out pages into PDF bytes.
pub fn generate_pdf(
    layout: &Layout,
    typeface: &Typeface,
    ascii85_streams: bool,
) -> Result<(Vec<u8>, Vec<Diagnostic>), Error> {
    let char_map = match typeface {
        Typeface::Standard => None,
        Typeface::Embedded { .. } => Some(CharMap::from_pages(&layout.pages)?),
    };
    let mut encoder = TextEncoder::for_char_map(char_map.as_ref());

    let mut pdf_builder = PDFBuilder::new().with_ascii85_streams(ascii85_streams);
    for page in &layout.pages {
        let mut builder = PageBuilder::new(layout.page_size.y);
        for line in &page.lines {
            let ascent = typeface.metrics(line.style.weight).ascent;
            builder.line(line, ascent, &encoder.encode(&line.text))?;
        }
        pdf_builder.page(&builder.build())?;
    }
    pdf_builder.catalog(typeface, char_map.as_ref(), layout.page_size)?;
    let content = pdf_builder.build()?;

    Ok((content, encoder.finish()))
}

fn read_font_file(path: &Path) -> Result<Vec<u8>, Error> {
    log::debug!("loading font {}", path.display());
    fs::read(path).map_err(|err| Error::io(path, err))
}

impl RenderedResume {
    /// Writes the document into `dir` under its file name.
    pub fn save(&self, dir: &Path) -> Result<PathBuf, Error> {
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.bytes).map_err(|err| Error::io(&path, err))?;
        Ok(path)
    }
}
