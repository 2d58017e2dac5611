use std::{fs, path::Path, path::PathBuf};

use glam::{vec2, Vec2};
use serde::Deserialize;

use crate::{error::Error, sections::SectionKind};

// A4 page size
pub const A4_WIDTH: f32 = 8.27 * 72.0;
pub const A4_HEIGHT: f32 = 11.69 * 72.0;

pub const LETTER_WIDTH: f32 = 8.5 * 72.0;
pub const LETTER_HEIGHT: f32 = 11.0 * 72.0;

pub const DEFAULT_OUTPUT_FILE_NAME: &str = "Resume.pdf";

/// Settings for one render pass. Lengths are in PDF points.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub page_size: PageSize,
    pub margin: f32,
    /// Defaults to the printable width of the page.
    pub wrap_width: Option<f32>,
    pub line_advance: LineAdvance,
    /// Extra space after the contact block.
    pub section_gap: f32,
    /// Extra space after each education entry.
    pub entry_gap: f32,
    pub max_pages: usize,
    pub section_order: Vec<SectionKind>,
    pub labels: Labels,
    pub fonts: Option<FontPaths>,
    pub ascii85_streams: bool,
    pub output_file_name: String,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSize {
    #[default]
    A4,
    Letter,
    Custom {
        width: f32,
        height: f32,
    },
}

/// How far the cursor moves down after a line.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineAdvance {
    /// `font_size * factor`.
    Relative { factor: f32 },
    /// `font_size - decrement`.
    Fixed { decrement: f32 },
}

/// TrueType files to embed instead of the standard Helvetica faces.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FontPaths {
    pub regular: PathBuf,
    pub bold: PathBuf,
}

/// Headings and field prefixes printed in the document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Labels {
    pub work_experience: String,
    pub job_title: String,
    pub company: String,
    pub period: String,
    pub experience_details: String,
    pub education: String,
    pub school_name: String,
    pub degree: String,
    pub graduation_year: String,
    pub skills: String,
    pub languages: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            margin: 36.0,
            wrap_width: None,
            line_advance: LineAdvance::default(),
            section_gap: 4.0,
            entry_gap: 8.0,
            max_pages: 50,
            section_order: SectionKind::DEFAULT_ORDER.to_vec(),
            labels: Labels::default(),
            fonts: None,
            ascii85_streams: false,
            output_file_name: DEFAULT_OUTPUT_FILE_NAME.to_owned(),
        }
    }
}

impl Default for LineAdvance {
    fn default() -> Self {
        Self::Relative { factor: 1.15 }
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            work_experience: "Work Experience:".to_owned(),
            job_title: "Job Title: ".to_owned(),
            company: "Company: ".to_owned(),
            period: "Period: ".to_owned(),
            experience_details: "Experience Details:".to_owned(),
            education: "Education:".to_owned(),
            school_name: "School Name: ".to_owned(),
            degree: "Degree: ".to_owned(),
            graduation_year: "Graduation Year: ".to_owned(),
            skills: "Skills:".to_owned(),
            languages: "Languages:".to_owned(),
        }
    }
}

impl RenderConfig {
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let size = self.page_size.dimensions();
        if self.margin.is_nan() || self.margin < 0.0 {
            return Err(Error::Config(format!("margin must be non-negative, got {}", self.margin)));
        }
        if self.printable_width() <= 0.0 || size.y - 2.0 * self.margin <= 0.0 {
            return Err(Error::Config(format!(
                "margin {} leaves no printable area on a {}x{} page",
                self.margin, size.x, size.y,
            )));
        }
        if let Some(width) = self.wrap_width {
            if width.is_nan() || width <= 0.0 {
                return Err(Error::Config(format!("wrap width must be positive, got {width}")));
            }
        }
        for (name, gap) in [
            ("section_gap", self.section_gap),
            ("entry_gap", self.entry_gap),
        ] {
            if !gap.is_finite() || gap < 0.0 {
                return Err(Error::Config(format!("{name} must be non-negative, got {gap}")));
            }
        }
        if self.max_pages == 0 {
            return Err(Error::Config("max_pages must be at least 1".to_owned()));
        }
        Ok(())
    }

    pub fn printable_width(&self) -> f32 {
        self.page_size.dimensions().x - 2.0 * self.margin
    }

    pub fn wrap_width(&self) -> f32 {
        self.wrap_width.unwrap_or_else(|| self.printable_width())
    }
}

impl PageSize {
    pub fn dimensions(self) -> Vec2 {
        match self {
            Self::A4 => vec2(A4_WIDTH, A4_HEIGHT),
            Self::Letter => vec2(LETTER_WIDTH, LETTER_HEIGHT),
            Self::Custom { width, height } => vec2(width, height),
        }
    }
}

impl LineAdvance {
    pub fn advance(self, font_size: f32) -> f32 {
        let advance = match self {
            Self::Relative { factor } => font_size * factor,
            Self::Fixed { decrement } => font_size - decrement,
        };
        advance.max(0.0)
    }
}
