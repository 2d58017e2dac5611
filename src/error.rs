use std::{fmt, io, path::PathBuf};

use thiserror::Error;

use crate::font;

#[derive(Debug, Error)]
pub enum Error {
    #[error("font error: {0}")]
    Font(#[from] font::Error),
    #[error("more than 256 distinct characters, cannot map {0:?}")]
    CharMapFull(char),
    #[error("failed to access {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write PDF content: {0}")]
    Write(#[from] io::Error),
    #[error("failed to format PDF content")]
    Format(#[from] fmt::Error),
}

/// A problem that was recovered from while rendering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    #[error("field `{field}` was {found}, rendered as an empty string")]
    InvalidInput { field: String, found: &'static str },
    #[error("document needs more than {max_pages} pages, dropped {dropped_lines} lines")]
    RenderOverflow {
        max_pages: usize,
        dropped_lines: usize,
    },
    #[error("character {character:?} is not supported by the font, replaced with '?'")]
    UnsupportedCharacter { character: char },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
