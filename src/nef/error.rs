//! Error types for NEF frame building and decoding.

use thiserror::Error;

/// Errors raised while assembling or decoding NEF saveframes.
#[derive(Debug, Error)]
pub enum Error {
    /// Peaks of one spectrum disagree on their number of dimensions.
    #[error("peaks in {origin} have inconsistent dimensionality, found dimension counts: {counts:?}")]
    DimensionMismatch {
        /// Where the peaks came from (file or frame name).
        origin: String,
        /// The distinct dimension counts seen, ascending.
        counts: Vec<usize>,
    },

    /// A peak position could not be read as a number.
    #[error("bad peak position '{value}' in {origin} at row {row}: {line}")]
    BadPosition {
        origin: String,
        /// One-based row within the loop.
        row: usize,
        value: String,
        /// The row's raw content.
        line: String,
    },

    #[error("frame '{frame}' has no '{category}' loop")]
    MissingLoop { frame: String, category: String },

    #[error("loop '{category}' has no '{tag}' column")]
    MissingColumn { category: String, tag: String },

    /// A loop or tag value could not be decoded.
    #[error("bad value '{value}' for '{tag}' in {origin}: {detail}")]
    BadValue {
        origin: String,
        tag: String,
        value: String,
        detail: String,
    },

    #[error("no frame of category '{category}' matches '{selector}', available frames: {}", available.join(", "))]
    FrameNotFound {
        category: String,
        selector: String,
        available: Vec<String>,
    },

    #[error("selector '{selector}' matches several frames of category '{category}': {}", matches.join(", "))]
    AmbiguousFrame {
        category: String,
        selector: String,
        matches: Vec<String>,
    },

    #[error("ran out of chain codes, every letter A-Z is excluded or already used")]
    ChainCodesExhausted,

    #[error(transparent)]
    Star(#[from] crate::star::Error),

    /// Failed to parse a conversion configuration TOML.
    #[error("failed to parse conversion configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl Error {
    pub fn bad_value(
        origin: impl Into<String>,
        tag: impl Into<String>,
        value: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self::BadValue {
            origin: origin.into(),
            tag: tag.into(),
            value: value.into(),
            detail: detail.into(),
        }
    }

    pub fn missing_loop(frame: impl Into<String>, category: impl Into<String>) -> Self {
        Self::MissingLoop {
            frame: frame.into(),
            category: category.into(),
        }
    }

    pub fn missing_column(category: impl Into<String>, tag: impl Into<String>) -> Self {
        Self::MissingColumn {
            category: category.into(),
            tag: tag.into(),
        }
    }
}
