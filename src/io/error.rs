use super::Format;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("failed to parse {format} data: {details} (at line {line}){}", show_content(content))]
    Parse {
        format: Format,
        line: usize,
        details: String,
        /// The offending raw line, when one is known.
        content: String,
    },

    #[error("failed to build NEF data: {0}")]
    Nef(#[from] crate::nef::Error),
}

fn show_content(content: &str) -> String {
    if content.is_empty() {
        String::new()
    } else {
        format!("\n    {}", content.trim_end())
    }
}

impl Error {
    pub fn parse(format: Format, line: usize, details: impl Into<String>) -> Self {
        Self::Parse {
            format,
            line,
            details: details.into(),
            content: String::new(),
        }
    }

    pub fn parse_line(
        format: Format,
        line: usize,
        content: &str,
        details: impl Into<String>,
    ) -> Self {
        Self::Parse {
            format,
            line,
            details: details.into(),
            content: content.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_errors_show_the_raw_line() {
        let err = Error::parse_line(Format::Xplor, 12, "  17 ( A x SER HB2 )", "bad resid");
        let message = err.to_string();
        assert!(message.starts_with("failed to parse XPLOR data: bad resid (at line 12)"));
        assert!(message.ends_with("17 ( A x SER HB2 )"));
    }

    #[test]
    fn parse_errors_without_content_are_one_line() {
        let err = Error::parse(Format::NmrView, 1, "empty file");
        assert_eq!(
            err.to_string(),
            "failed to parse NMRView data: empty file (at line 1)"
        );
    }
}
