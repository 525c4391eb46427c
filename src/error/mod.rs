//! Error types for document parsing.
//!
//! Parsing is all-or-nothing: the first error aborts the parse and is
//! returned with the source name and line where it was detected. I/O
//! failures from the underlying reader are reported separately from
//! malformed input.

use std::fmt;
use std::io;

/// Source location within a document being parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Display name of the input: a file path, or `"<string>"` for
    /// in-memory input.
    pub source: String,
    /// 1-based line number.
    pub line: u32,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.line)
    }
}

/// The error type returned when input is malformed.
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Human-readable error message.
    pub message: String,
    /// Where in the source the error occurred.
    pub location: SourceLocation,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse error at {}: {}", self.location, self.message)
    }
}

impl std::error::Error for ParseError {}

/// Any failure from a parse entry point.
#[derive(Debug)]
pub enum Error {
    /// The underlying reader failed.
    Io(io::Error),
    /// The input is malformed.
    Parse(ParseError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "i/o error: {err}"),
            Self::Parse(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_location_display() {
        let loc = SourceLocation {
            source: "report.xml".to_string(),
            line: 17,
        };
        assert_eq!(loc.to_string(), "report.xml:17");
    }

    #[test]
    fn test_parse_error_display() {
        let err = ParseError {
            message: "unexpected end of input".to_string(),
            location: SourceLocation {
                source: "<string>".to_string(),
                line: 3,
            },
        };
        assert_eq!(
            err.to_string(),
            "parse error at <string>:3: unexpected end of input"
        );
    }

    #[test]
    fn test_error_wraps_parse_error() {
        let err: Error = ParseError {
            message: "bad tag".to_string(),
            location: SourceLocation {
                source: "<string>".to_string(),
                line: 1,
            },
        }
        .into();
        let _: &dyn std::error::Error = &err;
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_error_wraps_io_error() {
        let err: Error = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(err.to_string().contains("i/o error"));
    }
}
