//! Document parser.
//!
//! A hand-rolled pipeline: a buffered character source with one-byte
//! pushback feeds a three-state tokenizer, and a recursive-descent
//! builder turns the tokens into a `Document`. Parsing is permissive
//! about document structure (any well-nested tags are fine, no schema)
//! and strict about lexical problems: an unknown entity or a mangled tag
//! fails the whole parse.

mod builder;
pub(crate) mod entities;
pub(crate) mod reader;
pub(crate) mod tokenizer;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::Error;
use crate::tree::Document;

use builder::TreeBuilder;
use reader::CharReader;
use tokenizer::Tokenizer;

/// Default bound on element nesting depth.
pub const DEFAULT_MAX_DEPTH: u32 = 256;

/// Parse options.
///
/// ```
/// use microxml::ParseOptions;
///
/// let opts = ParseOptions::default().max_depth(64);
/// ```
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Maximum element nesting depth (default: 256). Exceeding it is a
    /// structural parse error.
    pub max_depth: u32,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    /// Sets the maximum element nesting depth.
    #[must_use]
    pub fn max_depth(mut self, max: u32) -> Self {
        self.max_depth = max;
        self
    }
}

/// Parses a string with default options.
///
/// # Errors
///
/// Returns an error if the input is malformed.
pub fn parse_str(input: &str) -> Result<Document, Error> {
    parse_str_with_options(input, &ParseOptions::default())
}

/// Parses a string with the given options.
///
/// # Errors
///
/// Returns an error if the input is malformed.
pub fn parse_str_with_options(input: &str, options: &ParseOptions) -> Result<Document, Error> {
    parse_reader(input.as_bytes(), "<string>", options)
}

/// Parses from any reader. `source` names the input in error messages.
///
/// # Errors
///
/// Returns an error if the reader fails or the input is malformed.
pub fn parse_reader<R: Read>(
    input: R,
    source: impl Into<String>,
    options: &ParseOptions,
) -> Result<Document, Error> {
    let tokens = Tokenizer::new(CharReader::new(input, source));
    TreeBuilder::new(tokens, options).parse()
}

/// Opens and parses a file. The path names the input in error messages.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the input is
/// malformed.
pub fn parse_file(path: impl AsRef<Path>, options: &ParseOptions) -> Result<Document, Error> {
    let path = path.as_ref();
    let file = File::open(path)?;
    parse_reader(file, path.display().to_string(), options)
}

impl Document {
    /// Parses a string with default options.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is malformed.
    pub fn parse_str(input: &str) -> Result<Self, Error> {
        parse_str(input)
    }

    /// Opens and parses a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the input is
    /// malformed.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, Error> {
        parse_file(path, &ParseOptions::default())
    }

    /// Parses from any reader, with `source` naming the input in error
    /// messages.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader fails or the input is malformed.
    pub fn scan(input: impl Read, source: impl Into<String>) -> Result<Self, Error> {
        parse_reader(input, source, &ParseOptions::default())
    }
}
