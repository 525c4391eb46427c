//! Buffered character source with single-byte pushback.
//!
//! The tokenizer consumes input one byte at a time and occasionally needs
//! to look one byte ahead (e.g., to distinguish `</` from `<x`). The
//! reader keeps a one-slot pushback: `unread` returns the most recent byte
//! to the stream, and the next `next_byte` call delivers it again.
//!
//! Line accounting is 1-based: consuming a newline increments the line
//! counter, pushing one back decrements it, so error locations stay
//! accurate across lookahead.

use std::io::{BufRead, BufReader, Read};

use crate::error::SourceLocation;

pub(crate) struct CharReader<R: Read> {
    inner: BufReader<R>,
    /// One-slot pushback. `None` when empty.
    pushback: Option<u8>,
    line: u32,
    source: String,
}

impl<R: Read> CharReader<R> {
    pub(crate) fn new(input: R, source: impl Into<String>) -> Self {
        Self {
            inner: BufReader::new(input),
            pushback: None,
            line: 1,
            source: source.into(),
        }
    }

    /// Returns the next byte, or `None` at end of input.
    pub(crate) fn next_byte(&mut self) -> std::io::Result<Option<u8>> {
        let byte = match self.pushback.take() {
            Some(b) => Some(b),
            None => {
                let buf = self.inner.fill_buf()?;
                if buf.is_empty() {
                    None
                } else {
                    let b = buf[0];
                    self.inner.consume(1);
                    Some(b)
                }
            }
        };
        if byte == Some(b'\n') {
            self.line += 1;
        }
        Ok(byte)
    }

    /// Returns a byte to the stream.
    ///
    /// The slot holds a single byte. A second pushback before the first is
    /// re-read indicates a parser bug; it is logged and the byte dropped.
    pub(crate) fn unread(&mut self, byte: u8) {
        if self.pushback.is_some() {
            log::error!("double pushback at {}, dropping byte {byte:#04x}", self.location());
            return;
        }
        if byte == b'\n' {
            self.line = self.line.saturating_sub(1);
        }
        self.pushback = Some(byte);
    }

    pub(crate) fn location(&self) -> SourceLocation {
        SourceLocation {
            source: self.source.clone(),
            line: self.line,
        }
    }
}
