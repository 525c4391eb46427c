//! Document serialization.

mod xml;

pub use xml::{serialize, serialize_to};

use std::fs::File;
use std::io;
use std::path::Path;

use crate::tree::Document;

impl Document {
    /// Serializes the document to a string.
    pub fn to_xml(&self) -> String {
        xml::serialize(self)
    }

    /// Serializes the document to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_to(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let file = File::create(path)?;
        xml::serialize_to(self, file)
    }
}
