//! # Document Parsing
//!
//! Two-phase, single forward pass over the lines of a chapter.
//!
//! 1. **Line Classification** (`classify`): each line is judged on its own
//!    prefix: fence, repository link delimiter, or other.
//! 2. **Segment Construction** (`builder`): a `SegmentBuilder` tracks whether
//!    we are in prose, inside a fence, or inside a link block, and emits
//!    `Segment`s as regions close.
//!
//! Serializing the segments reproduces the input for every canonical
//! document. Link blocks are the exception: their decorative lines are
//! dropped and rebuilt as `%%\ncode: <url>\n%%\n`.

pub mod builder;
pub mod classify;
pub mod error;
pub mod lines;

#[cfg(test)]
mod tests;

pub use builder::SegmentBuilder;
pub use classify::{LineClass, classify};
pub use error::ParseError;
pub use lines::{LineRef, lines_with_numbers};

use crate::models::Document;

pub fn parse_document(text: impl Into<String>) -> Result<Document, ParseError> {
    let text = text.into();
    let mut builder = SegmentBuilder::new();

    for line in lines_with_numbers(&text) {
        builder.push(line)?;
    }

    let segments = builder.finish()?;
    log::trace!("parsed {} segments", segments.len());
    Ok(Document::new(text, segments))
}
