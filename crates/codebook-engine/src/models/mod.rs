pub mod document;
pub mod segment;

pub use document::{Document, serialize};
pub use segment::{
    CodeListing, FENCE, IGNORE_MARKER, LINK_DELIMITER, LineEnding, ProseText, RepoLink, Segment,
    SlugLine, strip_line_ending,
};
