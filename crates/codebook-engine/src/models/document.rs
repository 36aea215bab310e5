use crate::models::segment::{CodeListing, RepoLink, Segment};
use crate::parsing::{ParseError, parse_document};

/// A parsed chapter: the text it came from and its segments in order.
///
/// Immutable once built; [`Document::parse`] is the only constructor. Fixes
/// are made by serializing a new string, never by editing segments in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    original: String,
    segments: Vec<Segment>,
}

impl Document {
    pub fn parse(text: impl Into<String>) -> Result<Self, ParseError> {
        parse_document(text)
    }

    pub(crate) fn new(original: String, segments: Vec<Segment>) -> Self {
        Self { original, segments }
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    pub fn code_listings(&self) -> impl Iterator<Item = &CodeListing> {
        self.segments.iter().filter_map(Segment::as_listing)
    }

    pub fn repo_links(&self) -> impl Iterator<Item = &RepoLink> {
        self.segments.iter().filter_map(Segment::as_repo_link)
    }

    /// The repository link in effect at segment `index`: the nearest one
    /// before it in the document.
    pub fn repo_link_for(&self, index: usize) -> Option<&RepoLink> {
        self.segments
            .get(..index)?
            .iter()
            .rev()
            .find_map(Segment::as_repo_link)
    }

    /// Each code listing paired with the repository link in effect for it.
    pub fn listings_with_links(&self) -> Vec<(&CodeListing, Option<&RepoLink>)> {
        let mut current = None;
        let mut out = Vec::new();
        for segment in &self.segments {
            match segment {
                Segment::RepoLink(link) => current = Some(link),
                Segment::Listing(listing) => out.push((listing, current)),
                Segment::Prose(_) => {}
            }
        }
        out
    }

    pub fn serialize(&self) -> String {
        serialize(&self.segments)
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

/// Concatenates the canonical text of each segment in order.
pub fn serialize(segments: &[Segment]) -> String {
    segments.iter().map(Segment::to_source).collect()
}
