use std::fmt;

use crate::parsing::ParseError;
use crate::validation::SlugConvention;

/// Opens and closes a code listing.
pub const FENCE: &str = "```";
/// Trailing marker on a fence's language tag that exempts the listing from slug checks.
pub const IGNORE_MARKER: char = '!';
/// Opens and closes a repository link block.
pub const LINK_DELIMITER: &str = "%%";

/// Terminator of a single physical line.
///
/// Fence lines remember their terminator so that CRLF documents, and a closing
/// fence on the last line with no trailing newline, serialize back unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
    /// Last line of the input with no terminator.
    None,
}

impl LineEnding {
    pub fn of(line: &str) -> Self {
        if line.ends_with("\r\n") {
            LineEnding::CrLf
        } else if line.ends_with('\n') {
            LineEnding::Lf
        } else {
            LineEnding::None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
            LineEnding::None => "",
        }
    }
}

/// Returns `line` without its terminator.
pub fn strip_line_ending(line: &str) -> &str {
    line.strip_suffix("\r\n")
        .or_else(|| line.strip_suffix('\n'))
        .unwrap_or(line)
}

/// One piece of a parsed document, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Prose(ProseText),
    Listing(CodeListing),
    RepoLink(RepoLink),
}

impl Segment {
    /// The canonical source text of this segment.
    pub fn to_source(&self) -> String {
        self.to_string()
    }

    pub fn as_listing(&self) -> Option<&CodeListing> {
        match self {
            Segment::Listing(listing) => Some(listing),
            _ => None,
        }
    }

    pub fn as_repo_link(&self) -> Option<&RepoLink> {
        match self {
            Segment::RepoLink(link) => Some(link),
            _ => None,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Prose(prose) => fmt::Display::fmt(prose, f),
            Segment::Listing(listing) => fmt::Display::fmt(listing, f),
            Segment::RepoLink(link) => fmt::Display::fmt(link, f),
        }
    }
}

/// A contiguous run of ordinary lines, terminators included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProseText {
    pub text: String,
}

impl ProseText {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl fmt::Display for ProseText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A repository URL that applies to the listings following it.
///
/// Always serialized in canonical form, whatever decoration the source block had.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLink {
    pub url: String,
}

impl RepoLink {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl fmt::Display for RepoLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{LINK_DELIMITER}\ncode: {}\n{LINK_DELIMITER}\n", self.url)
    }
}

/// First body line of a listing that names its source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugLine {
    /// The line exactly as written, terminator included.
    pub raw: String,
    pub source_file_name: String,
}

/// A fenced source-code listing.
///
/// # Invariants
///
/// - `language` is never empty
/// - `slug` is only present when `ignore` is false and the first body line
///   matched the language's slug convention
/// - slug line followed by `code` is exactly the text between the fences
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeListing {
    language: String,
    ignore: bool,
    slug: Option<SlugLine>,
    code: String,
    open_ending: LineEnding,
    close_ending: LineEnding,
    line: usize,
}

impl CodeListing {
    /// Builds a listing from its captured fence block, opening fence line
    /// through closing fence line inclusive. `line` is the 1-based line
    /// number of the opening fence, used only for reporting.
    pub fn from_block(block: &str, line: usize) -> Result<Self, ParseError> {
        let lines: Vec<&str> = block.split_inclusive('\n').collect();
        let (header, rest) = lines
            .split_first()
            .ok_or(ParseError::UnterminatedFence { line })?;
        let (closing, body) = rest
            .split_last()
            .filter(|(closing, _)| closing.starts_with(FENCE))
            .ok_or(ParseError::UnterminatedFence { line })?;

        let (language, ignore) = parse_header(header).ok_or(ParseError::EmptyLanguage { line })?;

        let slug = if ignore {
            None
        } else {
            body.first().and_then(|first| {
                SlugConvention::for_language(&language)
                    .and_then(|convention| convention.extract(first))
                    .map(|source_file_name| SlugLine {
                        raw: first.to_string(),
                        source_file_name,
                    })
            })
        };
        let code_lines = if slug.is_some() { &body[1..] } else { body };

        Ok(Self {
            language,
            ignore,
            slug,
            code: code_lines.concat(),
            open_ending: LineEnding::of(header),
            close_ending: LineEnding::of(closing),
            line,
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn ignore(&self) -> bool {
        self.ignore
    }

    /// Body text after the slug line, or the whole body if none was extracted.
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn slug(&self) -> Option<&SlugLine> {
        self.slug.as_ref()
    }

    pub fn source_file_name(&self) -> Option<&str> {
        self.slug.as_ref().map(|slug| slug.source_file_name.as_str())
    }

    /// The exact lines between the opening and closing fence.
    pub fn body(&self) -> String {
        match &self.slug {
            Some(slug) => format!("{}{}", slug.raw, self.code),
            None => self.code.clone(),
        }
    }

    /// First line of the body without its terminator, empty for an empty body.
    pub fn first_line(&self) -> &str {
        let first = match &self.slug {
            Some(slug) => slug.raw.as_str(),
            None => self.code.split_inclusive('\n').next().unwrap_or(""),
        };
        strip_line_ending(first)
    }

    /// Line number of the opening fence.
    pub fn line(&self) -> usize {
        self.line
    }
}

impl fmt::Display for CodeListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(FENCE)?;
        f.write_str(&self.language)?;
        if self.ignore {
            write!(f, "{IGNORE_MARKER}")?;
        }
        f.write_str(self.open_ending.as_str())?;
        if let Some(slug) = &self.slug {
            f.write_str(&slug.raw)?;
        }
        f.write_str(&self.code)?;
        f.write_str(FENCE)?;
        f.write_str(self.close_ending.as_str())
    }
}

/// Splits an opening fence line into its language tag and ignore flag.
///
/// Returns `None` when no language remains once the marker is removed.
fn parse_header(header: &str) -> Option<(String, bool)> {
    let tag = strip_line_ending(header)
        .strip_prefix(FENCE)
        .unwrap_or(header)
        .trim();
    let (tag, ignore) = match tag.strip_suffix(IGNORE_MARKER) {
        Some(rest) => (rest.trim_end_matches(IGNORE_MARKER).trim(), true),
        None => (tag, false),
    };
    (!tag.is_empty()).then(|| (tag.to_string(), ignore))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("```python\n", "python", false)]
    #[case("```rust!\n", "rust", true)]
    #[case("```  go  \n", "go", false)]
    #[case("```python !\n", "python", true)]
    #[case("```text", "text", false)]
    fn header_yields_language_and_ignore(
        #[case] header: &str,
        #[case] language: &str,
        #[case] ignore: bool,
    ) {
        assert_eq!(parse_header(header), Some((language.to_string(), ignore)));
    }

    #[rstest]
    #[case("```\n")]
    #[case("```!\n")]
    #[case("```   !  \n")]
    fn header_without_language_is_rejected(#[case] header: &str) {
        assert_eq!(parse_header(header), None);
    }

    #[test]
    fn listing_extracts_slug_line() {
        let listing =
            CodeListing::from_block("```python\n# tools/build.py\npass\n```\n", 3).unwrap();
        assert_eq!(listing.language(), "python");
        assert_eq!(listing.source_file_name(), Some("tools/build.py"));
        assert_eq!(listing.code(), "pass\n");
        assert_eq!(listing.body(), "# tools/build.py\npass\n");
        assert_eq!(listing.line(), 3);
    }

    #[test]
    fn ignored_listing_keeps_first_line_in_code() {
        let listing = CodeListing::from_block("```python!\n# a.py\npass\n```\n", 1).unwrap();
        assert!(listing.ignore());
        assert_eq!(listing.source_file_name(), None);
        assert_eq!(listing.code(), "# a.py\npass\n");
    }

    #[test]
    fn listing_without_slug_keeps_whole_body() {
        let listing = CodeListing::from_block("```python\nprint(\"hi\")\n```\n", 1).unwrap();
        assert_eq!(listing.source_file_name(), None);
        assert_eq!(listing.code(), "print(\"hi\")\n");
        assert_eq!(listing.first_line(), "print(\"hi\")");
    }

    #[test]
    fn empty_body_is_allowed() {
        let listing = CodeListing::from_block("```rust\n```\n", 1).unwrap();
        assert_eq!(listing.code(), "");
        assert_eq!(listing.first_line(), "");
        assert_eq!(listing.to_string(), "```rust\n```\n");
    }

    #[test]
    fn empty_language_is_malformed() {
        let err = CodeListing::from_block("```\nfoo\n```\n", 7).unwrap_err();
        assert_eq!(err, ParseError::EmptyLanguage { line: 7 });
    }

    #[test]
    fn block_without_closing_fence_is_malformed() {
        let err = CodeListing::from_block("```rust\nfn main() {}\n", 2).unwrap_err();
        assert_eq!(err, ParseError::UnterminatedFence { line: 2 });
    }

    #[rstest]
    #[case("```python\n# a.py\npass\n```\n")]
    #[case("```rust!\nlet x = 1;\n```\n")]
    #[case("```go\r\n// main.go\r\npackage main\r\n```\r\n")]
    #[case("```text\nhello\n```")]
    fn listing_serializes_to_its_source(#[case] block: &str) {
        let listing = CodeListing::from_block(block, 1).unwrap();
        assert_eq!(listing.to_string(), block);
    }

    #[test]
    fn repo_link_is_canonical() {
        let link = RepoLink::new("https://example.com/x");
        assert_eq!(link.to_string(), "%%\ncode: https://example.com/x\n%%\n");
    }

    #[test]
    fn line_endings_are_detected() {
        assert_eq!(LineEnding::of("a\n"), LineEnding::Lf);
        assert_eq!(LineEnding::of("a\r\n"), LineEnding::CrLf);
        assert_eq!(LineEnding::of("a"), LineEnding::None);
        assert_eq!(strip_line_ending("a\r\n"), "a");
    }
}
