//! # Listing Validation
//!
//! Checks that each code listing's first line (the slug line) names the
//! source file it was taken from, using the comment convention of its
//! language. Findings are collected per listing; nothing here stops a
//! document from being processed.

use std::fmt;

use crate::models::{CodeListing, Document};

/// Language tag for program output, which never needs a slug line.
pub const OUTPUT_LANGUAGE: &str = "text";

/// How a language's slug line must look: a comment naming a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlugConvention {
    pub language: &'static str,
    pub comment_prefix: &'static str,
    pub file_extension: &'static str,
}

pub const SLUG_CONVENTIONS: &[SlugConvention] = &[
    SlugConvention {
        language: "python",
        comment_prefix: "#",
        file_extension: ".py",
    },
    SlugConvention {
        language: "rust",
        comment_prefix: "//",
        file_extension: ".rs",
    },
    SlugConvention {
        language: "go",
        comment_prefix: "//",
        file_extension: ".go",
    },
];

impl SlugConvention {
    pub fn for_language(language: &str) -> Option<&'static SlugConvention> {
        SLUG_CONVENTIONS.iter().find(|c| c.language == language)
    }

    /// Returns the file name a line declares, if it follows this convention.
    pub fn extract(&self, line: &str) -> Option<String> {
        let line = line.trim();
        if !line.ends_with(self.file_extension) {
            return None;
        }
        line.strip_prefix(self.comment_prefix)
            .map(|name| name.trim().to_string())
    }
}

/// What to do with a language that has no slug convention and isn't `text`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Unknown languages are exempt.
    #[default]
    Lenient,
    /// Unknown languages are violations.
    Strict,
}

/// A problem with a single listing. Never fatal to the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// The first body line doesn't name the source file.
    MissingSlugLine {
        language: String,
        first_line: String,
        line: usize,
    },
    /// Strict mode only: no slug convention exists for this language.
    UnrecognizedLanguage { language: String, line: usize },
}

impl Violation {
    /// Line number of the offending listing's opening fence.
    pub fn line(&self) -> usize {
        match self {
            Violation::MissingSlugLine { line, .. }
            | Violation::UnrecognizedLanguage { line, .. } => *line,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::MissingSlugLine {
                language,
                first_line,
                line,
            } => {
                let convention = SlugConvention::for_language(language);
                write!(f, "line {line}: {language} listing must start with a slug line")?;
                if let Some(c) = convention {
                    write!(f, " ('{} <file>{}')", c.comment_prefix, c.file_extension)?;
                }
                write!(f, ", found {first_line:?}")
            }
            Violation::UnrecognizedLanguage { language, line } => {
                write!(f, "line {line}: unrecognized listing language {language:?}")
            }
        }
    }
}

/// Checks one listing. Ignored and `text` listings always pass.
pub fn validate(listing: &CodeListing, mode: ValidationMode) -> Vec<Violation> {
    if listing.ignore() || listing.language() == OUTPUT_LANGUAGE {
        return vec![];
    }

    match SlugConvention::for_language(listing.language()) {
        Some(_) if listing.source_file_name().is_some() => vec![],
        Some(_) => vec![Violation::MissingSlugLine {
            language: listing.language().to_string(),
            first_line: listing.first_line().to_string(),
            line: listing.line(),
        }],
        None => match mode {
            ValidationMode::Lenient => vec![],
            ValidationMode::Strict => vec![Violation::UnrecognizedLanguage {
                language: listing.language().to_string(),
                line: listing.line(),
            }],
        },
    }
}

/// Checks every listing in a document, in order.
pub fn validate_document(doc: &Document, mode: ValidationMode) -> Vec<Violation> {
    doc.code_listings()
        .flat_map(|listing| validate(listing, mode))
        .collect()
}

/// One line per checked listing naming its language and file, e.g.
/// `python: ch01/hello.py`. `text` and ignored listings are skipped.
pub fn listing_summary(listing: &CodeListing) -> Option<String> {
    if listing.ignore() || listing.language() == OUTPUT_LANGUAGE {
        return None;
    }
    Some(format!(
        "{}: {}",
        listing.language(),
        listing.source_file_name().unwrap_or_default()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn listing(block: &str) -> CodeListing {
        CodeListing::from_block(block, 1).unwrap()
    }

    #[rstest]
    #[case("```python\n# tools/build.py\n```\n", "tools/build.py")]
    #[case("```python\n#tools/build.py\n```\n", "tools/build.py")]
    #[case("```rust\n// src/main.rs\nfn main() {}\n```\n", "src/main.rs")]
    #[case("```go\n  //   cmd/app/main.go  \n```\n", "cmd/app/main.go")]
    fn valid_slug_lines_pass(#[case] block: &str, #[case] file: &str) {
        let l = listing(block);
        assert_eq!(l.source_file_name(), Some(file));
        assert!(validate(&l, ValidationMode::Strict).is_empty());
    }

    #[rstest]
    #[case("```python\nprint(\"hi\")\n```\n", "python", "print(\"hi\")")]
    #[case("```python\n# build.rs\n```\n", "python", "# build.rs")]
    #[case("```rust\n# main.rs\n```\n", "rust", "# main.rs")]
    #[case("```go\npackage main\n```\n", "go", "package main")]
    #[case("```go\n```\n", "go", "")]
    fn bad_slug_lines_are_reported(
        #[case] block: &str,
        #[case] language: &str,
        #[case] first_line: &str,
    ) {
        assert_eq!(
            validate(&listing(block), ValidationMode::Lenient),
            vec![Violation::MissingSlugLine {
                language: language.to_string(),
                first_line: first_line.to_string(),
                line: 1,
            }]
        );
    }

    #[rstest]
    #[case(ValidationMode::Lenient)]
    #[case(ValidationMode::Strict)]
    fn text_listings_are_exempt(#[case] mode: ValidationMode) {
        assert!(validate(&listing("```text\nhello\n```\n"), mode).is_empty());
    }

    #[rstest]
    #[case("```python!\nprint(1)\n```\n")]
    #[case("```rust!\nlet x = 1;\n```\n")]
    #[case("```toml!\n[x]\n```\n")]
    fn ignored_listings_are_exempt(#[case] block: &str) {
        assert!(validate(&listing(block), ValidationMode::Strict).is_empty());
    }

    #[test]
    fn unknown_language_depends_on_mode() {
        let l = listing("```toml\n[package]\n```\n");
        assert!(validate(&l, ValidationMode::Lenient).is_empty());
        assert_eq!(
            validate(&l, ValidationMode::Strict),
            vec![Violation::UnrecognizedLanguage {
                language: "toml".to_string(),
                line: 1,
            }]
        );
    }

    #[test]
    fn document_collects_violations_from_every_listing() {
        let doc = Document::parse(
            "```python\nprint(1)\n```\n```rust\n// ok.rs\n```\n```go\nfunc x() {}\n```\n",
        )
        .unwrap();
        let lines: Vec<_> = validate_document(&doc, ValidationMode::Lenient)
            .iter()
            .map(Violation::line)
            .collect();
        assert_eq!(lines, vec![1, 7]);
    }

    #[test]
    fn violation_message_names_language_and_line() {
        let v = Violation::MissingSlugLine {
            language: "python".to_string(),
            first_line: "print(\"hi\")".to_string(),
            line: 12,
        };
        assert_eq!(
            v.to_string(),
            "line 12: python listing must start with a slug line ('# <file>.py'), found \"print(\\\"hi\\\")\""
        );
    }

    #[test]
    fn summary_lists_checked_listings_only() {
        assert_eq!(
            listing_summary(&listing("```python\n# a.py\n```\n")),
            Some("python: a.py".to_string())
        );
        assert_eq!(listing_summary(&listing("```text\nout\n```\n")), None);
        assert_eq!(listing_summary(&listing("```rust!\nx\n```\n")), None);
        assert_eq!(
            listing_summary(&listing("```python\nprint(1)\n```\n")),
            Some("python: ".to_string())
        );
    }
}
