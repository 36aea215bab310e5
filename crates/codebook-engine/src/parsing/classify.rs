use std::sync::OnceLock;

use regex::Regex;

use crate::models::{FENCE, LINK_DELIMITER};

/// What a single line is, judged from the line alone.
///
/// This is phase 1 of parsing; the builder decides what each class means
/// given the current mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass<'a> {
    /// Starts with the fence marker.
    Fence,
    /// Starts with the repository link delimiter.
    LinkDelimiter,
    /// Anything else. `link_value` holds the trimmed capture of a
    /// `code: <value>` pattern found anywhere on the line.
    Other { link_value: Option<&'a str> },
}

pub fn classify(line: &str) -> LineClass<'_> {
    if line.starts_with(FENCE) {
        LineClass::Fence
    } else if line.starts_with(LINK_DELIMITER) {
        LineClass::LinkDelimiter
    } else {
        LineClass::Other {
            link_value: link_value(line),
        }
    }
}

fn link_value(line: &str) -> Option<&str> {
    static LINK_VALUE_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = LINK_VALUE_REGEX
        .get_or_init(|| Regex::new(r"code:\s*(.*)").expect("Invalid link value regex"));

    regex
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("```python\n", LineClass::Fence)]
    #[case("```\n", LineClass::Fence)]
    #[case("%%\n", LineClass::LinkDelimiter)]
    #[case("%% trailing\n", LineClass::LinkDelimiter)]
    #[case("plain text\n", LineClass::Other { link_value: None })]
    #[case(" ```indented\n", LineClass::Other { link_value: None })]
    fn classifies_by_prefix(#[case] line: &str, #[case] expected: LineClass<'static>) {
        assert_eq!(classify(line), expected);
    }

    #[rstest]
    #[case("code: https://example.com/x\n", "https://example.com/x")]
    #[case("  code:   https://example.com/x  \r\n", "https://example.com/x")]
    #[case("source code:u\n", "u")]
    #[case("code:\n", "")]
    fn captures_link_value(#[case] line: &str, #[case] expected: &str) {
        assert_eq!(
            classify(line),
            LineClass::Other {
                link_value: Some(expected)
            }
        );
    }
}
