use thiserror::Error;

/// Structural problems that make a document unparseable.
///
/// Line numbers are 1-based and point at the line that opened the construct.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("code fence at line {line} has no language tag")]
    EmptyLanguage { line: usize },
    #[error("code fence opened at line {line} is never closed")]
    UnterminatedFence { line: usize },
    #[error("repository link block opened at line {line} is never closed")]
    UnterminatedRepoLink { line: usize },
}
