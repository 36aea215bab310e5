/// A single line of the input with its 1-based line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRef<'a> {
    pub number: usize,
    /// The line text, terminator included if present.
    pub text: &'a str,
}

/// Returns an iterator over lines, keeping each line's terminator so that
/// concatenating every `text` reproduces the input exactly.
pub fn lines_with_numbers(text: &str) -> impl Iterator<Item = LineRef<'_>> {
    text.split_inclusive('\n')
        .enumerate()
        .map(|(i, text)| LineRef { number: i + 1, text })
}
