use crate::models::{CodeListing, ProseText, RepoLink, Segment};

use super::{
    classify::{LineClass, classify},
    error::ParseError,
    lines::LineRef,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Prose,
    /// Inside a code fence opened at `start`.
    InFence { start: usize },
    /// Inside a repository link block opened at `start`.
    InRepoLink { start: usize },
}

/// Line-at-a-time state machine that turns classified lines into segments.
///
/// One accumulator serves every mode: prose lines, the whole fence block, or
/// the captured link values, depending on where we are.
pub struct SegmentBuilder {
    mode: Mode,
    buf: String,
    out: Vec<Segment>,
}

impl SegmentBuilder {
    pub fn new() -> Self {
        Self {
            mode: Mode::Prose,
            buf: String::new(),
            out: vec![],
        }
    }

    pub fn push(&mut self, line: LineRef<'_>) -> Result<(), ParseError> {
        match (self.mode, classify(line.text)) {
            (Mode::InFence { start }, LineClass::Fence) => {
                self.buf.push_str(line.text);
                let block = std::mem::take(&mut self.buf);
                self.out.push(Segment::Listing(CodeListing::from_block(&block, start)?));
                self.mode = Mode::Prose;
            }
            (Mode::InFence { .. }, _) => self.buf.push_str(line.text),
            (Mode::InRepoLink { .. }, LineClass::LinkDelimiter) => {
                let url = std::mem::take(&mut self.buf);
                self.out.push(Segment::RepoLink(RepoLink::new(url.trim())));
                self.mode = Mode::Prose;
            }
            (Mode::InRepoLink { .. }, LineClass::Other { link_value }) => {
                // Decoration inside the block is dropped; serialization
                // rebuilds the canonical form.
                if let Some(value) = link_value {
                    self.buf.push_str(value);
                }
            }
            (Mode::InRepoLink { .. }, LineClass::Fence) => {}
            (Mode::Prose, LineClass::Fence) => {
                self.flush_prose();
                self.buf.push_str(line.text);
                self.mode = Mode::InFence { start: line.number };
            }
            (Mode::Prose, LineClass::LinkDelimiter) => {
                self.flush_prose();
                self.mode = Mode::InRepoLink { start: line.number };
            }
            (Mode::Prose, LineClass::Other { .. }) => self.buf.push_str(line.text),
        }
        Ok(())
    }

    pub fn finish(mut self) -> Result<Vec<Segment>, ParseError> {
        match self.mode {
            Mode::Prose => {
                self.flush_prose();
                Ok(self.out)
            }
            Mode::InFence { start } => Err(ParseError::UnterminatedFence { line: start }),
            Mode::InRepoLink { start } => Err(ParseError::UnterminatedRepoLink { line: start }),
        }
    }

    fn flush_prose(&mut self) {
        if !self.buf.is_empty() {
            let text = std::mem::take(&mut self.buf);
            self.out.push(Segment::Prose(ProseText::new(text)));
        }
    }
}

impl Default for SegmentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
