//! # Chapter Renumbering
//!
//! Chapters are files named `<n>. <title>.md` and appendices `A<n>. <title>.md`.
//! To insert a chapter, give it the number it should take and a `!`:
//! `3.! New Chapter.md` sorts before an existing `3. Old Chapter.md`.
//! Renumbering sorts the files and hands out contiguous numbers again,
//! reporting only the files whose names would change.

use std::cmp::Ordering;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::io::{self, IoError};

#[derive(Debug, thiserror::Error)]
pub enum RenumberError {
    #[error("Invalid format: {0}")]
    InvalidName(String),
    #[error(transparent)]
    Io(#[from] IoError),
}

/// Tie-break between files that share a number. `Inserted` goes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    Inserted,
    Normal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedFile {
    pub number: u32,
    pub priority: Priority,
    /// The file's name as found, including any `A` prefix.
    pub original_name: String,
    /// Everything after `<n>. `, extension included.
    pub title: String,
    pub new_name: String,
}

impl NumberedFile {
    /// Parses `<n>.[!] <title>`.
    pub fn parse(name: &str) -> Result<Self, RenumberError> {
        static NUMBERED_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = NUMBERED_REGEX
            .get_or_init(|| Regex::new(r"^(\d+)\.(!)?\s*(.*)$").expect("Invalid numbered regex"));

        let caps = regex
            .captures(name)
            .ok_or_else(|| RenumberError::InvalidName(name.to_string()))?;
        let number = caps[1]
            .parse()
            .map_err(|_| RenumberError::InvalidName(name.to_string()))?;
        let priority = if caps.get(2).is_some() {
            Priority::Inserted
        } else {
            Priority::Normal
        };

        Ok(Self {
            number,
            priority,
            original_name: name.to_string(),
            title: caps[3].trim().to_string(),
            new_name: String::new(),
        })
    }

    pub fn is_changed(&self) -> bool {
        self.original_name != self.new_name
    }
}

impl Ord for NumberedFile {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.number, self.priority, &self.original_name).cmp(&(
            other.number,
            other.priority,
            &other.original_name,
        ))
    }
}

impl PartialOrd for NumberedFile {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// All numbered files in their new order, and the subset that must be renamed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Renumbering {
    pub files: Vec<NumberedFile>,
    pub changes: Vec<NumberedFile>,
}

impl Renumbering {
    fn from_sorted(files: Vec<NumberedFile>) -> Self {
        let changes = files.iter().filter(|f| f.is_changed()).cloned().collect();
        Self { files, changes }
    }
}

/// Renumbers chapter names from `0.`; names not starting with a digit are skipped.
pub fn plan_chapters<I, S>(names: I) -> Result<Renumbering, RenumberError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut files = names
        .into_iter()
        .filter(|name| starts_with_digit(name.as_ref()))
        .map(|name| NumberedFile::parse(name.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    files.sort();

    for (i, file) in files.iter_mut().enumerate() {
        file.new_name = format!("{i}. {}", file.title);
    }
    Ok(Renumbering::from_sorted(files))
}

/// Renumbers appendix names (`A<digit>...`) from `A1.`.
pub fn plan_appendices<I, S>(names: I) -> Result<Renumbering, RenumberError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut files = names
        .into_iter()
        .filter_map(|name| {
            name.as_ref()
                .strip_prefix('A')
                .filter(|rest| starts_with_digit(rest))
                .map(|rest| (name.as_ref().to_string(), rest.to_string()))
        })
        .map(|(name, rest)| {
            NumberedFile::parse(&rest).map(|file| NumberedFile {
                original_name: name,
                ..file
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    files.sort();

    for (i, file) in files.iter_mut().enumerate() {
        file.new_name = format!("A{}. {}", i + 1, file.title);
    }
    Ok(Renumbering::from_sorted(files))
}

/// Plans chapter renumbering for the markdown files in `dir`.
pub fn chapters(dir: &Path) -> Result<Renumbering, RenumberError> {
    plan_chapters(markdown_names(dir)?)
}

/// Plans appendix renumbering for the markdown files in `dir`.
pub fn appendices(dir: &Path) -> Result<Renumbering, RenumberError> {
    plan_appendices(markdown_names(dir)?)
}

fn markdown_names(dir: &Path) -> Result<Vec<String>, IoError> {
    Ok(io::scan_markdown_files(dir)?
        .iter()
        .map(|path| io::display_name(path))
        .collect())
}

fn starts_with_digit(s: &str) -> bool {
    s.chars().next().is_some_and(|c| c.is_ascii_digit())
}
