//! # Round-Trip Checking
//!
//! Re-serializes a parsed document and compares the result with the text it
//! was parsed from. A mismatch is reported, never raised; the re-serialized
//! text can be written next to the original for diffing, but the original is
//! never touched.

use std::path::{Path, PathBuf};

use similar::TextDiff;

use crate::io::{self, IoError};
use crate::models::Document;

/// Extension appended to a document's file name for its drift artifact.
pub const ARTIFACT_EXTENSION: &str = "tmp";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundTrip {
    Exact,
    Drift(Drift),
}

impl RoundTrip {
    pub fn is_exact(&self) -> bool {
        matches!(self, RoundTrip::Exact)
    }
}

/// Re-serialized text that differs from the original.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drift {
    serialized: String,
    first_divergent_line: usize,
}

impl Drift {
    pub fn serialized(&self) -> &str {
        &self.serialized
    }

    /// 1-based number of the first line that differs.
    pub fn first_divergent_line(&self) -> usize {
        self.first_divergent_line
    }

    /// Unified diff from `original` to the re-serialized text.
    pub fn unified_diff(&self, original: &str, name: &str) -> String {
        TextDiff::from_lines(original, self.serialized.as_str())
            .unified_diff()
            .context_radius(2)
            .header(name, &format!("{name}.{ARTIFACT_EXTENSION}"))
            .to_string()
    }
}

pub fn check_round_trip(doc: &Document) -> RoundTrip {
    let serialized = doc.serialize();
    if serialized == doc.original() {
        return RoundTrip::Exact;
    }

    let first_divergent_line = first_divergent_line(doc.original(), &serialized);
    log::debug!("round trip drifts at line {first_divergent_line}");
    RoundTrip::Drift(Drift {
        serialized,
        first_divergent_line,
    })
}

fn first_divergent_line(a: &str, b: &str) -> usize {
    let mut left = a.split_inclusive('\n');
    let mut right = b.split_inclusive('\n');
    let mut number = 1;
    loop {
        match (left.next(), right.next()) {
            (Some(l), Some(r)) if l == r => number += 1,
            _ => return number,
        }
    }
}

/// Sibling path that receives a drifted document's re-serialized text.
pub fn artifact_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(ARTIFACT_EXTENSION);
    path.with_file_name(name)
}

/// Writes the re-serialized text next to `path` and returns where it went.
pub fn write_drift_artifact(path: &Path, drift: &Drift) -> Result<PathBuf, IoError> {
    let target = artifact_path(path);
    io::write_file(&target, drift.serialized())?;
    Ok(target)
}

/// Deletes `*.md.tmp` artifacts left in `dir` by an earlier check. Other
/// `.tmp` files belong to the user and are left alone.
pub fn remove_stale_artifacts(dir: &Path) -> Result<Vec<PathBuf>, IoError> {
    let stale = io::scan_files(dir, &format!("md.{ARTIFACT_EXTENSION}"))?;
    for path in &stale {
        std::fs::remove_file(path).map_err(|source| IoError::Io {
            path: path.clone(),
            source,
        })?;
        log::debug!("removed stale artifact {}", path.display());
    }
    Ok(stale)
}
