//! # Batch Checking
//!
//! Runs the parser, listing validator and round-trip checker over one file
//! or a whole book directory. Each document is processed on its own: a file
//! that can't be read or parsed is reported and the batch carries on.

use std::path::{Path, PathBuf};

use crate::io::{self, IoError};
use crate::models::Document;
use crate::parsing::ParseError;
use crate::roundtrip::{self, RoundTrip};
use crate::validation::{self, ValidationMode, Violation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckOptions {
    pub mode: ValidationMode,
    /// Write `<name>.tmp` next to each document that fails to round-trip.
    pub write_artifacts: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            mode: ValidationMode::Lenient,
            write_artifacts: true,
        }
    }
}

/// Why a document could not be checked at all.
#[derive(Debug, thiserror::Error)]
pub enum Unparseable {
    #[error(transparent)]
    Io(#[from] IoError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Everything found in one successfully parsed document.
#[derive(Debug)]
pub struct Findings {
    pub document: Document,
    pub violations: Vec<Violation>,
    pub round_trip: RoundTrip,
    /// Where the drift artifact was written, if one was.
    pub artifact: Option<PathBuf>,
}

impl Findings {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty() && self.round_trip.is_exact()
    }
}

#[derive(Debug)]
pub struct DocumentReport {
    pub path: PathBuf,
    pub outcome: Result<Findings, Unparseable>,
}

impl DocumentReport {
    pub fn name(&self) -> String {
        io::display_name(&self.path)
    }

    pub fn is_clean(&self) -> bool {
        self.outcome.as_ref().is_ok_and(Findings::is_clean)
    }
}

pub fn check_text(text: &str, mode: ValidationMode) -> Result<Findings, ParseError> {
    let document = Document::parse(text)?;
    let violations = validation::validate_document(&document, mode);
    let round_trip = roundtrip::check_round_trip(&document);
    Ok(Findings {
        document,
        violations,
        round_trip,
        artifact: None,
    })
}

pub fn check_file(path: &Path, options: CheckOptions) -> DocumentReport {
    DocumentReport {
        path: path.to_path_buf(),
        outcome: check_file_inner(path, options),
    }
}

fn check_file_inner(path: &Path, options: CheckOptions) -> Result<Findings, Unparseable> {
    let text = io::read_document(path)?;
    let mut findings = check_text(&text, options.mode)?;

    if options.write_artifacts
        && let RoundTrip::Drift(drift) = &findings.round_trip
    {
        findings.artifact = Some(roundtrip::write_drift_artifact(path, drift)?);
    }
    Ok(findings)
}

/// Checks a whole book: clears artifacts from the previous run, then checks
/// every chapter.
pub fn check_book(dir: &Path, options: CheckOptions) -> Result<Vec<DocumentReport>, IoError> {
    for removed in roundtrip::remove_stale_artifacts(dir)? {
        log::info!("Removed stale {}", removed.display());
    }
    check_directory(dir, options)
}

/// Checks every markdown file in `dir`. Deletes nothing.
pub fn check_directory(dir: &Path, options: CheckOptions) -> Result<Vec<DocumentReport>, IoError> {
    let reports: Vec<_> = io::scan_markdown_files(dir)?
        .iter()
        .map(|path| check_file(path, options))
        .collect();

    for report in &reports {
        if let Err(e) = &report.outcome {
            log::warn!("{}: {e}", report.name());
        }
    }
    Ok(reports)
}
