//! # Source Verification
//!
//! Chapters point at a companion repository with `%% code: <url> %%` blocks
//! and name each listing's file on its slug line. Given a local checkout of
//! that repository, this reports which of those files and directories exist.
//!
//! Slug-line paths are relative to the repository root. Link URLs are mapped
//! to local directories by swapping a configured URL prefix for the checkout
//! path; links outside that prefix are skipped.

use std::path::{Path, PathBuf};

use crate::check::Unparseable;
use crate::io::{self, IoError};
use crate::models::{Document, RepoLink};

/// A local checkout of the repository the chapters link to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRoot {
    pub local: PathBuf,
    /// URL that corresponds to `local`, e.g.
    /// `https://github.com/me/examples/tree/main`.
    pub repo_prefix: Option<String>,
}

impl SourceRoot {
    pub fn new(local: impl Into<PathBuf>) -> Self {
        Self {
            local: local.into(),
            repo_prefix: None,
        }
    }

    pub fn with_repo_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.repo_prefix = Some(prefix.into());
        self
    }

    /// Local directory for `link`, if its URL falls under `repo_prefix`.
    pub fn local_dir(&self, link: &RepoLink) -> Option<PathBuf> {
        let prefix = self.repo_prefix.as_deref()?.trim_end_matches('/');
        let rest = link.url.strip_prefix(prefix)?;
        if !(rest.is_empty() || rest.starts_with('/')) {
            return None;
        }
        let rest = rest.trim_matches('/');
        if rest.is_empty() {
            Some(self.local.clone())
        } else {
            Some(self.local.join(rest))
        }
    }

    pub fn local_file(&self, source_file_name: &str) -> PathBuf {
        self.local.join(source_file_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// Directory a repository link maps to.
    RepoLink,
    /// File named on a listing's slug line, with the link in effect for it.
    Listing { line: usize, link: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCheck {
    pub kind: SourceKind,
    pub path: PathBuf,
    pub exists: bool,
}

/// Checks every mapped repo link and every slug-line file in `doc`.
///
/// Links come first in document order, then listings in document order.
pub fn verify_sources(doc: &Document, root: &SourceRoot) -> Vec<SourceCheck> {
    let mut checks = Vec::new();

    for link in doc.repo_links() {
        match root.local_dir(link) {
            Some(path) => checks.push(SourceCheck {
                kind: SourceKind::RepoLink,
                exists: path.is_dir(),
                path,
            }),
            None => log::debug!("repo link {} is outside the code root", link.url),
        }
    }

    for (listing, link) in doc.listings_with_links() {
        let Some(name) = listing.source_file_name() else {
            continue;
        };
        let path = root.local_file(name);
        checks.push(SourceCheck {
            kind: SourceKind::Listing {
                line: listing.line(),
                link: link.map(|l| l.url.clone()),
            },
            exists: path.is_file(),
            path,
        });
    }
    checks
}

#[derive(Debug)]
pub struct SourceReport {
    pub path: PathBuf,
    pub outcome: Result<Vec<SourceCheck>, Unparseable>,
}

impl SourceReport {
    pub fn name(&self) -> String {
        io::display_name(&self.path)
    }

    pub fn missing(&self) -> impl Iterator<Item = &SourceCheck> {
        self.outcome
            .as_ref()
            .map(|checks| checks.as_slice())
            .unwrap_or_default()
            .iter()
            .filter(|check| !check.exists)
    }

    pub fn is_clean(&self) -> bool {
        self.outcome
            .as_ref()
            .is_ok_and(|checks| checks.iter().all(|check| check.exists))
    }
}

pub fn verify_file(path: &Path, root: &SourceRoot) -> SourceReport {
    let outcome = io::read_document(path)
        .map_err(Unparseable::from)
        .and_then(|text| Ok(Document::parse(text)?))
        .map(|doc| verify_sources(&doc, root));
    SourceReport {
        path: path.to_path_buf(),
        outcome,
    }
}

/// Verifies every markdown file in `dir` against `root`.
pub fn verify_directory(dir: &Path, root: &SourceRoot) -> Result<Vec<SourceReport>, IoError> {
    io::validate_book_dir(&root.local)?;
    let reports: Vec<_> = io::scan_markdown_files(dir)?
        .iter()
        .map(|path| verify_file(path, root))
        .collect();

    for report in &reports {
        if let Err(e) = &report.outcome {
            log::warn!("{}: {e}", report.name());
        }
        for check in report.missing() {
            log::info!("{}: missing {}", report.name(), check.path.display());
        }
    }
    Ok(reports)
}
