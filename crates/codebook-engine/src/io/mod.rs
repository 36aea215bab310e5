use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid book directory: {0}")]
    InvalidBookDir(PathBuf),
    #[error("Bad file pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("Unreadable directory entry: {0}")]
    Glob(#[from] glob::GlobError),
}

impl IoError {
    fn at(path: &Path) -> impl FnOnce(std::io::Error) -> IoError + '_ {
        move |source| IoError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Read a whole document into memory
pub fn read_document(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(IoError::at(path))
}

/// Write content to a file, creating parent directories as needed
pub fn write_file(path: &Path, content: &str) -> Result<(), IoError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(IoError::at(parent))?;
    }
    fs::write(path, content).map_err(IoError::at(path))
}

/// Markdown files directly inside `dir`, sorted by path
pub fn scan_markdown_files(dir: &Path) -> Result<Vec<PathBuf>, IoError> {
    scan_files(dir, "md")
}

/// Files directly inside `dir` with the given extension, sorted by path
pub fn scan_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, IoError> {
    validate_book_dir(dir)?;

    let pattern = format!(
        "{}/*.{extension}",
        glob::Pattern::escape(&dir.to_string_lossy())
    );
    let mut files = glob::glob(&pattern)?
        .filter(|entry| entry.as_ref().map_or(true, |p| p.is_file()))
        .collect::<Result<Vec<_>, _>>()?;
    files.sort();
    Ok(files)
}

pub fn validate_book_dir(path: &Path) -> Result<(), IoError> {
    if !path.is_dir() {
        return Err(IoError::InvalidBookDir(path.to_path_buf()));
    }
    Ok(())
}

/// File name of `path` for display, falling back to the whole path
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
