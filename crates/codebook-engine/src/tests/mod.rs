use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary book directory
pub fn create_test_book_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Create a test file in the book directory with content
pub fn create_test_file(book_dir: &TempDir, filename: &str, content: &str) -> PathBuf {
    let file_path = book_dir.path().join(filename);
    fs::write(&file_path, content).unwrap();
    file_path
}
