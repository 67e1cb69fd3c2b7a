//! Tests for the real FileSystem implementation

use std::fs;

use tempfile::TempDir;

use tocsmith::infrastructure::traits::{FileSystem, RealFileSystem};

#[test]
fn given_written_file_when_reading_then_same_content() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("toc.json");
    let fs = RealFileSystem;

    // Act
    fs.write(&path, "{\"chapters\": []}").unwrap();

    // Assert
    assert!(fs.exists(&path));
    assert!(fs.is_file(&path));
    assert_eq!(fs.read_to_string(&path).unwrap(), "{\"chapters\": []}");
}

#[test]
fn given_nested_dir_when_create_dir_all_then_exists_but_not_file() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("a/b/c");
    let fs = RealFileSystem;

    // Act
    fs.create_dir_all(&dir).unwrap();

    // Assert
    assert!(fs.exists(&dir));
    assert!(!fs.is_file(&dir));
}

#[test]
fn given_missing_file_when_reading_then_not_found() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let fs = RealFileSystem;

    // Act
    let err = fs.read_to_string(&temp.path().join("absent.txt")).unwrap_err();

    // Assert
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    assert!(fs::metadata(temp.path()).is_ok());
}
