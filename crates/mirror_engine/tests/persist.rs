use std::fs;

use mirror_engine::{ensure_output_dir, AtomicFileWriter, PersistError};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn page_directory_is_created_with_parents() {
    let root = TempDir::new().unwrap();
    let page_dir = root.path().join("mirror").join("example.com_a_b");

    ensure_output_dir(&page_dir).unwrap();

    assert!(page_dir.is_dir());
    assert_eq!(fs::read_dir(&page_dir).unwrap().count(), 0);
}

#[test]
fn rerun_keeps_files_from_earlier_runs() {
    let root = TempDir::new().unwrap();
    let page_dir = root.path().join("example.com_page");
    fs::create_dir(&page_dir).unwrap();
    fs::write(page_dir.join("old.css"), "from last time").unwrap();

    ensure_output_dir(&page_dir).unwrap();
    AtomicFileWriter::new(page_dir.clone())
        .write("index.html", "<html></html>")
        .unwrap();

    assert_eq!(
        fs::read_to_string(page_dir.join("old.css")).unwrap(),
        "from last time"
    );
    assert!(page_dir.join("index.html").is_file());
}

#[test]
fn file_in_place_of_directory_is_rejected() {
    let root = TempDir::new().unwrap();
    let occupied = root.path().join("example.com_page");
    fs::write(&occupied, "x").unwrap();

    let err = ensure_output_dir(&occupied).unwrap_err();
    assert!(matches!(err, PersistError::NotADirectory { .. }));
}

#[test]
fn same_name_is_replaced_last_write_wins() {
    let root = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(root.path().to_path_buf());

    let first = writer.write("styles.css", "a{}").unwrap();
    let second = writer.write("styles.css", "b{}").unwrap();

    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(second).unwrap(), "b{}");
    assert_eq!(fs::read_dir(root.path()).unwrap().count(), 1);
}

#[test]
fn image_bytes_are_written_verbatim() {
    let root = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(root.path().to_path_buf());
    let png = vec![0x89, b'P', b'N', b'G', 0x00, 0xff];

    let path = writer.write("logo.png", &png).unwrap();
    assert_eq!(fs::read(path).unwrap(), png);
}

#[test]
fn names_with_separators_never_leave_the_directory() {
    let root = TempDir::new().unwrap();
    let page_dir = root.path().join("page");
    fs::create_dir(&page_dir).unwrap();
    let writer = AtomicFileWriter::new(page_dir);

    let err = writer.write("../escaped.css", "x").unwrap_err();

    assert!(matches!(err, PersistError::InvalidFilename { .. }));
    assert!(!root.path().join("escaped.css").exists());
}

#[test]
fn failed_write_leaves_nothing_behind() {
    let root = TempDir::new().unwrap();
    let not_a_dir = root.path().join("not_a_dir");
    fs::write(&not_a_dir, "x").unwrap();

    let err = AtomicFileWriter::new(not_a_dir.clone())
        .write("index.html", "data")
        .unwrap_err();

    assert!(matches!(err, PersistError::Write { .. }));
    assert_eq!(fs::read_to_string(&not_a_dir).unwrap(), "x");
    assert!(!root.path().join("index.html").exists());
}
