use std::fs;

use scan_engine::{ensure_output_dir, AtomicFileWriter, PersistError};
use tempfile::TempDir;

const REPORT: &str = "Health_Report.pdf";

#[test]
fn download_dir_is_created_on_first_save() {
    let temp = TempDir::new().unwrap();
    let downloads = temp.path().join("reports").join("2024");
    let writer = AtomicFileWriter::new(downloads.clone());

    let saved = writer.write(REPORT, b"%PDF-1.4").unwrap();

    assert_eq!(saved, downloads.join(REPORT));
    assert_eq!(fs::read(&saved).unwrap(), b"%PDF-1.4");
}

#[test]
fn second_report_replaces_first_without_leftovers() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    writer.write(REPORT, b"first report").unwrap();
    let saved = writer.write(REPORT, b"second").unwrap();

    assert_eq!(fs::read(&saved).unwrap(), b"second");
    let entries: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(entries, vec![REPORT.to_string()]);
}

#[test]
fn file_in_place_of_download_dir_is_rejected() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("output");
    fs::write(&blocker, "x").unwrap();

    assert!(matches!(
        ensure_output_dir(&blocker),
        Err(PersistError::OutputDir(_))
    ));
    let err = AtomicFileWriter::new(blocker.clone())
        .write(REPORT, b"data")
        .unwrap_err();
    assert!(err.to_string().contains("not a directory"));
    assert!(!temp.path().join(REPORT).exists());
}
