use std::fs;

use routeplay_engine::{artifact_file_name, ensure_output_dir, AtomicFileWriter};
use tempfile::TempDir;

#[test]
fn creates_missing_download_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("downloads");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("route_map.html", b"<html>1</html>").unwrap();
    assert_eq!(first.file_name().unwrap(), "route_map.html");
    assert_eq!(fs::read(&first).unwrap(), b"<html>1</html>");

    let second = writer.write("route_map.html", b"<html>2</html>").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read(&second).unwrap(), b"<html>2</html>");
}

#[test]
fn no_partial_file_when_dir_is_a_file() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    assert!(writer.write("segment_details.csv", b"data").is_err());
    assert!(!file_path.with_file_name("segment_details.csv").exists());
}

#[test]
fn artifact_names_come_from_server_paths() {
    assert_eq!(
        artifact_file_name("/outputs/optimized_route.geojson").unwrap(),
        "optimized_route.geojson"
    );
    assert!(artifact_file_name("/outputs/").is_err());
    assert!(artifact_file_name("/outputs/..").is_err());
}
