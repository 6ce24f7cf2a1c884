//! Tests for error handling under adverse filesystem conditions

use depot_fs::{NormalizedPath, RobustnessConfig, io};
use tempfile::tempdir;

#[test]
fn write_new_to_nonexistent_parent_creates_directories() {
    let dir = tempdir().unwrap();
    let path = NormalizedPath::new(dir.path().join("a").join("b").join("blob.bin"));

    io::write_new(&path, b"deep content", RobustnessConfig::default())
        .expect("write_new should create parent directories");

    assert_eq!(io::read_bytes(&path).unwrap(), b"deep content");
}

#[test]
fn read_text_nonexistent_file_returns_error() {
    let dir = tempdir().unwrap();
    let path = NormalizedPath::new(dir.path().join("does_not_exist.txt"));

    assert!(io::read_text(&path).is_err(), "Reading non-existent file should fail");
}

#[cfg(unix)]
mod unix_tests {
    use super::*;
    use std::fs::{self, Permissions};
    use std::os::unix::fs::PermissionsExt;

    fn is_root() -> bool {
        match std::process::Command::new("id").arg("-u").output() {
            Ok(output) => String::from_utf8_lossy(&output.stdout).trim() == "0",
            Err(_) => false,
        }
    }

    #[test]
    fn write_new_to_readonly_directory_returns_error() {
        if is_root() {
            eprintln!("Skipping test: running as root bypasses permission checks");
            return;
        }
        let dir = tempdir().unwrap();
        let readonly_dir = dir.path().join("readonly");
        fs::create_dir(&readonly_dir).unwrap();
        fs::set_permissions(&readonly_dir, Permissions::from_mode(0o555)).unwrap();

        let path = NormalizedPath::new(readonly_dir.join("blob.bin"));
        let result = io::write_new(&path, b"content", RobustnessConfig::default());

        let _ = fs::set_permissions(&readonly_dir, Permissions::from_mode(0o755));

        let err = result.expect_err("Writing to read-only directory should fail");
        assert_eq!(err.io_kind(), Some(std::io::ErrorKind::PermissionDenied));
    }

    #[test]
    fn read_bytes_permission_denied_returns_error() {
        if is_root() {
            eprintln!("Skipping test: running as root bypasses permission checks");
            return;
        }
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("secret.bin");
        fs::write(&file_path, "secret content").unwrap();
        fs::set_permissions(&file_path, Permissions::from_mode(0o000)).unwrap();

        let result = io::read_bytes(&NormalizedPath::new(&file_path));

        let _ = fs::set_permissions(&file_path, Permissions::from_mode(0o644));

        let err = result.expect_err("Reading unreadable file should fail");
        assert_eq!(err.io_kind(), Some(std::io::ErrorKind::PermissionDenied));
    }

    #[test]
    fn write_atomic_unwritable_parent_preserves_original() {
        if is_root() {
            eprintln!("Skipping test: running as root bypasses permission checks");
            return;
        }
        let dir = tempdir().unwrap();
        let parent = dir.path().join("parent");
        fs::create_dir(&parent).unwrap();

        let file_path = parent.join("existing.toml");
        fs::write(&file_path, "original").unwrap();
        fs::set_permissions(&parent, Permissions::from_mode(0o555)).unwrap();

        let result = io::write_atomic(&NormalizedPath::new(&file_path), b"new content", RobustnessConfig::default());

        let _ = fs::set_permissions(&parent, Permissions::from_mode(0o755));

        assert!(result.is_err(), "Writing when parent is read-only should fail");
        assert_eq!(
            fs::read_to_string(&file_path).unwrap(),
            "original",
            "Original file content must be preserved when write fails"
        );
    }
}
