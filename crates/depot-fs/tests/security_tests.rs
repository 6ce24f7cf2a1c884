use depot_fs::path::NormalizedPath;

#[test]
fn test_path_traversal_mitigation() {
    let base = NormalizedPath::new("/var/www");
    let malicious_input = "../../etc/passwd";

    let joined = base.join(malicious_input);

    assert_ne!(
        joined.as_str(),
        "/var/www/../../etc/passwd",
        "Should resolve dot segments"
    );
    assert_eq!(joined.as_str(), "/etc/passwd");
    assert!(!joined.starts_with(&base));
}

#[test]
fn test_join_resolves_dots() {
    let base = NormalizedPath::new("/a/b");

    assert_eq!(base.join("c").as_str(), "/a/b/c");
    assert_eq!(base.join("./c").as_str(), "/a/b/c");
    assert_eq!(base.join("../c").as_str(), "/a/c");
    assert_eq!(base.join("../../c").as_str(), "/c");
    assert_eq!(base.join("../../../../c").as_str(), "/c");
}

#[test]
fn test_sibling_with_shared_prefix_is_not_contained() {
    let root = NormalizedPath::new("/data/cdn");
    let sibling = root.join("../cdn_other/x");

    assert_eq!(sibling.as_str(), "/data/cdn_other/x");
    // A raw string prefix test would accept this path
    assert!(sibling.as_str().starts_with(root.as_str()));
    assert!(!sibling.starts_with(&root));
}

#[test]
fn test_relative_path_sandboxing() {
    let path = NormalizedPath::new("../outside.txt");
    assert_eq!(
        path.as_str(),
        "outside.txt",
        "Leading .. should be dropped for relative paths"
    );

    let path2 = NormalizedPath::new("a/../../b");
    assert_eq!(path2.as_str(), "b");
}

#[test]
#[cfg(unix)]
fn test_write_atomic_rejects_symlink_in_path() {
    use std::os::unix::fs::symlink;
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let real_dir = dir.path().join("real");
    std::fs::create_dir(&real_dir).unwrap();

    let link = dir.path().join("link");
    symlink(&real_dir, &link).unwrap();

    let file_through_link = link.join("file.txt");
    let normalized_path = NormalizedPath::new(&file_through_link);
    let result = depot_fs::io::write_atomic(&normalized_path, b"content", depot_fs::RobustnessConfig::default());

    assert!(result.is_err(), "Should reject writes through symlinks");
    assert!(!real_dir.join("file.txt").exists());
}
