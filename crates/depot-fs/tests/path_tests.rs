use depot_fs::NormalizedPath;

#[test]
fn test_normalize_forward_slashes() {
    let path = NormalizedPath::new("foo/bar/baz");
    assert_eq!(path.as_str(), "foo/bar/baz");
}

#[test]
fn test_normalize_backslashes_to_forward() {
    let path = NormalizedPath::new("foo\\bar\\baz");
    assert_eq!(path.as_str(), "foo/bar/baz");
}

#[test]
fn test_normalize_collapses_dot_and_empty_segments() {
    let path = NormalizedPath::new("/srv//files/./a/");
    assert_eq!(path.as_str(), "/srv/files/a");
}

#[test]
fn test_join_paths() {
    let base = NormalizedPath::new("/srv/files");
    assert_eq!(base.join("abc").as_str(), "/srv/files/abc");
    assert_eq!(base.join("").as_str(), "/srv/files");
    assert_eq!(base.join(".").as_str(), "/srv/files");
}

#[test]
fn test_join_absolute_segment_replaces_base() {
    let base = NormalizedPath::new("/srv/files");
    assert_eq!(base.join("/etc/passwd").as_str(), "/etc/passwd");
    assert_eq!(base.join("\\etc\\passwd").as_str(), "/etc/passwd");
}

#[test]
fn test_is_absolute() {
    assert!(NormalizedPath::new("/a").is_absolute());
    assert!(NormalizedPath::new("//server/share").is_absolute());
    assert!(!NormalizedPath::new("a/b").is_absolute());
}

#[cfg(windows)]
#[test]
fn test_drive_paths_are_absolute() {
    assert!(NormalizedPath::new("C:\\a").is_absolute());
}

#[cfg(not(windows))]
#[test]
fn test_colon_names_stay_relative() {
    let root = NormalizedPath::new("/srv/files");
    assert!(!NormalizedPath::new("c:foo.png").is_absolute());
    assert_eq!(root.join("c:foo.png").as_str(), "/srv/files/c:foo.png");
    assert!(root.join("c:foo.png").starts_with(&root));
}

#[test]
fn test_starts_with_compares_whole_segments() {
    let root = NormalizedPath::new("/data/cdn");
    assert!(NormalizedPath::new("/data/cdn").starts_with(&root));
    assert!(NormalizedPath::new("/data/cdn/x").starts_with(&root));
    assert!(!NormalizedPath::new("/data/cdn_other/x").starts_with(&root));
    assert!(!NormalizedPath::new("/data").starts_with(&root));
}

#[test]
fn test_starts_with_requires_same_root_prefix() {
    let root = NormalizedPath::new("/data");
    assert!(!NormalizedPath::new("data/x").starts_with(&root));
    assert!(!NormalizedPath::new("//data/x").starts_with(&root));
}

#[test]
fn test_strip_prefix() {
    let root = NormalizedPath::new("/data/cdn");
    let inner = NormalizedPath::new("/data/cdn/a/b.txt");

    assert_eq!(inner.strip_prefix(&root).unwrap().as_str(), "a/b.txt");
    assert_eq!(root.strip_prefix(&root).unwrap().as_str(), "");
    assert!(NormalizedPath::new("/data/cdn_other").strip_prefix(&root).is_none());
}

#[test]
fn test_file_name_and_extension() {
    let path = NormalizedPath::new("/srv/files/0123.tar.gz");
    assert_eq!(path.file_name(), Some("0123.tar.gz"));
    assert_eq!(path.extension(), Some("gz"));
    assert_eq!(NormalizedPath::new("/srv/.hidden").extension(), None);
    assert_eq!(NormalizedPath::new("/").file_name(), None);
}

#[test]
fn test_to_native_returns_pathbuf() {
    let path = NormalizedPath::new("foo/bar");
    let native = path.to_native();
    assert!(native.to_string_lossy().contains("bar"));
}
