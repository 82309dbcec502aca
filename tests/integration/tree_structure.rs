//! Integration tests for tree shape: keys, ordering, aggregation

use super::test_utils::sample_tree;
use dirhash::tree::builder::TreeBuilder;
use dirhash::tree::hasher::{compute_content_hash, Hasher};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_sample_tree_digests() {
    let (_temp_dir, root) = sample_tree();
    let tree = TreeBuilder::new(root).build().unwrap();

    let keys: Vec<&str> = tree.entries.keys().map(|k| k.as_str()).collect();
    assert_eq!(keys, vec!["R", "R/a.txt", "R/sub", "R/sub/b.txt"]);

    let hasher = Hasher::default();
    let a = compute_content_hash(b"hi");
    let b = compute_content_hash(b"");
    let sub = hasher.hash_children([&b]);
    let r = hasher.hash_children([&a, &sub]);

    assert_eq!(tree.get("R/a.txt"), Some(a));
    assert_eq!(tree.get("R/sub/b.txt"), Some(b));
    assert_eq!(tree.get("R/sub"), Some(sub));
    assert_eq!(tree.root_digest, r);
}

#[test]
fn test_empty_directory_is_hash_of_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("empty");
    fs::create_dir(&root).unwrap();

    let tree = TreeBuilder::new(root).build().unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.root_digest, compute_content_hash(b""));
}

#[test]
fn test_nested_empty_directories_counted() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("R");
    fs::create_dir_all(root.join("a").join("b").join("c")).unwrap();

    let tree = TreeBuilder::new(root).build().unwrap();
    assert_eq!(tree.len(), 4);
    assert!(tree.get("R/a/b/c").is_some());
}

#[test]
fn test_single_file_root() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("only.txt");
    fs::write(&file, "hi").unwrap();

    let tree = TreeBuilder::new(file).build().unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.root_key.as_str(), "only.txt");
    assert_eq!(tree.root_digest, compute_content_hash(b"hi"));
}

#[test]
fn test_relative_root_resolves_to_absolute() {
    let (_temp_dir, root) = sample_tree();
    let dotted = root.join("sub").join("..");

    let tree = TreeBuilder::new(dotted).build().unwrap();
    assert!(tree.root_path.is_absolute());
    assert_eq!(tree.root_key.as_str(), "R");
    assert_eq!(tree.len(), 4);
}

#[test]
fn test_name_order_is_bytewise() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("R");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("b"), "lower").unwrap();
    fs::write(root.join("B"), "upper").unwrap();
    fs::write(root.join("a"), "lower a").unwrap();

    let tree = TreeBuilder::new(root).build().unwrap();
    let keys: Vec<&str> = tree.entries.keys().map(|k| k.as_str()).collect();
    assert_eq!(keys, vec!["R", "R/B", "R/a", "R/b"]);

    let hasher = Hasher::default();
    let expected = hasher.hash_children([
        &compute_content_hash(b"upper"),
        &compute_content_hash(b"lower a"),
        &compute_content_hash(b"lower"),
    ]);
    assert_eq!(tree.root_digest, expected);
}
