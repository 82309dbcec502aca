//! Property-based tests for determinism guarantees

use dirhash::output::render_line;
use dirhash::tree::builder::{Strategy, TreeBuilder};
use dirhash::tree::hasher::{self, HashAlgorithm, Hasher};
use dirhash::tree::path::PathKey;
use dirhash::types::Digest;
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use tempfile::TempDir;

proptest! {
    /// Hex form is always 128 lowercase characters and parses back
    #[test]
    fn prop_hex_is_fixed_width(bytes in any::<[u8; 32]>(), tail in any::<[u8; 32]>()) {
        let mut raw = [0u8; 64];
        raw[..32].copy_from_slice(&bytes);
        raw[32..].copy_from_slice(&tail);
        let digest = Digest::from_bytes(raw);

        let hex = digest.to_hex();
        prop_assert_eq!(hex.len(), 128);
        prop_assert!(hex.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
        prop_assert_eq!(hex.parse::<Digest>().unwrap(), digest);
    }

    /// Chunk size never affects a content digest
    #[test]
    fn prop_buffer_size_irrelevant(content in proptest::collection::vec(any::<u8>(), 0..4096), buffer in 1usize..512) {
        let hasher = Hasher::new(HashAlgorithm::Sha512, buffer);
        let streamed = hasher.hash_bytes(&content[..]).unwrap();
        prop_assert_eq!(streamed, hasher::compute_content_hash(&content));
    }

    /// Keys order exactly as their string forms do
    #[test]
    fn prop_keys_order_as_strings(
        left in proptest::collection::vec("[a-z.\\- ]{1,4}", 1..4),
        right in proptest::collection::vec("[a-z.\\- ]{1,4}", 1..4),
    ) {
        let build = |names: &[String]| {
            names
                .iter()
                .fold(PathKey::parse("R").unwrap(), |key, name| key.child(name))
        };
        let a = build(&left);
        let b = build(&right);

        prop_assert_eq!(a.cmp(&b), a.as_str().as_bytes().cmp(b.as_str().as_bytes()));
    }

    /// Indentation grows four spaces per level below the root's children
    #[test]
    fn prop_indent_width(depth in 1usize..8) {
        let mut key = PathKey::parse("R").unwrap();
        for i in 0..depth {
            key = key.child(&format!("n{}", i));
        }
        let line = render_line(&key, &hasher::compute_content_hash(b""));
        let indent = line.len() - line.trim_start().len();
        prop_assert_eq!(indent, 4 * (depth + 1).saturating_sub(2));
    }
}

/// Test that tree digests do not depend on the strategy used
#[test]
fn test_tree_determinism_property() {
    let mut config = proptest::test_runner::Config::default();
    config.cases = 16;
    let mut runner = proptest::test_runner::TestRunner::new(config);

    let files = proptest::collection::btree_map(
        "[a-c]{1,2}(/[a-c]{1,2}){0,2}\\.f",
        proptest::collection::vec(any::<u8>(), 0..64),
        1..12,
    );

    runner
        .run(&files, |files: BTreeMap<String, Vec<u8>>| {
            let temp_dir = TempDir::new().unwrap();
            let root = temp_dir.path().join("R");
            fs::create_dir(&root).unwrap();
            for (rel, content) in &files {
                let path = root.join(rel);
                fs::create_dir_all(path.parent().unwrap()).unwrap();
                fs::write(path, content).unwrap();
            }

            let sequential = TreeBuilder::new(root.clone())
                .with_strategy(Strategy::Sequential)
                .build()
                .unwrap();
            let parallel = TreeBuilder::new(root.clone())
                .with_strategy(Strategy::Parallel { threads: 3 })
                .build()
                .unwrap();

            prop_assert_eq!(&sequential.entries, &parallel.entries);
            for rel in files.keys() {
                let key = format!("R/{}", rel);
                prop_assert!(sequential.get(&key).is_some());
            }
            Ok(())
        })
        .unwrap();
}
