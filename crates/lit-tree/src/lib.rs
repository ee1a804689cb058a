//! Tree builder for lit.
//!
//! Converts a flat staging index or a live working directory into a nested
//! Merkle tree of blob and tree objects, and writes stored trees back onto
//! disk.
//!
//! Both sources fill the same [`FolderNode`] structure and are hashed by the
//! same [`TreeBuilder`], so a given set of `(path, content)` pairs yields one
//! tree id whichever path produced it. Whether objects are persisted depends
//! only on the [`ObjectSink`](lit_store::ObjectSink) passed in.

pub mod builder;
pub mod error;
pub mod ignore;
pub mod materialize;
pub mod node;
pub mod workdir;

use std::path::Path;

use lit_index::Index;
use lit_store::ObjectSink;
use lit_types::ObjectId;

pub use builder::TreeBuilder;
pub use error::{TreeError, TreeResult};
pub use ignore::IgnoreRules;
pub use materialize::{clear_workdir, materialize, MaterializeStats};
pub use node::FolderNode;
pub use workdir::scan_workdir;

/// Tree id of the staged paths in `index`.
pub fn tree_from_index(index: &Index, sink: &dyn ObjectSink) -> TreeResult<ObjectId> {
    let node = FolderNode::from_index(index)?;
    TreeBuilder::new(sink).build(&node)
}

/// Tree id of the working directory at `root`.
pub fn tree_from_workdir(
    root: &Path,
    ignore: &IgnoreRules,
    sink: &dyn ObjectSink,
) -> TreeResult<ObjectId> {
    let node = scan_workdir(root, ignore, sink)?;
    TreeBuilder::new(sink).build(&node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::fs;

    use lit_crypto::EMPTY_TREE;
    use lit_store::{Blob, HashOnlySink, InMemoryObjectStore, ObjectStore, StoreSink, Tree};
    use proptest::prelude::*;

    fn write_files(root: &Path, files: &BTreeMap<String, Vec<u8>>) {
        for (path, content) in files {
            let full = root.join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, content).unwrap();
        }
    }

    fn index_of(files: &BTreeMap<String, Vec<u8>>) -> Index {
        let mut index = Index::new();
        for (path, content) in files {
            index.stage(path, Blob::id_of(content)).unwrap();
        }
        index
    }

    /// Re-hash a stored tree and all subtrees from their decoded lines.
    fn rehash_stored(store: &InMemoryObjectStore, id: &ObjectId) -> ObjectId {
        let tree = store.read_tree(id).unwrap();
        let mut entries = Vec::new();
        for mut entry in tree.entries {
            if entry.is_dir() {
                entry.object_id = rehash_stored(store, &entry.object_id);
            }
            entries.push(entry);
        }
        Tree::new(entries).to_stored_object().compute_id()
    }

    #[test]
    fn empty_inputs_hash_to_empty_tree() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(".lit")).unwrap();
        assert_eq!(tree_from_index(&Index::new(), &HashOnlySink).unwrap(), EMPTY_TREE);
        assert_eq!(
            tree_from_workdir(dir.path(), &IgnoreRules::default(), &HashOnlySink).unwrap(),
            EMPTY_TREE
        );
    }

    #[test]
    fn staged_scenario_serialization() {
        let store = InMemoryObjectStore::new();
        let h1 = store.write_blob(b"a\n").unwrap();
        let h2 = store.write_blob(b"b\n").unwrap();
        let mut index = Index::new();
        index.stage("a.txt", h1).unwrap();
        index.stage("src/b.js", h2).unwrap();

        let root = tree_from_index(&index, &StoreSink::new(&store)).unwrap();
        let ht = lit_crypto::ObjectHasher::hash(
            lit_types::ObjectKind::Tree,
            format!("100644 blob {h2} b.js\n").as_bytes(),
        );
        assert_eq!(
            store.get(&root).unwrap().data,
            format!("100644 blob {h1} a.txt\n040000 tree {ht} src\n").into_bytes()
        );
    }

    #[test]
    fn materialized_tree_rescans_to_same_id() {
        let mut files = BTreeMap::new();
        files.insert("a.txt".to_string(), b"one".to_vec());
        files.insert("src/lib/b.rs".to_string(), b"two".to_vec());
        let src = tempfile::tempdir().unwrap();
        write_files(src.path(), &files);

        let store = InMemoryObjectStore::new();
        let rules = IgnoreRules::default();
        let id = tree_from_workdir(src.path(), &rules, &StoreSink::new(&store)).unwrap();

        let dest = tempfile::tempdir().unwrap();
        materialize(&store, &id, dest.path()).unwrap();
        assert_eq!(tree_from_workdir(dest.path(), &rules, &HashOnlySink).unwrap(), id);
    }

    #[test]
    fn index_conflict_is_reported() {
        let mut index = Index::new();
        index.stage("x", ObjectId::from_hash([1; 20])).unwrap();
        index.stage("x/y", ObjectId::from_hash([2; 20])).unwrap();
        assert!(matches!(
            tree_from_index(&index, &HashOnlySink),
            Err(TreeError::PathConflict(_))
        ));
    }

    fn file_sets() -> impl Strategy<Value = BTreeMap<String, Vec<u8>>> {
        proptest::collection::btree_map(
            "[a-zA-Z0-9_]{1,5}(/[a-zA-Z0-9_ .]{1,5}){0,2}",
            proptest::collection::vec(any::<u8>(), 0..64),
            0..10,
        )
        .prop_filter("no path may be both file and directory", |files| {
            files.keys().all(|a| {
                files
                    .keys()
                    .all(|b| !b.starts_with(&format!("{a}/")))
            })
        })
        .prop_filter("no dot segments", |files| {
            files
                .keys()
                .all(|p| p.split('/').all(|s| s != "." && s != ".." && s != ".lit"))
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn disk_index_and_stored_paths_agree(files in file_sets()) {
            let dir = tempfile::tempdir().unwrap();
            write_files(dir.path(), &files);

            let store = InMemoryObjectStore::new();
            let from_disk = tree_from_workdir(dir.path(), &IgnoreRules::none(), &HashOnlySink).unwrap();
            let from_index = tree_from_index(&index_of(&files), &StoreSink::new(&store)).unwrap();
            let reconstructed = rehash_stored(&store, &from_index);

            prop_assert_eq!(from_disk, from_index);
            prop_assert_eq!(from_index, reconstructed);
        }
    }
}
