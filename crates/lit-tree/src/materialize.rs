//! Writing stored trees onto the working directory.

use std::fs;
use std::path::Path;

use lit_store::ObjectStore;
use lit_types::{ObjectId, META_DIR};
use tracing::debug;

use crate::error::{TreeError, TreeResult};
use crate::ignore::IgnoreRules;

/// Counts reported by [`materialize`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MaterializeStats {
    pub files: usize,
    pub dirs: usize,
}

/// Remove every top-level entry of `root` except ignored names.
///
/// Only the top level is spared: an ignored name nested inside a removed
/// directory goes with it, so the cleared root rescans as the empty tree.
pub fn clear_workdir(root: &Path, ignore: &IgnoreRules) -> TreeResult<()> {
    let mut removed = 0usize;
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if ignore.is_ignored_os(&entry.file_name()) {
            continue;
        }
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
        removed += 1;
    }
    debug!(root = %root.display(), removed, "cleared working directory");
    Ok(())
}

/// Write the tree `tree_id` from `store` into `dest`.
///
/// Directories are created as needed and files are overwritten. The walk is
/// depth-first over an explicit worklist. A missing or wrong-kind object
/// aborts the walk and leaves whatever was already written in place.
pub fn materialize(
    store: &dyn ObjectStore,
    tree_id: &ObjectId,
    dest: &Path,
) -> TreeResult<MaterializeStats> {
    let mut stats = MaterializeStats::default();
    let mut pending = vec![(*tree_id, dest.to_path_buf())];

    while let Some((id, dir)) = pending.pop() {
        let tree = store.read_tree(&id)?;
        if tree.get(META_DIR).is_some() {
            return Err(TreeError::InvalidPath(format!(
                "tree {id} contains an entry named {META_DIR}"
            )));
        }
        fs::create_dir_all(&dir)?;

        for entry in tree.entries.iter().rev() {
            let path = dir.join(&entry.name);
            if entry.is_dir() {
                fs::create_dir_all(&path)?;
                stats.dirs += 1;
                pending.push((entry.object_id, path));
            } else {
                let blob = store.read_blob(&entry.object_id)?;
                fs::write(&path, &blob.data)?;
                stats.files += 1;
            }
        }
    }

    debug!(
        tree = %tree_id.short_hex(),
        files = stats.files,
        dirs = stats.dirs,
        "materialized tree"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lit_store::{EntryMode, InMemoryObjectStore, StoredObject, Tree, TreeEntry};
    use lit_types::ObjectKind;

    fn write_tree(store: &InMemoryObjectStore, entries: Vec<TreeEntry>) -> ObjectId {
        store.write(&Tree::new(entries).to_stored_object()).unwrap()
    }

    #[test]
    fn clear_keeps_metadata_and_top_level_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join(".lit/objects")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::create_dir_all(root.join("web/node_modules")).unwrap();
        fs::create_dir_all(root.join("src/deep/er")).unwrap();
        fs::write(root.join("web/node_modules/dep.js"), "d").unwrap();
        fs::write(root.join("web/page.html"), "p").unwrap();
        fs::write(root.join("src/deep/er/f.rs"), "f").unwrap();
        fs::write(root.join("top.txt"), "t").unwrap();

        clear_workdir(root, &IgnoreRules::default()).unwrap();

        assert!(root.join(".lit/objects").is_dir());
        assert!(root.join("node_modules/pkg").is_dir());
        assert!(!root.join("web").exists());
        assert!(!root.join("src").exists());
        assert!(!root.join("top.txt").exists());
    }

    #[test]
    fn cleared_root_rescans_as_empty_tree() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("node_modules")).unwrap();
        fs::create_dir_all(root.join("web/node_modules")).unwrap();
        fs::write(root.join("web/node_modules/dep.js"), "d").unwrap();

        clear_workdir(root, &IgnoreRules::default()).unwrap();

        let node = crate::scan_workdir(root, &IgnoreRules::default(), &lit_store::HashOnlySink).unwrap();
        assert!(node.is_empty());
    }

    #[test]
    fn materialize_writes_nested_tree() {
        let store = InMemoryObjectStore::new();
        let a = store.write_blob(b"alpha").unwrap();
        let b = store.write_blob(b"beta").unwrap();
        let empty = write_tree(&store, Vec::new());
        let src = write_tree(
            &store,
            vec![
                TreeEntry::new(EntryMode::Regular, "b.js", b).unwrap(),
                TreeEntry::new(EntryMode::Directory, "empty", empty).unwrap(),
            ],
        );
        let root = write_tree(
            &store,
            vec![
                TreeEntry::new(EntryMode::Regular, "a.txt", a).unwrap(),
                TreeEntry::new(EntryMode::Directory, "src", src).unwrap(),
            ],
        );

        let dir = tempfile::tempdir().unwrap();
        let stats = materialize(&store, &root, dir.path()).unwrap();
        assert_eq!(stats, MaterializeStats { files: 2, dirs: 2 });
        assert_eq!(fs::read(dir.path().join("a.txt")).unwrap(), b"alpha");
        assert_eq!(fs::read(dir.path().join("src/b.js")).unwrap(), b"beta");
        assert!(dir.path().join("src/empty").is_dir());
    }

    #[test]
    fn materialize_missing_blob_fails() {
        let store = InMemoryObjectStore::new();
        let missing = ObjectId::from_hash([9; 20]);
        let root = write_tree(
            &store,
            vec![TreeEntry::new(EntryMode::Regular, "gone.txt", missing).unwrap()],
        );
        let dir = tempfile::tempdir().unwrap();
        let err = materialize(&store, &root, dir.path()).unwrap_err();
        assert!(matches!(err, TreeError::Store(e) if e.is_not_found()));
    }

    #[test]
    fn materialize_rejects_non_tree() {
        let store = InMemoryObjectStore::new();
        let commit = store
            .write(&StoredObject::new(ObjectKind::Commit, b"tree x\n".to_vec()))
            .unwrap();
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            materialize(&store, &commit, dir.path()),
            Err(TreeError::Store(lit_store::StoreError::WrongKind { .. }))
        ));
    }

    #[test]
    fn materialize_refuses_metadata_entry() {
        let store = InMemoryObjectStore::new();
        let blob = store.write_blob(b"evil").unwrap();
        let root = write_tree(
            &store,
            vec![TreeEntry::new(EntryMode::Regular, ".lit", blob).unwrap()],
        );
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            materialize(&store, &root, dir.path()),
            Err(TreeError::InvalidPath(_))
        ));
        assert!(!dir.path().join(".lit").exists());
    }
}
