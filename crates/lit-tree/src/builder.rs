//! Bottom-up tree hashing over a [`FolderNode`].
//!
//! The walk uses an explicit stack of frames instead of recursion, so deep
//! directory nesting cannot exhaust the call stack. A frame is finished only
//! once every child directory has produced its id, which keeps the
//! children-before-parents order the hashes depend on.

use std::collections::btree_map;

use lit_store::{EntryMode, ObjectSink, Tree, TreeEntry};
use lit_types::ObjectId;
use tracing::debug;

use crate::error::TreeResult;
use crate::node::FolderNode;

/// Hashes folder nodes into tree objects through an [`ObjectSink`].
///
/// Whether the trees are persisted is decided by the sink alone; the
/// algorithm is the same either way.
pub struct TreeBuilder<'s> {
    sink: &'s dyn ObjectSink,
}

struct Frame<'a> {
    name: Option<&'a str>,
    node: &'a FolderNode,
    pending: btree_map::Iter<'a, String, FolderNode>,
    child_ids: Vec<(&'a str, ObjectId)>,
}

impl<'a> Frame<'a> {
    fn new(name: Option<&'a str>, node: &'a FolderNode) -> Self {
        Self {
            name,
            node,
            pending: node.dirs.iter(),
            child_ids: Vec::with_capacity(node.dirs.len()),
        }
    }
}

impl<'s> TreeBuilder<'s> {
    pub fn new(sink: &'s dyn ObjectSink) -> Self {
        Self { sink }
    }

    /// Hash `root` and every directory below it, returning the root tree id.
    pub fn build(&self, root: &FolderNode) -> TreeResult<ObjectId> {
        let mut stack = vec![Frame::new(None, root)];
        let mut trees = 0usize;

        while let Some(mut frame) = stack.pop() {
            if let Some((name, child)) = frame.pending.next() {
                stack.push(frame);
                stack.push(Frame::new(Some(name.as_str()), child));
                continue;
            }

            let id = self.write_node(frame.node, &frame.child_ids)?;
            trees += 1;

            match (stack.last_mut(), frame.name) {
                (Some(parent), Some(name)) => parent.child_ids.push((name, id)),
                _ => {
                    debug!(
                        tree = %id.short_hex(),
                        trees,
                        persisted = self.sink.persists(),
                        "built tree"
                    );
                    return Ok(id);
                }
            }
        }

        unreachable!("root frame returns before the stack drains")
    }

    fn write_node(&self, node: &FolderNode, child_ids: &[(&str, ObjectId)]) -> TreeResult<ObjectId> {
        let mut entries = Vec::with_capacity(node.files.len() + child_ids.len());
        for (name, id) in &node.files {
            entries.push(TreeEntry::new(EntryMode::Regular, name.as_str(), *id)?);
        }
        for (name, id) in child_ids {
            entries.push(TreeEntry::new(EntryMode::Directory, *name, *id)?);
        }
        let tree = Tree::new(entries);
        Ok(self.sink.put(&tree.to_stored_object())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lit_crypto::EMPTY_TREE;
    use lit_store::{HashOnlySink, InMemoryObjectStore, ObjectStore, StoreSink};

    fn blob(store: &InMemoryObjectStore, content: &[u8]) -> ObjectId {
        store.write_blob(content).unwrap()
    }

    #[test]
    fn empty_node_is_empty_tree() {
        let id = TreeBuilder::new(&HashOnlySink).build(&FolderNode::new()).unwrap();
        assert_eq!(id, EMPTY_TREE);
    }

    #[test]
    fn nested_layout_matches_line_format() {
        let store = InMemoryObjectStore::new();
        let h1 = blob(&store, b"alpha\n");
        let h2 = blob(&store, b"console.log(1)\n");

        let mut root = FolderNode::new();
        root.insert_file("a.txt", h1).unwrap();
        root.insert_file("src/b.js", h2).unwrap();

        let sink = StoreSink::new(&store);
        let root_id = TreeBuilder::new(&sink).build(&root).unwrap();

        let child = Tree::new(vec![TreeEntry::new(EntryMode::Regular, "b.js", h2).unwrap()]);
        assert_eq!(child.encode(), format!("100644 blob {h2} b.js\n").into_bytes());
        let ht = child.to_stored_object().compute_id();

        let stored = store.get(&root_id).unwrap();
        assert_eq!(
            stored.data,
            format!("100644 blob {h1} a.txt\n040000 tree {ht} src\n").into_bytes()
        );
        assert!(store.exists(&ht).unwrap());
    }

    #[test]
    fn hash_only_matches_persisting() {
        let store = InMemoryObjectStore::new();
        let mut root = FolderNode::new();
        root.insert_file("z/y/x/deep.txt", blob(&store, b"deep")).unwrap();
        root.insert_file("top.txt", blob(&store, b"top")).unwrap();
        root.ensure_dir("empty").unwrap();

        let before = store.len();
        let hashed = TreeBuilder::new(&HashOnlySink).build(&root).unwrap();
        assert_eq!(store.len(), before);

        let sink = StoreSink::new(&store);
        let written = TreeBuilder::new(&sink).build(&root).unwrap();
        assert_eq!(hashed, written);
        // root, z, z/y, z/y/x and the shared empty tree
        assert_eq!(store.len(), before + 5);
    }

    #[test]
    fn deep_nesting_does_not_recurse() {
        let path = vec!["d"; 500].join("/") + "/leaf";
        let mut root = FolderNode::new();
        root.insert_file(&path, ObjectId::from_hash([1; 20])).unwrap();
        let id = TreeBuilder::new(&HashOnlySink).build(&root).unwrap();
        assert_ne!(id, EMPTY_TREE);
    }
}
