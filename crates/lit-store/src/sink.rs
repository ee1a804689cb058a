//! Write strategies for tree construction.
//!
//! The tree builder runs one algorithm and hands every object it produces to
//! an [`ObjectSink`]. Persisting and hash-only runs differ only in the sink,
//! and both sinks derive the id from [`StoredObject::compute_id`].

use lit_types::{ObjectId, ObjectKind};

use crate::error::StoreResult;
use crate::object::StoredObject;
use crate::traits::ObjectStore;

/// Destination for objects produced while building trees.
pub trait ObjectSink {
    /// Accept an object and return its id.
    fn put(&self, object: &StoredObject) -> StoreResult<ObjectId>;

    /// Accept raw content of `kind`.
    fn put_bytes(&self, kind: ObjectKind, data: Vec<u8>) -> StoreResult<ObjectId> {
        self.put(&StoredObject::new(kind, data))
    }

    /// Whether objects handed to this sink end up in a store.
    fn persists(&self) -> bool;
}

/// Sink that writes every object into an [`ObjectStore`].
pub struct StoreSink<'a> {
    store: &'a dyn ObjectStore,
}

impl<'a> StoreSink<'a> {
    pub fn new(store: &'a dyn ObjectStore) -> Self {
        Self { store }
    }
}

impl ObjectSink for StoreSink<'_> {
    fn put(&self, object: &StoredObject) -> StoreResult<ObjectId> {
        let id = self.store.write(object)?;
        debug_assert_eq!(id, object.compute_id());
        Ok(id)
    }

    fn persists(&self) -> bool {
        true
    }
}

/// Sink that only computes ids. Used for dirty checks.
#[derive(Clone, Copy, Debug, Default)]
pub struct HashOnlySink;

impl ObjectSink for HashOnlySink {
    fn put(&self, object: &StoredObject) -> StoreResult<ObjectId> {
        Ok(object.compute_id())
    }

    fn persists(&self) -> bool {
        false
    }
}
