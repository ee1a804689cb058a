use lit_types::{ObjectId, ObjectKind};

use crate::error::{StoreError, StoreResult};
use crate::object::{Blob, StoredObject, Tree};

/// Content-addressed object store.
///
/// All implementations must satisfy these invariants:
/// - Objects are immutable once written. The same kind and content always
///   produce the same id.
/// - Writing an object that already exists is a no-op returning its id.
/// - Reads never return bytes that fail to hash to the requested id.
/// - All I/O errors are propagated, never silently ignored.
pub trait ObjectStore: Send + Sync {
    /// Read an object by its content-addressed id.
    ///
    /// Returns `Ok(None)` if the object does not exist.
    /// Returns `Err` on I/O failure or data corruption.
    fn read(&self, id: &ObjectId) -> StoreResult<Option<StoredObject>>;

    /// Write an object and return its content-addressed id.
    fn write(&self, object: &StoredObject) -> StoreResult<ObjectId>;

    /// Check whether an object exists in the store.
    fn exists(&self, id: &ObjectId) -> StoreResult<bool>;

    /// Read an object, failing with [`StoreError::NotFound`] if it is absent.
    fn get(&self, id: &ObjectId) -> StoreResult<StoredObject> {
        self.read(id)?.ok_or(StoreError::NotFound(*id))
    }

    /// Read an object and assert its kind.
    fn get_kind(&self, id: &ObjectId, expected: ObjectKind) -> StoreResult<StoredObject> {
        let object = self.get(id)?;
        object.expect_kind(id, expected)?;
        Ok(object)
    }

    /// Read and decode a blob.
    fn read_blob(&self, id: &ObjectId) -> StoreResult<Blob> {
        let object = self.get_kind(id, ObjectKind::Blob)?;
        Ok(Blob::new(object.data))
    }

    /// Read and decode a tree.
    fn read_tree(&self, id: &ObjectId) -> StoreResult<Tree> {
        let object = self.get_kind(id, ObjectKind::Tree)?;
        Tree::decode(&object.data).map_err(|reason| StoreError::Corrupt { id: *id, reason })
    }

    /// Store raw bytes as a blob.
    fn write_blob(&self, data: &[u8]) -> StoreResult<ObjectId> {
        self.write(&StoredObject::new(ObjectKind::Blob, data.to_vec()))
    }
}
