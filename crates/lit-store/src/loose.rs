//! Loose object storage on disk.
//!
//! Layout, relative to the store root:
//!
//! ```text
//! objects/
//!   4b/
//!     825dc642cb6eb9a060e54bf8d69288fbee4904
//! ```
//!
//! Each file holds the zlib-deflated frame `"<kind> <len>\0<content>"`, the
//! same encoding git uses for loose objects. The id is the hash of the
//! inflated frame.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lit_crypto::ObjectHasher;
use lit_types::ObjectId;
use tracing::debug;

use crate::codec::{decode_framed, encode_framed};
use crate::error::{StoreError, StoreResult};
use crate::object::StoredObject;
use crate::traits::ObjectStore;

/// Default zlib level for new objects.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// One compressed file per object, sharded by the first two hex characters.
#[derive(Clone, Debug)]
pub struct LooseObjectStore {
    root: PathBuf,
    level: u32,
}

impl LooseObjectStore {
    /// Open a store rooted at `root` (usually `.lit/objects`).
    ///
    /// The directory is created lazily on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            level: DEFAULT_COMPRESSION_LEVEL,
        }
    }

    /// Use a different zlib compression level (0-9) for writes.
    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.level = level.min(9);
        self
    }

    /// The store root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file that holds `id`.
    pub fn object_path(&self, id: &ObjectId) -> PathBuf {
        self.root.join(id.shard()).join(id.shard_suffix())
    }

    fn decode(&self, id: &ObjectId, compressed: &[u8]) -> StoreResult<StoredObject> {
        let mut raw = Vec::new();
        ZlibDecoder::new(compressed)
            .read_to_end(&mut raw)
            .map_err(|e| StoreError::Corrupt {
                id: *id,
                reason: format!("inflate failed: {e}"),
            })?;
        let (header, content) =
            decode_framed(&raw).map_err(|reason| StoreError::Corrupt { id: *id, reason })?;

        let computed = ObjectHasher::hash_framed(&raw);
        if computed != *id {
            return Err(StoreError::HashMismatch { id: *id, computed });
        }
        Ok(StoredObject::new(header.kind, content.to_vec()))
    }
}

impl ObjectStore for LooseObjectStore {
    fn read(&self, id: &ObjectId) -> StoreResult<Option<StoredObject>> {
        let path = self.object_path(id);
        let compressed = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let object = self.decode(id, &compressed)?;
        debug!(id = %id.short_hex(), kind = %object.kind, size = object.size, "read object");
        Ok(Some(object))
    }

    fn write(&self, object: &StoredObject) -> StoreResult<ObjectId> {
        let raw = encode_framed(object.kind, &object.data);
        let id = ObjectHasher::hash_framed(&raw);
        let path = self.object_path(&id);

        // Content addressing: an existing file already holds these bytes.
        if path.exists() {
            debug!(id = %id.short_hex(), "object already present");
            return Ok(id);
        }

        let shard_dir = self.root.join(id.shard());
        fs::create_dir_all(&shard_dir)?;
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(self.level));
        encoder.write_all(&raw)?;
        let compressed = encoder.finish()?;

        let mut tmp = tempfile::NamedTempFile::new_in(&shard_dir)?;
        tmp.write_all(&compressed)?;
        tmp.as_file().sync_all()?;
        if let Err(e) = tmp.persist(&path) {
            // A concurrent writer may have produced the same object.
            if !path.exists() {
                return Err(e.error.into());
            }
        }

        debug!(id = %id.short_hex(), kind = %object.kind, size = object.size, "wrote object");
        Ok(id)
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.object_path(id).is_file())
    }
}
