use sha1::{Digest, Sha1};
use lit_types::{ObjectId, ObjectKind};

/// Id of the tree with zero entries (zero content bytes).
///
/// This is the "nothing staged, nothing committed" sentinel and matches the
/// value the tree builder computes for an empty input.
pub const EMPTY_TREE: ObjectId = ObjectId::from_hash([
    0x4b, 0x82, 0x5d, 0xc6, 0x42, 0xcb, 0x6e, 0xb9, 0xa0, 0x60, 0xe5, 0x4b, 0xf8, 0xd6, 0x92,
    0x88, 0xfb, 0xee, 0x49, 0x04,
]);

/// SHA-1 hasher over the canonical object frame.
pub struct ObjectHasher {
    inner: Sha1,
}

impl ObjectHasher {
    /// Start hashing an object of `kind` whose content is `len` bytes long.
    pub fn new(kind: ObjectKind, len: usize) -> Self {
        let mut inner = Sha1::new();
        inner.update(kind.as_str().as_bytes());
        inner.update(b" ");
        inner.update(len.to_string().as_bytes());
        inner.update([0u8]);
        Self { inner }
    }

    /// Feed content bytes.
    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    /// Finish and return the object id.
    pub fn finish(self) -> ObjectId {
        let digest: [u8; 20] = self.inner.finalize().into();
        ObjectId::from_hash(digest)
    }

    /// Hash a complete object in one call.
    pub fn hash(kind: ObjectKind, content: &[u8]) -> ObjectId {
        let mut hasher = Self::new(kind, content.len());
        hasher.update(content);
        hasher.finish()
    }

    /// Hash already-framed bytes (header included), as stored on disk
    /// before compression.
    pub fn hash_framed(raw: &[u8]) -> ObjectId {
        let digest: [u8; 20] = Sha1::digest(raw).into();
        ObjectId::from_hash(digest)
    }

    /// Verify that `content` of `kind` hashes to `expected`.
    pub fn verify(kind: ObjectKind, content: &[u8], expected: &ObjectId) -> bool {
        Self::hash(kind, content) == *expected
    }
}
