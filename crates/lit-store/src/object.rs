use std::fmt;

use lit_crypto::ObjectHasher;
use lit_types::{ObjectId, ObjectKind};

use crate::error::{StoreError, StoreResult};

/// A stored object: kind tag + content bytes + cached size.
///
/// `StoredObject` is the unit of storage. The store never interprets the
/// content; typed views ([`Blob`], [`Tree`], commits) decode it on demand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    /// The kind of this object.
    pub kind: ObjectKind,
    /// The content bytes (without the header).
    pub data: Vec<u8>,
    /// The size of `data` in bytes.
    pub size: u64,
}

impl StoredObject {
    /// Create a new stored object from kind and content.
    pub fn new(kind: ObjectKind, data: Vec<u8>) -> Self {
        let size = data.len() as u64;
        Self { kind, data, size }
    }

    /// Compute the content-addressed id of this object.
    pub fn compute_id(&self) -> ObjectId {
        ObjectHasher::hash(self.kind, &self.data)
    }

    /// Fail with [`StoreError::WrongKind`] unless this object is `expected`.
    pub fn expect_kind(&self, id: &ObjectId, expected: ObjectKind) -> StoreResult<()> {
        if self.kind != expected {
            return Err(StoreError::WrongKind {
                id: *id,
                expected,
                actual: self.kind,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Blob
// ---------------------------------------------------------------------------

/// Raw file content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blob {
    pub data: Vec<u8>,
}

impl Blob {
    /// Create a new blob from raw bytes.
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Id of `data` as a blob, without building an object.
    pub fn id_of(data: &[u8]) -> ObjectId {
        ObjectHasher::hash(ObjectKind::Blob, data)
    }

    /// Convert into a `StoredObject` for storage.
    pub fn to_stored_object(&self) -> StoredObject {
        StoredObject::new(ObjectKind::Blob, self.data.clone())
    }

    /// Decode from a `StoredObject`.
    pub fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        obj.expect_kind(&obj.compute_id(), ObjectKind::Blob)?;
        Ok(Self {
            data: obj.data.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

/// File mode for a tree entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntryMode {
    /// Regular file (`100644`), points at a blob.
    Regular,
    /// Subdirectory (`040000`), points at a tree.
    Directory,
}

impl EntryMode {
    /// The six-digit mode string written into tree lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "100644",
            Self::Directory => "040000",
        }
    }

    /// The object kind an entry of this mode refers to.
    pub fn object_kind(&self) -> ObjectKind {
        match self {
            Self::Regular => ObjectKind::Blob,
            Self::Directory => ObjectKind::Tree,
        }
    }

    /// Parse a mode string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "100644" => Some(Self::Regular),
            "040000" => Some(Self::Directory),
            _ => None,
        }
    }
}

impl fmt::Display for EntryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single entry in a tree object.
///
/// Serialized as one line: `<mode> <kind> <hash> <name>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeEntry {
    /// File mode (regular file or directory).
    pub mode: EntryMode,
    /// Entry name (a single path segment).
    pub name: String,
    /// Id of the referenced blob or tree.
    pub object_id: ObjectId,
}

impl TreeEntry {
    /// Create a new tree entry, validating the name.
    pub fn new(mode: EntryMode, name: impl Into<String>, object_id: ObjectId) -> StoreResult<Self> {
        let name = name.into();
        validate_entry_name(&name).map_err(StoreError::InvalidEntry)?;
        Ok(Self {
            mode,
            name,
            object_id,
        })
    }

    /// The kind of object this entry points at.
    pub fn kind(&self) -> ObjectKind {
        self.mode.object_kind()
    }

    /// Returns `true` if this entry is a subdirectory.
    pub fn is_dir(&self) -> bool {
        self.mode == EntryMode::Directory
    }

    /// The serialized line, without the newline.
    pub fn to_line(&self) -> String {
        format!(
            "{} {} {} {}",
            self.mode,
            self.kind(),
            self.object_id,
            self.name
        )
    }

    /// Parse one tree line.
    ///
    /// The name is everything after the third space, so names may contain
    /// spaces.
    pub fn parse_line(line: &str) -> Result<Self, String> {
        let mut parts = line.splitn(4, ' ');
        let (Some(mode), Some(kind), Some(hash), Some(name)) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(format!("expected 4 fields in tree line {line:?}"));
        };

        let mode = EntryMode::parse(mode).ok_or_else(|| format!("unknown mode {mode:?}"))?;
        let kind = kind.parse::<ObjectKind>().map_err(|e| e.to_string())?;
        if kind != mode.object_kind() {
            return Err(format!("mode {mode} does not match kind {kind}"));
        }
        let object_id = ObjectId::from_hex(hash).map_err(|e| format!("bad hash {hash:?}: {e}"))?;
        validate_entry_name(name)?;

        Ok(Self {
            mode,
            name: name.to_string(),
            object_id,
        })
    }

    /// Canonical ordering key: files before directories, then name bytes.
    fn order_key(&self) -> (bool, &[u8]) {
        (self.is_dir(), self.name.as_bytes())
    }
}

/// Check that `name` is usable as a single tree entry name.
pub fn validate_entry_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("entry name must not be empty".into());
    }
    if name == "." || name == ".." {
        return Err(format!("entry name {name:?} is reserved"));
    }
    if let Some(ch) = name.chars().find(|c| matches!(c, '/' | '\0' | '\n')) {
        return Err(format!("entry name {name:?} contains {ch:?}"));
    }
    Ok(())
}

/// Directory listing object.
///
/// Entries are ordered files first, then directories, each group sorted by
/// the raw bytes of the name. This order is independent of locale and of the
/// code path that produced the tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tree {
    pub entries: Vec<TreeEntry>,
}

impl Tree {
    /// Create a tree, putting entries into canonical order.
    pub fn new(mut entries: Vec<TreeEntry>) -> Self {
        entries.sort_by(|a, b| a.order_key().cmp(&b.order_key()));
        Self { entries }
    }

    /// Create an empty tree.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Serialize to tree content: newline-terminated lines, or zero bytes
    /// when there are no entries.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&entry.to_line());
            out.push('\n');
        }
        out.into_bytes()
    }

    /// Parse tree content, preserving the stored line order.
    pub fn decode(content: &[u8]) -> Result<Self, String> {
        let text = std::str::from_utf8(content).map_err(|_| "tree content is not UTF-8".to_string())?;
        if text.is_empty() {
            return Ok(Self::empty());
        }
        let body = text
            .strip_suffix('\n')
            .ok_or_else(|| "tree content is not newline-terminated".to_string())?;
        let entries = body
            .split('\n')
            .map(TreeEntry::parse_line)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { entries })
    }

    /// Convert into a `StoredObject` for storage.
    pub fn to_stored_object(&self) -> StoredObject {
        StoredObject::new(ObjectKind::Tree, self.encode())
    }

    /// Decode from a `StoredObject`.
    pub fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        let id = obj.compute_id();
        obj.expect_kind(&id, ObjectKind::Tree)?;
        Self::decode(&obj.data).map_err(|reason| StoreError::Corrupt { id, reason })
    }

    /// Look up an entry by name.
    pub fn get(&self, name: &str) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the tree has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lit_crypto::EMPTY_TREE;

    fn id(byte: u8) -> ObjectId {
        ObjectId::from_hash([byte; 20])
    }

    #[test]
    fn blob_roundtrip() {
        let blob = Blob::new(b"hello world".to_vec());
        let stored = blob.to_stored_object();
        let decoded = Blob::from_stored_object(&stored).unwrap();
        assert_eq!(blob, decoded);
    }

    #[test]
    fn blob_kind_mismatch() {
        let stored = StoredObject::new(ObjectKind::Tree, Vec::new());
        let err = Blob::from_stored_object(&stored).unwrap_err();
        assert!(matches!(
            err,
            StoreError::WrongKind {
                expected: ObjectKind::Blob,
                actual: ObjectKind::Tree,
                ..
            }
        ));
    }

    #[test]
    fn files_sort_before_directories() {
        let tree = Tree::new(vec![
            TreeEntry::new(EntryMode::Directory, "alpha", id(1)).unwrap(),
            TreeEntry::new(EntryMode::Regular, "zebra.txt", id(2)).unwrap(),
            TreeEntry::new(EntryMode::Regular, "Beta.txt", id(3)).unwrap(),
        ]);
        let names: Vec<_> = tree.entries.iter().map(|e| e.name.as_str()).collect();
        // Byte order puts uppercase before lowercase.
        assert_eq!(names, ["Beta.txt", "zebra.txt", "alpha"]);
    }

    #[test]
    fn empty_tree_is_zero_bytes() {
        let stored = Tree::empty().to_stored_object();
        assert!(stored.data.is_empty());
        assert_eq!(stored.compute_id(), EMPTY_TREE);
    }

    #[test]
    fn encode_matches_line_format() {
        let tree = Tree::new(vec![
            TreeEntry::new(EntryMode::Regular, "a.txt", id(0xaa)).unwrap(),
            TreeEntry::new(EntryMode::Directory, "src", id(0xbb)).unwrap(),
        ]);
        let expected = format!(
            "100644 blob {} a.txt\n040000 tree {} src\n",
            id(0xaa),
            id(0xbb)
        );
        assert_eq!(tree.encode(), expected.into_bytes());
    }

    #[test]
    fn decode_reencodes_identically() {
        let tree = Tree::new(vec![
            TreeEntry::new(EntryMode::Regular, "my file.txt", id(1)).unwrap(),
            TreeEntry::new(EntryMode::Directory, "docs", id(2)).unwrap(),
        ]);
        let bytes = tree.encode();
        let decoded = Tree::decode(&bytes).unwrap();
        assert_eq!(decoded, tree);
        assert_eq!(decoded.encode(), bytes);
        assert_eq!(decoded.get("my file.txt").unwrap().object_id, id(1));
    }

    #[test]
    fn parse_rejects_mode_kind_mismatch() {
        let line = format!("100644 tree {} x", id(1));
        assert!(TreeEntry::parse_line(&line).is_err());
    }

    #[test]
    fn parse_rejects_short_lines_and_bad_hashes() {
        assert!(TreeEntry::parse_line("100644 blob abc").is_err());
        assert!(TreeEntry::parse_line("100644 blob abc name").is_err());
        assert!(TreeEntry::parse_line(&format!("100755 blob {} x", id(1))).is_err());
    }

    #[test]
    fn decode_rejects_unterminated_content() {
        let line = format!("100644 blob {} x", id(1));
        assert!(Tree::decode(line.as_bytes()).is_err());
    }

    #[test]
    fn entry_names_are_validated() {
        assert!(TreeEntry::new(EntryMode::Regular, "", id(1)).is_err());
        assert!(TreeEntry::new(EntryMode::Regular, "a/b", id(1)).is_err());
        assert!(TreeEntry::new(EntryMode::Regular, "..", id(1)).is_err());
        assert!(TreeEntry::new(EntryMode::Regular, "line\nbreak", id(1)).is_err());
    }

    #[test]
    fn corrupt_tree_object() {
        let stored = StoredObject::new(ObjectKind::Tree, b"garbage\n".to_vec());
        let err = Tree::from_stored_object(&stored).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[test]
    fn entry_mode_strings() {
        for mode in [EntryMode::Regular, EntryMode::Directory] {
            assert_eq!(EntryMode::parse(mode.as_str()), Some(mode));
        }
        assert_eq!(EntryMode::parse("100755"), None);
    }
}
