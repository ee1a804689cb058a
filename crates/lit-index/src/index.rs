//! The in-memory staging index and its file codec.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use lit_types::ObjectId;
use tracing::debug;

use crate::error::{IndexError, IndexResult};
use crate::path::validate_repo_path;

/// The staging index: one blob id per repository-relative path.
///
/// Keys are kept in a `BTreeMap`, so iteration (and the serialized file) is
/// always in path byte order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Index {
    entries: BTreeMap<String, ObjectId>,
}

impl Index {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of staged paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The blob id staged at `path`.
    pub fn get(&self, path: &str) -> Option<&ObjectId> {
        self.entries.get(path)
    }

    /// Returns `true` if `path` is staged.
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Iterate `(path, blob id)` pairs in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ObjectId)> {
        self.entries.iter().map(|(path, id)| (path.as_str(), id))
    }

    /// Stage `id` at `path`, replacing any previous entry.
    ///
    /// Returns the id that was staged there before, if any.
    pub fn stage(&mut self, path: &str, id: ObjectId) -> IndexResult<Option<ObjectId>> {
        validate_repo_path(path)?;
        Ok(self.entries.insert(path.to_string(), id))
    }

    /// Remove `path` from the index.
    pub fn remove(&mut self, path: &str) -> Option<ObjectId> {
        self.entries.remove(path)
    }

    // ---------------------------------------------------------------
    // Text format
    // ---------------------------------------------------------------

    /// Parse index file contents.
    ///
    /// Blank lines are skipped. The hash is the last space-separated field,
    /// so paths may contain spaces. Any other malformed line is an error.
    pub fn parse(text: &str) -> IndexResult<Self> {
        let mut entries = BTreeMap::new();
        for (n, raw) in text.lines().enumerate() {
            let line = raw.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            let malformed = |reason: String| IndexError::Malformed {
                line: n + 1,
                reason,
            };
            let (path, hash) = line
                .rsplit_once(' ')
                .ok_or_else(|| malformed("expected \"<path> <hash>\"".to_string()))?;
            validate_repo_path(path).map_err(|e| malformed(e.to_string()))?;
            let id = ObjectId::from_hex(hash).map_err(|e| malformed(e.to_string()))?;
            entries.insert(path.to_string(), id);
        }
        Ok(Self { entries })
    }

    /// Serialize to the index file format.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for (path, id) in &self.entries {
            out.push_str(path);
            out.push(' ');
            out.push_str(&id.to_hex());
            out.push('\n');
        }
        out
    }

    /// Load the index file at `path`. A missing file is an empty index.
    pub fn load(path: &Path) -> IndexResult<Self> {
        match fs::read_to_string(path) {
            Ok(text) => {
                let index = Self::parse(&text)?;
                debug!(entries = index.len(), "loaded index");
                Ok(index)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write the index file at `path`, replacing it atomically.
    pub fn save(&self, path: &Path) -> IndexResult<()> {
        let dir = path
            .parent()
            .ok_or_else(|| IndexError::InvalidPath(path.display().to_string()))?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(self.serialize().as_bytes())?;
        tmp.persist(path).map_err(|e| e.error)?;
        debug!(entries = self.len(), "saved index");
        Ok(())
    }
}

impl FromIterator<(String, ObjectId)> for Index {
    /// Collect without validation. Callers feeding untrusted paths should use
    /// [`Index::stage`].
    fn from_iter<I: IntoIterator<Item = (String, ObjectId)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn id(byte: u8) -> ObjectId {
        ObjectId::from_hash([byte; 20])
    }

    #[test]
    fn stage_overwrites() {
        let mut index = Index::new();
        assert_eq!(index.stage("a.txt", id(1)).unwrap(), None);
        assert_eq!(index.stage("a.txt", id(2)).unwrap(), Some(id(1)));
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("a.txt"), Some(&id(2)));
    }

    #[test]
    fn stage_rejects_invalid_paths() {
        let mut index = Index::new();
        assert!(index.stage("", id(1)).is_err());
        assert!(index.stage("../x", id(1)).is_err());
        assert!(index.is_empty());
    }

    #[test]
    fn serialize_sorted_with_trailing_newline() {
        let mut index = Index::new();
        index.stage("src/b.js", id(2)).unwrap();
        index.stage("a.txt", id(1)).unwrap();
        index.stage("B.md", id(3)).unwrap();
        let text = index.serialize();
        let expected = format!("B.md {}\na.txt {}\nsrc/b.js {}\n", id(3), id(1), id(2));
        assert_eq!(text, expected);
    }

    #[test]
    fn empty_index_serializes_to_nothing() {
        assert_eq!(Index::new().serialize(), "");
        assert!(Index::parse("").unwrap().is_empty());
        assert!(Index::parse("\n\n").unwrap().is_empty());
    }

    #[test]
    fn parse_accepts_paths_with_spaces() {
        let text = format!("my notes.txt {}\n", id(9));
        let index = Index::parse(&text).unwrap();
        assert_eq!(index.get("my notes.txt"), Some(&id(9)));
    }

    #[test]
    fn parse_reports_line_numbers() {
        let text = format!("a.txt {}\nbroken\n", id(1));
        match Index::parse(&text).unwrap_err() {
            IndexError::Malformed { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
        assert!(Index::parse("a.txt nothex\n").is_err());
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let index = Index::load(&dir.path().join("index")).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index");
        let mut index = Index::new();
        index.stage("a.txt", id(1)).unwrap();
        index.stage("src/b.js", id(2)).unwrap();
        index.save(&path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), index.serialize());
        assert_eq!(Index::load(&path).unwrap(), index);

        Index::new().save(&path).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"");
    }

    proptest! {
        #[test]
        fn parse_inverts_serialize(
            entries in proptest::collection::btree_map("[a-z]{1,6}(/[a-z]{1,6}){0,2}", any::<[u8; 20]>(), 0..12)
        ) {
            let index: Index = entries
                .into_iter()
                .map(|(path, bytes)| (path, ObjectId::from_hash(bytes)))
                .collect();
            prop_assert_eq!(Index::parse(&index.serialize()).unwrap(), index);
        }
    }
}
