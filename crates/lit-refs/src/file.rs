//! Filesystem ref store rooted at the `.lit` directory.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use lit_types::{ObjectId, RepositoryHandle};

use crate::error::{RefError, Result};
use crate::names::validate_ref_path;
use crate::traits::RefStore;
use crate::types::{parse_ref_value, Head};

/// Refs stored as files: `HEAD` and `refs/heads/<branch>`.
///
/// Every write replaces the target file atomically through a temporary file
/// in the same directory.
#[derive(Clone, Debug)]
pub struct FileRefStore {
    handle: RepositoryHandle,
}

impl FileRefStore {
    pub fn new(handle: RepositoryHandle) -> Self {
        Self { handle }
    }

    fn ref_file(&self, path: &str) -> Result<PathBuf> {
        validate_ref_path(path)?;
        Ok(self.handle.ref_file(path))
    }
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = path.parent().ok_or_else(|| RefError::InvalidRefName {
        name: path.display().to_string(),
        reason: "no parent directory".into(),
    })?;
    fs::create_dir_all(dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

impl RefStore for FileRefStore {
    fn read_ref(&self, path: &str) -> Result<Option<ObjectId>> {
        match read_optional(&self.ref_file(path)?)? {
            Some(text) => parse_ref_value(path, &text),
            None => Ok(None),
        }
    }

    fn write_ref(&self, path: &str, id: &ObjectId) -> Result<()> {
        write_atomic(&self.ref_file(path)?, &format!("{id}\n"))
    }

    fn head(&self) -> Result<Option<Head>> {
        match read_optional(&self.handle.head_path())? {
            Some(text) => Head::parse(&text),
            None => Ok(None),
        }
    }

    fn set_head(&self, head: &Head) -> Result<()> {
        write_atomic(&self.handle.head_path(), &head.encode())
    }
}
