//! In-memory reference store for testing and ephemeral use.

use std::collections::HashMap;
use std::sync::RwLock;

use lit_types::ObjectId;

use crate::error::Result;
use crate::names::validate_ref_path;
use crate::traits::RefStore;
use crate::types::Head;

/// An in-memory implementation of [`RefStore`].
///
/// All data lives in a `HashMap` behind a `RwLock`. Data is lost when the
/// store is dropped.
#[derive(Debug, Default)]
pub struct InMemoryRefStore {
    refs: RwLock<HashMap<String, ObjectId>>,
    head: RwLock<Option<Head>>,
}

impl InMemoryRefStore {
    /// Create a new empty ref store with HEAD unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with HEAD already set.
    pub fn with_head(head: Head) -> Self {
        Self {
            refs: RwLock::new(HashMap::new()),
            head: RwLock::new(Some(head)),
        }
    }
}

impl RefStore for InMemoryRefStore {
    fn read_ref(&self, path: &str) -> Result<Option<ObjectId>> {
        validate_ref_path(path)?;
        Ok(self.refs.read().expect("lock poisoned").get(path).copied())
    }

    fn write_ref(&self, path: &str, id: &ObjectId) -> Result<()> {
        validate_ref_path(path)?;
        self.refs
            .write()
            .expect("lock poisoned")
            .insert(path.to_string(), *id);
        Ok(())
    }

    fn head(&self) -> Result<Option<Head>> {
        Ok(self.head.read().expect("lock poisoned").clone())
    }

    fn set_head(&self, head: &Head) -> Result<()> {
        *self.head.write().expect("lock poisoned") = Some(head.clone());
        Ok(())
    }
}
