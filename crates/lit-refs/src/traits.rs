//! The [`RefStore`] trait defining the reference storage interface.

use lit_types::ObjectId;
use tracing::debug;

use crate::error::Result;
use crate::types::Head;

/// Storage backend for branch refs and HEAD.
pub trait RefStore: Send + Sync {
    /// Read a ref by its path (e.g. `refs/heads/main`).
    ///
    /// Returns `Ok(None)` if the ref does not exist yet.
    fn read_ref(&self, path: &str) -> Result<Option<ObjectId>>;

    /// Create or update the ref at `path`.
    fn write_ref(&self, path: &str, id: &ObjectId) -> Result<()>;

    /// Read the current HEAD state.
    ///
    /// Returns `Ok(None)` if HEAD has not been set.
    fn head(&self) -> Result<Option<Head>>;

    /// Replace HEAD.
    fn set_head(&self, head: &Head) -> Result<()>;

    /// The commit HEAD resolves to, following a symbolic ref.
    ///
    /// Returns `Ok(None)` when HEAD is unset or names a branch with no
    /// commits.
    fn resolve_head(&self) -> Result<Option<ObjectId>> {
        match self.head()? {
            Some(Head::Symbolic(path)) => self.read_ref(&path),
            Some(Head::Detached(id)) => Ok(Some(id)),
            None => Ok(None),
        }
    }

    /// Point HEAD's target at `id`.
    ///
    /// A symbolic HEAD advances its branch; otherwise HEAD itself is
    /// rewritten as detached.
    fn move_head(&self, id: &ObjectId) -> Result<()> {
        match self.head()? {
            Some(Head::Symbolic(path)) => {
                self.write_ref(&path, id)?;
                debug!(branch = %path, to = %id.short_hex(), "moved branch");
            }
            _ => {
                self.set_head(&Head::Detached(*id))?;
                debug!(to = %id.short_hex(), "moved detached HEAD");
            }
        }
        Ok(())
    }
}
