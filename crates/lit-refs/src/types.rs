//! HEAD and its on-disk encoding.

use std::fmt;

use lit_types::ObjectId;

use crate::error::{RefError, Result};
use crate::names::{validate_ref_path, HEADS_PREFIX};

const SYMBOLIC_PREFIX: &str = "ref:";

/// What HEAD points at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Head {
    /// HEAD names a branch ref path, e.g. `refs/heads/main`.
    Symbolic(String),
    /// HEAD is detached, pointing directly to a commit.
    Detached(ObjectId),
}

impl Head {
    /// HEAD pointing at `refs/heads/<branch>`.
    pub fn branch(branch: &str) -> Result<Self> {
        Ok(Self::Symbolic(crate::names::branch_ref(branch)?))
    }

    /// Parse HEAD file contents. Empty contents mean HEAD is unset.
    pub fn parse(text: &str) -> Result<Option<Self>> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if let Some(rest) = trimmed.strip_prefix(SYMBOLIC_PREFIX) {
            let path = rest.trim();
            validate_ref_path(path)?;
            return Ok(Some(Self::Symbolic(path.to_string())));
        }
        let id = ObjectId::from_hex(trimmed).map_err(|e| RefError::Malformed {
            name: "HEAD".to_string(),
            reason: e.to_string(),
        })?;
        Ok(Some(Self::Detached(id)))
    }

    /// HEAD file contents, newline-terminated.
    pub fn encode(&self) -> String {
        match self {
            Self::Symbolic(path) => format!("{SYMBOLIC_PREFIX} {path}\n"),
            Self::Detached(id) => format!("{id}\n"),
        }
    }

    /// The ref path, if HEAD is symbolic.
    pub fn ref_path(&self) -> Option<&str> {
        match self {
            Self::Symbolic(path) => Some(path),
            Self::Detached(_) => None,
        }
    }

    /// The short branch name, if HEAD names a branch under `refs/heads/`.
    pub fn branch_name(&self) -> Option<&str> {
        self.ref_path()?.strip_prefix(HEADS_PREFIX)
    }

    /// Returns `true` if HEAD is detached.
    pub fn is_detached(&self) -> bool {
        matches!(self, Self::Detached(_))
    }
}

impl fmt::Display for Head {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Symbolic(path) => write!(f, "{path}"),
            Self::Detached(id) => write!(f, "detached at {}", id.short_hex()),
        }
    }
}

/// Parse ref file contents: a bare hash, or nothing.
pub(crate) fn parse_ref_value(name: &str, text: &str) -> Result<Option<ObjectId>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    ObjectId::from_hex(trimmed)
        .map(Some)
        .map_err(|e| RefError::Malformed {
            name: name.to_string(),
            reason: e.to_string(),
        })
}
