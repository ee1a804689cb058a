//! Staging index for lit.
//!
//! The index is the editable mapping from repository-relative path to blob
//! id that the next commit will snapshot. It is persisted as `.lit/index`:
//!
//! ```text
//! a.txt 3b18e512dba79e4c8300dd08aeb37f8e728b8dad
//! src/b.js e69de29bb2d1d6434b8b29ae775ad8c2e48c5391
//! ```
//!
//! Lines are sorted by path bytes and the file ends with a newline iff it is
//! non-empty. A missing file is an empty index.

pub mod error;
pub mod index;
pub mod path;

pub use error::{IndexError, IndexResult};
pub use index::Index;
pub use path::{normalize_relative, validate_repo_path};
