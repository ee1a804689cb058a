//! Reference management for lit.
//!
//! A branch ref is a file under `.lit/refs/heads/` holding one commit id.
//! HEAD either names a branch ref (`ref: refs/heads/main`) or holds a commit
//! id directly (detached). An absent ref or an empty HEAD means "no commits
//! yet" and is reported as `None`, never as an error.
//!
//! # Modules
//!
//! - [`error`] -- Error types for ref operations
//! - [`types`] -- [`Head`] and its file encoding
//! - [`traits`] -- The [`RefStore`] trait defining the storage interface
//! - [`names`] -- Ref path and branch name validation
//! - [`file`] -- [`FileRefStore`] backed by the `.lit` directory
//! - [`memory`] -- In-memory [`InMemoryRefStore`] for tests

pub mod error;
pub mod file;
pub mod memory;
pub mod names;
pub mod traits;
pub mod types;

pub use error::{RefError, Result};
pub use file::FileRefStore;
pub use memory::InMemoryRefStore;
pub use names::{branch_ref, validate_branch_name, validate_ref_path, DEFAULT_BRANCH};
pub use traits::RefStore;
pub use types::Head;
