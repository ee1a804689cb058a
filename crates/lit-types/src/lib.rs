//! Foundation types for lit.
//!
//! This crate provides the identifiers and structural types shared by every
//! other lit crate.
//!
//! # Key Types
//!
//! - [`ObjectId`]: 160-bit content address, rendered as 40 lowercase hex chars
//! - [`ObjectKind`]: the three object kinds: blob, tree, commit
//! - [`RepositoryHandle`]: explicit bundle of repository paths passed to every operation

pub mod error;
pub mod handle;
pub mod kind;
pub mod object;

pub use error::TypeError;
pub use handle::{RepositoryHandle, META_DIR};
pub use kind::ObjectKind;
pub use object::ObjectId;
