//! Object codec and content-addressed storage for lit.
//!
//! This crate implements a hash-keyed object store analogous to git's
//! `.git/objects/` directory. Every blob, tree and commit is stored as an
//! immutable object identified by the SHA-1 of `"<kind> <len>\0<content>"`.
//!
//! # Object Types
//!
//! - [`Blob`] -- raw file content
//! - [`Tree`] -- directory listing of [`TreeEntry`] lines
//! - commits are encoded by `lit-chain` on top of [`StoredObject`]
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`LooseObjectStore`] -- one zlib-deflated file per object under `objects/<2>/<38>`
//! - [`InMemoryObjectStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Sinks
//!
//! Tree construction writes through an [`ObjectSink`]: [`StoreSink`] persists
//! into a store, [`HashOnlySink`] only computes ids. Both share one hashing
//! path, so they cannot disagree on an id.
//!
//! # Design Rules
//!
//! 1. Objects are immutable once written (content-addressing guarantees this).
//! 2. Writing existing content is a no-op that returns the same id.
//! 3. Reads verify the frame and the hash before returning data.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod codec;
pub mod error;
pub mod loose;
pub mod memory;
pub mod object;
pub mod sink;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use codec::ObjectHeader;
pub use error::{StoreError, StoreResult};
pub use loose::LooseObjectStore;
pub use memory::InMemoryObjectStore;
pub use object::{Blob, EntryMode, StoredObject, Tree, TreeEntry};
pub use sink::{HashOnlySink, ObjectSink, StoreSink};
pub use traits::ObjectStore;
