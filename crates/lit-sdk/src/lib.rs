//! High-level SDK for lit.
//!
//! [`Lit`] bundles a [`RepositoryHandle`](lit_types::RepositoryHandle) with
//! the loose object store, the file ref store and the repository config, and
//! exposes the operations the `lit` binary offers.

pub mod config;
pub mod error;
pub mod repository;

pub use config::{CheckoutConfig, CoreConfig, RepoConfig, UserConfig};
pub use error::{SdkError, SdkResult};
pub use repository::{InitStatus, Lit, LogEntry, RepoStatus, TreeSource};

// Re-export key types
pub use lit_chain::Commit;
pub use lit_checkout::{CheckoutOutcome, CheckoutPolicy, CheckoutState, DirtyReport};
pub use lit_refs::{Head, RefStore};
pub use lit_store::{EntryMode, StoredObject, Tree, TreeEntry};
pub use lit_types::{ObjectId, ObjectKind, RepositoryHandle};
