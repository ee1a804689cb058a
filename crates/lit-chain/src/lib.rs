//! Commit chain for lit.
//!
//! A commit wraps one tree id with an optional parent, an author line, a
//! unix timestamp and a free-text message:
//!
//! ```text
//! tree 4b825dc642cb6eb9a060e54bf8d69288fbee4904
//! parent 3b18e512dba79e4c8300dd08aeb37f8e728b8dad
//! author lit <lit@localhost>
//! date 1700000000
//!
//! initial import
//! ```
//!
//! Parents form a singly linked backward chain that [`CommitWalk`] follows
//! from youngest to oldest.

pub mod chain;
pub mod commit;
pub mod error;

pub use chain::{CommitChain, CommitWalk};
pub use commit::Commit;
pub use error::{ChainError, ChainResult};
