//! Content hashing for lit objects.
//!
//! Object ids are SHA-1 digests of the framed object bytes
//! `"<kind> <len>\0<content>"`. The frame is hashed incrementally, so callers
//! never have to concatenate header and content just to learn an id.

pub mod hasher;

pub use hasher::{ObjectHasher, EMPTY_TREE};
