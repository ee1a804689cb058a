//! Checkout state machine for lit.
//!
//! A checkout moves through [`CheckoutState::Clean`] (or
//! [`CheckoutState::Dirty`], which stops it), [`CheckoutState::Materializing`]
//! and [`CheckoutState::Done`]. The dirty gate compares three independently
//! computed tree ids (HEAD's tree, the index tree and the working-directory
//! tree) and refuses to touch the disk when they diverge. Once the gate
//! passes, materialization is best-effort: a failure part way leaves the
//! working directory partially rewritten and HEAD unmoved.

pub mod error;
pub mod machine;
pub mod report;

pub use error::{CheckoutError, CheckoutResult};
pub use machine::{Checkout, CheckoutOutcome};
pub use report::{CheckoutPolicy, CheckoutState, DirtyReport};
