//! SCIM PATCH engine.
//!
//! Applies an ordered batch of `add` / `replace` / `delete` operations to a
//! user record. Paths are dotted attribute paths resolved case-insensitively
//! through [`scim_path`]; intermediate objects are created on demand.
//!
//! # Operations
//!
//! - `add`: appends to an array, merges into an object when the value is an
//!   object, otherwise behaves like `replace`.
//! - `replace`: overwrites the attribute whatever it held.
//! - `delete`: removes the attribute; absent attributes are a no-op.
//!
//! Keywords are matched case-insensitively. Anything else is skipped and
//! reported in the [`PatchReport`], never aborting the batch.

pub mod types;
pub mod apply;
pub mod codec;

pub use types::{InvalidPatchBody, OpKind, PatchError, PatchOperation, PatchReport};
pub use apply::{apply_op, apply_patch};
pub use codec::from_json;
