//! Attribute paths for SCIM user records.
//!
//! SCIM attribute names are case-insensitive. This crate stores records with
//! lowercase keys ([`canonicalize`]), parses dotted attribute paths into
//! lowercase steps ([`parse_attr_path`]) and walks a record along such a path,
//! either to write ([`resolve_ref`]) or to read ([`resolve_value`]).
//!
//! # Example
//!
//! ```
//! use scim_path::{canonicalize, parse_attr_path, resolve_ref, resolve_value, AtomicPaths};
//! use serde_json::json;
//!
//! let atomic = AtomicPaths::default();
//! let doc = canonicalize(&json!({"userName": "Bob"}));
//! let mut record = doc.as_object().cloned().unwrap();
//!
//! let path = parse_attr_path("Name.givenName", &atomic);
//! resolve_ref(&mut record, &path).set(json!("Bob"));
//! assert_eq!(resolve_value(&record, &path), Some(&json!("Bob")));
//! ```

pub mod types;
pub use types::{Path, PathRef, PathStep, Record};

pub mod canon;
pub use canon::{canonicalize, canonicalize_in_place, canonicalize_map};

pub mod path;
pub use path::{format_attr_path, parse_attr_path, AtomicPaths, ENTERPRISE_USER_SCHEMA};

pub mod resolve;
pub use resolve::{resolve_ref, resolve_value};
