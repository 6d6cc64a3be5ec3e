//! A mock SCIM 2.0 user directory.
//!
//! Provides the PATCH engine, single-clause list filters, the in-memory
//! [`UserStore`] with JSON snapshots, and the axum HTTP boundary that serves
//! `/Users` behind a shared bearer secret.
//!
//! Records are stored with lowercase keys (see [`scim_path::canonicalize`]);
//! attribute paths in PATCH operations and filters are resolved
//! case-insensitively.
//!
//! # Example
//!
//! ```
//! use scim_directory::patch::PatchOperation;
//! use scim_directory::{AtomicPaths, UserStore};
//! use serde_json::json;
//!
//! let mut store = UserStore::new(AtomicPaths::default());
//! let input = json!({"userName": "Bob"});
//! let user = store.create(input.as_object().unwrap());
//! let id = user["id"].as_str().unwrap().to_string();
//!
//! let (user, _) = store
//!     .patch(&id, &[PatchOperation::replace("userName", json!("Bobby"))])
//!     .unwrap();
//! assert_eq!(user["username"], json!("Bobby"));
//! ```

pub mod config;
pub mod filter;
pub mod patch;
pub mod record;
pub mod server;
pub mod store;

pub use config::Config;
pub use filter::{Filter, FilterError, FilterOperator, RecordFilter};
pub use patch::{InvalidPatchBody, PatchError, PatchOperation, PatchReport};
pub use scim_path::{AtomicPaths, Record};
pub use server::{router, AppState, ServerError};
pub use store::{ListResult, StoreError, UserStore};
