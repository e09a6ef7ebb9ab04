//! # IdStore Core
//!
//! Immutable in-memory record store with typed identifiers and secondary
//! indices.
//!
//! This crate provides:
//! - [`Id`]: strictly increasing identifiers tagged with the record type
//! - [`Store`]: an immutable value holding records and index tables
//! - [`StoreConfig`]: a builder that declares indices over derived keys
//! - [`System`]: the operation set that keeps indices consistent and
//!   rejects writes violating a unique index
//!
//! ## Usage
//!
//! ```rust,ignore
//! use idstore_core::{Index, StoreConfig};
//!
//! let mut config = StoreConfig::new();
//! let by_name = config.unique_index("by_name", |u: &User| u.name.clone())?;
//! let system = config.build(by_name);
//!
//! let store = system.init_store();
//! let (id, store) = system.create(alice, &store).expect("name is free");
//! assert_eq!(system.get_id_by(|ix| *ix, "alice", &store), Some(id));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod id;
pub mod index;
mod store;
mod system;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use id::Id;
pub use index::{Index, IndexDef, IndexKind, IndexTable, KeyFn};
pub use store::Store;
pub use system::{CreateRejected, System};
