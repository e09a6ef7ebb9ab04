//! # IdStore Testkit
//!
//! Test utilities for IdStore.
//!
//! This crate provides:
//! - A sample `Person` record and a pre-configured system over it
//! - Property-based test generators using proptest
//! - A model-checking harness comparing a store with a reference map
//!
//! ## Usage
//!
//! ```rust,ignore
//! use idstore_testkit::prelude::*;
//!
//! #[test]
//! fn test_with_store() {
//!     with_person_store(|system, store| {
//!         // ... test operations
//!     });
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod harness;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::harness::*;
}

pub use fixtures::*;
pub use generators::*;
pub use harness::*;
