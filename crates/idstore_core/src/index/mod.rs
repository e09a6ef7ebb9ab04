//! Secondary indices over derived string keys.
//!
//! An index is declared once, at configuration time, with a pure key
//! function `&T -> String`. From then on the [`System`](crate::System)
//! keeps its table in step with the primary map on every insert and
//! remove.
//!
//! # Index Types
//!
//! - [`UniqueTable`]: one record per key, colliding inserts are rejected
//! - [`MultiTable`]: a set of records per key, never rejects
//!
//! Only exact-key lookup is supported; keys carry no ordering.

mod def;
mod table;

pub use def::{Index, IndexDef, IndexKind, KeyFn};
pub use table::{IndexTable, MultiTable, UniqueTable};
