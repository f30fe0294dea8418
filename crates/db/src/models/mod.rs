//! Database row structs.
//!
//! Each submodule holds a `FromRow` struct matching the columns a repository
//! selects, and its conversion into the domain record.

pub mod performance;
pub mod rundown;
