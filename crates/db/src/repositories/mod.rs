//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Batch writes run in one
//! transaction.

pub mod performance_repo;
pub mod rundown_repo;

pub use performance_repo::PerformanceRepo;
pub use rundown_repo::RundownRepo;
