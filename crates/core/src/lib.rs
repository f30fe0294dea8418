//! Concert program domain core.
//!
//! Record types, column registries, the change verdict engine, record and
//! ordering reconciliation, and the derived schedule and stage views. Storage
//! is reached only through the [`store::RecordStore`] trait so the core
//! stays independent of any database.

pub mod action;
pub mod cell;
pub mod detail;
pub mod column;
pub mod duration;
pub mod error;
pub mod ordering;
pub mod performance;
pub mod reconcile;
pub mod rundown;
pub mod schedule;
pub mod stage;
pub mod store;
pub mod types;
pub mod verdict;
pub mod views;

#[cfg(test)]
mod memory;
