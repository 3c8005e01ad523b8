//! # remi-memory
//!
//! Reminder persistence for Remi (SQLite-backed).

pub mod store;

pub use store::Store;
