//! # remi-core
//!
//! Core types, traits, configuration, and error handling for the Remi agent.

pub mod config;
pub mod error;
pub mod message;
pub mod reminder;
pub mod traits;

pub use config::shellexpand;
