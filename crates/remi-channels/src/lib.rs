//! # remi-channels
//!
//! Messaging channel implementations for Remi.

pub mod line;

pub use line::LineChannel;
