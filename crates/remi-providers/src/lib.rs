//! # remi-providers
//!
//! Model provider implementations for Remi.

pub mod openai;

pub use openai::OpenAiProvider;
