//! Storage abstraction and implementations for LearnPath.
//!
//! This crate provides a trait-based record store for students and their
//! progress history, a JSON-file and an in-memory implementation, and the
//! reference population loader.

#![warn(missing_docs)]

pub mod trait_;
pub mod json_storage;
pub mod memory;
pub mod baseline;

pub use trait_::{Storage, StorageError, Result};
pub use json_storage::JsonStorage;
pub use memory::MemoryStorage;
pub use baseline::load_reference_population;
