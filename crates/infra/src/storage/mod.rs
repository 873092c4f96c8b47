//! Storage backends implementing [`pocketledger_core::KeyValueStore`].
//!
//! The in-memory backend lives in the core crate so every crate can test
//! against it; this module holds the on-disk one.

pub mod json_file;

pub use json_file::JsonFileStore;
