//! Infrastructure layer: durable storage backends.

pub mod storage;

pub use storage::JsonFileStore;
