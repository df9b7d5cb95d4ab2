//! Configuration types
//!
//! Host-provided render configuration, optionally stored as postcard binary
//! data.

pub mod types;

pub use types::*;
