//! Board-agnostic core of the sliver paint pipeline
//!
//! Renders a tree of on-screen elements onto a memory-limited display so
//! that no single rendering call blocks for an unbounded time:
//!
//! - Draw state machine shared by every element type
//! - Paint loop implementing the suspension contract (park on asset
//!   streams, resume exactly where it left off)
//! - Frame scheduler walking layers back to front
//! - Damage accumulation
//! - Element catalog, layers and screen
//! - Surface, asset source and scheme traits for external collaborators
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// Must come first: defines the logging macros
mod fmt;

pub mod config;
pub mod damage;
pub mod elements;
pub mod geometry;
pub mod paint;
pub mod scheduler;
pub mod traits;

#[cfg(test)]
mod testing;
