//! embedded-graphics backend for the sliver paint pipeline
//!
//! - [`surface::GraphicsSurface`] adapts any `DrawTarget` to the pipeline
//!   `Surface`, clipping every primitive to the current damage region.
//! - [`assets::FlashAssets`] streams raw RGB565 images from an
//!   `embedded-storage` device and renders mono-font text, a bounded slice
//!   of work per reader run.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// Must come first so the logging macros are visible to later modules
mod fmt;

pub mod assets;
pub mod surface;

pub use assets::{AssetError, FlashAssets, FlashReader, ImageEntry};
pub use surface::GraphicsSurface;
