//! Collaborator traits
//!
//! These traits define the boundary between the paint pipeline and the
//! code that blits pixels, stores assets and holds visual configuration.

pub mod asset;
pub mod scheme;
pub mod surface;

pub use asset::{
    AssetReader, AssetSource, FontId, FontMetrics, ImageId, StreamStatus, TextRun,
};
pub use scheme::{BorderStyle, Scheme, SchemeId, SchemeLookup, SchemeTable};
pub use surface::Surface;
