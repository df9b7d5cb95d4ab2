//! Explicit paint context
//!
//! Everything a draw step may touch is reached through this object, passed
//! down by the caller: the surface, the asset source, the scheme lookup and
//! the render configuration. There is no global "active context".

use crate::config::RenderConfig;
use crate::geometry::Rect;
use crate::traits::{AssetSource, SchemeLookup, Surface};

pub struct PaintContext<'a, A: AssetSource> {
    pub surface: &'a mut dyn Surface,
    pub assets: &'a mut A,
    pub schemes: &'a dyn SchemeLookup,
    pub config: &'a RenderConfig,
    /// Region being redrawn; streams are clipped to it
    pub clip: Rect,
}

impl<'a, A: AssetSource> PaintContext<'a, A> {
    pub fn new(
        surface: &'a mut dyn Surface,
        assets: &'a mut A,
        schemes: &'a dyn SchemeLookup,
        config: &'a RenderConfig,
        clip: Rect,
    ) -> Self {
        Self {
            surface,
            assets,
            schemes,
            config,
            clip,
        }
    }

    /// Current clip narrowed to `rect`
    pub fn clip_to(&self, rect: Rect) -> Rect {
        self.clip.intersection(&rect).unwrap_or_default()
    }
}
