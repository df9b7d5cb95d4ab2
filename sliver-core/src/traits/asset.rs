//! Asset stream traits
//!
//! Image and glyph data can live in storage much slower than local memory
//! (external flash, for example). Requesting such data returns a resumable
//! reader; each `run()` moves the transfer forward by a bounded amount and
//! pushes whatever became available to the surface. Nothing here blocks or
//! spawns background work: a pending reader only makes progress when the
//! element owning it is painted again.

use super::surface::Surface;
use crate::geometry::{Color, Point, Rect, Size};

/// Progress of a streamed fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StreamStatus {
    /// More `run()` calls are needed
    Pending,
    /// Transfer complete; the reader can be released
    Finished,
}

/// Image identifier in the asset source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ImageId(pub u16);

/// Font identifier in the asset source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FontId(pub u16);

/// Fixed-advance font metrics used for line layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FontMetrics {
    /// Horizontal distance between glyph origins (pixels)
    pub advance: u16,
    /// Vertical distance between line origins (pixels)
    pub line_height: u16,
}

/// One line of text to stream to the surface
#[derive(Debug, Clone, Copy)]
pub struct TextRun<'a> {
    pub font: FontId,
    pub text: &'a str,
    /// Top-left corner of the first glyph
    pub origin: Point,
    pub color: Color,
    pub clip: Rect,
}

/// Resumable handle for an in-progress fetch
pub trait AssetReader {
    /// Current transfer status
    fn status(&self) -> StreamStatus;

    /// Advance the transfer by a bounded amount
    fn run(&mut self, surface: &mut dyn Surface);

    fn is_finished(&self) -> bool {
        self.status() == StreamStatus::Finished
    }
}

/// Provider of images, fonts and the readers that stream them
pub trait AssetSource {
    type Reader: AssetReader;

    /// Pixel size of an image, or `None` if the image does not exist
    fn image_size(&self, image: ImageId) -> Option<Size>;

    /// Start streaming `image` with its top-left corner at `origin`
    ///
    /// The returned reader may already be finished if the data was local.
    fn open_image(&mut self, image: ImageId, origin: Point, clip: Rect) -> Option<Self::Reader>;

    /// Metrics of `font`, or `None` if the font does not exist
    fn font_metrics(&self, font: FontId) -> Option<FontMetrics>;

    /// Start streaming the glyphs of one text line
    fn open_text(&mut self, run: &TextRun<'_>) -> Option<Self::Reader>;
}
