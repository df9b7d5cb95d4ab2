//! Drawing surface trait
//!
//! The surface is the layer/display driver that actually blits pixels.
//! Primitives never fail from the pipeline's point of view: rectangles
//! outside the panel or the current clip are clipped or clamped by the
//! implementation, and bus errors are the implementation's business.

use crate::geometry::{Color, Point, Rect};
use crate::scheduler::LayerId;

/// Drawing primitives consumed by element step operations and asset readers
pub trait Surface {
    /// Fill a rectangle with a solid color
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Draw a rectangle outline `width` pixels thick, inside `rect`
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: u8);

    /// Write a horizontal run of pixels starting at `origin`
    fn draw_run(&mut self, origin: Point, pixels: &[Color]);

    /// Restrict subsequent drawing to `clip`
    fn set_clip(&mut self, _clip: Rect) {}

    /// A frame is about to be drawn
    fn begin_frame(&mut self) {}

    /// Drawing of `layer` is about to start, limited to `damage`
    fn begin_layer(&mut self, _layer: LayerId, _damage: Rect) {}

    /// All elements of `layer` have been drawn
    fn end_layer(&mut self, _layer: LayerId) {}

    /// The frame is complete; buffered content may be flushed
    fn end_frame(&mut self) {}
}
