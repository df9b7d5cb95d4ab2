//! Generic step library
//!
//! Bounded units of drawing work shared by every element type. Each call
//! either pushes pixels through the surface, opens an asset stream, or
//! computes working-data; none of them loops over more than one element
//! stage.

use super::context::PaintContext;
use super::text::{Alignment, TextLayout};
use crate::geometry::{Color, Rect};
use crate::traits::{AssetSource, BorderStyle, ImageId, Scheme, TextRun};

/// Check if `image` exists in `assets`
pub fn has_image<A: AssetSource>(assets: &A, image: Option<ImageId>) -> bool {
    image.is_some_and(|id| assets.image_size(id).is_some())
}

/// Check if `text` is non-empty and the scheme's font exists
pub fn has_text<A: AssetSource>(assets: &A, scheme: &Scheme, text: Option<&str>) -> bool {
    text.is_some_and(|t| !t.is_empty())
        && scheme
            .font
            .is_some_and(|font| assets.font_metrics(font).is_some())
}

/// Fill `rect` with `color`, clipped to the damaged region
pub fn fill_background<A: AssetSource>(ctx: &mut PaintContext<'_, A>, rect: Rect, color: Color) {
    if let Some(area) = ctx.clip.intersection(&rect) {
        ctx.surface.fill_rect(area, color);
    }
}

/// Stroke the border inside `rect`
///
/// The surface clips the stroke to the region set by the scheduler.
pub fn stroke_border<A: AssetSource>(
    ctx: &mut PaintContext<'_, A>,
    rect: Rect,
    border: BorderStyle,
) {
    if border.width == 0 || !ctx.clip.intersects(&rect) {
        return;
    }
    ctx.surface.stroke_rect(rect, border.color, border.width);
}

/// Open the stream for `image`, centered in `area`
///
/// Returns `None` if the image is unknown or lies outside the clip.
pub fn open_image<A: AssetSource>(
    ctx: &mut PaintContext<'_, A>,
    image: ImageId,
    area: Rect,
) -> Option<A::Reader> {
    let size = ctx.assets.image_size(image)?;
    let origin = area.center_of(size);
    let clip = ctx.clip_to(area.intersection(&Rect::from_origin(origin, size))?);
    if clip.is_empty() {
        return None;
    }
    let reader = ctx.assets.open_image(image, origin, clip);
    if reader.is_none() {
        warn!("image {} could not be opened", image.0);
    }
    reader
}

/// Wrap `text` into `area` using the scheme's font
pub fn layout_text<A: AssetSource>(
    ctx: &mut PaintContext<'_, A>,
    text: &str,
    scheme: &Scheme,
    area: Rect,
    align: Alignment,
) -> TextLayout {
    let Some(metrics) = scheme.font.and_then(|f| ctx.assets.font_metrics(f)) else {
        return TextLayout::default();
    };
    TextLayout::wrap(text, metrics, area, align)
}

/// Open the glyph stream for one wrapped line
///
/// Blank lines and lines outside the clip produce no stream.
pub fn open_text_line<A: AssetSource>(
    ctx: &mut PaintContext<'_, A>,
    text: &str,
    layout: &TextLayout,
    line: u8,
    scheme: &Scheme,
    clip: Rect,
) -> Option<A::Reader> {
    let font = scheme.font?;
    let span = *layout.line(line)?;
    let line_text = layout.line_text(text, line)?;
    if line_text.is_empty() {
        return None;
    }
    let clip = ctx.clip_to(clip);
    if clip.is_empty() {
        return None;
    }
    let run = TextRun {
        font,
        text: line_text,
        origin: span.origin,
        color: scheme.foreground,
        clip,
    };
    let reader = ctx.assets.open_text(&run);
    if reader.is_none() {
        warn!("font {} could not render line {}", font.0, line);
    }
    reader
}
