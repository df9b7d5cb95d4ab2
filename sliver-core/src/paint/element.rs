//! Element base record and lifecycle traits
//!
//! Concrete elements compose an [`ElementBase`] and implement [`Element`]
//! (storage and time-based behavior) plus [`Paintable`] (the draw hooks the
//! generic paint loop dispatches to). Every hook has a default built from
//! the step library, so an element only overrides what it draws
//! differently.

use super::context::PaintContext;
use super::state::{DrawState, Guards};
use super::steps;
use super::text::{Alignment, TextLayout};
use crate::damage::DamageSink;
use crate::geometry::Rect;
use crate::scheduler::LayerId;
use crate::traits::{AssetReader, AssetSource, ImageId, Scheme, SchemeId};

/// Paint working-data kept across suspensions
///
/// Created when a paint sequence starts and dropped when the element
/// reaches `Done`, is invalidated, or is dropped itself.
#[derive(Debug, Clone)]
pub struct PaintData {
    /// Scheme resolved for this frame
    pub scheme: Scheme,
    /// Wrapped text, filled in by `AnalyzeText`
    pub layout: TextLayout,
}

impl PaintData {
    pub fn new(scheme: Scheme) -> Self {
        Self {
            scheme,
            layout: TextLayout::default(),
        }
    }
}

/// Per-element paint progress
#[derive(Debug)]
pub struct PaintState<R> {
    pub(crate) state: DrawState,
    pub(crate) reader: Option<R>,
    pub(crate) data: Option<PaintData>,
}

impl<R> PaintState<R> {
    const fn new() -> Self {
        Self {
            state: DrawState::Ready,
            reader: None,
            data: None,
        }
    }
}

/// Shared base record composed into every element
#[derive(Debug)]
pub struct ElementBase<R> {
    rect: Rect,
    layer: LayerId,
    scheme: Option<SchemeId>,
    visible: bool,
    paint: PaintState<R>,
}

impl<R: AssetReader> ElementBase<R> {
    pub const fn new(rect: Rect, scheme: Option<SchemeId>) -> Self {
        Self {
            rect,
            layer: LayerId(0),
            scheme,
            visible: true,
            paint: PaintState::new(),
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn layer(&self) -> LayerId {
        self.layer
    }

    pub fn scheme(&self) -> Option<SchemeId> {
        self.scheme
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn draw_state(&self) -> DrawState {
        self.paint.state
    }

    /// Check if an asset stream is outstanding
    pub fn has_reader(&self) -> bool {
        self.paint.reader.is_some()
    }

    /// Check if paint working-data is allocated
    pub fn has_paint_data(&self) -> bool {
        self.paint.data.is_some()
    }

    /// Push this element's area to `damage`
    pub fn damage(&self, damage: &mut dyn DamageSink) {
        damage.add_damage_rect(self.layer, self.rect, true);
    }

    /// Move/resize; both the old and the new area become stale
    pub fn set_rect(&mut self, rect: Rect, damage: &mut dyn DamageSink) {
        if rect == self.rect {
            return;
        }
        self.damage(damage);
        self.rect = rect;
        self.damage(damage);
    }

    pub fn set_scheme(&mut self, scheme: Option<SchemeId>, damage: &mut dyn DamageSink) {
        if scheme != self.scheme {
            self.scheme = scheme;
            self.damage(damage);
        }
    }

    pub fn set_visible(&mut self, visible: bool, damage: &mut dyn DamageSink) {
        if visible != self.visible {
            self.visible = visible;
            self.damage(damage);
        }
    }

    /// Restart painting from `Ready`, releasing any reader and working-data
    pub fn invalidate(&mut self) {
        self.paint = PaintState::new();
    }

    pub(crate) fn set_layer(&mut self, layer: LayerId) {
        self.layer = layer;
    }

    pub(crate) fn paint_state_mut(&mut self) -> &mut PaintState<R> {
        &mut self.paint
    }
}

/// Storage-level element behavior
pub trait Element {
    /// Reader type of the asset source this element is painted with
    type Reader: AssetReader;

    fn base(&self) -> &ElementBase<Self::Reader>;

    fn base_mut(&mut self) -> &mut ElementBase<Self::Reader>;

    /// Progress time-based logic (cursor blink, animations)
    ///
    /// Runs independently of drawing; changes are reported as damage.
    fn update(&mut self, _dt_ms: u32, _damage: &mut dyn DamageSink) {}

    /// Called after the base rectangle changed
    fn on_resize(&mut self, _old: Rect, _damage: &mut dyn DamageSink) {}

    /// Move/resize the element, damaging both areas
    fn resize(&mut self, rect: Rect, damage: &mut dyn DamageSink) {
        let old = self.base().rect();
        if old == rect {
            return;
        }
        self.base_mut().set_rect(rect, damage);
        self.on_resize(old, damage);
    }
}

/// Draw hooks dispatched from the draw state machine
///
/// Each hook performs one bounded unit of work. Hooks never choose the next
/// state themselves: the paint loop does that from [`Paintable::guards`].
pub trait Paintable<A: AssetSource>: Element<Reader = A::Reader> {
    /// Stages this element needs to draw with `scheme`
    ///
    /// Evaluated at every transition. Absent images or fonts disable their
    /// stage rather than failing later.
    fn guards(&self, scheme: &Scheme, assets: &A) -> Guards {
        Guards {
            background: scheme.background.is_some(),
            image: steps::has_image(assets, self.image()),
            text: steps::has_text(assets, scheme, self.text()),
            border: scheme.border.is_some(),
        }
    }

    /// Image drawn in the image stage
    fn image(&self) -> Option<ImageId> {
        None
    }

    /// Text drawn in the text stage
    fn text(&self) -> Option<&str> {
        None
    }

    fn text_alignment(&self) -> Alignment {
        Alignment::default()
    }

    /// Area available for the image and text
    fn content_rect(&self, scheme: &Scheme) -> Rect {
        self.base().rect().inset(scheme.content_inset())
    }

    /// Area the text is wrapped into
    fn text_rect(&self, scheme: &Scheme) -> Rect {
        self.content_rect(scheme)
    }

    fn paint_background(&mut self, data: &PaintData, ctx: &mut PaintContext<'_, A>) {
        if let Some(color) = data.scheme.background {
            steps::fill_background(ctx, self.base().rect(), color);
        }
    }

    /// Request the image stream
    ///
    /// Returning a reader that is not finished parks the element in
    /// `WaitImage` until it is.
    fn open_image(&mut self, data: &PaintData, ctx: &mut PaintContext<'_, A>) -> Option<A::Reader> {
        let image = self.image()?;
        steps::open_image(ctx, image, self.content_rect(&data.scheme))
    }

    /// Compute the line layout used by the following `DrawText` steps
    fn analyze_text(&mut self, data: &mut PaintData, ctx: &mut PaintContext<'_, A>) {
        let area = self.text_rect(&data.scheme);
        let align = self.text_alignment();
        data.layout = match self.text() {
            Some(text) => steps::layout_text(ctx, text, &data.scheme, area, align),
            None => TextLayout::default(),
        };
    }

    /// Request the glyph stream for one wrapped line
    fn open_text_line(
        &mut self,
        line: u8,
        data: &PaintData,
        ctx: &mut PaintContext<'_, A>,
    ) -> Option<A::Reader> {
        let text = self.text()?;
        let clip = self.base().rect();
        steps::open_text_line(ctx, text, &data.layout, line, &data.scheme, clip)
    }

    fn paint_border(&mut self, data: &PaintData, ctx: &mut PaintContext<'_, A>) {
        if let Some(border) = data.scheme.border {
            steps::stroke_border(ctx, self.base().rect(), border);
        }
    }
}
