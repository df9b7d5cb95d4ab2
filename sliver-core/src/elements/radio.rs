//! Radio button
//!
//! The indicator is drawn from primitives in the image stage, so it never
//! streams and never parks.

use super::{to_text, Text};
use crate::damage::DamageSink;
use crate::geometry::Rect;
use crate::paint::{steps, Alignment, Element, ElementBase, Guards, HAlign, PaintContext, PaintData, Paintable, VAlign};
use crate::traits::{AssetReader, AssetSource, BorderStyle, Scheme, SchemeId};

/// Gap between the indicator frame and its check mark
const MARK_INSET: u32 = 3;

#[derive(Debug)]
pub struct RadioButton<R> {
    base: ElementBase<R>,
    text: Text,
    checked: bool,
}

impl<R: AssetReader> RadioButton<R> {
    pub fn new(rect: Rect, scheme: SchemeId, text: &str) -> Self {
        Self {
            base: ElementBase::new(rect, Some(scheme)),
            text: to_text(text),
            checked: false,
        }
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: &str, damage: &mut dyn DamageSink) {
        if text != self.text.as_str() {
            self.text = to_text(text);
            self.base.damage(damage);
        }
    }

    pub fn set_checked(&mut self, checked: bool, damage: &mut dyn DamageSink) {
        if checked != self.checked {
            self.checked = checked;
            self.base.damage(damage);
        }
    }

    /// Square indicator at the left edge, centered vertically
    fn indicator_rect(&self, scheme: &Scheme) -> Rect {
        let content = self.base.rect().inset(scheme.content_inset());
        let side = content.height.min(content.width).min(16);
        Rect::new(
            content.x,
            content.y + (content.height - side) as i32 / 2,
            side,
            side,
        )
    }
}

impl<R: AssetReader> Element for RadioButton<R> {
    type Reader = R;

    fn base(&self) -> &ElementBase<R> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase<R> {
        &mut self.base
    }
}

impl<A: AssetSource> Paintable<A> for RadioButton<A::Reader> {
    fn guards(&self, scheme: &Scheme, assets: &A) -> Guards {
        Guards {
            background: scheme.background.is_some(),
            image: true,
            text: steps::has_text(assets, scheme, Some(&self.text)),
            border: scheme.border.is_some(),
        }
    }

    fn text(&self) -> Option<&str> {
        Some(&self.text)
    }

    fn text_alignment(&self) -> Alignment {
        Alignment::new(HAlign::Left, VAlign::Middle)
    }

    fn text_rect(&self, scheme: &Scheme) -> Rect {
        let content = self.base.rect().inset(scheme.content_inset());
        let offset = self.indicator_rect(scheme).width + scheme.padding as u32;
        Rect::new(
            content.x + offset as i32,
            content.y,
            content.width.saturating_sub(offset),
            content.height,
        )
    }

    fn open_image(&mut self, data: &PaintData, ctx: &mut PaintContext<'_, A>) -> Option<A::Reader> {
        let indicator = self.indicator_rect(&data.scheme);
        let frame = BorderStyle {
            color: data.scheme.accent,
            width: 1,
        };
        steps::stroke_border(ctx, indicator, frame);
        if self.checked {
            steps::fill_background(ctx, indicator.inset(MARK_INSET), data.scheme.accent);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;
    use crate::paint::{paint, DrawState};
    use crate::testing::*;

    fn paint_radio(radio: &mut RadioButton<ScriptedReader>) -> RecordingSurface {
        let mut surface = RecordingSurface::default();
        let mut assets = ScriptedAssets::new();
        let schemes = test_schemes();
        let config = RenderConfig::new();
        let mut ctx = PaintContext::new(&mut surface, &mut assets, &schemes, &config, SCREEN);
        assert_eq!(paint(radio, &mut ctx), DrawState::Done);
        surface
    }

    #[test]
    fn test_unchecked_draws_frame_only() {
        let mut radio = RadioButton::new(Rect::new(0, 0, 80, 20), TRANSPARENT, "One");
        let surface = paint_radio(&mut radio);

        assert_eq!(surface.ops[0], SurfaceOp::Stroke(Rect::new(2, 2, 16, 16), 1));
        assert_eq!(surface.fills(), 0);
    }

    #[test]
    fn test_checked_fills_mark() {
        let mut radio = RadioButton::new(Rect::new(0, 0, 80, 20), TRANSPARENT, "One");
        radio.set_checked(true, &mut RecordingDamage::default());
        let surface = paint_radio(&mut radio);

        assert!(surface
            .ops
            .contains(&SurfaceOp::Fill(Rect::new(5, 5, 10, 10), crate::geometry::Color::BLACK)));
    }
}
