//! Push button

use super::{to_text, Text};
use crate::damage::DamageSink;
use crate::geometry::{Color, Rect};
use crate::paint::{steps, Alignment, Element, ElementBase, Guards, PaintContext, PaintData, Paintable};
use crate::traits::{AssetReader, AssetSource, ImageId, Scheme, SchemeId};

/// Button with an optional icon left of its caption
///
/// While pressed the scheme's active background replaces the normal fill.
#[derive(Debug)]
pub struct Button<R> {
    base: ElementBase<R>,
    text: Text,
    icon: Option<ImageId>,
    pressed: bool,
}

impl<R: AssetReader> Button<R> {
    pub fn new(rect: Rect, scheme: SchemeId, text: &str) -> Self {
        Self {
            base: ElementBase::new(rect, Some(scheme)),
            text: to_text(text),
            icon: None,
            pressed: false,
        }
    }

    pub fn with_icon(mut self, icon: ImageId) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn set_text(&mut self, text: &str, damage: &mut dyn DamageSink) {
        if text != self.text.as_str() {
            self.text = to_text(text);
            self.base.damage(damage);
        }
    }

    pub fn set_image(&mut self, icon: Option<ImageId>, damage: &mut dyn DamageSink) {
        if icon != self.icon {
            self.icon = icon;
            self.base.damage(damage);
        }
    }

    pub fn set_pressed(&mut self, pressed: bool, damage: &mut dyn DamageSink) {
        if pressed != self.pressed {
            self.pressed = pressed;
            self.base.damage(damage);
        }
    }

    fn fill(&self, scheme: &Scheme) -> Option<Color> {
        if self.pressed {
            scheme.active_background.or(scheme.background)
        } else {
            scheme.background
        }
    }

    /// Square icon slot at the left of the content area
    fn icon_rect(&self, scheme: &Scheme) -> Rect {
        let content = self.base.rect().inset(scheme.content_inset());
        Rect::new(content.x, content.y, content.height.min(content.width), content.height)
    }

    fn caption_rect(&self, scheme: &Scheme) -> Rect {
        let content = self.base.rect().inset(scheme.content_inset());
        if self.icon.is_none() {
            return content;
        }
        let icon = self.icon_rect(scheme);
        let offset = icon.width + scheme.padding as u32;
        Rect::new(
            content.x + offset as i32,
            content.y,
            content.width.saturating_sub(offset),
            content.height,
        )
    }
}

impl<R: AssetReader> Element for Button<R> {
    type Reader = R;

    fn base(&self) -> &ElementBase<R> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase<R> {
        &mut self.base
    }
}

impl<A: AssetSource> Paintable<A> for Button<A::Reader> {
    fn guards(&self, scheme: &Scheme, assets: &A) -> Guards {
        Guards {
            background: self.fill(scheme).is_some(),
            image: steps::has_image(assets, self.icon),
            text: steps::has_text(assets, scheme, Some(&self.text)),
            border: scheme.border.is_some(),
        }
    }

    fn image(&self) -> Option<ImageId> {
        self.icon
    }

    fn text(&self) -> Option<&str> {
        Some(&self.text)
    }

    fn text_alignment(&self) -> Alignment {
        Alignment::centered()
    }

    fn text_rect(&self, scheme: &Scheme) -> Rect {
        self.caption_rect(scheme)
    }

    fn paint_background(&mut self, data: &PaintData, ctx: &mut PaintContext<'_, A>) {
        if let Some(color) = self.fill(&data.scheme) {
            steps::fill_background(ctx, self.base.rect(), color);
        }
    }

    fn open_image(&mut self, data: &PaintData, ctx: &mut PaintContext<'_, A>) -> Option<A::Reader> {
        let icon = self.icon?;
        steps::open_image(ctx, icon, self.icon_rect(&data.scheme))
    }
}
