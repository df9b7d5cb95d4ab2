//! Static text label

use super::{to_text, Text};
use crate::damage::DamageSink;
use crate::geometry::Rect;
use crate::paint::{Alignment, Element, ElementBase, Paintable};
use crate::traits::{AssetReader, AssetSource, SchemeId};

/// Background and wrapped text
#[derive(Debug)]
pub struct Label<R> {
    base: ElementBase<R>,
    text: Text,
    align: Alignment,
}

impl<R: AssetReader> Label<R> {
    pub fn new(rect: Rect, scheme: SchemeId, text: &str) -> Self {
        Self {
            base: ElementBase::new(rect, Some(scheme)),
            text: to_text(text),
            align: Alignment::default(),
        }
    }

    pub fn with_alignment(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: &str, damage: &mut dyn DamageSink) {
        if text == self.text.as_str() {
            return;
        }
        self.text = to_text(text);
        self.base.damage(damage);
    }

    pub fn set_alignment(&mut self, align: Alignment, damage: &mut dyn DamageSink) {
        if align != self.align {
            self.align = align;
            self.base.damage(damage);
        }
    }
}

impl<R: AssetReader> Element for Label<R> {
    type Reader = R;

    fn base(&self) -> &ElementBase<R> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase<R> {
        &mut self.base
    }
}

impl<A: AssetSource> Paintable<A> for Label<A::Reader> {
    fn text(&self) -> Option<&str> {
        Some(&self.text)
    }

    fn text_alignment(&self) -> Alignment {
        self.align
    }
}
