//! Image-only element

use crate::damage::DamageSink;
use crate::geometry::Rect;
use crate::paint::{Element, ElementBase, Paintable};
use crate::traits::{AssetReader, AssetSource, ImageId, SchemeId};

#[derive(Debug)]
pub struct Picture<R> {
    base: ElementBase<R>,
    image: Option<ImageId>,
}

impl<R: AssetReader> Picture<R> {
    pub fn new(rect: Rect, scheme: SchemeId, image: ImageId) -> Self {
        Self {
            base: ElementBase::new(rect, Some(scheme)),
            image: Some(image),
        }
    }

    pub fn image(&self) -> Option<ImageId> {
        self.image
    }

    pub fn set_image(&mut self, image: Option<ImageId>, damage: &mut dyn DamageSink) {
        if image != self.image {
            self.image = image;
            self.base.damage(damage);
        }
    }
}

impl<R: AssetReader> Element for Picture<R> {
    type Reader = R;

    fn base(&self) -> &ElementBase<R> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase<R> {
        &mut self.base
    }
}

impl<A: AssetSource> Paintable<A> for Picture<A::Reader> {
    fn image(&self) -> Option<ImageId> {
        self.image
    }
}
