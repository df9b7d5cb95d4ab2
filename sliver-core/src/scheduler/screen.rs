//! Screen: the ordered set of layers drawn each frame

use heapless::Vec;

use super::layer::{ElementId, Layer, LayerError, LayerId};
use crate::damage::DamageSink;
use crate::geometry::Rect;
use crate::paint::Element;

/// Layers stacked back to front
#[derive(Debug)]
pub struct Screen<E, const L: usize, const N: usize> {
    bounds: Rect,
    layers: Vec<Layer<E, N>, L>,
}

impl<E: Element, const L: usize, const N: usize> Screen<E, L, N> {
    pub const fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            layers: Vec::new(),
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Push a new layer in front of the existing ones
    pub fn add_layer(&mut self) -> Result<LayerId, LayerError> {
        let id = u8::try_from(self.layers.len())
            .map(LayerId)
            .map_err(|_| LayerError::Full)?;
        self.layers
            .push(Layer::new(id))
            .map_err(|_| LayerError::Full)?;
        Ok(id)
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer<E, N>> {
        self.layers.get(id.0 as usize)
    }

    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer<E, N>> {
        self.layers.get_mut(id.0 as usize)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Attach a top-level element to `layer`
    pub fn add(&mut self, layer: LayerId, element: E) -> Result<ElementId, LayerError> {
        self.layer_mut(layer).ok_or(LayerError::UnknownLayer)?.add(element)
    }

    /// Mutate an element through a damage sink bound to its layer
    pub fn edit<T>(
        &mut self,
        layer: LayerId,
        id: ElementId,
        f: impl FnOnce(&mut E, &mut dyn DamageSink) -> T,
    ) -> Result<T, LayerError> {
        self.layer_mut(layer)
            .ok_or(LayerError::UnknownLayer)?
            .edit(id, f)
    }

    /// Check if any layer has damage waiting for a frame
    pub fn has_damage(&self) -> bool {
        self.layers.iter().any(Layer::has_damage)
    }

    /// Damage the whole screen on every layer
    pub fn invalidate_all(&mut self) {
        let bounds = self.bounds;
        for layer in self.layers.iter_mut() {
            layer.add_damage(bounds, true);
        }
    }

    /// Run every element's time-based logic
    pub fn update(&mut self, dt_ms: u32) {
        for layer in self.layers.iter_mut() {
            layer.update(dt_ms);
        }
    }
}

impl<E: Element, const L: usize, const N: usize> DamageSink for Screen<E, L, N> {
    fn add_damage_rect(&mut self, layer: LayerId, rect: Rect, combine: bool) {
        // Off-screen parts are never drawn
        let Some(rect) = rect.intersection(&self.bounds) else {
            return;
        };
        match self.layer_mut(layer) {
            Some(target) => target.add_damage(rect, combine),
            None => warn!("damage for unknown layer {}", layer.0),
        }
    }
}
