//! Element layers
//!
//! A layer is a fixed-capacity arena of elements arranged as a forest.
//! Elements are painted in preorder: parent before children, siblings in
//! attachment order. Each layer owns its damage accumulator.

use heapless::Vec;

use crate::damage::{DamageAccumulator, DamageList, DamageSink};
use crate::geometry::Rect;
use crate::paint::Element;

/// Layer identifier, also its back-to-front position on the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LayerId(pub u8);

/// Handle to an element inside its layer
///
/// Handles of removed elements may be reused by later insertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ElementId(u16);

impl ElementId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Layer operation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LayerError {
    /// No free element or layer slot
    Full,
    /// Element handle does not refer to a live element
    UnknownElement,
    /// Parent handle does not refer to a live element
    UnknownParent,
    /// No layer with this id on the screen
    UnknownLayer,
}

#[derive(Debug)]
struct Node<E> {
    element: E,
    parent: Option<ElementId>,
    /// Needs painting in the current frame
    pending: bool,
}

/// Fixed-capacity element forest with its own damage
#[derive(Debug)]
pub struct Layer<E, const N: usize> {
    id: LayerId,
    nodes: Vec<Option<Node<E>>, N>,
    /// Preorder paint order
    order: Vec<ElementId, N>,
    damage: DamageAccumulator,
}

impl<E: Element, const N: usize> Layer<E, N> {
    pub const fn new(id: LayerId) -> Self {
        Self {
            id,
            nodes: Vec::new(),
            order: Vec::new(),
            damage: DamageAccumulator::new(),
        }
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Attach a top-level element after every existing one
    pub fn add(&mut self, element: E) -> Result<ElementId, LayerError> {
        self.attach(None, element)
    }

    /// Attach `element` as the last child of `parent`
    pub fn add_child(&mut self, parent: ElementId, element: E) -> Result<ElementId, LayerError> {
        if self.node(parent).is_none() {
            return Err(LayerError::UnknownParent);
        }
        self.attach(Some(parent), element)
    }

    fn attach(&mut self, parent: Option<ElementId>, mut element: E) -> Result<ElementId, LayerError> {
        let slot = match self.nodes.iter().position(Option::is_none) {
            Some(slot) => slot,
            None => {
                self.nodes.push(None).map_err(|_| LayerError::Full)?;
                self.nodes.len() - 1
            }
        };
        let id = ElementId(slot as u16);

        let position = match parent.and_then(|p| self.position(p)) {
            Some(p) => self.subtree_end(p),
            None => self.order.len(),
        };
        // A free slot means the order has room
        self.order
            .insert(position, id)
            .map_err(|_| LayerError::Full)?;

        element.base_mut().set_layer(self.id);
        let rect = element.base().rect();
        self.nodes[slot] = Some(Node {
            element,
            parent,
            pending: false,
        });
        if self.is_shown(id) {
            self.damage.add(rect, true);
        }
        Ok(id)
    }

    /// Destroy `id` and its whole subtree
    ///
    /// Returns the removed element. Descendants are dropped, releasing
    /// their readers and paint working-data. Every removed area that was
    /// visible becomes damage.
    pub fn remove(&mut self, id: ElementId) -> Result<E, LayerError> {
        let start = self.position(id).ok_or(LayerError::UnknownElement)?;
        let end = self.subtree_end(start);

        for i in start..end {
            let member = self.order[i];
            if self.is_shown(member) {
                if let Some(rect) = self.get(member).map(|e| e.base().rect()) {
                    self.damage.add(rect, true);
                }
            }
        }

        let mut root = None;
        for i in (start..end).rev() {
            let member = self.order[i];
            let node = self.nodes.get_mut(member.index()).and_then(Option::take);
            if member == id {
                root = node.map(|n| n.element);
            }
        }

        let mut order = Vec::new();
        for (i, member) in self.order.iter().enumerate() {
            if i < start || i >= end {
                let _ = order.push(*member);
            }
        }
        self.order = order;

        root.ok_or(LayerError::UnknownElement)
    }

    pub fn get(&self, id: ElementId) -> Option<&E> {
        self.node(id).map(|n| &n.element)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut E> {
        self.nodes
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .map(|n| &mut n.element)
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Elements in paint order
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &E)> + '_ {
        self.order
            .iter()
            .filter_map(move |id| self.get(*id).map(|e| (*id, e)))
    }

    /// Check if `id` and every ancestor are visible
    pub fn is_shown(&self, id: ElementId) -> bool {
        let mut current = Some(id);
        while let Some(id) = current {
            match self.node(id) {
                Some(node) if node.element.base().is_visible() => current = node.parent,
                _ => return false,
            }
        }
        true
    }

    /// Mutate an element, with a damage sink bound to this layer
    pub fn edit<T>(
        &mut self,
        id: ElementId,
        f: impl FnOnce(&mut E, &mut dyn DamageSink) -> T,
    ) -> Result<T, LayerError> {
        let Self {
            id: layer,
            nodes,
            damage,
            ..
        } = self;
        let node = nodes
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(LayerError::UnknownElement)?;
        let mut sink = LayerDamage {
            layer: *layer,
            damage,
        };
        Ok(f(&mut node.element, &mut sink))
    }

    /// Run every element's time-based logic
    pub fn update(&mut self, dt_ms: u32) {
        let Self {
            id: layer,
            nodes,
            damage,
            ..
        } = self;
        let mut sink = LayerDamage {
            layer: *layer,
            damage,
        };
        for node in nodes.iter_mut().flatten() {
            node.element.update(dt_ms, &mut sink);
        }
    }

    pub fn add_damage(&mut self, rect: Rect, combine: bool) {
        self.damage.add(rect, combine);
    }

    pub fn has_damage(&self) -> bool {
        !self.damage.is_empty()
    }

    pub fn damage(&self) -> &DamageAccumulator {
        &self.damage
    }

    /// Take the accumulated damage for the frame being drawn
    pub fn take_damage(&mut self) -> DamageList {
        self.damage.drain()
    }

    /// Restart every shown element touching `damage` and mark it pending
    ///
    /// Returns the number of elements marked.
    pub fn mark_damaged(&mut self, damage: &[Rect]) -> usize {
        let mut marked = 0;
        for i in 0..self.order.len() {
            let id = self.order[i];
            if !self.is_shown(id) {
                continue;
            }
            let Some(node) = self.nodes.get_mut(id.index()).and_then(Option::as_mut) else {
                continue;
            };
            let rect = node.element.base().rect();
            if damage.iter().any(|d| d.intersects(&rect)) {
                node.element.base_mut().invalidate();
                node.pending = true;
                marked += 1;
            }
        }
        marked
    }

    /// First element in paint order still needing paint
    pub fn next_pending(&self) -> Option<ElementId> {
        self.order
            .iter()
            .copied()
            .find(|id| self.node(*id).is_some_and(|n| n.pending))
    }

    pub fn clear_pending(&mut self, id: ElementId) {
        if let Some(node) = self.nodes.get_mut(id.index()).and_then(Option::as_mut) {
            node.pending = false;
        }
    }

    pub fn pending_count(&self) -> usize {
        self.nodes.iter().flatten().filter(|n| n.pending).count()
    }

    /// Damage the area of every shown element
    pub fn invalidate(&mut self) {
        for i in 0..self.order.len() {
            let id = self.order[i];
            if !self.is_shown(id) {
                continue;
            }
            if let Some(rect) = self.get(id).map(|e| e.base().rect()) {
                self.damage.add(rect, true);
            }
        }
    }

    fn node(&self, id: ElementId) -> Option<&Node<E>> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    fn position(&self, id: ElementId) -> Option<usize> {
        self.node(id)?;
        self.order.iter().position(|i| *i == id)
    }

    /// Index just past the subtree starting at order position `start`
    fn subtree_end(&self, start: usize) -> usize {
        let root = self.order[start];
        let mut end = start + 1;
        while end < self.order.len() && self.is_descendant(self.order[end], root) {
            end += 1;
        }
        end
    }

    fn is_descendant(&self, id: ElementId, ancestor: ElementId) -> bool {
        let mut current = self.parent(id);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent(p);
        }
        false
    }
}

impl<E: Element, const N: usize> DamageSink for Layer<E, N> {
    fn add_damage_rect(&mut self, layer: LayerId, rect: Rect, combine: bool) {
        if layer == self.id {
            self.damage.add(rect, combine);
        }
    }
}

/// Damage sink borrowing only a layer's accumulator
struct LayerDamage<'a> {
    layer: LayerId,
    damage: &'a mut DamageAccumulator,
}

impl DamageSink for LayerDamage<'_> {
    fn add_damage_rect(&mut self, layer: LayerId, rect: Rect, combine: bool) {
        if layer == self.layer {
            self.damage.add(rect, combine);
        }
    }
}
