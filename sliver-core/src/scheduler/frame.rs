//! Frame scheduler
//!
//! Walks the screen's layers back to front and drives each damaged
//! element's draw state machine. A frame goes through
//! `Ready → PreFrame → (PreLayer → Drawing → PostLayer)* → Ready`; the
//! phase is written only here.
//!
//! `advance` never blocks: it returns whenever an element parks on an asset
//! stream or the preemption level asks for a break, and the next call
//! resumes at the same element. Later elements in a layer are never painted
//! before an earlier parked one.

use super::layer::LayerId;
use super::screen::Screen;
use crate::damage::bounding_box;
use crate::geometry::Rect;
use crate::paint::{paint, PaintContext, Paintable};
use crate::traits::AssetSource;

/// Frame phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FramePhase {
    /// No frame in progress
    #[default]
    Ready,
    /// Frame about to start
    PreFrame,
    /// Collecting the next layer's damage
    PreLayer,
    /// Painting the current layer's elements
    Drawing,
    /// Current layer finished
    PostLayer,
}

/// Result of one `advance` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdvanceOutcome {
    /// Nothing to draw
    Idle,
    /// Frame in progress; call again
    Yielded,
    /// Frame finished
    FrameComplete,
}

/// Counters for host inspection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameStats {
    /// Frames completed
    pub frames: u32,
    /// `paint` calls issued
    pub paint_calls: u32,
    /// Times an element entered a wait state on an asset stream
    pub parks: u32,
}

/// Frame scheduler state
#[derive(Debug, Default)]
pub struct FrameScheduler {
    phase: FramePhase,
    /// Index of the layer being drawn
    layer: u8,
    /// Damaged region of the layer being drawn
    region: Rect,
    stats: FrameStats,
}

impl FrameScheduler {
    pub const fn new() -> Self {
        Self {
            phase: FramePhase::Ready,
            layer: 0,
            region: Rect::new(0, 0, 0, 0),
            stats: FrameStats {
                frames: 0,
                paint_calls: 0,
                parks: 0,
            },
        }
    }

    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    /// Layer being drawn, if a frame is in progress
    pub fn current_layer(&self) -> Option<LayerId> {
        match self.phase {
            FramePhase::Ready | FramePhase::PreFrame => None,
            _ => Some(LayerId(self.layer)),
        }
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Progress time-based logic and the current frame
    ///
    /// `dt_ms` is the time elapsed since the previous call. The context may
    /// be a different one on every call: the clip of the layer being drawn
    /// is restored from the scheduler before any element is painted.
    pub fn advance<E, A, const L: usize, const N: usize>(
        &mut self,
        dt_ms: u32,
        screen: &mut Screen<E, L, N>,
        ctx: &mut PaintContext<'_, A>,
    ) -> AdvanceOutcome
    where
        E: Paintable<A>,
        A: AssetSource,
    {
        screen.update(dt_ms);

        if self.phase == FramePhase::Ready {
            if !screen.has_damage() {
                return AdvanceOutcome::Idle;
            }
            self.phase = FramePhase::PreFrame;
        }

        // Clip already applied to `ctx` during this call
        let mut clipped = false;

        loop {
            match self.phase {
                FramePhase::Ready => return AdvanceOutcome::Idle,
                FramePhase::PreFrame => {
                    debug!("frame {} start", self.stats.frames);
                    ctx.surface.begin_frame();
                    self.layer = 0;
                    self.phase = FramePhase::PreLayer;
                }
                FramePhase::PreLayer => {
                    let Some(layer) = screen.layer_mut(LayerId(self.layer)) else {
                        ctx.surface.end_frame();
                        self.stats.frames = self.stats.frames.wrapping_add(1);
                        self.phase = FramePhase::Ready;
                        debug!("frame complete");
                        return AdvanceOutcome::FrameComplete;
                    };

                    let damage = layer.take_damage();
                    let Some(region) = bounding_box(&damage) else {
                        self.layer += 1;
                        continue;
                    };
                    let marked = layer.mark_damaged(&damage);
                    debug!(
                        "layer {} begin: {} damage rects, {} elements",
                        self.layer,
                        damage.len(),
                        marked
                    );

                    self.region = region;
                    ctx.clip = region;
                    ctx.surface.set_clip(region);
                    clipped = true;
                    ctx.surface.begin_layer(layer.id(), region);
                    self.phase = FramePhase::Drawing;
                }
                FramePhase::Drawing => {
                    let Some(layer) = screen.layer_mut(LayerId(self.layer)) else {
                        self.phase = FramePhase::PostLayer;
                        continue;
                    };
                    let Some(id) = layer.next_pending() else {
                        self.phase = FramePhase::PostLayer;
                        continue;
                    };
                    if !layer.is_shown(id) {
                        // Hidden since its layer was marked
                        if let Some(element) = layer.get_mut(id) {
                            element.base_mut().invalidate();
                        }
                        layer.clear_pending(id);
                        continue;
                    }
                    let Some(element) = layer.get_mut(id) else {
                        layer.clear_pending(id);
                        continue;
                    };

                    if !clipped {
                        ctx.clip = self.region;
                        ctx.surface.set_clip(self.region);
                        clipped = true;
                    }

                    self.stats.paint_calls = self.stats.paint_calls.wrapping_add(1);
                    let before = element.base().draw_state();
                    let state = paint(element, ctx);

                    if state.is_done() {
                        layer.clear_pending(id);
                        if ctx.config.preemption.yields_between_elements() {
                            return AdvanceOutcome::Yielded;
                        }
                    } else {
                        if state.is_wait() && state != before {
                            trace!("element {} parked", id.index());
                            self.stats.parks = self.stats.parks.wrapping_add(1);
                        }
                        return AdvanceOutcome::Yielded;
                    }
                }
                FramePhase::PostLayer => {
                    ctx.surface.end_layer(LayerId(self.layer));
                    self.layer += 1;
                    self.phase = FramePhase::PreLayer;
                }
            }
        }
    }
}
