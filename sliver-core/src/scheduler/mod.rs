//! Frame scheduling
//!
//! Layers of elements, the screen that stacks them, and the scheduler that
//! turns accumulated damage into incremental paint calls.

pub mod frame;
pub mod layer;
pub mod screen;

pub use frame::{AdvanceOutcome, FramePhase, FrameScheduler, FrameStats};
pub use layer::{ElementId, Layer, LayerError, LayerId};
pub use screen::Screen;
