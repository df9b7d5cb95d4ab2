//! Element painting
//!
//! The draw state machine, the generic step library it dispatches to, and
//! the paint loop implementing the suspension contract.

pub mod context;
pub mod element;
pub mod painter;
pub mod state;
pub mod steps;
pub mod text;

pub use context::PaintContext;
pub use element::{Element, ElementBase, PaintData, Paintable};
pub use painter::paint;
pub use state::{DrawState, Guards, Stage};
pub use text::{Alignment, HAlign, LineSpan, TextLayout, VAlign, MAX_TEXT_LINES};
