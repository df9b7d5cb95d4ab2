//! Generic paint loop
//!
//! `paint` is the single entry point into an element's draw state machine.
//! It dispatches `Ready` to the first stage the element needs, then runs
//! one step at a time until the element is `Done`, parks on an asset
//! stream, or the preemption level demands a return after one transition.
//! Element implementations never see the preemption level.

use super::context::PaintContext;
use super::element::{PaintData, Paintable};
use super::state::{DrawState, Stage};
use crate::traits::{AssetReader, AssetSource, Scheme};

/// Advance `element` through as much of its paint sequence as the
/// suspension contract allows
///
/// Returns the state reached. Calling this on a `Done` element draws
/// nothing.
pub fn paint<E, A>(element: &mut E, ctx: &mut PaintContext<'_, A>) -> DrawState
where
    E: Paintable<A>,
    A: AssetSource,
{
    let Some(mut data) = begin(element, ctx) else {
        return element.base().draw_state();
    };

    loop {
        step(element, &mut data, ctx);

        let state = element.base().draw_state();
        if state.is_done() || state.is_wait() || ctx.config.preemption.single_step() {
            break;
        }
    }

    finish::<E, A>(element, data)
}

/// Resolve the working-data for this call
///
/// `Ready` is a pure dispatch: it resolves the scheme, picks the first
/// stage and draws nothing.
fn begin<E, A>(element: &mut E, ctx: &mut PaintContext<'_, A>) -> Option<PaintData>
where
    E: Paintable<A>,
    A: AssetSource,
{
    match element.base().draw_state() {
        DrawState::Done => None,
        DrawState::Ready => {
            let Some(scheme) = resolve_scheme(element, ctx) else {
                debug!("element has no scheme, nothing to draw");
                set_state::<E, A>(element, DrawState::Done);
                return None;
            };
            let first = DrawState::first(&element.guards(&scheme, &*ctx.assets));
            set_state::<E, A>(element, first);
            if first.is_done() {
                return None;
            }
            Some(PaintData::new(scheme))
        }
        _ => {
            let data = element.base_mut().paint_state_mut().data.take();
            match data {
                Some(data) => Some(data),
                None => {
                    // Working-data dropped mid-sequence: start over
                    element.base_mut().invalidate();
                    begin(element, ctx)
                }
            }
        }
    }
}

fn resolve_scheme<E, A>(element: &E, ctx: &PaintContext<'_, A>) -> Option<Scheme>
where
    E: Paintable<A>,
    A: AssetSource,
{
    let id = element.base().scheme()?;
    ctx.schemes.scheme(id).copied()
}

/// Run the step bound to the current state, then advance
fn step<E, A>(element: &mut E, data: &mut PaintData, ctx: &mut PaintContext<'_, A>)
where
    E: Paintable<A>,
    A: AssetSource,
{
    let next = match element.base().draw_state() {
        DrawState::DrawBackground => {
            element.paint_background(data, ctx);
            DrawState::after(Stage::Background, &element.guards(&data.scheme, &*ctx.assets))
        }
        DrawState::DrawImage => {
            let reader = element.open_image(data, ctx);
            if park::<E, A>(element, reader) {
                trace!("image stream pending, parking");
                DrawState::WaitImage
            } else {
                DrawState::after(Stage::Image, &element.guards(&data.scheme, &*ctx.assets))
            }
        }
        DrawState::WaitImage => {
            if pump::<E, A>(element, ctx) {
                DrawState::after(Stage::Image, &element.guards(&data.scheme, &*ctx.assets))
            } else {
                DrawState::WaitImage
            }
        }
        DrawState::AnalyzeText => {
            element.analyze_text(data, ctx);
            if data.layout.is_empty() {
                DrawState::after(Stage::Text, &element.guards(&data.scheme, &*ctx.assets))
            } else {
                DrawState::DrawText { line: 0 }
            }
        }
        DrawState::DrawText { line } => {
            let reader = element.open_text_line(line, data, ctx);
            if park::<E, A>(element, reader) {
                trace!("glyph stream for line {} pending, parking", line);
                DrawState::WaitText { line }
            } else {
                next_line(element, line, data, ctx)
            }
        }
        DrawState::WaitText { line } => {
            if pump::<E, A>(element, ctx) {
                next_line(element, line, data, ctx)
            } else {
                DrawState::WaitText { line }
            }
        }
        DrawState::DrawBorder => {
            element.paint_border(data, ctx);
            DrawState::after(Stage::Border, &element.guards(&data.scheme, &*ctx.assets))
        }
        DrawState::Ready | DrawState::Done => DrawState::Done,
    };

    set_state::<E, A>(element, next);
}

fn next_line<E, A>(element: &E, line: u8, data: &PaintData, ctx: &PaintContext<'_, A>) -> DrawState
where
    E: Paintable<A>,
    A: AssetSource,
{
    let guards = element.guards(&data.scheme, &*ctx.assets);
    DrawState::after_line(line, data.layout.line_count(), &guards)
}

/// Keep `reader` if its transfer is still running
///
/// Returns true if the element must wait. Finished or absent readers are
/// released immediately.
fn park<E, A>(element: &mut E, reader: Option<A::Reader>) -> bool
where
    E: Paintable<A>,
    A: AssetSource,
{
    match reader {
        Some(reader) if !reader.is_finished() => {
            let paint = element.base_mut().paint_state_mut();
            debug_assert!(paint.reader.is_none(), "second outstanding reader");
            paint.reader = Some(reader);
            true
        }
        _ => false,
    }
}

/// Advance the outstanding stream by one `run()`
///
/// Returns true once the stream has finished and been released.
fn pump<E, A>(element: &mut E, ctx: &mut PaintContext<'_, A>) -> bool
where
    E: Paintable<A>,
    A: AssetSource,
{
    let paint = element.base_mut().paint_state_mut();
    let finished = match paint.reader.as_mut() {
        Some(reader) => {
            reader.run(ctx.surface);
            reader.is_finished()
        }
        None => true,
    };
    if finished {
        paint.reader = None;
    }
    finished
}

/// Store working-data back, or release everything once `Done`
fn finish<E, A>(element: &mut E, data: PaintData) -> DrawState
where
    E: Paintable<A>,
    A: AssetSource,
{
    let paint = element.base_mut().paint_state_mut();
    if paint.state.is_done() {
        paint.reader = None;
        drop(data);
    } else {
        paint.data = Some(data);
    }
    paint.state
}

fn set_state<E, A>(element: &mut E, state: DrawState)
where
    E: Paintable<A>,
    A: AssetSource,
{
    element.base_mut().paint_state_mut().state = state;
}
