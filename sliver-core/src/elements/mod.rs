//! Element catalog
//!
//! Concrete elements taking part in the draw protocol. Each composes an
//! `ElementBase` and overrides only the draw hooks it needs; [`Widget`]
//! unifies them so a single layer can hold any mix.

pub mod button;
pub mod label;
pub mod picture;
pub mod radio;
pub mod text_field;

pub use button::Button;
pub use label::Label;
pub use picture::Picture;
pub use radio::RadioButton;
pub use text_field::TextField;

use heapless::String;

use crate::damage::DamageSink;
use crate::geometry::Rect;
use crate::paint::{Alignment, Element, ElementBase, Guards, PaintContext, PaintData, Paintable};
use crate::traits::{AssetReader, AssetSource, ImageId, Scheme};

/// Maximum text length per element (bytes)
pub const MAX_TEXT_LEN: usize = 64;

/// Element text storage
pub type Text = String<MAX_TEXT_LEN>;

/// Copy `text`, truncated at a character boundary
pub fn to_text(text: &str) -> Text {
    let mut out = Text::new();
    for ch in text.chars() {
        if out.push(ch).is_err() {
            debug!("text longer than {} bytes truncated", MAX_TEXT_LEN);
            break;
        }
    }
    out
}

/// Any catalog element
#[derive(Debug)]
pub enum Widget<R> {
    Label(Label<R>),
    Button(Button<R>),
    RadioButton(RadioButton<R>),
    TextField(TextField<R>),
    Picture(Picture<R>),
}

macro_rules! dispatch {
    ($self:expr, $w:ident => $body:expr) => {
        match $self {
            Widget::Label($w) => $body,
            Widget::Button($w) => $body,
            Widget::RadioButton($w) => $body,
            Widget::TextField($w) => $body,
            Widget::Picture($w) => $body,
        }
    };
}

impl<R: AssetReader> Element for Widget<R> {
    type Reader = R;

    fn base(&self) -> &ElementBase<R> {
        dispatch!(self, w => w.base())
    }

    fn base_mut(&mut self) -> &mut ElementBase<R> {
        dispatch!(self, w => w.base_mut())
    }

    fn update(&mut self, dt_ms: u32, damage: &mut dyn DamageSink) {
        dispatch!(self, w => w.update(dt_ms, damage))
    }

    fn on_resize(&mut self, old: Rect, damage: &mut dyn DamageSink) {
        dispatch!(self, w => w.on_resize(old, damage))
    }
}

impl<A: AssetSource> Paintable<A> for Widget<A::Reader> {
    fn guards(&self, scheme: &Scheme, assets: &A) -> Guards {
        dispatch!(self, w => w.guards(scheme, assets))
    }

    fn image(&self) -> Option<ImageId> {
        dispatch!(self, w => Paintable::<A>::image(w))
    }

    fn text(&self) -> Option<&str> {
        dispatch!(self, w => Paintable::<A>::text(w))
    }

    fn text_alignment(&self) -> Alignment {
        dispatch!(self, w => Paintable::<A>::text_alignment(w))
    }

    fn content_rect(&self, scheme: &Scheme) -> Rect {
        dispatch!(self, w => Paintable::<A>::content_rect(w, scheme))
    }

    fn text_rect(&self, scheme: &Scheme) -> Rect {
        dispatch!(self, w => Paintable::<A>::text_rect(w, scheme))
    }

    fn paint_background(&mut self, data: &PaintData, ctx: &mut PaintContext<'_, A>) {
        dispatch!(self, w => w.paint_background(data, ctx))
    }

    fn open_image(&mut self, data: &PaintData, ctx: &mut PaintContext<'_, A>) -> Option<A::Reader> {
        dispatch!(self, w => w.open_image(data, ctx))
    }

    fn analyze_text(&mut self, data: &mut PaintData, ctx: &mut PaintContext<'_, A>) {
        dispatch!(self, w => w.analyze_text(data, ctx))
    }

    fn open_text_line(
        &mut self,
        line: u8,
        data: &PaintData,
        ctx: &mut PaintContext<'_, A>,
    ) -> Option<A::Reader> {
        dispatch!(self, w => w.open_text_line(line, data, ctx))
    }

    fn paint_border(&mut self, data: &PaintData, ctx: &mut PaintContext<'_, A>) {
        dispatch!(self, w => w.paint_border(data, ctx))
    }
}

macro_rules! widget_from {
    ($($variant:ident),*) => {
        $(
            impl<R> From<$variant<R>> for Widget<R> {
                fn from(element: $variant<R>) -> Self {
                    Widget::$variant(element)
                }
            }
        )*
    };
}

widget_from!(Label, Button, RadioButton, TextField, Picture);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PreemptionLevel, RenderConfig};
    use crate::scheduler::{AdvanceOutcome, FrameScheduler, Screen};
    use crate::testing::*;

    #[test]
    fn test_to_text_truncates_on_char_boundary() {
        let long = "é".repeat(40);
        let text = to_text(&long);
        assert_eq!(text.len(), MAX_TEXT_LEN);
        assert!(text.chars().all(|c| c == 'é'));
    }

    #[test]
    fn test_mixed_screen_frame() {
        let config = RenderConfig::new().with_preemption(PreemptionLevel::Level0);
        let mut screen: Screen<Widget<ScriptedReader>, 1, 8> = Screen::new(SCREEN);
        let layer = screen.add_layer().unwrap();
        let panel = screen
            .add(layer, Widget::Label(Label::new(Rect::new(0, 0, 240, 160), TRANSPARENT, "")))
            .unwrap();
        let layer_ref = screen.layer_mut(layer).unwrap();
        layer_ref
            .add_child(panel, Widget::Button(Button::new(Rect::new(10, 10, 80, 24), BORDERED, "OK")))
            .unwrap();
        layer_ref
            .add_child(panel, Widget::RadioButton(RadioButton::new(Rect::new(10, 40, 80, 20), PLAIN, "On")))
            .unwrap();
        layer_ref
            .add_child(panel, Widget::Picture(Picture::new(Rect::new(100, 10, 40, 40), PLAIN, SLOW_IMAGE)))
            .unwrap();
        let field = layer_ref
            .add_child(panel, Widget::TextField(TextField::new(Rect::new(10, 70, 120, 20), BORDERED, &config)))
            .unwrap();

        let mut surface = RecordingSurface::default();
        let mut assets = ScriptedAssets::new();
        let schemes = test_schemes();
        let mut scheduler = FrameScheduler::new();
        let mut ctx = PaintContext::new(&mut surface, &mut assets, &schemes, &config, SCREEN);

        let mut outcome = scheduler.advance(0, &mut screen, &mut ctx);
        while outcome != AdvanceOutcome::FrameComplete {
            outcome = scheduler.advance(0, &mut screen, &mut ctx);
        }

        assert_eq!(scheduler.stats().parks, 1);
        for (_, widget) in screen.layer(layer).unwrap().iter() {
            assert!(widget.base().draw_state().is_done());
        }

        // Focus makes the field blink on the next updates
        screen
            .edit(layer, field, |w, d| {
                if let Widget::TextField(f) = w {
                    f.set_focused(true, d);
                }
            })
            .unwrap();
        while scheduler.advance(0, &mut screen, &mut ctx) != AdvanceOutcome::FrameComplete {}
        assert_eq!(
            scheduler.advance(DEFAULT_BLINK, &mut screen, &mut ctx),
            AdvanceOutcome::FrameComplete
        );
        assert_eq!(scheduler.stats().frames, 3);
    }

    const DEFAULT_BLINK: u32 = crate::config::DEFAULT_CURSOR_BLINK_MS as u32;
}
