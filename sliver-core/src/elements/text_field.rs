//! Editable single-line text field with a blinking cursor
//!
//! The cursor blinks from `update`, independent of drawing: every toggle
//! damages only the cursor rectangle, and the cursor itself is drawn after
//! the text in the border stage.

use super::{to_text, Text};
use crate::config::RenderConfig;
use crate::damage::DamageSink;
use crate::geometry::Rect;
use crate::paint::{steps, Alignment, Element, ElementBase, Guards, HAlign, PaintContext, PaintData, Paintable, VAlign};
use crate::traits::{AssetReader, AssetSource, Scheme, SchemeId};

/// Cursor bar width (pixels)
const CURSOR_WIDTH: u32 = 2;

#[derive(Debug)]
pub struct TextField<R> {
    base: ElementBase<R>,
    text: Text,
    focused: bool,
    cursor_on: bool,
    blink_ms: u32,
    elapsed_ms: u32,
    /// Where the cursor was last drawn
    cursor: Rect,
}

impl<R: AssetReader> TextField<R> {
    /// Empty field blinking at the configured cursor period
    pub fn new(rect: Rect, scheme: SchemeId, config: &RenderConfig) -> Self {
        Self {
            base: ElementBase::new(rect, Some(scheme)),
            text: Text::new(),
            focused: false,
            cursor_on: false,
            blink_ms: config.cursor_blink_ms as u32,
            elapsed_ms: 0,
            cursor: Rect::default(),
        }
    }

    /// Blink half-period; 0 keeps the cursor steady
    pub fn with_blink_period(mut self, blink_ms: u16) -> Self {
        self.blink_ms = blink_ms as u32;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_cursor_shown(&self) -> bool {
        self.focused && self.cursor_on
    }

    pub fn set_text(&mut self, text: &str, damage: &mut dyn DamageSink) {
        if text != self.text.as_str() {
            self.text = to_text(text);
            self.edited(damage);
        }
    }

    /// Append one character; returns false when the field is full
    pub fn push_char(&mut self, ch: char, damage: &mut dyn DamageSink) -> bool {
        if self.text.push(ch).is_err() {
            return false;
        }
        self.edited(damage);
        true
    }

    /// Remove the last character
    pub fn backspace(&mut self, damage: &mut dyn DamageSink) -> Option<char> {
        let ch = self.text.pop()?;
        self.edited(damage);
        Some(ch)
    }

    pub fn set_focused(&mut self, focused: bool, damage: &mut dyn DamageSink) {
        if focused == self.focused {
            return;
        }
        self.focused = focused;
        self.restart_blink();
        self.base.damage(damage);
    }

    fn edited(&mut self, damage: &mut dyn DamageSink) {
        self.restart_blink();
        self.base.damage(damage);
    }

    fn restart_blink(&mut self) {
        self.cursor_on = true;
        self.elapsed_ms = 0;
    }

    fn damage_cursor(&self, damage: &mut dyn DamageSink) {
        let area = if self.cursor.is_empty() {
            self.base.rect()
        } else {
            self.cursor
        };
        damage.add_damage_rect(self.base.layer(), area, true);
    }

    fn cursor_rect(&self, data: &PaintData, scheme: &Scheme, line_height: u32, advance: u32) -> Rect {
        let area = self.base.rect().inset(scheme.content_inset());
        let last = data
            .layout
            .line_count()
            .checked_sub(1)
            .and_then(|i| data.layout.line(i));
        let (x, y) = match last {
            Some(span) => (
                span.origin.x + (span.columns as u32 * advance) as i32,
                span.origin.y,
            ),
            None => (area.x, area.y + (area.height as i32 - line_height as i32) / 2),
        };
        let cursor = Rect::new(x, y, CURSOR_WIDTH, line_height);
        cursor.intersection(&area).unwrap_or_default()
    }
}

impl<R: AssetReader> Element for TextField<R> {
    type Reader = R;

    fn base(&self) -> &ElementBase<R> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase<R> {
        &mut self.base
    }

    fn update(&mut self, dt_ms: u32, damage: &mut dyn DamageSink) {
        if !self.focused || self.blink_ms == 0 {
            return;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(dt_ms);
        if self.elapsed_ms < self.blink_ms {
            return;
        }
        // Odd number of elapsed half-periods flips the cursor
        let periods = self.elapsed_ms / self.blink_ms;
        self.elapsed_ms %= self.blink_ms;
        if periods % 2 == 1 {
            self.cursor_on = !self.cursor_on;
            self.damage_cursor(damage);
        }
    }

    fn on_resize(&mut self, _old: Rect, _damage: &mut dyn DamageSink) {
        self.cursor = Rect::default();
        self.restart_blink();
    }
}

impl<A: AssetSource> Paintable<A> for TextField<A::Reader> {
    fn guards(&self, scheme: &Scheme, assets: &A) -> Guards {
        Guards {
            background: scheme.background.is_some(),
            image: false,
            text: steps::has_text(assets, scheme, Some(&self.text)),
            border: scheme.border.is_some() || self.is_cursor_shown(),
        }
    }

    fn text(&self) -> Option<&str> {
        Some(&self.text)
    }

    fn text_alignment(&self) -> Alignment {
        Alignment::new(HAlign::Left, VAlign::Middle)
    }

    fn paint_border(&mut self, data: &PaintData, ctx: &mut PaintContext<'_, A>) {
        if let Some(border) = data.scheme.border {
            steps::stroke_border(ctx, self.base.rect(), border);
        }
        if !self.is_cursor_shown() {
            return;
        }
        let Some(metrics) = data.scheme.font.and_then(|f| ctx.assets.font_metrics(f)) else {
            return;
        };
        self.cursor = self.cursor_rect(
            data,
            &data.scheme,
            metrics.line_height as u32,
            metrics.advance as u32,
        );
        steps::fill_background(ctx, self.cursor, data.scheme.foreground);
    }
}
