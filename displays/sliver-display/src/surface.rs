//! embedded-graphics surface
//!
//! Adapts any `DrawTarget` whose color converts from `Rgb888` to the
//! pipeline's `Surface`. Every primitive is clipped to the region set by the
//! frame scheduler, so elements may draw past the damaged area freely.

use embedded_graphics::draw_target::DrawTargetExt;
use embedded_graphics::geometry::{Dimensions, Point as EgPoint, Size as EgSize};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyleBuilder, Rectangle, StrokeAlignment};

use sliver_core::geometry::{Color, Point, Rect};
use sliver_core::traits::Surface;

pub(crate) fn to_rectangle(rect: Rect) -> Rectangle {
    Rectangle::new(
        EgPoint::new(rect.x, rect.y),
        EgSize::new(rect.width, rect.height),
    )
}

pub(crate) fn to_rgb(color: Color) -> Rgb888 {
    Rgb888::new(color.r(), color.g(), color.b())
}

/// `Surface` over an embedded-graphics draw target
pub struct GraphicsSurface<D> {
    target: D,
    clip: Option<Rect>,
    errors: u32,
}

impl<D> GraphicsSurface<D>
where
    D: DrawTarget,
    D::Color: From<Rgb888>,
{
    pub fn new(target: D) -> Self {
        Self {
            target,
            clip: None,
            errors: 0,
        }
    }

    pub fn target(&self) -> &D {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut D {
        &mut self.target
    }

    pub fn into_inner(self) -> D {
        self.target
    }

    /// Draw calls the target rejected
    pub fn errors(&self) -> u32 {
        self.errors
    }

    /// Region currently drawn into
    fn region(&self) -> Rectangle {
        let bounds = self.target.bounding_box();
        match self.clip {
            Some(clip) => bounds.intersection(&to_rectangle(clip)),
            None => bounds,
        }
    }

    fn native(color: Color) -> D::Color {
        to_rgb(color).into()
    }

    fn record<E>(&mut self, result: Result<(), E>) {
        if result.is_err() {
            self.errors = self.errors.wrapping_add(1);
            warn!("draw target error ({} so far)", self.errors);
        }
    }
}

impl<D> Surface for GraphicsSurface<D>
where
    D: DrawTarget,
    D::Color: From<Rgb888>,
{
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let area = self.region().intersection(&to_rectangle(rect));
        if area.is_zero_sized() {
            return;
        }
        let result = self.target.fill_solid(&area, Self::native(color));
        self.record(result);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: u8) {
        if width == 0 {
            return;
        }
        let region = self.region();
        let style = PrimitiveStyleBuilder::new()
            .stroke_color(Self::native(color))
            .stroke_width(width as u32)
            .stroke_alignment(StrokeAlignment::Inside)
            .build();
        let result = to_rectangle(rect)
            .into_styled(style)
            .draw(&mut self.target.clipped(&region));
        self.record(result);
    }

    fn draw_run(&mut self, origin: Point, pixels: &[Color]) {
        let region = self.region();
        let run = pixels.iter().enumerate().map(|(i, c)| {
            Pixel(
                EgPoint::new(origin.x + i as i32, origin.y),
                Self::native(*c),
            )
        });
        let result = self.target.clipped(&region).draw_iter(run);
        self.record(result);
    }

    fn set_clip(&mut self, clip: Rect) {
        self.clip = Some(clip);
    }

    fn end_frame(&mut self) {
        self.clip = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::mock_display::MockDisplay;
    use embedded_graphics::pixelcolor::Rgb565;

    fn surface() -> GraphicsSurface<MockDisplay<Rgb565>> {
        let mut display = MockDisplay::new();
        display.set_allow_overdraw(true);
        display.set_allow_out_of_bounds_drawing(true);
        GraphicsSurface::new(display)
    }

    #[test]
    fn test_fill_respects_clip() {
        let mut surface = surface();
        surface.set_clip(Rect::new(0, 0, 4, 4));

        surface.fill_rect(Rect::new(2, 2, 10, 10), Color::WHITE);

        let display = surface.target();
        assert_eq!(display.get_pixel(EgPoint::new(3, 3)), Some(Rgb565::WHITE));
        assert_eq!(display.get_pixel(EgPoint::new(5, 5)), None);
    }

    #[test]
    fn test_stroke_inside_rect() {
        let mut surface = surface();

        surface.stroke_rect(Rect::new(0, 0, 5, 5), Color::WHITE, 1);

        let display = surface.target();
        assert_eq!(display.get_pixel(EgPoint::new(0, 0)), Some(Rgb565::WHITE));
        assert_eq!(display.get_pixel(EgPoint::new(4, 4)), Some(Rgb565::WHITE));
        assert_eq!(display.get_pixel(EgPoint::new(2, 2)), None);
    }

    #[test]
    fn test_run_clipped_horizontally() {
        let mut surface = surface();
        surface.set_clip(Rect::new(0, 0, 2, 64));

        surface.draw_run(Point::new(0, 1), &[Color::WHITE; 4]);

        let display = surface.target();
        assert_eq!(display.get_pixel(EgPoint::new(1, 1)), Some(Rgb565::WHITE));
        assert_eq!(display.get_pixel(EgPoint::new(2, 1)), None);
        assert_eq!(surface.errors(), 0);
    }

    #[test]
    fn test_end_frame_clears_clip() {
        let mut surface = surface();
        surface.set_clip(Rect::new(0, 0, 1, 1));
        surface.end_frame();

        surface.fill_rect(Rect::new(10, 10, 1, 1), Color::WHITE);

        assert_eq!(
            surface.target().get_pixel(EgPoint::new(10, 10)),
            Some(Rgb565::WHITE)
        );
    }
}
