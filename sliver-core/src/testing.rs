//! Test doubles shared by the unit tests

use std::string::String;
use std::vec::Vec;

use crate::damage::DamageSink;
use crate::geometry::{Color, Point, Rect, Size};
use crate::paint::{steps, DrawState, ElementBase, Element, PaintContext, PaintData, Paintable, TextLayout};
use crate::scheduler::LayerId;
use crate::traits::{
    AssetReader, AssetSource, BorderStyle, FontId, FontMetrics, ImageId, Scheme, SchemeId,
    SchemeTable, StreamStatus, Surface, TextRun,
};

pub const SCREEN: Rect = Rect::new(0, 0, 240, 160);

pub const PLAIN: SchemeId = SchemeId(1);
pub const BORDERED: SchemeId = SchemeId(2);
pub const TRANSPARENT: SchemeId = SchemeId(3);

pub const FONT: FontId = FontId(1);
pub const METRICS: FontMetrics = FontMetrics {
    advance: 6,
    line_height: 10,
};

/// Image whose reader finishes on open
pub const FAST_IMAGE: ImageId = ImageId(1);
/// Image whose reader needs `SLOW_IMAGE_RUNS` runs
pub const SLOW_IMAGE: ImageId = ImageId(2);
pub const SLOW_IMAGE_RUNS: u8 = 3;
pub const IMAGE_SIZE: Size = Size::new(16, 16);

pub const MAX_LINES_FOR_TEST: usize = crate::paint::MAX_TEXT_LINES;

pub fn test_schemes() -> SchemeTable<4> {
    let plain = Scheme {
        background: Some(Color::WHITE),
        font: Some(FONT),
        padding: 2,
        ..Default::default()
    };
    let mut table = SchemeTable::new();
    let _ = table.insert(PLAIN, plain);
    let _ = table.insert(
        BORDERED,
        Scheme {
            border: Some(BorderStyle {
                color: Color::BLACK,
                width: 1,
            }),
            active_background: Some(Color::BLACK),
            ..plain
        },
    );
    let _ = table.insert(
        TRANSPARENT,
        Scheme {
            background: None,
            ..plain
        },
    );
    table
}

/// Damage sink keeping every rectangle pushed to it
#[derive(Debug, Default)]
pub struct RecordingDamage {
    pub rects: Vec<(LayerId, Rect)>,
}

impl DamageSink for RecordingDamage {
    fn add_damage_rect(&mut self, layer: LayerId, rect: Rect, _combine: bool) {
        self.rects.push((layer, rect));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceOp {
    Fill(Rect, Color),
    Stroke(Rect, u8),
    Run(Point, usize),
    Clip(Rect),
    BeginFrame,
    BeginLayer(LayerId, Rect),
    EndLayer(LayerId),
    EndFrame,
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<SurfaceOp>,
}

impl RecordingSurface {
    pub fn fills(&self) -> usize {
        self.count(|op| matches!(op, SurfaceOp::Fill(..)))
    }

    pub fn strokes(&self) -> usize {
        self.count(|op| matches!(op, SurfaceOp::Stroke(..)))
    }

    pub fn runs(&self) -> usize {
        self.count(|op| matches!(op, SurfaceOp::Run(..)))
    }

    fn count(&self, f: impl Fn(&SurfaceOp) -> bool) -> usize {
        self.ops.iter().filter(|op| f(op)).count()
    }
}

impl Surface for RecordingSurface {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ops.push(SurfaceOp::Fill(rect, color));
    }

    fn stroke_rect(&mut self, rect: Rect, _color: Color, width: u8) {
        self.ops.push(SurfaceOp::Stroke(rect, width));
    }

    fn draw_run(&mut self, origin: Point, pixels: &[Color]) {
        self.ops.push(SurfaceOp::Run(origin, pixels.len()));
    }

    fn set_clip(&mut self, clip: Rect) {
        self.ops.push(SurfaceOp::Clip(clip));
    }

    fn begin_frame(&mut self) {
        self.ops.push(SurfaceOp::BeginFrame);
    }

    fn begin_layer(&mut self, layer: LayerId, region: Rect) {
        self.ops.push(SurfaceOp::BeginLayer(layer, region));
    }

    fn end_layer(&mut self, layer: LayerId) {
        self.ops.push(SurfaceOp::EndLayer(layer));
    }

    fn end_frame(&mut self) {
        self.ops.push(SurfaceOp::EndFrame);
    }
}

/// Reader that finishes after a fixed number of runs
#[derive(Debug)]
pub struct ScriptedReader {
    remaining: u8,
    origin: Point,
}

impl AssetReader for ScriptedReader {
    fn status(&self) -> StreamStatus {
        if self.remaining == 0 {
            StreamStatus::Finished
        } else {
            StreamStatus::Pending
        }
    }

    fn run(&mut self, surface: &mut dyn Surface) {
        if self.remaining > 0 {
            surface.draw_run(self.origin, &[Color::BLACK]);
            self.remaining -= 1;
        }
    }
}

#[derive(Debug, Default)]
pub struct ScriptedAssets {
    text_runs: u8,
    pub opened: usize,
}

impl ScriptedAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs each glyph stream needs before finishing
    pub fn with_text_runs(mut self, runs: u8) -> Self {
        self.text_runs = runs;
        self
    }
}

impl AssetSource for ScriptedAssets {
    type Reader = ScriptedReader;

    fn image_size(&self, image: ImageId) -> Option<Size> {
        (image == FAST_IMAGE || image == SLOW_IMAGE).then_some(IMAGE_SIZE)
    }

    fn open_image(&mut self, image: ImageId, origin: Point, _clip: Rect) -> Option<ScriptedReader> {
        let remaining = match image {
            FAST_IMAGE => 0,
            SLOW_IMAGE => SLOW_IMAGE_RUNS,
            _ => return None,
        };
        self.opened += 1;
        Some(ScriptedReader { remaining, origin })
    }

    fn font_metrics(&self, font: FontId) -> Option<FontMetrics> {
        (font == FONT).then_some(METRICS)
    }

    fn open_text(&mut self, run: &TextRun<'_>) -> Option<ScriptedReader> {
        if run.font != FONT {
            return None;
        }
        self.opened += 1;
        Some(ScriptedReader {
            remaining: self.text_runs,
            origin: run.origin,
        })
    }
}

/// Element recording every draw hook it runs
#[derive(Debug)]
pub struct TestElement {
    base: ElementBase<ScriptedReader>,
    image: Option<ImageId>,
    text: Option<String>,
    /// State at each hook call
    pub visited: Vec<DrawState>,
    pub steps: u32,
}

impl TestElement {
    pub fn new(rect: Rect, scheme: SchemeId) -> Self {
        Self {
            base: ElementBase::new(rect, Some(scheme)),
            image: None,
            text: None,
            visited: Vec::new(),
            steps: 0,
        }
    }

    pub fn with_image(mut self, image: ImageId) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.into());
        self
    }

    fn record(&mut self) {
        self.visited.push(self.base.draw_state());
        self.steps += 1;
    }
}

impl Element for TestElement {
    type Reader = ScriptedReader;

    fn base(&self) -> &ElementBase<ScriptedReader> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase<ScriptedReader> {
        &mut self.base
    }
}

impl Paintable<ScriptedAssets> for TestElement {
    fn image(&self) -> Option<ImageId> {
        self.image
    }

    fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    fn paint_background(&mut self, data: &PaintData, ctx: &mut PaintContext<'_, ScriptedAssets>) {
        self.record();
        if let Some(color) = data.scheme.background {
            steps::fill_background(ctx, self.base.rect(), color);
        }
    }

    fn open_image(
        &mut self,
        data: &PaintData,
        ctx: &mut PaintContext<'_, ScriptedAssets>,
    ) -> Option<ScriptedReader> {
        self.record();
        let image = self.image?;
        steps::open_image(ctx, image, self.content_rect(&data.scheme))
    }

    fn analyze_text(&mut self, data: &mut PaintData, ctx: &mut PaintContext<'_, ScriptedAssets>) {
        self.record();
        let area = self.text_rect(&data.scheme);
        data.layout = match self.text.as_deref() {
            Some(text) => steps::layout_text(ctx, text, &data.scheme, area, Default::default()),
            None => TextLayout::default(),
        };
    }

    fn open_text_line(
        &mut self,
        line: u8,
        data: &PaintData,
        ctx: &mut PaintContext<'_, ScriptedAssets>,
    ) -> Option<ScriptedReader> {
        self.record();
        let text = self.text.as_deref()?;
        steps::open_text_line(ctx, text, &data.layout, line, &data.scheme, self.base.rect())
    }

    fn paint_border(&mut self, data: &PaintData, ctx: &mut PaintContext<'_, ScriptedAssets>) {
        self.record();
        if let Some(border) = data.scheme.border {
            steps::stroke_border(ctx, self.base.rect(), border);
        }
    }
}
