//! Text line layout
//!
//! Wraps an element's text into lines against a fixed-advance font. The
//! result is paint working-data: computed once in `AnalyzeText` and reused
//! by every `DrawText` step of the same frame, across suspensions.

use heapless::Vec;

use crate::geometry::{Point, Rect};
use crate::traits::FontMetrics;

/// Maximum wrapped lines per element
pub const MAX_TEXT_LINES: usize = 8;

/// Horizontal alignment of each line inside the content area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical alignment of the line block inside the content area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VAlign {
    Top,
    #[default]
    Middle,
    Bottom,
}

/// Text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Alignment {
    pub horizontal: HAlign,
    pub vertical: VAlign,
}

impl Alignment {
    pub const fn new(horizontal: HAlign, vertical: VAlign) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    pub const fn centered() -> Self {
        Self::new(HAlign::Center, VAlign::Middle)
    }
}

/// One wrapped line: a byte range of the source text and where to draw it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineSpan {
    pub start: u16,
    pub end: u16,
    /// Width in glyphs
    pub columns: u16,
    /// Top-left corner of the first glyph
    pub origin: Point,
}

/// Wrapped lines of one element's text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextLayout {
    lines: Vec<LineSpan, MAX_TEXT_LINES>,
    bounds: Rect,
}

impl TextLayout {
    /// Wrap `text` into `area`
    ///
    /// Lines break at spaces and explicit newlines; words wider than the
    /// area are broken between glyphs. Lines beyond the area's height or
    /// `MAX_TEXT_LINES` are dropped, as are lines starting past the first
    /// 64 KiB of text.
    pub fn wrap(text: &str, metrics: FontMetrics, area: Rect, align: Alignment) -> Self {
        let mut layout = TextLayout::default();
        if text.is_empty() || area.is_empty() || metrics.advance == 0 || metrics.line_height == 0
        {
            return layout;
        }

        let max_columns = (area.width / metrics.advance as u32).max(1) as usize;
        let max_lines =
            ((area.height / metrics.line_height as u32).max(1) as usize).min(MAX_TEXT_LINES);

        let mut ranges: Vec<(usize, usize, usize), MAX_TEXT_LINES> = Vec::new();
        let mut wrapper = Wrapper {
            max_columns,
            max_lines,
            current: None,
            lines: &mut ranges,
        };

        let mut paragraph_start = 0;
        for paragraph in text.split('\n') {
            if !wrapper.paragraph(text, paragraph_start, paragraph.len()) {
                break;
            }
            paragraph_start += paragraph.len() + 1;
        }

        layout.place(&ranges, metrics, area, align);
        layout
    }

    pub fn line_count(&self) -> u8 {
        self.lines.len() as u8
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, index: u8) -> Option<&LineSpan> {
        self.lines.get(index as usize)
    }

    /// Slice of `text` shown on line `index`
    pub fn line_text<'t>(&self, text: &'t str, index: u8) -> Option<&'t str> {
        let span = self.line(index)?;
        text.get(span.start as usize..span.end as usize)
    }

    /// Area covered by all lines
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    fn place(
        &mut self,
        ranges: &[(usize, usize, usize)],
        metrics: FontMetrics,
        area: Rect,
        align: Alignment,
    ) {
        let line_height = metrics.line_height as i32;
        let block_height = ranges.len() as i32 * line_height;
        let top = match align.vertical {
            VAlign::Top => area.y,
            VAlign::Middle => area.y + (area.height as i32 - block_height) / 2,
            VAlign::Bottom => area.bottom() - block_height,
        };

        let mut bounds = Rect::default();
        for (i, &(start, end, columns)) in ranges.iter().enumerate() {
            let (Ok(start), Ok(end), Ok(columns)) = (
                u16::try_from(start),
                u16::try_from(end),
                u16::try_from(columns),
            ) else {
                debug!("text line {} past addressable range, dropped", i);
                break;
            };
            let width = columns as i32 * metrics.advance as i32;
            let x = match align.horizontal {
                HAlign::Left => area.x,
                HAlign::Center => area.x + (area.width as i32 - width) / 2,
                HAlign::Right => area.right() - width,
            };
            let origin = Point::new(x, top + i as i32 * line_height);
            bounds = bounds.union(&Rect::new(
                origin.x,
                origin.y,
                width as u32,
                metrics.line_height as u32,
            ));
            // Capacity matches `ranges`
            let _ = self.lines.push(LineSpan {
                start,
                end,
                columns,
                origin,
            });
        }
        self.bounds = bounds;
    }
}

/// Greedy word wrapper over byte ranges of the source text
struct Wrapper<'a> {
    max_columns: usize,
    max_lines: usize,
    /// Line being built: (start, end, columns)
    current: Option<(usize, usize, usize)>,
    lines: &'a mut Vec<(usize, usize, usize), MAX_TEXT_LINES>,
}

impl Wrapper<'_> {
    /// Wrap one newline-free paragraph starting at byte `start`
    ///
    /// Returns false once no more lines fit.
    fn paragraph(&mut self, text: &str, start: usize, len: usize) -> bool {
        let paragraph = &text[start..start + len];
        let mut word_start: Option<usize> = None;

        let ends = paragraph
            .char_indices()
            .chain(core::iter::once((paragraph.len(), ' ')));
        for (i, ch) in ends {
            if ch == ' ' {
                if let Some(s) = word_start.take() {
                    if !self.word(text, start + s, start + i) {
                        return false;
                    }
                }
            } else if word_start.is_none() {
                word_start = Some(i);
            }
        }

        match self.current.take() {
            Some(line) => self.emit(line),
            // Blank paragraph still takes a line
            None => self.emit((start, start, 0)),
        }
    }

    fn word(&mut self, text: &str, start: usize, end: usize) -> bool {
        let columns = text[start..end].chars().count();

        if let Some((line_start, _, line_columns)) = self.current {
            if line_columns + 1 + columns <= self.max_columns {
                self.current = Some((line_start, end, line_columns + 1 + columns));
                return true;
            }
            if let Some(line) = self.current.take() {
                if !self.emit(line) {
                    return false;
                }
            }
        }

        if columns <= self.max_columns {
            self.current = Some((start, end, columns));
            return true;
        }

        // Hard-break a word wider than the line
        let mut chunk_start = start;
        let mut chunk_columns = 0;
        for (i, _) in text[start..end].char_indices() {
            if chunk_columns == self.max_columns {
                if !self.emit((chunk_start, start + i, chunk_columns)) {
                    return false;
                }
                chunk_start = start + i;
                chunk_columns = 0;
            }
            chunk_columns += 1;
        }
        self.current = Some((chunk_start, end, chunk_columns));
        true
    }

    fn emit(&mut self, line: (usize, usize, usize)) -> bool {
        if self.lines.len() >= self.max_lines {
            return false;
        }
        let _ = self.lines.push(line);
        self.lines.len() < self.max_lines
    }
}
