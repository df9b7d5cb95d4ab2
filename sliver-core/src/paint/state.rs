//! Draw state machine definition
//!
//! Every element type paints through the same template:
//!
//! ```text
//! Ready → [DrawBackground] → [DrawImage ⇄ WaitImage]
//!       → [AnalyzeText → DrawText(line) ⇄ WaitText(line)] → [DrawBorder] → Done
//! ```
//!
//! Bracketed stages are skipped when their guard is false. Guards are
//! evaluated fresh at every transition, so a background made transparent is
//! simply skipped on the next frame. States only ever move forward; wait
//! states are the only ones re-entered without changing the tag.

/// Position of an element within its paint sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DrawState {
    /// Not started / idle
    Ready,
    /// About to fill the background
    DrawBackground,
    /// About to request the image stream
    DrawImage,
    /// Image stream outstanding
    WaitImage,
    /// About to wrap the text into lines
    AnalyzeText,
    /// About to request the glyph stream for one line
    DrawText { line: u8 },
    /// Glyph stream for one line outstanding
    WaitText { line: u8 },
    /// About to draw the border
    DrawBorder,
    /// Nothing more to draw this frame
    Done,
}

/// Optional stage of the paint template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Stage {
    Background,
    Image,
    Text,
    Border,
}

impl Stage {
    /// Template order, back to front
    pub const ORDER: [Stage; 4] = [Stage::Background, Stage::Image, Stage::Text, Stage::Border];

    /// First state of this stage
    pub const fn entry(self) -> DrawState {
        match self {
            Stage::Background => DrawState::DrawBackground,
            Stage::Image => DrawState::DrawImage,
            Stage::Text => DrawState::AnalyzeText,
            Stage::Border => DrawState::DrawBorder,
        }
    }

    const fn index(self) -> usize {
        match self {
            Stage::Background => 0,
            Stage::Image => 1,
            Stage::Text => 2,
            Stage::Border => 3,
        }
    }
}

/// What an element actually needs to draw right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Guards {
    pub background: bool,
    pub image: bool,
    pub text: bool,
    pub border: bool,
}

impl Guards {
    /// Guards with every stage enabled
    pub const fn all() -> Self {
        Self {
            background: true,
            image: true,
            text: true,
            border: true,
        }
    }

    pub const fn allows(&self, stage: Stage) -> bool {
        match stage {
            Stage::Background => self.background,
            Stage::Image => self.image,
            Stage::Text => self.text,
            Stage::Border => self.border,
        }
    }

    /// Number of stages enabled
    pub fn enabled_count(&self) -> usize {
        Stage::ORDER.iter().filter(|s| self.allows(**s)).count()
    }
}

impl DrawState {
    /// Stage this state belongs to
    pub const fn stage(self) -> Option<Stage> {
        match self {
            DrawState::DrawBackground => Some(Stage::Background),
            DrawState::DrawImage | DrawState::WaitImage => Some(Stage::Image),
            DrawState::AnalyzeText | DrawState::DrawText { .. } | DrawState::WaitText { .. } => {
                Some(Stage::Text)
            }
            DrawState::DrawBorder => Some(Stage::Border),
            DrawState::Ready | DrawState::Done => None,
        }
    }

    /// Check if this is a wait state (asset stream outstanding)
    pub const fn is_wait(self) -> bool {
        matches!(self, DrawState::WaitImage | DrawState::WaitText { .. })
    }

    /// Check if painting is finished for this frame
    pub const fn is_done(self) -> bool {
        matches!(self, DrawState::Done)
    }

    /// Check if painting is in progress (neither idle nor finished)
    pub const fn is_active(self) -> bool {
        !matches!(self, DrawState::Ready | DrawState::Done)
    }

    /// First state of a fresh paint sequence
    pub fn first(guards: &Guards) -> DrawState {
        Self::following(0, guards)
    }

    /// State after `stage` has completed
    pub fn after(stage: Stage, guards: &Guards) -> DrawState {
        Self::following(stage.index() + 1, guards)
    }

    /// State after text line `line` has been drawn
    ///
    /// Moves on to the next wrapped line, or past the text stage once the
    /// last line is out.
    pub fn after_line(line: u8, line_count: u8, guards: &Guards) -> DrawState {
        match line.checked_add(1) {
            Some(next) if next < line_count => DrawState::DrawText { line: next },
            _ => Self::after(Stage::Text, guards),
        }
    }

    fn following(from: usize, guards: &Guards) -> DrawState {
        Stage::ORDER
            .iter()
            .skip(from)
            .find(|stage| guards.allows(**stage))
            .map_or(DrawState::Done, |stage| stage.entry())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_template() {
        let g = Guards::all();
        assert_eq!(DrawState::first(&g), DrawState::DrawBackground);
        assert_eq!(DrawState::after(Stage::Background, &g), DrawState::DrawImage);
        assert_eq!(DrawState::after(Stage::Image, &g), DrawState::AnalyzeText);
        assert_eq!(DrawState::after(Stage::Text, &g), DrawState::DrawBorder);
        assert_eq!(DrawState::after(Stage::Border, &g), DrawState::Done);
    }

    #[test]
    fn test_skip_image_and_border() {
        let g = Guards {
            background: true,
            text: true,
            ..Default::default()
        };
        assert_eq!(DrawState::after(Stage::Background, &g), DrawState::AnalyzeText);
        assert_eq!(DrawState::after(Stage::Text, &g), DrawState::Done);
    }

    #[test]
    fn test_nothing_enabled_is_done() {
        assert_eq!(DrawState::first(&Guards::default()), DrawState::Done);
    }

    #[test]
    fn test_transparent_background_skipped() {
        let g = Guards {
            border: true,
            ..Default::default()
        };
        assert_eq!(DrawState::first(&g), DrawState::DrawBorder);
    }

    #[test]
    fn test_text_lines_advance() {
        let g = Guards::all();
        assert_eq!(
            DrawState::after_line(0, 3, &g),
            DrawState::DrawText { line: 1 }
        );
        assert_eq!(DrawState::after_line(2, 3, &g), DrawState::DrawBorder);
        assert_eq!(DrawState::after_line(u8::MAX, u8::MAX, &g), DrawState::DrawBorder);
    }

    #[test]
    fn test_wait_states() {
        assert!(DrawState::WaitImage.is_wait());
        assert!(DrawState::WaitText { line: 0 }.is_wait());
        assert!(!DrawState::DrawImage.is_wait());
        assert!(!DrawState::Done.is_wait());
    }

    #[test]
    fn test_stage_membership() {
        assert_eq!(DrawState::WaitImage.stage(), Some(Stage::Image));
        assert_eq!(DrawState::WaitText { line: 4 }.stage(), Some(Stage::Text));
        assert_eq!(DrawState::Ready.stage(), None);
    }

    #[test]
    fn test_transitions_only_move_forward() {
        // Every stage exit lands in a later stage or Done
        let g = Guards::all();
        for stage in Stage::ORDER {
            let next = DrawState::after(stage, &g);
            if let Some(next_stage) = next.stage() {
                assert!(next_stage.index() > stage.index());
            } else {
                assert_eq!(next, DrawState::Done);
            }
        }
    }
}
