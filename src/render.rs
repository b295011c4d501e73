//! Rendering payload handed to the display collaborator.
//!
//! The core never draws. Each tick it emits a `FramePayload` describing what
//! an external render sink should overlay on the frame and print to the
//! status panel. Highlights convey pass/fail semantics only; the sink owns
//! the actual palette.

use crate::detect::BoundingBox;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Highlight {
    /// Pass / compliant (conventionally green).
    Affirmative,
    /// Fail / non-compliant (conventionally red).
    Alert,
    /// Informational, no pass/fail meaning.
    Neutral,
}

/// A labeled box to draw on the frame.
#[derive(Clone, Debug)]
pub struct Overlay {
    pub bounds: BoundingBox,
    pub label: String,
    pub highlight: Highlight,
}

/// One line for the status panel.
#[derive(Clone, Debug)]
pub struct TextLine {
    pub text: String,
    pub highlight: Highlight,
}

impl TextLine {
    pub fn neutral(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            highlight: Highlight::Neutral,
        }
    }

    pub fn pass_fail(text: impl Into<String>, pass: bool) -> Self {
        Self {
            text: text.into(),
            highlight: if pass {
                Highlight::Affirmative
            } else {
                Highlight::Alert
            },
        }
    }
}

/// Everything the render sink needs for one frame.
#[derive(Clone, Debug, Default)]
pub struct FramePayload {
    pub overlays: Vec<Overlay>,
    pub lines: Vec<TextLine>,
    /// When set, the sink should clear the status panel before printing
    /// `lines` (used by Inspection when the lane occupant leaves).
    pub clear_panel: bool,
}

impl FramePayload {
    pub fn push_overlay(
        &mut self,
        bounds: BoundingBox,
        label: impl Into<String>,
        highlight: Highlight,
    ) {
        self.overlays.push(Overlay {
            bounds,
            label: label.into(),
            highlight,
        });
    }
}
