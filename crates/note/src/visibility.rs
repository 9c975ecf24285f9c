//! Equity visibility state machine.
//!
//! The note type selector decides whether the equity section exists. There is
//! no uninitialized state: the starting state is derived from whatever note
//! type is selected at startup, including one restored from a draft.

use serde::{Deserialize, Serialize};
use tracing::info;

/// Note type that turns the equity section on.
pub const EQUITY_RESEARCH: &str = "Equity Research";

/// Whether the equity section applies to the current note.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    /// Any note type other than equity research.
    #[default]
    NonEquity,
    /// Equity research note.
    Equity,
}

/// Field and section requirements implied by a [`Visibility`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRequirements {
    /// The equity section is shown.
    pub equity_section_visible: bool,
    /// The equity entry is shown in the section navigation.
    pub equity_nav_visible: bool,
    /// The rating field must be filled before export.
    pub rating_required: bool,
    /// Price statistics must be present before export.
    pub stats_required: bool,
}

/// A change of [`Visibility`] caused by a new note type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    /// State before the change.
    pub from: Visibility,
    /// State after the change.
    pub to: Visibility,
    /// Requirements that now apply.
    pub requirements: FieldRequirements,
}

impl Visibility {
    /// Derives the state from a note type; only the exact literal
    /// [`EQUITY_RESEARCH`] selects [`Visibility::Equity`].
    #[must_use]
    pub fn from_note_type(note_type: &str) -> Self {
        if note_type == EQUITY_RESEARCH {
            Self::Equity
        } else {
            Self::NonEquity
        }
    }

    /// Returns true in the equity state.
    #[must_use]
    pub const fn is_equity(&self) -> bool {
        matches!(self, Self::Equity)
    }

    /// Requirements for this state.
    #[must_use]
    pub const fn requirements(&self) -> FieldRequirements {
        let equity = self.is_equity();
        FieldRequirements {
            equity_section_visible: equity,
            equity_nav_visible: equity,
            rating_required: equity,
            stats_required: equity,
        }
    }

    /// Applies a note type change. Returns the transition if the state moved.
    pub fn transition(&mut self, note_type: &str) -> Option<Transition> {
        let next = Self::from_note_type(note_type);
        if next == *self {
            return None;
        }
        let transition = Transition {
            from: *self,
            to: next,
            requirements: next.requirements(),
        };
        *self = next;
        info!(from = ?transition.from, to = ?transition.to, note_type, "Equity visibility changed");
        Some(transition)
    }
}
