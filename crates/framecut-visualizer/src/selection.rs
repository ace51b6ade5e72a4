//! Single-part selection
//!
//! A part is either unselected or selected, and at most one part is
//! selected at a time. Selecting another part or clicking empty space
//! leaves the previous one unselected.

use framecut_core::PartId;

/// Result of a selection transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChange {
    pub previous: Option<PartId>,
    pub current: Option<PartId>,
}

impl SelectionChange {
    pub fn is_noop(&self) -> bool {
        self.previous == self.current
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    current: Option<PartId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&PartId> {
        self.current.as_ref()
    }

    pub fn is_selected(&self, id: &PartId) -> bool {
        self.current.as_ref() == Some(id)
    }

    /// Move to `target`; `None` clears the selection
    pub fn transition(&mut self, target: Option<PartId>) -> SelectionChange {
        let previous = std::mem::replace(&mut self.current, target);
        SelectionChange {
            previous,
            current: self.current.clone(),
        }
    }

    pub fn clear(&mut self) -> SelectionChange {
        self.transition(None)
    }
}
