use crate::model::note::Note;

/// Lifecycle of one rhythm slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Pending,
    Hit,
    Missed,
}

impl SlotState {
    pub fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// One note position within a rhythm staff segment.
#[derive(Debug, Clone)]
pub struct NoteSlot {
    pub note: Note,
    pub state: SlotState,
}

impl NoteSlot {
    pub fn new(note: Note) -> Self {
        Self {
            note,
            state: SlotState::Pending,
        }
    }

    /// A slot counts as answered once it is hit or missed.
    pub fn answered(&self) -> bool {
        !self.state.is_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::note::{Clef, NoteSymbol, note_at};

    fn slot() -> NoteSlot {
        NoteSlot::new(note_at(Clef::Treble, 0, NoteSymbol::Whole).unwrap())
    }

    #[test]
    fn new_slot_is_pending() {
        let slot = slot();
        assert!(slot.state.is_pending());
        assert!(!slot.answered());
    }

    #[test]
    fn hit_and_missed_both_count_as_answered() {
        let mut slot = slot();
        slot.state = SlotState::Hit;
        assert!(slot.answered());
        slot.state = SlotState::Missed;
        assert!(slot.answered());
    }
}
