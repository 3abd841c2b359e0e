mod cursor;
mod engine;
mod slot;

pub use cursor::{Cursor, SlotRuler};
pub use engine::{
    COUNTDOWN_TICK_MS, COUNTDOWN_TICKS, RhythmConfig, RhythmEngine, RhythmPhase, SubmitOutcome,
};
pub use slot::{NoteSlot, SlotState};
