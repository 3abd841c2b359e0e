// Data models for staff notes and their display notation.

pub mod notation;
pub mod note;

pub use notation::NotationSystem;
pub use note::{Clef, Note, NoteName, NoteSymbol, note_at};
