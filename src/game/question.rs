use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{GameMode, GameSettings};
use crate::game::generator::NoteGenerator;
use crate::model::note::Note;

/// Note count bounds for sequence questions.
const SEQUENCE_NOTES_MIN: usize = 2;
const SEQUENCE_NOTES_MAX: usize = 4;

/// One question presented to the player.
///
/// Owned by the round; replaced (never mutated across questions) when the
/// round rotates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub notes: Vec<Note>,
    /// Display names of the notes through the active notation, order preserved.
    pub correct_answer: Vec<String>,
    /// The full seven-name option set, regardless of note count.
    pub options: Vec<String>,
    pub answered: bool,
    pub user_answer: Option<Vec<String>>,
}

impl Question {
    /// Placeholder installed between questions.
    pub fn empty() -> Self {
        Self {
            id: String::new(),
            notes: Vec::new(),
            correct_answer: Vec::new(),
            options: Vec::new(),
            answered: false,
            user_answer: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

impl Default for Question {
    fn default() -> Self {
        Self::empty()
    }
}

/// Builds questions from freshly generated notes.
pub struct QuestionBuilder {
    generator: NoteGenerator,
}

impl QuestionBuilder {
    pub fn new(generator: NoteGenerator) -> Self {
        Self { generator }
    }

    /// Build a fresh question for the given settings.
    ///
    /// Rhythm rounds do not pass through here: the rhythm engine generates
    /// its own slot-indexed note list. A rhythm-mode call still yields a
    /// valid single-note question so the path stays harmless.
    pub fn build(&mut self, settings: &GameSettings) -> Question {
        let count = match settings.game_mode {
            GameMode::SingleNote | GameMode::Rhythm => 1,
            GameMode::Sequence => self
                .generator
                .roll_count(SEQUENCE_NOTES_MIN, SEQUENCE_NOTES_MAX),
        };
        let notes = self.generator.generate_many(count, settings.difficulty);
        let correct_answer = notes
            .iter()
            .map(|note| settings.notation_system.label(note.name).to_owned())
            .collect();

        Question {
            id: next_question_id(),
            correct_answer,
            options: settings.notation_system.option_set(),
            notes,
            answered: false,
            user_answer: None,
        }
    }

    pub fn generator_mut(&mut self) -> &mut NoteGenerator {
        &mut self.generator
    }
}

/// Millisecond timestamp plus a random suffix. The suffix keeps ids unique
/// across calls that land on the same millisecond.
fn next_question_id() -> String {
    format!(
        "{}-{}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple()
    )
}
