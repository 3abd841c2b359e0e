use log::warn;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::config::Difficulty;
use crate::model::note::{
    Clef, Note, NoteSymbol, STAFF_POSITION_MAX, STAFF_POSITION_MIN, note_at,
};

const BEGINNER_SYMBOLS: &[NoteSymbol] = &[NoteSymbol::Whole];
const INTERMEDIATE_SYMBOLS: &[NoteSymbol] =
    &[NoteSymbol::Whole, NoteSymbol::Half, NoteSymbol::Quarter];
const ADVANCED_SYMBOLS: &[NoteSymbol] = &[
    NoteSymbol::Whole,
    NoteSymbol::Half,
    NoteSymbol::Quarter,
    NoteSymbol::Eighth,
];

/// Generates random staff notes for a difficulty level.
///
/// Pitch is drawn uniformly over the clef's full staff/ledger range at
/// every difficulty; difficulty only selects the duration-symbol pool.
pub struct NoteGenerator {
    clef: Clef,
    rng: StdRng,
}

impl NoteGenerator {
    pub fn new(clef: Clef) -> Self {
        Self {
            clef,
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeded generator for reproducible rounds.
    pub fn with_seed(clef: Clef, seed: u64) -> Self {
        Self {
            clef,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn clef(&self) -> Clef {
        self.clef
    }

    /// Generate one random note.
    ///
    /// A failed position lookup substitutes the clef's reference-line
    /// whole note instead of surfacing an error.
    pub fn generate(&mut self, difficulty: Difficulty) -> Note {
        let position = self.rng.gen_range(STAFF_POSITION_MIN..=STAFF_POSITION_MAX);
        let symbol = symbol_pool(difficulty)
            .choose(&mut self.rng)
            .copied()
            .unwrap_or_default();
        match note_at(self.clef, position, symbol) {
            Some(note) => note,
            None => {
                warn!("no note at staff position {position}, using fallback");
                fallback_note(self.clef)
            }
        }
    }

    /// Generate an ordered run of independent notes. Repeats are allowed.
    pub fn generate_many(&mut self, count: usize, difficulty: Difficulty) -> Vec<Note> {
        (0..count).map(|_| self.generate(difficulty)).collect()
    }

    /// Roll a note count in the given inclusive range.
    pub fn roll_count(&mut self, min: usize, max: usize) -> usize {
        self.rng.gen_range(min..=max)
    }
}

fn symbol_pool(difficulty: Difficulty) -> &'static [NoteSymbol] {
    match difficulty {
        Difficulty::Beginner => BEGINNER_SYMBOLS,
        Difficulty::Intermediate => INTERMEDIATE_SYMBOLS,
        Difficulty::Advanced => ADVANCED_SYMBOLS,
    }
}

fn fallback_note(clef: Clef) -> Note {
    note_at(clef, 0, NoteSymbol::Whole).unwrap_or(Note {
        name: crate::model::NoteName::B,
        octave: 4,
        staff_position: 0,
        symbol: NoteSymbol::Whole,
    })
}
