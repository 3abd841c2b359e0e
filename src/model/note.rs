use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// The seven diatonic note names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteName {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl NoteName {
    /// All names in scale order, C first.
    pub const ALL: [NoteName; 7] = [
        NoteName::C,
        NoteName::D,
        NoteName::E,
        NoteName::F,
        NoteName::G,
        NoteName::A,
        NoteName::B,
    ];

    /// Letter-notation label.
    pub fn letter(self) -> &'static str {
        match self {
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::F => "F",
            Self::G => "G",
            Self::A => "A",
            Self::B => "B",
        }
    }

    /// Solfège-notation label.
    pub fn solfege(self) -> &'static str {
        match self {
            Self::C => "Do",
            Self::D => "Re",
            Self::E => "Mi",
            Self::F => "Fa",
            Self::G => "Sol",
            Self::A => "La",
            Self::B => "Si",
        }
    }

    /// Scale index, C = 0.
    pub fn index(self) -> usize {
        match self {
            Self::C => 0,
            Self::D => 1,
            Self::E => 2,
            Self::F => 3,
            Self::G => 4,
            Self::A => 5,
            Self::B => 6,
        }
    }

    /// Convert from a scale index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Duration symbol attached to a generated note.
/// Difficulty widens the pool of symbols, not the pitch range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NoteSymbol {
    #[default]
    Whole,
    Half,
    Quarter,
    Eighth,
}

/// Clef fixing the staff-position to pitch mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum Clef {
    #[default]
    Treble,
    Bass,
}

impl Clef {
    /// Diatonic step (octave * 7 + scale index) of the middle staff line.
    /// Treble centers on B4, bass on D3.
    fn reference_step(self) -> i32 {
        match self {
            Self::Treble => 4 * 7 + 6,
            Self::Bass => 3 * 7 + 1,
        }
    }
}

/// Supported staff-position domain. Positions beyond the lines sit on
/// ledger lines; anything outside this range has no lookup entry.
pub const STAFF_POSITION_MIN: i8 = -6;
pub const STAFF_POSITION_MAX: i8 = 6;

/// A single note placed on the staff. Immutable once generated.
///
/// `staff_position` counts diatonic steps from the middle line
/// (0 = middle line, positive = upward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub name: NoteName,
    pub octave: i8,
    pub staff_position: i8,
    pub symbol: NoteSymbol,
}

impl Note {
    /// Whether the note sits outside the five staff lines.
    pub fn requires_ledger_line(&self) -> bool {
        self.staff_position.abs() > 4
    }
}

/// Look up the note at a staff position for the given clef.
/// Returns `None` outside the supported staff/ledger range.
pub fn note_at(clef: Clef, staff_position: i8, symbol: NoteSymbol) -> Option<Note> {
    if !(STAFF_POSITION_MIN..=STAFF_POSITION_MAX).contains(&staff_position) {
        return None;
    }
    let step = clef.reference_step() + i32::from(staff_position);
    let name = NoteName::from_index(step.rem_euclid(7) as usize)?;
    Some(Note {
        name,
        octave: step.div_euclid(7) as i8,
        staff_position,
        symbol,
    })
}
