use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::note::NoteName;

/// Display convention for note names.
/// A pure presentation mapping, never a scoring input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NotationSystem {
    #[default]
    Letter,
    Solfege,
}

impl NotationSystem {
    /// Label for a note name under this notation.
    pub fn label(self, name: NoteName) -> &'static str {
        match self {
            Self::Letter => name.letter(),
            Self::Solfege => name.solfege(),
        }
    }

    /// The selectable answer surface: always all seven names, so the
    /// option list never reveals how many notes are on the staff.
    pub fn option_set(self) -> Vec<String> {
        NoteName::ALL
            .iter()
            .map(|name| self.label(*name).to_owned())
            .collect()
    }

    /// Reverse lookup from a label produced by `label`.
    pub fn parse_label(self, label: &str) -> Option<NoteName> {
        NoteName::ALL
            .iter()
            .copied()
            .find(|name| self.label(*name) == label)
    }
}
