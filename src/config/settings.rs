use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::ValueEnum;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::model::NotationSystem;

/// Difficulty level. Selects the duration-symbol pool the generator draws
/// from; the staff pitch range is the same at every level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

/// Game mode for a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum GameMode {
    /// Identify one note.
    #[default]
    SingleNote,
    /// Identify an ordered run of notes.
    Sequence,
    /// Timed sweep over note slots.
    Rhythm,
}

/// User settings for a round.
///
/// Immutable by convention: derive variants through the `with_*`
/// constructors instead of mutating in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettings {
    pub notation_system: NotationSystem,
    pub difficulty: Difficulty,
    pub game_mode: GameMode,
    pub show_note_labels: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            notation_system: NotationSystem::Letter,
            difficulty: Difficulty::Beginner,
            game_mode: GameMode::SingleNote,
            show_note_labels: true,
        }
    }
}

impl GameSettings {
    pub fn with_notation(self, notation_system: NotationSystem) -> Self {
        Self {
            notation_system,
            ..self
        }
    }

    pub fn with_difficulty(self, difficulty: Difficulty) -> Self {
        Self { difficulty, ..self }
    }

    pub fn with_game_mode(self, game_mode: GameMode) -> Self {
        Self { game_mode, ..self }
    }

    pub fn with_note_labels(self, show_note_labels: bool) -> Self {
        Self {
            show_note_labels,
            ..self
        }
    }

    /// Load settings from disk, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from_disk().unwrap_or_default()
    }

    fn load_from_disk() -> Result<Self> {
        let path = Self::settings_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save settings to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::settings_path()?)
    }

    /// Save settings to a specific file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    fn settings_path() -> Result<PathBuf> {
        if let Some(proj_dirs) = ProjectDirs::from("com", "solfa", "solfa") {
            Ok(proj_dirs.config_dir().join("settings.json"))
        } else {
            Ok(PathBuf::from(".solfa-settings.json"))
        }
    }
}
