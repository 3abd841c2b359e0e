pub mod settings;

pub use settings::{Difficulty, GameMode, GameSettings};
