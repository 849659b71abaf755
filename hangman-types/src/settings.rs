use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::GameError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

/// Per-difficulty allowances applied when a round is set up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DifficultyProfile {
    pub max_hints: u32,
    pub max_wrong_guesses: u32,
    pub time_multiplier: f64,
}

impl Difficulty {
    pub fn profile(self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile {
                max_hints: 5,
                max_wrong_guesses: 8,
                time_multiplier: 1.2,
            },
            Difficulty::Normal => DifficultyProfile {
                max_hints: 3,
                max_wrong_guesses: 6,
                time_multiplier: 1.0,
            },
            Difficulty::Hard => DifficultyProfile {
                max_hints: 2,
                max_wrong_guesses: 4,
                time_multiplier: 0.8,
            },
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            other => Err(GameError::invalid_input(other)),
        }
    }
}

/// Countdown settings, edited from the admin panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TimeConfig {
    pub enabled: bool,
    pub initial_time: u32,      // seconds
    pub bonus_per_correct: u32, // seconds added per correct letter
    pub penalty_per_wrong: u32, // seconds removed per wrong letter
    pub bonus_per_word: u32,    // seconds credited for a solved word
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            initial_time: 120,
            bonus_per_correct: 3,
            penalty_per_wrong: 5,
            bonus_per_word: 15,
        }
    }
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TimeConfigUpdate {
    pub enabled: Option<bool>,
    pub initial_time: Option<u32>,
    pub bonus_per_correct: Option<u32>,
    pub penalty_per_wrong: Option<u32>,
    pub bonus_per_word: Option<u32>,
}

impl TimeConfig {
    /// Seconds on the clock for a round, scaled by the difficulty multiplier.
    pub fn round_seconds(&self, profile: &DifficultyProfile) -> u32 {
        (self.initial_time as f64 * profile.time_multiplier).round() as u32
    }

    pub fn apply(&self, update: &TimeConfigUpdate) -> Result<TimeConfig, GameError> {
        let merged = TimeConfig {
            enabled: update.enabled.unwrap_or(self.enabled),
            initial_time: update.initial_time.unwrap_or(self.initial_time),
            bonus_per_correct: update.bonus_per_correct.unwrap_or(self.bonus_per_correct),
            penalty_per_wrong: update.penalty_per_wrong.unwrap_or(self.penalty_per_wrong),
            bonus_per_word: update.bonus_per_word.unwrap_or(self.bonus_per_word),
        };

        if merged.initial_time == 0 {
            return Err(GameError::invalid_configuration(
                "initial_time must be greater than zero",
            ));
        }

        Ok(merged)
    }

    pub fn toggled(&self) -> TimeConfig {
        TimeConfig {
            enabled: !self.enabled,
            ..self.clone()
        }
    }
}

/// How the cost of a hint is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum HintPenaltyModel {
    /// Each penalty unit is one phantom wrong guess.
    WrongGuesses,
    /// Each penalty unit removes `per_unit` seconds from the countdown.
    Seconds { per_unit: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MatchSettings {
    pub difficulty: Difficulty,
    pub target_wins: u32,
    /// `None` picks seconds while a countdown runs and wrong guesses otherwise.
    pub hint_penalty: Option<HintPenaltyModel>,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            target_wins: 2,
            hint_penalty: None,
        }
    }
}
