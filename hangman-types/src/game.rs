use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{Difficulty, PunishmentEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GameMode {
    Solo,
    Couple,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum MatchPhase {
    Setup,
    WordSelection,
    Playing,
    RoundResult,
    MatchComplete,
}

impl std::fmt::Display for MatchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MatchPhase::Setup => "setup",
            MatchPhase::WordSelection => "word selection",
            MatchPhase::Playing => "playing",
            MatchPhase::RoundResult => "round result",
            MatchPhase::MatchComplete => "match complete",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum SlotId {
    A,
    B,
}

impl SlotId {
    pub fn other(self) -> SlotId {
        match self {
            SlotId::A => SlotId::B,
            SlotId::B => SlotId::A,
        }
    }

    pub fn index(self) -> usize {
        match self {
            SlotId::A => 0,
            SlotId::B => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum RoundStatus {
    Playing,
    Won,
    Lost,
}

/// How a finished round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum RoundEnd {
    Solved,
    WrongGuessesExhausted,
    TimeExpired,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PlayerSlot {
    pub display_name: String,
    pub score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum TimerStatus {
    Idle,
    Running,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TimerView {
    pub status: TimerStatus,
    pub remaining_seconds: u32,
    pub display: String, // m:ss
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoundSummary {
    pub round_number: u32,
    pub secret_word: String,
    pub status: RoundStatus,
    pub end: RoundEnd,
    /// Slot credited with the round; `None` in solo play.
    pub winner: Option<SlotId>,
    pub wrong_guesses: u32,
    pub hints_used: u32,
    pub bonus_seconds: u32,
    pub finished_at: String, // ISO 8601 string
}

/// Everything the presentation layer renders. Recomputed on demand; the
/// secret word only appears once the round is over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MatchView {
    pub mode: Option<GameMode>,
    pub phase: MatchPhase,
    pub difficulty: Difficulty,
    pub round_number: u32,
    pub target_wins: u32,
    pub slots: Vec<PlayerSlot>,
    pub challenger: Option<SlotId>,
    pub guesser: Option<SlotId>,
    pub masked_word: Option<String>,
    pub guessed_letters: Vec<String>,
    pub wrong_guesses: u32,
    pub max_wrong_guesses: u32,
    pub remaining_guesses: u32,
    pub round_status: Option<RoundStatus>,
    pub timer: Option<TimerView>,
    pub revealed_hints: Vec<String>,
    pub hints_remaining: u32,
    pub last_round: Option<RoundSummary>,
    pub punishment_options: Vec<PunishmentEntry>,
    pub chosen_punishment: Option<PunishmentEntry>,
}

/// Cumulative results across rounds, from the guesser's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameStats {
    pub wins: u32,
    pub losses: u32,
    pub total_games: u32,
    pub best_streak: u32,
    pub current_streak: u32,
}

impl GameStats {
    pub fn record(&mut self, status: RoundStatus) {
        match status {
            RoundStatus::Won => {
                self.wins += 1;
                self.total_games += 1;
                self.current_streak += 1;
                self.best_streak = self.best_streak.max(self.current_streak);
            }
            RoundStatus::Lost => {
                self.losses += 1;
                self.total_games += 1;
                self.current_streak = 0;
            }
            RoundStatus::Playing => {}
        }
    }

    /// Whole-number percentage of rounds won.
    pub fn win_rate(&self) -> u32 {
        if self.total_games == 0 {
            return 0;
        }
        ((self.wins as f64 / self.total_games as f64) * 100.0).round() as u32
    }
}

/// Change notifications published by the match coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GameEvent {
    MatchStarted {
        mode: GameMode,
        slots: Vec<PlayerSlot>,
    },
    RoundStarted {
        round_number: u32,
        word_length: u32,
        challenger: Option<SlotId>,
    },
    TimerArmed {
        generation: u64,
        seconds: u32,
    },
    LetterGuessed {
        letter: String,
        correct: bool,
    },
    HintRevealed {
        index: u32,
        hint: String,
        cost: u32,
    },
    TimerExpired {
        round_number: u32,
    },
    RoundResolved {
        summary: RoundSummary,
    },
    MatchCompleted {
        winner: SlotId,
        loser: SlotId,
        punishment_options: Vec<PunishmentEntry>,
    },
    PunishmentChosen {
        punishment: PunishmentEntry,
    },
    MatchReset,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_alternation() {
        assert_eq!(SlotId::A.other(), SlotId::B);
        assert_eq!(SlotId::B.other().other(), SlotId::B);
        assert_eq!(SlotId::B.index(), 1);
    }

    #[test]
    fn test_stats_streaks() {
        let mut stats = GameStats::default();
        stats.record(RoundStatus::Won);
        stats.record(RoundStatus::Won);
        stats.record(RoundStatus::Lost);
        stats.record(RoundStatus::Won);
        stats.record(RoundStatus::Playing);

        assert_eq!(stats.wins, 3);
        assert_eq!(stats.losses, 1);
        assert_eq!(stats.total_games, 4);
        assert_eq!(stats.best_streak, 2);
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.win_rate(), 75);
    }
}
