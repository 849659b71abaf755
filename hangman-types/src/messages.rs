use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{Difficulty, GameError, GameEvent, MatchView, PunishmentId};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ClientMessage {
    StartMatch { name_a: String, name_b: String },
    StartSolo { name: String },
    SetDifficulty { difficulty: Difficulty },
    SubmitSecretWord { text: String },
    PickRandomWord { category: Option<String> },
    SubmitLetterGuess { letter: String },
    RequestHint,
    AdvanceToNextRound,
    ChoosePunishment { id: PunishmentId },
    ResetMatch,
    Heartbeat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ServerMessage {
    StateUpdate { view: MatchView },
    Event { event: GameEvent },
    Error { error: GameError },
}
