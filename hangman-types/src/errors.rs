use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Why a user-supplied word was refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum WordRejection {
    TooShort { min: u32, actual: u32 },
    TooLong { max: u32, actual: u32 },
    NonLetter { character: String },
}

impl std::fmt::Display for WordRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WordRejection::TooShort { min, actual } => {
                write!(f, "word has {} letters, at least {} required", actual, min)
            }
            WordRejection::TooLong { max, actual } => {
                write!(f, "word has {} letters, at most {} allowed", actual, max)
            }
            WordRejection::NonLetter { character } => {
                write!(f, "'{}' is not a letter", character)
            }
        }
    }
}

/// Recoverable failures of game operations. A refused operation leaves all
/// state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, thiserror::Error)]
#[ts(export)]
pub enum GameError {
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },
    #[error("invalid input: {input:?}")]
    InvalidInput { input: String },
    #[error("word rejected: {rejection}")]
    WordValidationFailed { rejection: WordRejection },
    #[error("hint {requested} unavailable (next hint {next}, {allowed} allowed)")]
    HintExhausted { requested: u32, next: u32, allowed: u32 },
    #[error("no candidates available in {pool}")]
    NoCandidatesAvailable { pool: String },
    #[error("operation not allowed while {current_state}")]
    InvalidGameState { current_state: String },
    #[error("punishment {id} not found")]
    PunishmentNotFound { id: String },
}

impl GameError {
    pub fn invalid_input(input: impl Into<String>) -> Self {
        GameError::InvalidInput {
            input: input.into(),
        }
    }

    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        GameError::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

pub type GameResult<T> = Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = GameError::WordValidationFailed {
            rejection: WordRejection::TooShort { min: 3, actual: 2 },
        };
        assert_eq!(
            err.to_string(),
            "word rejected: word has 2 letters, at least 3 required"
        );

        let err = GameError::HintExhausted {
            requested: 2,
            next: 1,
            allowed: 3,
        };
        assert!(err.to_string().contains("next hint 1"));
    }

    #[test]
    fn test_error_serializes_with_variant_tag() {
        let err = GameError::NoCandidatesAvailable {
            pool: "word catalog".to_string(),
        };
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("NoCandidatesAvailable"));
    }
}
