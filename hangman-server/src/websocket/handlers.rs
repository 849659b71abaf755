use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::registry::SessionRegistry;
use crate::session::SessionId;
use hangman_core::GameCommand;
use hangman_types::{ClientMessage, GameError, ServerMessage};

/// Translate a client message into a coordinator command. Heartbeats have
/// no game meaning and map to `None`.
pub fn to_command(message: ClientMessage) -> Result<Option<GameCommand>, GameError> {
    let command = match message {
        ClientMessage::StartMatch { name_a, name_b } => GameCommand::StartMatch { name_a, name_b },
        ClientMessage::StartSolo { name } => GameCommand::StartSolo { name },
        ClientMessage::SetDifficulty { difficulty } => GameCommand::SetDifficulty { difficulty },
        ClientMessage::SubmitSecretWord { text } => GameCommand::SubmitSecretWord { text },
        ClientMessage::PickRandomWord { category } => GameCommand::PickRandomWord { category },
        ClientMessage::SubmitLetterGuess { letter } => GameCommand::SubmitLetterGuess {
            letter: single_letter(&letter)?,
        },
        ClientMessage::RequestHint => GameCommand::RequestHint,
        ClientMessage::AdvanceToNextRound => GameCommand::AdvanceToNextRound,
        ClientMessage::ChoosePunishment { id } => GameCommand::ChoosePunishment { id },
        ClientMessage::ResetMatch => GameCommand::ResetMatch,
        ClientMessage::Heartbeat => return Ok(None),
    };
    Ok(Some(command))
}

fn single_letter(input: &str) -> Result<char, GameError> {
    let mut chars = input.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) => Ok(letter),
        _ => Err(GameError::invalid_input(input)),
    }
}

#[derive(Clone)]
pub struct MessageHandler {
    session_id: SessionId,
    registry: Arc<SessionRegistry>,
    outbound: mpsc::UnboundedSender<ServerMessage>,
}

impl MessageHandler {
    pub fn new(
        session_id: SessionId,
        registry: Arc<SessionRegistry>,
        outbound: mpsc::UnboundedSender<ServerMessage>,
    ) -> Self {
        Self {
            session_id,
            registry,
            outbound,
        }
    }

    /// Errors returned here close the connection; game-level refusals are
    /// reported to the client instead.
    pub fn handle_message(&self, message: ClientMessage) -> Result<(), String> {
        match to_command(message) {
            Ok(Some(command)) => self.registry.dispatch(self.session_id, command),
            Ok(None) => {
                debug!("Heartbeat from session {}", self.session_id);
                self.registry.touch(self.session_id);
                Ok(())
            }
            Err(error) => {
                warn!("Rejected input from session {}: {}", self.session_id, error);
                self.send_message(ServerMessage::Error { error })
            }
        }
    }

    pub fn handle_invalid_json(&self, text: &str) -> Result<(), String> {
        warn!("Invalid JSON from session {}", self.session_id);
        self.send_message(ServerMessage::Error {
            error: GameError::invalid_input(text),
        })
    }

    fn send_message(&self, message: ServerMessage) -> Result<(), String> {
        self.outbound
            .send(message)
            .map_err(|_| "Connection closed".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hangman_types::Difficulty;

    #[test]
    fn test_letter_must_be_single_character() {
        let command = to_command(ClientMessage::SubmitLetterGuess {
            letter: " e ".to_string(),
        });
        assert_eq!(
            command,
            Ok(Some(GameCommand::SubmitLetterGuess { letter: 'e' }))
        );

        for bad in ["", "ab", "   "] {
            let result = to_command(ClientMessage::SubmitLetterGuess {
                letter: bad.to_string(),
            });
            assert!(matches!(result, Err(GameError::InvalidInput { .. })), "{:?}", bad);
        }
    }

    #[test]
    fn test_messages_map_to_commands() {
        assert_eq!(to_command(ClientMessage::Heartbeat), Ok(None));
        assert_eq!(
            to_command(ClientMessage::SetDifficulty {
                difficulty: Difficulty::Easy
            }),
            Ok(Some(GameCommand::SetDifficulty {
                difficulty: Difficulty::Easy
            }))
        );
        assert_eq!(
            to_command(ClientMessage::PickRandomWord { category: None }),
            Ok(Some(GameCommand::PickRandomWord { category: None }))
        );
    }
}
