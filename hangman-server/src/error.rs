use hangman_types::GameError;

/// Failures surfaced by the admin routes.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("storage failure: {0}")]
    Storage(#[from] anyhow::Error),
}

pub type ServerResult<T> = Result<T, ServerError>;
