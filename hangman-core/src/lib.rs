pub mod game_events;
pub mod guess_engine;
pub mod hints;
pub mod library;
pub mod match_coordinator;
pub mod punishment_catalog;
pub mod timer;
pub mod word_catalog;

// Re-export main components
pub use game_events::*;
pub use guess_engine::*;
pub use hints::*;
pub use library::*;
pub use match_coordinator::*;
pub use punishment_catalog::*;
pub use timer::*;
pub use word_catalog::*;
