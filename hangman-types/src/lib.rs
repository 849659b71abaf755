pub mod errors;
pub mod game;
pub mod messages;
pub mod punishment;
pub mod settings;

// Re-export all types
pub use errors::*;
pub use game::*;
pub use messages::*;
pub use punishment::*;
pub use settings::*;

pub type PunishmentId = uuid::Uuid;
