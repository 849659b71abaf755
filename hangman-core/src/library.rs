use hangman_types::TimeConfig;

use crate::{PunishmentCatalog, WordCatalog};

/// Admin-managed content consulted when rounds are set up and resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLibrary {
    pub words: WordCatalog,
    pub punishments: PunishmentCatalog,
    pub time_config: TimeConfig,
}

impl ContentLibrary {
    pub fn with_defaults() -> Self {
        Self {
            words: WordCatalog::with_defaults(),
            punishments: PunishmentCatalog::with_defaults(),
            time_config: TimeConfig::default(),
        }
    }

    pub fn empty() -> Self {
        Self {
            words: WordCatalog::new(),
            punishments: PunishmentCatalog::new(),
            time_config: TimeConfig::default(),
        }
    }
}

impl Default for ContentLibrary {
    fn default() -> Self {
        Self::with_defaults()
    }
}
