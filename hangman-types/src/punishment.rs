use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::PunishmentId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum PunishmentCategory {
    Mild,
    Moderate,
    Intense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum PunishmentType {
    Action,
    Position,
    Fetish,
    Foreplay,
    Domination,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PunishmentEntry {
    pub id: PunishmentId,
    pub title: String,
    pub description: String,
    pub category: PunishmentCategory,
    #[serde(rename = "type")]
    pub kind: PunishmentType,
    pub duration: Option<String>,
}

/// Admin input for a new entry; the catalog assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewPunishment {
    pub title: String,
    pub description: String,
    pub category: PunishmentCategory,
    #[serde(rename = "type")]
    pub kind: PunishmentType,
    pub duration: Option<String>,
}
