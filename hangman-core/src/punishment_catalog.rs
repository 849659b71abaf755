use hangman_types::{
    GameError, GameResult, NewPunishment, PunishmentCategory, PunishmentEntry, PunishmentId,
    PunishmentType,
};
use rand::Rng;
use rand::seq::{IteratorRandom, SliceRandom};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Number of options offered to the losing side.
pub const PUNISHMENT_OPTIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PunishmentCatalog {
    entries: Vec<PunishmentEntry>,
}

impl PunishmentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let entries = DEFAULT_PUNISHMENTS
            .iter()
            .enumerate()
            .map(|(index, (title, description, category, kind, duration))| PunishmentEntry {
                // Stable ids so persisted choices survive a reset to defaults
                id: Uuid::from_u128(index as u128 + 1),
                title: title.to_string(),
                description: description.to_string(),
                category: *category,
                kind: *kind,
                duration: duration.map(str::to_string),
            })
            .collect();

        Self { entries }
    }

    pub fn add(&mut self, punishment: NewPunishment) -> GameResult<PunishmentEntry> {
        let title = punishment.title.trim();
        let description = punishment.description.trim();
        if title.is_empty() {
            return Err(GameError::invalid_input(punishment.title));
        }
        if description.is_empty() {
            return Err(GameError::invalid_input(punishment.description));
        }

        let entry = PunishmentEntry {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: description.to_string(),
            category: punishment.category,
            kind: punishment.kind,
            duration: punishment
                .duration
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
        };
        self.entries.push(entry.clone());
        Ok(entry)
    }

    pub fn remove(&mut self, id: PunishmentId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    pub fn get(&self, id: PunishmentId) -> Option<&PunishmentEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn entries(&self) -> &[PunishmentEntry] {
        &self.entries
    }

    pub fn by_category(&self, category: PunishmentCategory) -> Vec<&PunishmentEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.category == category)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Uniform pick from the whole catalog or one category.
    pub fn random<R: Rng + ?Sized>(
        &self,
        category: Option<PunishmentCategory>,
        rng: &mut R,
    ) -> GameResult<PunishmentEntry> {
        self.entries
            .iter()
            .filter(|entry| category.is_none_or(|c| entry.category == c))
            .choose(rng)
            .cloned()
            .ok_or_else(|| GameError::NoCandidatesAvailable {
                pool: match category {
                    Some(c) => format!("{:?} punishments", c),
                    None => "punishment catalog".to_string(),
                },
            })
    }

    /// Draw `count` options, distinct whenever the pool allows it. A pool
    /// smaller than `count` contributes every entry once, then repeats.
    pub fn draw_options<R: Rng + ?Sized>(
        &self,
        count: usize,
        category: Option<PunishmentCategory>,
        rng: &mut R,
    ) -> GameResult<Vec<PunishmentEntry>> {
        let pool = self
            .entries
            .iter()
            .filter(|entry| category.is_none_or(|c| entry.category == c));

        let mut options: Vec<PunishmentEntry> =
            pool.choose_multiple(rng, count).into_iter().cloned().collect();
        options.shuffle(rng);

        if options.len() < count {
            debug!(
                "Only {} distinct punishments for {} options, allowing repeats",
                options.len(),
                count
            );
        }
        while options.len() < count {
            options.push(self.random(category, rng)?);
        }

        Ok(options)
    }

    pub fn reset_to_defaults(&mut self) {
        *self = Self::with_defaults();
    }
}

type DefaultPunishment = (
    &'static str,
    &'static str,
    PunishmentCategory,
    PunishmentType,
    Option<&'static str>,
);

const DEFAULT_PUNISHMENTS: &[DefaultPunishment] = &[
    // Mild
    ("Passionate Kiss", "Give your partner a long, passionate kiss for 30 seconds", PunishmentCategory::Mild, PunishmentType::Foreplay, Some("30 seconds")),
    ("Sensual Massage", "Give your partner a sensual back massage for 2 minutes", PunishmentCategory::Mild, PunishmentType::Foreplay, Some("2 minutes")),
    ("Strip Tease", "Do a sexy strip tease, slowly removing one piece of clothing", PunishmentCategory::Mild, PunishmentType::Action, None),
    ("Naughty Whisper", "Whisper in your partner's ear what you want to do with them", PunishmentCategory::Mild, PunishmentType::Foreplay, None),
    ("Seductive Dance", "Dance seductively for your partner for 1 minute", PunishmentCategory::Mild, PunishmentType::Action, Some("1 minute")),
    // Moderate
    ("Oral Teasing", "Use only your mouth to tease your partner for 3 minutes without letting them finish", PunishmentCategory::Moderate, PunishmentType::Foreplay, Some("3 minutes")),
    ("Cowgirl Position", "Stay on top and set the rhythm during the next round", PunishmentCategory::Moderate, PunishmentType::Position, None),
    ("Blindfolded", "Your partner is blindfolded while you touch and tease them for 5 minutes", PunishmentCategory::Moderate, PunishmentType::Fetish, Some("5 minutes")),
    ("Ice and Fire", "Use ice cubes and then your warm mouth on sensitive spots", PunishmentCategory::Moderate, PunishmentType::Fetish, None),
    ("Gentle Domination", "You are in full control for 10 minutes and your partner can only obey", PunishmentCategory::Moderate, PunishmentType::Domination, Some("10 minutes")),
    // Intense
    ("Light Bondage", "Tie your partner's hands with a tie or scarf and do as you please", PunishmentCategory::Intense, PunishmentType::Fetish, None),
    ("Orgasm Denial", "Bring your partner to the edge three times and stop each time", PunishmentCategory::Intense, PunishmentType::Domination, None),
    ("Dominant Position", "Take full control of rhythm and intensity from behind", PunishmentCategory::Intense, PunishmentType::Position, None),
    ("Role Play", "Play teacher and student or boss and secretary during the next session", PunishmentCategory::Intense, PunishmentType::Fetish, None),
    ("Total Submission", "Your partner must satisfy all of your wishes for the next 15 minutes", PunishmentCategory::Intense, PunishmentType::Domination, Some("15 minutes")),
    ("Spanking", "Give your partner 10 spanks, before or during the act", PunishmentCategory::Intense, PunishmentType::Domination, None),
    ("Toy Time", "Use a toy (vibrator, handcuffs, etc.) in the next session", PunishmentCategory::Intense, PunishmentType::Fetish, None),
    ("Unusual Place", "Make love somewhere new in the house (kitchen, bathroom, living room)", PunishmentCategory::Intense, PunishmentType::Action, None),
    ("Pleasure Control", "You decide when, how and for how long your partner may feel pleasure", PunishmentCategory::Intense, PunishmentType::Domination, None),
    ("Fantasy Fulfilled", "Your partner must act out a fantasy you have always wanted to try", PunishmentCategory::Intense, PunishmentType::Fetish, None),
];

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn new_punishment(title: &str, category: PunishmentCategory) -> NewPunishment {
        NewPunishment {
            title: title.to_string(),
            description: format!("{} for a minute", title),
            category,
            kind: PunishmentType::Action,
            duration: Some(" 1 minute ".to_string()),
        }
    }

    #[test]
    fn test_defaults() {
        let catalog = PunishmentCatalog::with_defaults();
        assert_eq!(catalog.len(), 20);
        assert_eq!(catalog.by_category(PunishmentCategory::Mild).len(), 5);
        assert_eq!(catalog.by_category(PunishmentCategory::Moderate).len(), 5);
        assert_eq!(catalog.by_category(PunishmentCategory::Intense).len(), 10);
        assert!(catalog.get(Uuid::from_u128(1)).is_some());
    }

    #[test]
    fn test_add_and_remove() {
        let mut catalog = PunishmentCatalog::new();
        let entry = catalog
            .add(new_punishment("Lap Dance", PunishmentCategory::Moderate))
            .unwrap();
        assert_eq!(entry.duration.as_deref(), Some("1 minute"));
        assert_eq!(catalog.get(entry.id), Some(&entry));

        assert!(catalog.remove(entry.id));
        assert!(!catalog.remove(entry.id));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_add_rejects_blank_fields() {
        let mut catalog = PunishmentCatalog::new();
        let mut blank = new_punishment("  ", PunishmentCategory::Mild);
        assert!(matches!(
            catalog.add(blank.clone()),
            Err(GameError::InvalidInput { .. })
        ));
        blank.title = "Tickle".to_string();
        blank.description = String::new();
        assert!(catalog.add(blank).is_err());
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_random_respects_category() {
        let catalog = PunishmentCatalog::with_defaults();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let entry = catalog
                .random(Some(PunishmentCategory::Mild), &mut rng)
                .unwrap();
            assert_eq!(entry.category, PunishmentCategory::Mild);
        }
    }

    #[test]
    fn test_random_from_empty_catalog() {
        let catalog = PunishmentCatalog::new();
        let mut rng = StdRng::seed_from_u64(3);
        assert!(matches!(
            catalog.random(None, &mut rng),
            Err(GameError::NoCandidatesAvailable { .. })
        ));
        assert!(catalog.draw_options(3, None, &mut rng).is_err());
    }

    #[test]
    fn test_draw_options_are_distinct() {
        let catalog = PunishmentCatalog::with_defaults();
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..10 {
            let options = catalog
                .draw_options(PUNISHMENT_OPTIONS, None, &mut rng)
                .unwrap();
            assert_eq!(options.len(), 3);
            let ids: HashSet<_> = options.iter().map(|o| o.id).collect();
            assert_eq!(ids.len(), 3);
        }
    }

    #[test]
    fn test_draw_options_exact_pool_never_repeats() {
        let mut catalog = PunishmentCatalog::new();
        for title in ["Hug", "Kiss", "Dance"] {
            catalog
                .add(new_punishment(title, PunishmentCategory::Mild))
                .unwrap();
        }
        catalog
            .add(new_punishment("Blindfold", PunishmentCategory::Intense))
            .unwrap();

        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let options = catalog
                .draw_options(3, Some(PunishmentCategory::Mild), &mut rng)
                .unwrap();
            let ids: HashSet<_> = options.iter().map(|o| o.id).collect();
            assert_eq!(ids.len(), 3);
            assert!(options.iter().all(|o| o.category == PunishmentCategory::Mild));
        }
    }

    #[test]
    fn test_draw_options_small_catalog_repeats() {
        let mut catalog = PunishmentCatalog::new();
        let only = catalog
            .add(new_punishment("Hug", PunishmentCategory::Mild))
            .unwrap();
        let mut rng = StdRng::seed_from_u64(5);

        let options = catalog.draw_options(3, None, &mut rng).unwrap();
        assert_eq!(options.len(), 3);
        assert!(options.iter().all(|o| o.id == only.id));
    }
}
