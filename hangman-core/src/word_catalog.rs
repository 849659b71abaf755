use hangman_types::{GameError, GameResult, WordRejection};
use once_cell::sync::Lazy;
use rand::Rng;
use rand::seq::IteratorRandom;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

pub const MIN_WORD_LENGTH: usize = 3;
pub const MAX_SECRET_WORD_LENGTH: usize = 20;
pub const DEFAULT_CATEGORY: &str = "general";

static LETTERS_ONLY: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[A-Z]+$").expect("letters-only pattern is valid"));

/// Uppercase, trimmed form used for every comparison.
pub fn normalize_word(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// A normalized word: uppercase ASCII letters only, at least three long.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Word(String);

impl Word {
    pub fn parse(raw: &str) -> GameResult<Word> {
        validate(raw, None)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Word {
    type Error = GameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Word::parse(&value)
    }
}

impl From<Word> for String {
    fn from(word: Word) -> Self {
        word.0
    }
}

/// Validate a secret word typed by the challenger (3 to 20 letters).
pub fn validate_secret_word(raw: &str) -> GameResult<Word> {
    validate(raw, Some(MAX_SECRET_WORD_LENGTH))
}

fn validate(raw: &str, max_length: Option<usize>) -> GameResult<Word> {
    let normalized = normalize_word(raw);
    let length = normalized.chars().count();

    let rejection = if length < MIN_WORD_LENGTH {
        Some(WordRejection::TooShort {
            min: MIN_WORD_LENGTH as u32,
            actual: length as u32,
        })
    } else if let Some(max) = max_length.filter(|max| length > *max) {
        Some(WordRejection::TooLong {
            max: max as u32,
            actual: length as u32,
        })
    } else if !LETTERS_ONLY.is_match(&normalized) {
        let character = normalized
            .chars()
            .find(|c| !c.is_ascii_uppercase())
            .map(String::from)
            .unwrap_or_default();
        Some(WordRejection::NonLetter { character })
    } else {
        None
    };

    match rejection {
        Some(rejection) => Err(GameError::WordValidationFailed { rejection }),
        None => Ok(Word(normalized)),
    }
}

/// Candidate words grouped by category. A word lives in at most one category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredCatalog")]
pub struct WordCatalog {
    categories: BTreeMap<String, BTreeSet<Word>>,
}

/// Wire form of a catalog. Words are validated on the way in but may repeat
/// across categories, so loading goes through `WordCatalog::insert`.
#[derive(Deserialize)]
struct StoredCatalog {
    categories: BTreeMap<String, Vec<Word>>,
}

impl From<StoredCatalog> for WordCatalog {
    fn from(stored: StoredCatalog) -> Self {
        let mut catalog = WordCatalog::new();
        for (category, words) in stored.categories {
            for word in words {
                if !catalog.insert(&category, word.clone()) {
                    debug!("Dropping duplicate stored word {} in {}", word, category);
                }
            }
        }
        catalog
    }
}

impl WordCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        for (category, words) in DEFAULT_WORDS {
            for word in *words {
                // Built-in words are all valid; duplicates are ignored.
                let _ = catalog.add(category, word);
            }
        }
        catalog
    }

    /// Build a catalog from a newline separated list. Blank lines, comments
    /// and invalid entries are skipped.
    #[cfg(test)]
    pub fn from_word_list(category: &str, word_list: &str) -> Self {
        let mut catalog = Self::new();
        for line in word_list
            .lines()
            .filter(|line| !line.trim().is_empty() && !line.trim_start().starts_with('#'))
        {
            if let Err(e) = catalog.add(category, line) {
                debug!("Skipping word list entry {:?}: {}", line, e);
            }
        }
        catalog
    }

    /// Add a word; `Ok(false)` when it is already present in any category.
    pub fn add(&mut self, category: &str, raw: &str) -> GameResult<bool> {
        let word = Word::parse(raw)?;
        Ok(self.insert(category, word))
    }

    fn insert(&mut self, category: &str, word: Word) -> bool {
        if self.contains(word.as_str()) {
            return false;
        }

        self.categories
            .entry(normalize_category(category))
            .or_default()
            .insert(word);
        true
    }

    pub fn remove(&mut self, raw: &str) -> bool {
        let normalized = normalize_word(raw);
        let mut emptied = None;
        let mut removed = false;

        for (category, words) in self.categories.iter_mut() {
            if words.iter().any(|w| w.as_str() == normalized) {
                words.retain(|w| w.as_str() != normalized);
                removed = true;
                if words.is_empty() {
                    emptied = Some(category.clone());
                }
                break;
            }
        }

        if let Some(category) = emptied {
            self.categories.remove(&category);
        }
        removed
    }

    pub fn contains(&self, raw: &str) -> bool {
        let normalized = normalize_word(raw);
        self.words().any(|w| w.as_str() == normalized)
    }

    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.categories.values().flatten()
    }

    pub fn words_in(&self, category: &str) -> Vec<&Word> {
        self.categories
            .get(&normalize_category(category))
            .map(|words| words.iter().collect())
            .unwrap_or_default()
    }

    pub fn categories(&self) -> Vec<&str> {
        self.categories.keys().map(String::as_str).collect()
    }

    pub fn category_of(&self, raw: &str) -> Option<&str> {
        let normalized = normalize_word(raw);
        self.categories
            .iter()
            .find(|(_, words)| words.iter().any(|w| w.as_str() == normalized))
            .map(|(category, _)| category.as_str())
    }

    pub fn len(&self) -> usize {
        self.categories.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Uniform pick across every category.
    pub fn random_word<R: Rng + ?Sized>(&self, rng: &mut R) -> GameResult<Word> {
        self.words()
            .choose(rng)
            .cloned()
            .ok_or_else(|| GameError::NoCandidatesAvailable {
                pool: "word catalog".to_string(),
            })
    }

    pub fn random_word_in<R: Rng + ?Sized>(&self, category: &str, rng: &mut R) -> GameResult<Word> {
        let category = normalize_category(category);
        self.categories
            .get(&category)
            .and_then(|words| words.iter().choose(rng))
            .cloned()
            .ok_or(GameError::NoCandidatesAvailable {
                pool: format!("category {}", category),
            })
    }

    pub fn reset_to_defaults(&mut self) {
        *self = Self::with_defaults();
    }
}

fn normalize_category(category: &str) -> String {
    let category = category.trim().to_lowercase();
    if category.is_empty() {
        DEFAULT_CATEGORY.to_string()
    } else {
        category
    }
}

const DEFAULT_WORDS: &[(&str, &[&str])] = &[
    (
        "romance",
        &[
            "ROMANCE", "PASSION", "INTIMATE", "AFFECTION", "DEVOTION", "COURTSHIP",
            "FLIRTATION", "INFATUATION", "YEARNING", "LONGING", "CHARMING", "BLISS",
            "RAPTURE", "EUPHORIA", "BREATHTAKING", "BEAUTIFUL", "HANDSOME", "GORGEOUS",
            "STUNNING",
        ],
    ),
    (
        "desire",
        &[
            "DESIRE", "SEDUCTION", "TEMPTATION", "CRAVING", "LUST", "AROUSAL", "PLEASURE",
            "ECSTASY", "SENSUAL", "SENSUOUS", "EROTIC", "AROUSING", "SEDUCTIVE",
            "TITILLATING", "STIMULATING", "SUGGESTIVE",
        ],
    ),
    (
        "allure",
        &[
            "ATTRACTION", "CHEMISTRY", "ALLURING", "CAPTIVATING", "ENCHANTING", "MAGNETIC",
            "IRRESISTIBLE", "PROVOCATIVE", "TANTALIZING", "MESMERIZING", "BEWITCHING",
            "ENTICING", "INTOXICATING", "ATTRACTIVE", "HYPNOTIC", "SPELLBINDING",
            "MYSTERIOUS", "EXOTIC", "VOLUPTUOUS", "CURVACEOUS",
        ],
    ),
    (
        "heat",
        &[
            "SEXY", "HOT", "STEAMY", "SIZZLING", "BURNING", "FIERY", "WILD", "NAUGHTY",
            "PLAYFUL", "MISCHIEVOUS", "ADVENTUROUS", "BOLD", "DARING", "RISQUE",
            "SCANDALOUS", "FORBIDDEN", "SECRET", "HIDDEN", "SULTRY", "SMOLDERING",
            "ELECTRIFYING", "THRILLING", "EXCITING",
        ],
    ),
];
