use hangman_types::{GameError, GameResult};

pub const HINT_COUNT: usize = 3;
const VOWELS: [char; 5] = ['A', 'E', 'I', 'O', 'U'];

/// The three hints for a word, in canonical order: length bucket, first
/// letter, distinct vowels.
pub fn get_hints(word: &str) -> [String; HINT_COUNT] {
    let word = word.trim().to_uppercase();
    let length = word.chars().count();

    let length_hint = if length <= 5 {
        format!("Short and sweet ({} letters)", length)
    } else if length <= 8 {
        format!("Medium intensity ({} letters)", length)
    } else {
        format!("Long and passionate ({} letters)", length)
    };

    let first_letter_hint = match word.chars().next() {
        Some(first) => format!("Starts with the letter \"{}\"", first),
        None => "Starts with a mystery".to_string(),
    };

    let mut vowels: Vec<char> = Vec::new();
    for c in word.chars().filter(|c| VOWELS.contains(c)) {
        if !vowels.contains(&c) {
            vowels.push(c);
        }
    }
    let vowel_hint = if vowels.is_empty() {
        "No common vowels".to_string()
    } else {
        let listed: Vec<String> = vowels.iter().map(char::to_string).collect();
        format!("Contains the vowels: {}", listed.join(", "))
    };

    [length_hint, first_letter_hint, vowel_hint]
}

/// Penalty units charged for revealing the hint at `index`.
pub fn hint_cost(index: u32) -> u32 {
    match index {
        0 => 0,
        1 => 1,
        _ => 2,
    }
}

/// Per-round hint economy. Hints are consumed strictly in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintAdvisor {
    hints: [String; HINT_COUNT],
    max_hints: u32,
    revealed: Vec<String>,
}

impl HintAdvisor {
    /// `max_hints` is capped at the number of hints a word has.
    pub fn new(word: &str, max_hints: u32) -> Self {
        Self {
            hints: get_hints(word),
            max_hints: max_hints.min(HINT_COUNT as u32),
            revealed: Vec::new(),
        }
    }

    pub fn use_hint(&mut self, index: u32) -> GameResult<u32> {
        let next = self.hints_used();
        if index != next || index >= self.max_hints {
            return Err(GameError::HintExhausted {
                requested: index,
                next,
                allowed: self.max_hints,
            });
        }

        self.revealed.push(self.hints[index as usize].clone());
        Ok(hint_cost(index))
    }

    pub fn next_index(&self) -> u32 {
        self.hints_used()
    }

    pub fn hints_used(&self) -> u32 {
        self.revealed.len() as u32
    }

    pub fn max_hints(&self) -> u32 {
        self.max_hints
    }

    pub fn remaining(&self) -> u32 {
        self.max_hints - self.hints_used()
    }

    pub fn revealed(&self) -> &[String] {
        &self.revealed
    }
}
