use hangman_types::{GameError, GameResult, RoundEnd, RoundStatus};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

use crate::normalize_word;

pub const MASK_CHAR: char = '_';

/// A submission against the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guess {
    Letter(char),
    /// Phantom wrong guess charged by a hint. Never matches the word and is
    /// not recorded as a guessed letter.
    Penalty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    Correct { occurrences: usize },
    Wrong,
    AlreadyGuessed,
    /// The round was already decided; nothing changed.
    RoundOver,
}

/// State of a single word being guessed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuessRound {
    secret_word: String,
    guessed_letters: BTreeSet<char>,
    wrong_guess_count: u32,
    max_wrong_guesses: u32,
    status: RoundStatus,
    end: Option<RoundEnd>,
}

impl GuessRound {
    pub fn start(word: &str, max_wrong_guesses: u32) -> GameResult<Self> {
        let secret_word = normalize_word(word);
        if secret_word.is_empty() {
            return Err(GameError::invalid_configuration("secret word is empty"));
        }
        if max_wrong_guesses == 0 {
            return Err(GameError::invalid_configuration(
                "max wrong guesses must be greater than zero",
            ));
        }
        if !secret_word.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(GameError::invalid_input(word));
        }

        Ok(Self {
            secret_word,
            guessed_letters: BTreeSet::new(),
            wrong_guess_count: 0,
            max_wrong_guesses,
            status: RoundStatus::Playing,
            end: None,
        })
    }

    pub fn submit_letter(&mut self, letter: char) -> GameResult<GuessOutcome> {
        self.submit(Guess::Letter(letter))
    }

    pub fn submit(&mut self, guess: Guess) -> GameResult<GuessOutcome> {
        if let Guess::Letter(letter) = guess {
            if !letter.is_ascii_alphabetic() {
                return Err(GameError::invalid_input(letter.to_string()));
            }
        }

        if self.status != RoundStatus::Playing {
            return Ok(GuessOutcome::RoundOver);
        }

        let outcome = match guess {
            Guess::Letter(letter) => {
                let letter = letter.to_ascii_uppercase();
                if !self.guessed_letters.insert(letter) {
                    return Ok(GuessOutcome::AlreadyGuessed);
                }

                let occurrences = self.secret_word.chars().filter(|c| *c == letter).count();
                if occurrences > 0 {
                    GuessOutcome::Correct { occurrences }
                } else {
                    self.wrong_guess_count += 1;
                    GuessOutcome::Wrong
                }
            }
            Guess::Penalty => {
                self.wrong_guess_count += 1;
                GuessOutcome::Wrong
            }
        };

        self.evaluate();
        debug!(
            "Guess {:?} -> {:?} ({} / {} wrong)",
            guess, outcome, self.wrong_guess_count, self.max_wrong_guesses
        );
        Ok(outcome)
    }

    /// Force a loss because the countdown ran out. Returns false when the
    /// round was already decided.
    pub fn expire(&mut self) -> bool {
        if self.status != RoundStatus::Playing {
            return false;
        }
        self.status = RoundStatus::Lost;
        self.end = Some(RoundEnd::TimeExpired);
        true
    }

    // Win is checked first so the outcome is deterministic.
    fn evaluate(&mut self) {
        if self.is_solved() {
            self.status = RoundStatus::Won;
            self.end = Some(RoundEnd::Solved);
        } else if self.wrong_guess_count >= self.max_wrong_guesses {
            self.status = RoundStatus::Lost;
            self.end = Some(RoundEnd::WrongGuessesExhausted);
        }
    }

    fn is_solved(&self) -> bool {
        self.secret_word
            .chars()
            .all(|c| self.guessed_letters.contains(&c))
    }

    /// Display form, e.g. `P A S S _ _ _`.
    pub fn render(&self) -> String {
        self.secret_word
            .chars()
            .map(|c| {
                if self.guessed_letters.contains(&c) {
                    c
                } else {
                    MASK_CHAR
                }
            })
            .map(String::from)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn secret_word(&self) -> &str {
        &self.secret_word
    }

    pub fn guessed_letters(&self) -> &BTreeSet<char> {
        &self.guessed_letters
    }

    pub fn wrong_guess_count(&self) -> u32 {
        self.wrong_guess_count
    }

    pub fn max_wrong_guesses(&self) -> u32 {
        self.max_wrong_guesses
    }

    pub fn remaining_guesses(&self) -> u32 {
        self.max_wrong_guesses.saturating_sub(self.wrong_guess_count)
    }

    pub fn status(&self) -> RoundStatus {
        self.status
    }

    pub fn end(&self) -> Option<RoundEnd> {
        self.end
    }

    pub fn is_over(&self) -> bool {
        self.status != RoundStatus::Playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guess_all(round: &mut GuessRound, letters: &str) {
        for letter in letters.chars() {
            round.submit_letter(letter).unwrap();
        }
    }

    #[test]
    fn test_start_validation() {
        assert!(matches!(
            GuessRound::start("", 6),
            Err(GameError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            GuessRound::start("   ", 6),
            Err(GameError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            GuessRound::start("passion", 0),
            Err(GameError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            GuessRound::start("pass1on", 6),
            Err(GameError::InvalidInput { .. })
        ));

        let round = GuessRound::start(" passion ", 6).unwrap();
        assert_eq!(round.secret_word(), "PASSION");
        assert_eq!(round.status(), RoundStatus::Playing);
        assert_eq!(round.wrong_guess_count(), 0);
        assert!(round.guessed_letters().is_empty());
    }

    #[test]
    fn test_passion_scenario() {
        let mut round = GuessRound::start("PASSION", 6).unwrap();
        guess_all(&mut round, "PAS");
        assert_eq!(round.status(), RoundStatus::Playing);
        assert_eq!(round.render(), "P A S S _ _ _");
        assert_eq!(round.wrong_guess_count(), 0);

        guess_all(&mut round, "ZXQWE");
        assert_eq!(round.status(), RoundStatus::Playing);
        round.submit_letter('R').unwrap();
        assert_eq!(round.status(), RoundStatus::Lost);
        assert_eq!(round.end(), Some(RoundEnd::WrongGuessesExhausted));
        assert_eq!(round.remaining_guesses(), 0);
    }

    #[test]
    fn test_correct_letters_in_any_order_win() {
        for order in ["PASION", "NOISAP", "SAPINO", "iOnSaP"] {
            let mut round = GuessRound::start("PASSION", 6).unwrap();
            guess_all(&mut round, order);
            assert_eq!(round.status(), RoundStatus::Won, "order {}", order);
            assert_eq!(round.end(), Some(RoundEnd::Solved));
            assert_eq!(round.wrong_guess_count(), 0);
            assert_eq!(round.render(), "P A S S I O N");
        }
    }

    #[test]
    fn test_lost_round_is_terminal() {
        let mut round = GuessRound::start("LUST", 3).unwrap();
        guess_all(&mut round, "XYZ");
        assert_eq!(round.status(), RoundStatus::Lost);

        let snapshot = round.clone();
        assert_eq!(round.submit_letter('L'), Ok(GuessOutcome::RoundOver));
        assert_eq!(round.submit_letter('Q'), Ok(GuessOutcome::RoundOver));
        assert_eq!(round.submit(Guess::Penalty), Ok(GuessOutcome::RoundOver));
        assert_eq!(round, snapshot);
    }

    #[test]
    fn test_repeated_letter_is_noop() {
        let mut round = GuessRound::start("KISS", 6).unwrap();
        assert_eq!(
            round.submit_letter('s'),
            Ok(GuessOutcome::Correct { occurrences: 2 })
        );
        assert_eq!(round.submit_letter('z'), Ok(GuessOutcome::Wrong));

        let snapshot = round.clone();
        assert_eq!(round.submit_letter('S'), Ok(GuessOutcome::AlreadyGuessed));
        assert_eq!(round.submit_letter('Z'), Ok(GuessOutcome::AlreadyGuessed));
        assert_eq!(round, snapshot);
        assert_eq!(round.wrong_guess_count(), 1);
        assert_eq!(round.guessed_letters().len(), 2);
    }

    #[test]
    fn test_non_letters_rejected() {
        let mut round = GuessRound::start("KISS", 6).unwrap();
        for bad in ['1', ' ', '_', '!', 'é'] {
            assert!(matches!(
                round.submit_letter(bad),
                Err(GameError::InvalidInput { .. })
            ));
        }
        assert!(round.guessed_letters().is_empty());
        assert_eq!(round.wrong_guess_count(), 0);
    }

    #[test]
    fn test_penalty_counts_as_wrong_guess() {
        let mut round = GuessRound::start("KISS", 2).unwrap();
        assert_eq!(round.submit(Guess::Penalty), Ok(GuessOutcome::Wrong));
        assert_eq!(round.wrong_guess_count(), 1);
        assert!(round.guessed_letters().is_empty());

        round.submit(Guess::Penalty).unwrap();
        assert_eq!(round.status(), RoundStatus::Lost);
    }

    #[test]
    fn test_render_length_matches_word() {
        let mut round = GuessRound::start("TEMPTATION", 6).unwrap();
        for letters in ["", "T", "TE", "TEMPAION"] {
            guess_all(&mut round, letters);
            let rendered = round.render();
            let shown: String = rendered.chars().filter(|c| *c != ' ').collect();
            assert_eq!(shown.len(), 10);
        }
    }

    #[test]
    fn test_expire() {
        let mut round = GuessRound::start("BLISS", 6).unwrap();
        assert!(round.expire());
        assert_eq!(round.status(), RoundStatus::Lost);
        assert_eq!(round.end(), Some(RoundEnd::TimeExpired));
        assert!(!round.expire());

        let mut won = GuessRound::start("HOT", 6).unwrap();
        guess_all(&mut won, "HOT");
        assert!(!won.expire());
        assert_eq!(won.status(), RoundStatus::Won);
    }
}
