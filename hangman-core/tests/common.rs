#![allow(dead_code)]

use hangman_core::{ContentLibrary, GameEventHandler, MatchCoordinator};
use hangman_types::{GameEvent, MatchPhase, MatchSettings, SlotId, TimeConfig};
use std::sync::{Arc, Mutex};

pub const TEST_SEED: u64 = 42;

/// Library with the default catalogs and the countdown switched off
pub fn untimed_library() -> ContentLibrary {
    ContentLibrary {
        time_config: TimeConfig {
            enabled: false,
            ..TimeConfig::default()
        },
        ..ContentLibrary::with_defaults()
    }
}

/// Library with the default catalogs and a countdown of `seconds`
pub fn timed_library(seconds: u32) -> ContentLibrary {
    ContentLibrary {
        time_config: TimeConfig {
            initial_time: seconds,
            ..TimeConfig::default()
        },
        ..ContentLibrary::with_defaults()
    }
}

pub fn create_coordinator(settings: MatchSettings) -> MatchCoordinator {
    MatchCoordinator::with_seed(settings, TEST_SEED).unwrap()
}

/// Couple match already past setup, waiting for slot A's secret word
pub fn create_couple_match(settings: MatchSettings) -> (MatchCoordinator, EventCollector) {
    let mut coordinator = create_coordinator(settings);
    let collector = EventCollector::new();
    coordinator.add_event_handler(Box::new(collector.clone()));
    coordinator.start_match("Alice", "Bob").unwrap();
    assert_eq!(coordinator.phase(), MatchPhase::WordSelection);
    (coordinator, collector)
}

/// Guesses every letter of the current word
pub fn solve_round(coordinator: &mut MatchCoordinator, library: &ContentLibrary) {
    let word = coordinator
        .current_round()
        .expect("round in progress")
        .secret_word()
        .to_string();
    for letter in word.chars() {
        if coordinator.phase() != MatchPhase::Playing {
            break;
        }
        coordinator.submit_letter_guess(letter, library).unwrap();
    }
}

/// Guesses letters absent from the current word until the round is lost
pub fn fail_round(coordinator: &mut MatchCoordinator, library: &ContentLibrary) {
    let word = coordinator
        .current_round()
        .expect("round in progress")
        .secret_word()
        .to_string();
    for letter in ('A'..='Z').filter(|c| !word.contains(*c)) {
        if coordinator.phase() != MatchPhase::Playing {
            break;
        }
        coordinator.submit_letter_guess(letter, library).unwrap();
    }
}

/// Plays one couple round where `winner` takes the point
pub fn play_round_won_by(
    coordinator: &mut MatchCoordinator,
    library: &ContentLibrary,
    word: &str,
    winner: SlotId,
) {
    coordinator.submit_secret_word(word, library).unwrap();
    if winner == coordinator.guesser() {
        solve_round(coordinator, library);
    } else {
        fail_round(coordinator, library);
    }
}

/// Event collector for testing event emissions
#[derive(Clone)]
pub struct EventCollector {
    events: Arc<Mutex<Vec<GameEvent>>>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn get_events(&self) -> Vec<GameEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    pub fn last_event(&self) -> Option<GameEvent> {
        self.events.lock().unwrap().last().cloned()
    }

    pub fn count_matching(&self, check_fn: impl Fn(&GameEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| check_fn(e)).count()
    }

    pub fn has_event_type(&self, check_fn: impl Fn(&GameEvent) -> bool) -> bool {
        self.events.lock().unwrap().iter().any(check_fn)
    }
}

impl GameEventHandler for EventCollector {
    fn handle_event(&mut self, event: GameEvent) {
        self.events.lock().unwrap().push(event);
    }
}
