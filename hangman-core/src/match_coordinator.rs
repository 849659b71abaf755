use hangman_types::{
    Difficulty, GameError, GameEvent, GameMode, GameResult, GameStats, HintPenaltyModel,
    MatchPhase, MatchSettings, MatchView, PlayerSlot, PunishmentEntry, PunishmentId, RoundEnd,
    RoundStatus, RoundSummary, SlotId,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::{
    ContentLibrary, CountdownTimer, GameEventBus, GameEventHandler, Guess, GuessOutcome,
    GuessRound, HintAdvisor, PUNISHMENT_OPTIONS, TimerTick, Word, validate_secret_word,
};

/// Seconds charged per hint penalty unit when hints are paid in time.
pub const DEFAULT_HINT_SECONDS_PER_UNIT: u32 = 10;
const SOLO_DEFAULT_NAME: &str = "Player";

/// Every state change goes through one of these, applied one at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum GameCommand {
    StartMatch { name_a: String, name_b: String },
    StartSolo { name: String },
    SetDifficulty { difficulty: Difficulty },
    SubmitSecretWord { text: String },
    PickRandomWord { category: Option<String> },
    SubmitLetterGuess { letter: char },
    RequestHint,
    Tick { generation: u64 },
    AdvanceToNextRound,
    ChoosePunishment { id: PunishmentId },
    ResetMatch,
}

#[derive(Debug)]
struct ActiveRound {
    guess: GuessRound,
    hints: HintAdvisor,
    timed: bool,
}

/// Owns the lifecycle of a solo session or a couple match.
#[derive(Debug)]
pub struct MatchCoordinator {
    settings: MatchSettings,
    mode: Option<GameMode>,
    phase: MatchPhase,
    slots: [PlayerSlot; 2],
    challenger: SlotId,
    round_number: u32,
    round: Option<ActiveRound>,
    timer: CountdownTimer,
    last_round: Option<RoundSummary>,
    punishment_options: Vec<PunishmentEntry>,
    chosen_punishment: Option<PunishmentEntry>,
    stats: GameStats,
    event_bus: GameEventBus,
    rng: StdRng,
}

impl MatchCoordinator {
    pub fn new(settings: MatchSettings) -> GameResult<Self> {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    /// Deterministic draws, for tests and replays.
    pub fn with_seed(settings: MatchSettings, seed: u64) -> GameResult<Self> {
        Self::with_rng(settings, StdRng::seed_from_u64(seed))
    }

    fn with_rng(settings: MatchSettings, rng: StdRng) -> GameResult<Self> {
        if settings.target_wins == 0 {
            return Err(GameError::invalid_configuration(
                "target wins must be greater than zero",
            ));
        }
        if let Some(HintPenaltyModel::Seconds { per_unit: 0 }) = settings.hint_penalty {
            return Err(GameError::invalid_configuration(
                "hint seconds per unit must be greater than zero",
            ));
        }

        Ok(Self {
            settings,
            mode: None,
            phase: MatchPhase::Setup,
            slots: Default::default(),
            challenger: SlotId::A,
            round_number: 1,
            round: None,
            timer: CountdownTimer::new(),
            last_round: None,
            punishment_options: Vec::new(),
            chosen_punishment: None,
            stats: GameStats::default(),
            event_bus: GameEventBus::new(),
            rng,
        })
    }

    pub fn add_event_handler(&mut self, handler: Box<dyn GameEventHandler>) {
        self.event_bus.add_handler(handler);
        debug!("Event handler added ({} total)", self.event_bus.handler_count());
    }

    /// Single entry point: apply one command and return the new projection.
    /// A refused command leaves the coordinator unchanged.
    pub fn handle(&mut self, command: GameCommand, library: &ContentLibrary) -> GameResult<MatchView> {
        match command {
            GameCommand::StartMatch { name_a, name_b } => self.start_match(&name_a, &name_b)?,
            GameCommand::StartSolo { name } => self.start_solo(&name, library)?,
            GameCommand::SetDifficulty { difficulty } => self.set_difficulty(difficulty)?,
            GameCommand::SubmitSecretWord { text } => self.submit_secret_word(&text, library)?,
            GameCommand::PickRandomWord { category } => {
                self.pick_random_word(category.as_deref(), library)?
            }
            GameCommand::SubmitLetterGuess { letter } => {
                self.submit_letter_guess(letter, library)?;
            }
            GameCommand::RequestHint => {
                self.request_hint(library)?;
            }
            GameCommand::Tick { generation } => self.tick(generation, library),
            GameCommand::AdvanceToNextRound => self.advance_to_next_round(library)?,
            GameCommand::ChoosePunishment { id } => {
                self.choose_punishment(id)?;
            }
            GameCommand::ResetMatch => self.reset_match(),
        }
        Ok(self.view())
    }

    pub fn start_match(&mut self, name_a: &str, name_b: &str) -> GameResult<()> {
        self.require_phase(MatchPhase::Setup)?;
        let (name_a, name_b) = (name_a.trim(), name_b.trim());
        if name_a.is_empty() {
            return Err(GameError::invalid_input(name_a));
        }
        if name_b.is_empty() {
            return Err(GameError::invalid_input(name_b));
        }

        self.mode = Some(GameMode::Couple);
        self.slots = [
            PlayerSlot {
                display_name: name_a.to_string(),
                score: 0,
            },
            PlayerSlot {
                display_name: name_b.to_string(),
                score: 0,
            },
        ];
        self.challenger = SlotId::A;
        self.round_number = 1;
        self.phase = MatchPhase::WordSelection;

        info!("Couple match started: {} vs {}", name_a, name_b);
        self.event_bus.publish(GameEvent::MatchStarted {
            mode: GameMode::Couple,
            slots: self.slots.to_vec(),
        });
        Ok(())
    }

    /// Solo play skips word selection: the system picks the word.
    pub fn start_solo(&mut self, name: &str, library: &ContentLibrary) -> GameResult<()> {
        self.require_phase(MatchPhase::Setup)?;
        let word = library.words.random_word(&mut self.rng)?;

        let name = match name.trim() {
            "" => SOLO_DEFAULT_NAME,
            trimmed => trimmed,
        };
        self.mode = Some(GameMode::Solo);
        self.slots = [
            PlayerSlot {
                display_name: name.to_string(),
                score: 0,
            },
            PlayerSlot::default(),
        ];
        self.round_number = 1;

        info!("Solo session started for {}", name);
        self.event_bus.publish(GameEvent::MatchStarted {
            mode: GameMode::Solo,
            slots: vec![self.slots[0].clone()],
        });
        self.begin_round(word, library)
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> GameResult<()> {
        self.require_phase(MatchPhase::Setup)?;
        self.settings.difficulty = difficulty;
        debug!("Difficulty set to {:?}", difficulty);
        Ok(())
    }

    pub fn submit_secret_word(&mut self, text: &str, library: &ContentLibrary) -> GameResult<()> {
        self.require_phase(MatchPhase::WordSelection)?;
        let word = validate_secret_word(text)?;
        self.begin_round(word, library)
    }

    pub fn pick_random_word(
        &mut self,
        category: Option<&str>,
        library: &ContentLibrary,
    ) -> GameResult<()> {
        self.require_phase(MatchPhase::WordSelection)?;
        let word = match category {
            Some(category) => library.words.random_word_in(category, &mut self.rng)?,
            None => library.words.random_word(&mut self.rng)?,
        };
        self.begin_round(word, library)
    }

    fn begin_round(&mut self, word: Word, library: &ContentLibrary) -> GameResult<()> {
        let profile = self.settings.difficulty.profile();
        let guess = GuessRound::start(word.as_str(), profile.max_wrong_guesses)?;
        let hints = HintAdvisor::new(word.as_str(), profile.max_hints);
        let seconds = if library.time_config.enabled {
            library.time_config.round_seconds(&profile)
        } else {
            0
        };

        // Stop the previous countdown before anything new can tick.
        self.timer.cancel();
        self.round = Some(ActiveRound {
            guess,
            hints,
            timed: seconds > 0,
        });
        self.punishment_options.clear();
        self.chosen_punishment = None;
        self.phase = MatchPhase::Playing;

        info!(
            "Round {} started ({} letters)",
            self.round_number,
            word.len()
        );
        self.event_bus.publish(GameEvent::RoundStarted {
            round_number: self.round_number,
            word_length: word.len() as u32,
            challenger: self.challenger_slot(),
        });

        if seconds > 0 {
            let generation = self.timer.arm(seconds)?;
            self.event_bus
                .publish(GameEvent::TimerArmed { generation, seconds });
        }
        Ok(())
    }

    pub fn submit_letter_guess(
        &mut self,
        letter: char,
        library: &ContentLibrary,
    ) -> GameResult<GuessOutcome> {
        self.require_phase(MatchPhase::Playing)?;
        let round = self.active_round_mut()?;
        let outcome = round.guess.submit_letter(letter)?;
        let over = round.guess.is_over();

        match outcome {
            GuessOutcome::Correct { .. } | GuessOutcome::Wrong => {
                self.event_bus.publish(GameEvent::LetterGuessed {
                    letter: letter.to_ascii_uppercase().to_string(),
                    correct: matches!(outcome, GuessOutcome::Correct { .. }),
                });
            }
            GuessOutcome::AlreadyGuessed | GuessOutcome::RoundOver => return Ok(outcome),
        }

        if over {
            self.resolve_round(library);
            return Ok(outcome);
        }

        let time = &library.time_config;
        let delta = match outcome {
            GuessOutcome::Correct { .. } => time.bonus_per_correct as i64,
            _ => -(time.penalty_per_wrong as i64),
        };
        if self.timer.adjust(delta) == TimerTick::Expired {
            self.expire_round(library);
        }
        Ok(outcome)
    }

    /// Reveal the next hint and charge its cost. Returns the hint text.
    pub fn request_hint(&mut self, library: &ContentLibrary) -> GameResult<String> {
        self.require_phase(MatchPhase::Playing)?;
        let model = self.hint_penalty_model();
        let (index, cost, hint) = {
            let round = self.active_round_mut()?;
            let index = round.hints.next_index();
            let cost = round.hints.use_hint(index)?;
            if model == HintPenaltyModel::WrongGuesses {
                for _ in 0..cost {
                    round.guess.submit(Guess::Penalty)?;
                }
            }
            (index, cost, round.hints.revealed()[index as usize].clone())
        };

        let expired = match model {
            HintPenaltyModel::Seconds { per_unit } if cost > 0 => {
                self.timer.adjust(-(cost.saturating_mul(per_unit) as i64)) == TimerTick::Expired
            }
            _ => false,
        };

        debug!("Hint {} revealed at cost {} ({:?})", index, cost, model);
        self.event_bus.publish(GameEvent::HintRevealed {
            index,
            hint: hint.clone(),
            cost,
        });

        if expired {
            self.expire_round(library);
        } else if self.active_round()?.guess.is_over() {
            self.resolve_round(library);
        }
        Ok(hint)
    }

    /// One elapsed second. Ticks outside a round or from an older countdown
    /// are dropped.
    pub fn tick(&mut self, generation: u64, library: &ContentLibrary) {
        if self.phase != MatchPhase::Playing {
            return;
        }
        if self.timer.tick(generation) == TimerTick::Expired {
            self.expire_round(library);
        }
    }

    fn expire_round(&mut self, library: &ContentLibrary) {
        if let Some(round) = self.round.as_mut() {
            if round.guess.expire() {
                info!("Round {} lost on time", self.round_number);
                self.event_bus.publish(GameEvent::TimerExpired {
                    round_number: self.round_number,
                });
            }
        }
        self.resolve_round(library);
    }

    fn resolve_round(&mut self, library: &ContentLibrary) {
        let Some(round) = self.round.as_ref() else {
            return;
        };
        let status = round.guess.status();
        let end = match round.guess.end() {
            Some(end) => end,
            None => return,
        };

        let was_running = self.timer.is_running();
        if end != RoundEnd::TimeExpired {
            self.timer.cancel();
        }
        let bonus_seconds = if status == RoundStatus::Won && was_running {
            library.time_config.bonus_per_word
        } else {
            0
        };

        let winner = match self.mode {
            Some(GameMode::Couple) => Some(match status {
                RoundStatus::Won => self.guesser(),
                _ => self.challenger,
            }),
            _ => None,
        };
        if let Some(slot) = winner {
            self.slots[slot.index()].score += 1;
        }
        // Solo play scores the single slot but never completes a match.
        if self.mode == Some(GameMode::Solo) && status == RoundStatus::Won {
            self.slots[SlotId::A.index()].score += 1;
        }
        self.stats.record(status);

        let summary = RoundSummary {
            round_number: self.round_number,
            secret_word: round.guess.secret_word().to_string(),
            status,
            end,
            winner,
            wrong_guesses: round.guess.wrong_guess_count(),
            hints_used: round.hints.hints_used(),
            bonus_seconds,
            finished_at: chrono::Utc::now().to_rfc3339(),
        };
        info!(
            "Round {} resolved: {:?} via {:?}",
            summary.round_number, summary.status, summary.end
        );
        self.last_round = Some(summary.clone());
        self.event_bus.publish(GameEvent::RoundResolved { summary });

        match winner {
            Some(slot) if self.slots[slot.index()].score >= self.settings.target_wins => {
                self.complete_match(slot, library);
            }
            _ => {
                if self.mode == Some(GameMode::Solo) && status == RoundStatus::Lost {
                    self.offer_punishments(library);
                }
                self.phase = MatchPhase::RoundResult;
            }
        }
    }

    fn complete_match(&mut self, winner: SlotId, library: &ContentLibrary) {
        self.offer_punishments(library);
        self.phase = MatchPhase::MatchComplete;
        info!(
            "Match complete: {} wins {}-{}",
            self.slots[winner.index()].display_name,
            self.slots[winner.index()].score,
            self.slots[winner.other().index()].score
        );
        self.event_bus.publish(GameEvent::MatchCompleted {
            winner,
            loser: winner.other(),
            punishment_options: self.punishment_options.clone(),
        });
    }

    fn offer_punishments(&mut self, library: &ContentLibrary) {
        match library
            .punishments
            .draw_options(PUNISHMENT_OPTIONS, None, &mut self.rng)
        {
            Ok(options) => self.punishment_options = options,
            Err(e) => {
                warn!("No punishments to offer: {}", e);
                self.punishment_options.clear();
            }
        }
    }

    pub fn advance_to_next_round(&mut self, library: &ContentLibrary) -> GameResult<()> {
        self.require_phase(MatchPhase::RoundResult)?;

        match self.mode {
            Some(GameMode::Solo) => {
                let word = library.words.random_word(&mut self.rng)?;
                self.round_number += 1;
                self.begin_round(word, library)
            }
            _ => {
                self.timer.cancel();
                self.challenger = self.challenger.other();
                self.round_number += 1;
                self.round = None;
                self.punishment_options.clear();
                self.chosen_punishment = None;
                self.phase = MatchPhase::WordSelection;
                debug!(
                    "Round {}: {} is now the challenger",
                    self.round_number,
                    self.slots[self.challenger.index()].display_name
                );
                Ok(())
            }
        }
    }

    /// The losing side picks one of the offered punishments.
    pub fn choose_punishment(&mut self, id: PunishmentId) -> GameResult<PunishmentEntry> {
        let selectable = match self.phase {
            MatchPhase::MatchComplete => true,
            MatchPhase::RoundResult => self.mode == Some(GameMode::Solo),
            _ => false,
        };
        if !selectable || self.punishment_options.is_empty() {
            return Err(self.phase_error());
        }
        if self.chosen_punishment.is_some() {
            return Err(GameError::InvalidGameState {
                current_state: "punishment already chosen".to_string(),
            });
        }

        let punishment = self
            .punishment_options
            .iter()
            .find(|option| option.id == id)
            .cloned()
            .ok_or(GameError::PunishmentNotFound { id: id.to_string() })?;

        self.chosen_punishment = Some(punishment.clone());
        self.event_bus.publish(GameEvent::PunishmentChosen {
            punishment: punishment.clone(),
        });
        Ok(punishment)
    }

    /// Back to setup with cleared scores. Names are kept for convenience.
    pub fn reset_match(&mut self) {
        self.timer.cancel();
        for slot in &mut self.slots {
            slot.score = 0;
        }
        self.mode = None;
        self.challenger = SlotId::A;
        self.round_number = 1;
        self.round = None;
        self.last_round = None;
        self.punishment_options.clear();
        self.chosen_punishment = None;
        self.phase = MatchPhase::Setup;

        info!("Match reset");
        self.event_bus.publish(GameEvent::MatchReset);
    }

    fn hint_penalty_model(&self) -> HintPenaltyModel {
        let running = self.timer.is_running();
        match self.settings.hint_penalty {
            Some(HintPenaltyModel::Seconds { .. }) if !running => HintPenaltyModel::WrongGuesses,
            Some(model) => model,
            None if running => HintPenaltyModel::Seconds {
                per_unit: DEFAULT_HINT_SECONDS_PER_UNIT,
            },
            None => HintPenaltyModel::WrongGuesses,
        }
    }

    fn require_phase(&self, expected: MatchPhase) -> GameResult<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(self.phase_error())
        }
    }

    fn phase_error(&self) -> GameError {
        GameError::InvalidGameState {
            current_state: self.phase.to_string(),
        }
    }

    fn active_round(&self) -> GameResult<&ActiveRound> {
        match self.round.as_ref() {
            Some(round) => Ok(round),
            None => Err(self.phase_error()),
        }
    }

    fn active_round_mut(&mut self) -> GameResult<&mut ActiveRound> {
        let error = self.phase_error();
        self.round.as_mut().ok_or(error)
    }

    fn challenger_slot(&self) -> Option<SlotId> {
        match self.mode {
            Some(GameMode::Couple) => Some(self.challenger),
            _ => None,
        }
    }

    /// Solo play always guesses from slot A.
    pub fn guesser(&self) -> SlotId {
        match self.mode {
            Some(GameMode::Couple) => self.challenger.other(),
            _ => SlotId::A,
        }
    }

    pub fn challenger(&self) -> Option<SlotId> {
        self.challenger_slot()
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn mode(&self) -> Option<GameMode> {
        self.mode
    }

    pub fn settings(&self) -> &MatchSettings {
        &self.settings
    }

    pub fn slot(&self, slot: SlotId) -> &PlayerSlot {
        &self.slots[slot.index()]
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn current_round(&self) -> Option<&GuessRound> {
        self.round.as_ref().map(|round| &round.guess)
    }

    pub fn revealed_hints(&self) -> &[String] {
        self.round
            .as_ref()
            .map(|round| round.hints.revealed())
            .unwrap_or_default()
    }

    pub fn timer(&self) -> &CountdownTimer {
        &self.timer
    }

    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    pub fn last_round(&self) -> Option<&RoundSummary> {
        self.last_round.as_ref()
    }

    pub fn punishment_options(&self) -> &[PunishmentEntry] {
        &self.punishment_options
    }

    pub fn chosen_punishment(&self) -> Option<&PunishmentEntry> {
        self.chosen_punishment.as_ref()
    }

    /// Rendering projection of the current state.
    pub fn view(&self) -> MatchView {
        let round = self.round.as_ref();
        let slots = match self.mode {
            Some(GameMode::Solo) => vec![self.slots[0].clone()],
            _ => self.slots.to_vec(),
        };
        let guesser = self.mode.map(|_| self.guesser());

        MatchView {
            mode: self.mode,
            phase: self.phase,
            difficulty: self.settings.difficulty,
            round_number: self.round_number,
            target_wins: self.settings.target_wins,
            slots,
            challenger: self.challenger_slot(),
            guesser,
            masked_word: round.map(|r| r.guess.render()),
            guessed_letters: round
                .map(|r| r.guess.guessed_letters().iter().map(char::to_string).collect())
                .unwrap_or_default(),
            wrong_guesses: round.map(|r| r.guess.wrong_guess_count()).unwrap_or(0),
            max_wrong_guesses: round
                .map(|r| r.guess.max_wrong_guesses())
                .unwrap_or(self.settings.difficulty.profile().max_wrong_guesses),
            remaining_guesses: round.map(|r| r.guess.remaining_guesses()).unwrap_or(0),
            round_status: round.map(|r| r.guess.status()),
            timer: round.filter(|r| r.timed).map(|_| self.timer.view()),
            revealed_hints: self.revealed_hints().to_vec(),
            hints_remaining: round.map(|r| r.hints.remaining()).unwrap_or(0),
            last_round: self.last_round.clone(),
            punishment_options: self.punishment_options.clone(),
            chosen_punishment: self.chosen_punishment.clone(),
        }
    }
}
