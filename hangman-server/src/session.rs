use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use hangman_core::{GameCommand, GameEventHandler, MatchCoordinator};
use hangman_types::{GameEvent, GameResult, MatchSettings, ServerMessage};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::library::SharedLibrary;

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Forwards coordinator events to the owning session.
struct EventForwarder(mpsc::UnboundedSender<GameEvent>);

impl GameEventHandler for EventForwarder {
    fn handle_event(&mut self, event: GameEvent) {
        // The receiver lives as long as the session itself.
        let _ = self.0.send(event);
    }
}

/// Sending half of a running session. Dropping every handle stops the
/// session once its queue is drained.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: SessionId,
    commands: mpsc::UnboundedSender<GameCommand>,
}

impl SessionHandle {
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn send(&self, command: GameCommand) -> Result<(), String> {
        self.commands
            .send(command)
            .map_err(|_| "Session closed".to_string())
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }
}

/// One player's (or couple's) game. Commands from the client and ticks from
/// the countdown land in the same task and are applied one at a time.
pub struct GameSession {
    id: SessionId,
    coordinator: MatchCoordinator,
    library: Arc<SharedLibrary>,
    commands: mpsc::UnboundedReceiver<GameCommand>,
    ticks_tx: mpsc::UnboundedSender<u64>,
    ticks_rx: mpsc::UnboundedReceiver<u64>,
    events: mpsc::UnboundedReceiver<GameEvent>,
    outbound: mpsc::UnboundedSender<ServerMessage>,
    ticker: Option<JoinHandle<()>>,
    tick_interval: Duration,
}

impl GameSession {
    pub fn spawn(
        settings: MatchSettings,
        library: Arc<SharedLibrary>,
        outbound: mpsc::UnboundedSender<ServerMessage>,
        tick_interval: Duration,
    ) -> GameResult<SessionHandle> {
        let mut coordinator = MatchCoordinator::new(settings)?;
        let (events_tx, events) = mpsc::unbounded_channel();
        coordinator.add_event_handler(Box::new(EventForwarder(events_tx)));

        let id = SessionId::new();
        let (commands_tx, commands) = mpsc::unbounded_channel();
        let (ticks_tx, ticks_rx) = mpsc::unbounded_channel();

        let session = Self {
            id,
            coordinator,
            library,
            commands,
            ticks_tx,
            ticks_rx,
            events,
            outbound,
            ticker: None,
            tick_interval,
        };
        tokio::spawn(session.run());

        Ok(SessionHandle {
            id,
            commands: commands_tx,
        })
    }

    async fn run(mut self) {
        info!("Session {} started", self.id);
        self.send(ServerMessage::StateUpdate {
            view: self.coordinator.view(),
        });

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => self.apply(command).await,
                    None => break,
                },
                Some(generation) = self.ticks_rx.recv() => {
                    self.apply(GameCommand::Tick { generation }).await;
                }
            }
        }

        self.stop_ticker();
        info!("Session {} ended", self.id);
    }

    async fn apply(&mut self, command: GameCommand) {
        let is_tick = matches!(command, GameCommand::Tick { .. });
        if !is_tick {
            debug!("Session {} applying {:?}", self.id, command);
        }

        let result = {
            let content = self.library.content().await;
            self.coordinator.handle(command, &content)
        };
        let published = self.drain_events().await;

        match result {
            // Plain ticks only matter while the clock is visible.
            Ok(view) if !is_tick || published > 0 || self.coordinator.timer().is_running() => {
                self.send(ServerMessage::StateUpdate { view });
            }
            Ok(_) => {}
            Err(error) => {
                warn!("Session {} refused command: {}", self.id, error);
                self.send(ServerMessage::Error { error });
            }
        }
    }

    async fn drain_events(&mut self) -> usize {
        let mut published = 0;
        while let Ok(event) = self.events.try_recv() {
            match &event {
                GameEvent::TimerArmed { generation, .. } => self.start_ticker(*generation),
                GameEvent::RoundResolved { summary } => {
                    self.stop_ticker();
                    self.library.record_round(summary.status).await;
                }
                GameEvent::MatchReset => self.stop_ticker(),
                _ => {}
            }
            self.send(ServerMessage::Event { event });
            published += 1;
        }
        published
    }

    fn start_ticker(&mut self, generation: u64) {
        self.stop_ticker();

        let ticks = self.ticks_tx.clone();
        let period = self.tick_interval;
        self.ticker = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            loop {
                interval.tick().await;
                if ticks.send(generation).is_err() {
                    break;
                }
            }
        }));
        debug!("Session {} ticker started (generation {})", self.id, generation);
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }

    fn send(&self, message: ServerMessage) {
        if self.outbound.send(message).is_err() {
            debug!("Session {} has no listener", self.id);
        }
    }
}
