use std::time::{Duration, Instant};

use dashmap::DashMap;
use hangman_core::GameCommand;
use tracing::info;

use crate::session::{SessionHandle, SessionId};

#[derive(Debug)]
struct SessionEntry {
    handle: SessionHandle,
    connected_at: Instant,
    last_activity: Instant,
}

impl SessionEntry {
    fn is_inactive(&self, timeout: Duration) -> bool {
        self.last_activity.elapsed() > timeout
    }
}

/// Live sessions by id. Removing an entry drops its command sender, which
/// ends the session task.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: DashMap<SessionId, SessionEntry>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, handle: SessionHandle) -> SessionId {
        let id = handle.id();
        let now = Instant::now();
        self.sessions.insert(
            id,
            SessionEntry {
                handle,
                connected_at: now,
                last_activity: now,
            },
        );
        id
    }

    pub fn remove(&self, id: SessionId) -> bool {
        self.sessions.remove(&id).is_some()
    }

    pub fn touch(&self, id: SessionId) {
        if let Some(mut entry) = self.sessions.get_mut(&id) {
            entry.last_activity = Instant::now();
        }
    }

    /// Queue a command for the session and mark it active.
    pub fn dispatch(&self, id: SessionId, command: GameCommand) -> Result<(), String> {
        let mut entry = self
            .sessions
            .get_mut(&id)
            .ok_or_else(|| "Session not found".to_string())?;
        entry.last_activity = Instant::now();
        entry.handle.send(command)
    }

    pub fn connected_for(&self, id: SessionId) -> Option<Duration> {
        self.sessions.get(&id).map(|entry| entry.connected_at.elapsed())
    }

    /// Drops sessions idle for longer than `timeout` or whose task has
    /// already stopped. Returns how many were removed.
    pub fn cleanup_inactive(&self, timeout: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|id, entry| {
            let keep = !entry.is_inactive(timeout) && !entry.handle.is_closed();
            if !keep {
                info!("Removing inactive session: {}", id);
            }
            keep
        });
        before - self.sessions.len()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::SharedLibrary;
    use crate::session::GameSession;
    use hangman_persistence::MemorySnapshotStore;
    use hangman_types::{MatchSettings, ServerMessage};
    use std::sync::Arc;
    use tokio::sync::mpsc;

    async fn spawn_session() -> (SessionHandle, mpsc::UnboundedReceiver<ServerMessage>) {
        let library = Arc::new(SharedLibrary::load(Arc::new(MemorySnapshotStore::new())).await);
        let (outbound, inbox) = mpsc::unbounded_channel();
        let handle = GameSession::spawn(
            MatchSettings::default(),
            library,
            outbound,
            Duration::from_secs(60),
        )
        .unwrap();
        (handle, inbox)
    }

    #[tokio::test]
    async fn test_register_dispatch_remove() {
        let registry = SessionRegistry::new();
        let (handle, _inbox) = spawn_session().await;
        let id = registry.register(handle);
        assert_eq!(registry.session_count(), 1);

        assert!(registry.dispatch(id, GameCommand::ResetMatch).is_ok());
        assert!(registry.connected_for(id).is_some());

        assert!(registry.remove(id));
        assert!(!registry.remove(id));
        assert!(registry.dispatch(id, GameCommand::ResetMatch).is_err());
    }

    #[tokio::test]
    async fn test_cleanup_removes_idle_sessions() {
        let registry = SessionRegistry::new();
        let (first, _inbox_a) = spawn_session().await;
        let (second, _inbox_b) = spawn_session().await;
        let stale = registry.register(first);
        registry.register(second);

        tokio::time::sleep(Duration::from_millis(20)).await;
        registry.touch(stale);
        assert_eq!(registry.cleanup_inactive(Duration::from_millis(10)), 1);
        assert_eq!(registry.session_count(), 1);
        assert!(registry.connected_for(stale).is_some());
    }

    #[tokio::test]
    async fn test_removed_session_stops() {
        let registry = SessionRegistry::new();
        let (handle, mut inbox) = spawn_session().await;
        let id = registry.register(handle);

        // Initial state arrives first
        assert!(matches!(
            inbox.recv().await,
            Some(ServerMessage::StateUpdate { .. })
        ));
        registry.remove(id);
        let closed = tokio::time::timeout(Duration::from_secs(1), inbox.recv()).await;
        assert!(matches!(closed, Ok(None)));
    }
}
