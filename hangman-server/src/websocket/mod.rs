use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use warp::ws::{Message, WebSocket};

use crate::library::SharedLibrary;
use crate::registry::SessionRegistry;
use crate::session::{GameSession, SessionId, TICK_INTERVAL};
use hangman_types::{ClientMessage, MatchSettings};

pub mod handlers;
pub mod rate_limiter;

use handlers::MessageHandler;
use rate_limiter::RateLimiter;

pub async fn handle_connection(
    websocket: WebSocket,
    registry: Arc<SessionRegistry>,
    library: Arc<SharedLibrary>,
    settings: MatchSettings,
) {
    let (mut ws_sender, mut ws_receiver) = websocket.split();
    let (outbound, mut message_receiver) = mpsc::unbounded_channel();

    let handle = match GameSession::spawn(settings, library, outbound.clone(), TICK_INTERVAL) {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to start session: {}", e);
            return;
        }
    };
    let session_id = registry.register(handle);
    info!("New WebSocket session: {}", session_id);

    let message_handler = MessageHandler::new(session_id, registry.clone(), outbound);

    // Handle incoming messages
    let incoming_handler = {
        let message_handler = message_handler.clone();
        let mut rate_limiter = RateLimiter::new();

        async move {
            while let Some(result) = ws_receiver.next().await {
                match result {
                    Ok(msg) => {
                        if let Err(e) =
                            handle_message(msg, &mut rate_limiter, &message_handler, session_id)
                        {
                            error!("Error handling message for {}: {}", session_id, e);
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("WebSocket error for {}: {}", session_id, e);
                        break;
                    }
                }
            }
        }
    };

    // Handle outgoing messages
    let outgoing_handler = async move {
        while let Some(message) = message_receiver.recv().await {
            let json = match serde_json::to_string(&message) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize message: {:?}", e);
                    continue;
                }
            };

            if let Err(e) = ws_sender.send(Message::text(json)).await {
                warn!("Failed to send message to {}: {:?}", session_id, e);
                break;
            }
        }
    };

    tokio::select! {
        _ = incoming_handler => {},
        _ = outgoing_handler => {},
    }

    match registry.connected_for(session_id) {
        Some(age) => info!(
            "Session {} disconnected after {}s",
            session_id,
            age.as_secs()
        ),
        None => info!("Session {} disconnected", session_id),
    }
    registry.remove(session_id);
}

fn handle_message(
    msg: Message,
    rate_limiter: &mut RateLimiter,
    message_handler: &MessageHandler,
    session_id: SessionId,
) -> Result<(), String> {
    if !rate_limiter.check_rate_limit() {
        warn!("Rate limit exceeded for session {}", session_id);
        return Err("Rate limit exceeded".to_string());
    }

    // Only handle text messages
    let Ok(text) = msg.to_str() else {
        return Ok(());
    };

    match serde_json::from_str::<ClientMessage>(text) {
        Ok(client_message) => message_handler.handle_message(client_message),
        Err(_) => message_handler.handle_invalid_json(text),
    }
}
