
use hangman_types::{
    ClientMessage, GameError, GameEvent, GameMode, MatchPhase, RoundStatus, ServerMessage,
    SlotId,
};
use test_helpers::*;

async fn connect(setup: &TestServerSetup) -> warp::test::WsClient {
    let mut ws = warp::test::ws()
        .path("/ws")
        .handshake(setup.routes().build())
        .await
        .expect("WebSocket handshake should succeed");

    let view = recv_state(&mut ws).await;
    assert_eq!(view.phase, MatchPhase::Setup);
    ws
}

async fn start_couple_round(ws: &mut warp::test::WsClient, word: &str) {
    send(
        ws,
        &ClientMessage::StartMatch {
            name_a: "Alice".to_string(),
            name_b: "Bob".to_string(),
        },
    )
    .await;
    let view = recv_state(ws).await;
    assert_eq!(view.phase, MatchPhase::WordSelection);

    send(
        ws,
        &ClientMessage::SubmitSecretWord {
            text: word.to_string(),
        },
    )
    .await;
    let view = recv_state(ws).await;
    assert_eq!(view.phase, MatchPhase::Playing);
}

#[tokio::test]
async fn test_connection_registers_session() {
    let setup = TestServerSetup::untimed().await;
    let _ws = connect(&setup).await;
    assert_eq!(setup.registry.session_count(), 1);
}

#[tokio::test]
async fn test_start_match_publishes_event_then_state() {
    let setup = TestServerSetup::untimed().await;
    let mut ws = connect(&setup).await;

    send(
        &mut ws,
        &ClientMessage::StartMatch {
            name_a: "Alice".to_string(),
            name_b: "Bob".to_string(),
        },
    )
    .await;

    match recv(&mut ws).await {
        ServerMessage::Event {
            event: GameEvent::MatchStarted { mode, slots },
        } => {
            assert_eq!(mode, GameMode::Couple);
            assert_eq!(slots.len(), 2);
        }
        other => panic!("Expected MatchStarted, got {:?}", other),
    }
    let view = recv_state(&mut ws).await;
    assert_eq!(view.phase, MatchPhase::WordSelection);
    assert_eq!(view.challenger, Some(SlotId::A));
    assert_eq!(view.guesser, Some(SlotId::B));
}

#[tokio::test]
async fn test_full_round_over_websocket() {
    let setup = TestServerSetup::untimed().await;
    let mut ws = connect(&setup).await;
    start_couple_round(&mut ws, "passion").await;

    let mut view = None;
    for letter in ["P", "A", "S", "I", "O", "N"] {
        send(
            &mut ws,
            &ClientMessage::SubmitLetterGuess {
                letter: letter.to_string(),
            },
        )
        .await;
        view = Some(recv_state(&mut ws).await);
    }

    let view = view.unwrap();
    assert_eq!(view.phase, MatchPhase::RoundResult);
    assert_eq!(view.round_status, Some(RoundStatus::Won));
    assert_eq!(view.wrong_guesses, 0);
    let summary = view.last_round.expect("Round summary should be present");
    assert_eq!(summary.secret_word, "PASSION");
    assert_eq!(summary.winner, Some(SlotId::B));

    assert_eq!(setup.library.stats().await.wins, 1);
}

#[tokio::test]
async fn test_refused_command_keeps_connection_open() {
    let setup = TestServerSetup::untimed().await;
    let mut ws = connect(&setup).await;

    send(&mut ws, &ClientMessage::RequestHint).await;
    let error = recv_error(&mut ws).await;
    assert!(matches!(error, GameError::InvalidGameState { .. }));

    start_couple_round(&mut ws, "desire").await;
}

#[tokio::test]
async fn test_multi_character_guess_rejected() {
    let setup = TestServerSetup::untimed().await;
    let mut ws = connect(&setup).await;
    start_couple_round(&mut ws, "desire").await;

    send(
        &mut ws,
        &ClientMessage::SubmitLetterGuess {
            letter: "ab".to_string(),
        },
    )
    .await;
    assert_eq!(recv_error(&mut ws).await, GameError::invalid_input("ab"));

    send(
        &mut ws,
        &ClientMessage::SubmitLetterGuess {
            letter: " d ".to_string(),
        },
    )
    .await;
    let view = recv_state(&mut ws).await;
    assert_eq!(view.guessed_letters, vec!["D".to_string()]);
}

#[tokio::test]
async fn test_invalid_json_reports_error() {
    let setup = TestServerSetup::untimed().await;
    let mut ws = connect(&setup).await;

    ws.send_text("not json").await;
    assert_eq!(recv_error(&mut ws).await, GameError::invalid_input("not json"));
}

#[tokio::test]
async fn test_timed_round_reports_running_clock() {
    let setup = TestServerSetup::new().await;
    let mut ws = connect(&setup).await;
    start_couple_round(&mut ws, "passion").await;

    send(&mut ws, &ClientMessage::RequestHint).await;
    // Clock ticks may land before the hint reply
    let mut view = recv_state(&mut ws).await;
    while view.revealed_hints.is_empty() {
        view = recv_state(&mut ws).await;
    }
    assert_eq!(view.revealed_hints.len(), 1);
    let timer = view.timer.expect("Timed round should expose the clock");
    assert!(timer.remaining_seconds > 0);
}
