use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info};
use warp::Filter;
use warp::http::StatusCode;

use crate::error::ServerError;
use crate::library::SharedLibrary;
use hangman_types::{
    GameError, GameStats, NewPunishment, PunishmentCategory, PunishmentId, TimeConfigUpdate,
};

const MAX_BODY_BYTES: u64 = 16 * 1024;

type JsonReply = warp::reply::WithStatus<warp::reply::Json>;

#[derive(Deserialize)]
struct WordQuery {
    category: Option<String>,
}

#[derive(Deserialize)]
struct AddWordRequest {
    word: String,
    category: Option<String>,
}

#[derive(Deserialize)]
struct PunishmentQuery {
    category: Option<PunishmentCategory>,
}

#[derive(Serialize)]
struct WordListResponse {
    total: usize,
    categories: BTreeMap<String, Vec<String>>,
}

#[derive(Serialize)]
struct StatsResponse {
    #[serde(flatten)]
    stats: GameStats,
    win_rate: u32,
}

/// Content management routes. Reads are public; changes need
/// `Authorization: Bearer <admin password>`.
pub fn admin_routes(
    library: Arc<SharedLibrary>,
    admin_password: Arc<String>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let library_filter = warp::any().map(move || library.clone());
    let password_filter = warp::any().map(move || admin_password.clone());
    let auth_header = warp::header::optional::<String>("authorization");

    let list_words = warp::path!("words")
        .and(warp::get())
        .and(warp::query::<WordQuery>())
        .and(library_filter.clone())
        .and_then(handle_list_words);

    let add_word = warp::path!("words")
        .and(warp::post())
        .and(auth_header.clone())
        .and(json_body())
        .and(library_filter.clone())
        .and(password_filter.clone())
        .and_then(handle_add_word);

    let remove_word = warp::path!("words" / String)
        .and(warp::delete())
        .and(auth_header.clone())
        .and(library_filter.clone())
        .and(password_filter.clone())
        .and_then(handle_remove_word);

    let reset_words = warp::path!("words" / "reset")
        .and(warp::post())
        .and(auth_header.clone())
        .and(library_filter.clone())
        .and(password_filter.clone())
        .and_then(handle_reset_words);

    let list_punishments = warp::path!("punishments")
        .and(warp::get())
        .and(warp::query::<PunishmentQuery>())
        .and(library_filter.clone())
        .and_then(handle_list_punishments);

    let add_punishment = warp::path!("punishments")
        .and(warp::post())
        .and(auth_header.clone())
        .and(json_body())
        .and(library_filter.clone())
        .and(password_filter.clone())
        .and_then(handle_add_punishment);

    let remove_punishment = warp::path!("punishments" / PunishmentId)
        .and(warp::delete())
        .and(auth_header.clone())
        .and(library_filter.clone())
        .and(password_filter.clone())
        .and_then(handle_remove_punishment);

    let reset_punishments = warp::path!("punishments" / "reset")
        .and(warp::post())
        .and(auth_header.clone())
        .and(library_filter.clone())
        .and(password_filter.clone())
        .and_then(handle_reset_punishments);

    let get_time_config = warp::path!("time-config")
        .and(warp::get())
        .and(library_filter.clone())
        .and_then(handle_get_time_config);

    let update_time_config = warp::path!("time-config")
        .and(warp::put())
        .and(auth_header.clone())
        .and(json_body())
        .and(library_filter.clone())
        .and(password_filter.clone())
        .and_then(handle_update_time_config);

    let toggle_timer = warp::path!("time-config" / "toggle")
        .and(warp::post())
        .and(auth_header.clone())
        .and(library_filter.clone())
        .and(password_filter.clone())
        .and_then(handle_toggle_timer);

    let get_stats = warp::path!("stats")
        .and(warp::get())
        .and(library_filter.clone())
        .and_then(handle_get_stats);

    let reset_stats = warp::path!("stats")
        .and(warp::delete())
        .and(auth_header.clone())
        .and(library_filter)
        .and(password_filter)
        .and_then(handle_reset_stats);

    list_words
        .or(add_word)
        .or(reset_words)
        .or(remove_word)
        .or(list_punishments)
        .or(add_punishment)
        .or(reset_punishments)
        .or(remove_punishment)
        .or(get_time_config)
        .or(update_time_config)
        .or(toggle_timer)
        .or(get_stats)
        .or(reset_stats)
}

fn json_body<T: DeserializeOwned + Send>()
-> impl Filter<Extract = (T,), Error = warp::Rejection> + Clone {
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

fn json_reply<T: Serialize>(value: &T, status: StatusCode) -> JsonReply {
    warp::reply::with_status(warp::reply::json(value), status)
}

fn error_reply(message: &str, status: StatusCode) -> JsonReply {
    json_reply(&serde_json::json!({ "error": message }), status)
}

fn authorize(auth_header: Option<String>, password: &str) -> Result<(), JsonReply> {
    match auth_header {
        None => Err(error_reply(
            "Authentication required",
            StatusCode::UNAUTHORIZED,
        )),
        Some(header) => {
            let token = header.strip_prefix("Bearer ").unwrap_or(&header);
            if token == password {
                Ok(())
            } else {
                Err(error_reply("Invalid admin password", StatusCode::FORBIDDEN))
            }
        }
    }
}

fn server_error_reply(err: ServerError) -> JsonReply {
    match err {
        ServerError::Game(game_error) => {
            let status = match game_error {
                GameError::PunishmentNotFound { .. } => StatusCode::NOT_FOUND,
                _ => StatusCode::BAD_REQUEST,
            };
            json_reply(
                &serde_json::json!({
                    "error": game_error.to_string(),
                    "detail": game_error,
                }),
                status,
            )
        }
        ServerError::Storage(err) => {
            error!("Failed to persist admin change: {:#}", err);
            error_reply(
                "Failed to save changes",
                StatusCode::INTERNAL_SERVER_ERROR,
            )
        }
    }
}

async fn handle_list_words(
    query: WordQuery,
    library: Arc<SharedLibrary>,
) -> Result<JsonReply, warp::Rejection> {
    let words = library.words().await;
    let categories: BTreeMap<String, Vec<String>> = words
        .categories()
        .into_iter()
        .filter(|category| {
            query
                .category
                .as_deref()
                .is_none_or(|wanted| wanted.eq_ignore_ascii_case(category))
        })
        .map(|category| {
            let listed = words
                .words_in(category)
                .into_iter()
                .map(|word| word.to_string())
                .collect();
            (category.to_string(), listed)
        })
        .collect();
    let total = categories.values().map(Vec::len).sum();

    Ok(json_reply(
        &WordListResponse { total, categories },
        StatusCode::OK,
    ))
}

async fn handle_add_word(
    auth_header: Option<String>,
    request: AddWordRequest,
    library: Arc<SharedLibrary>,
    password: Arc<String>,
) -> Result<JsonReply, warp::Rejection> {
    if let Err(reply) = authorize(auth_header, &password) {
        return Ok(reply);
    }

    let category = request.category.as_deref().unwrap_or_default();
    match library.add_word(category, &request.word).await {
        Ok(true) => {
            info!("Word added: {}", request.word.trim().to_uppercase());
            Ok(json_reply(
                &serde_json::json!({ "added": request.word.trim().to_uppercase() }),
                StatusCode::CREATED,
            ))
        }
        Ok(false) => Ok(error_reply("Word already exists", StatusCode::CONFLICT)),
        Err(err) => Ok(server_error_reply(err)),
    }
}

async fn handle_remove_word(
    word: String,
    auth_header: Option<String>,
    library: Arc<SharedLibrary>,
    password: Arc<String>,
) -> Result<JsonReply, warp::Rejection> {
    if let Err(reply) = authorize(auth_header, &password) {
        return Ok(reply);
    }

    match library.remove_word(&word).await {
        Ok(true) => Ok(json_reply(
            &serde_json::json!({ "removed": word.to_uppercase() }),
            StatusCode::OK,
        )),
        Ok(false) => Ok(error_reply("Word not found", StatusCode::NOT_FOUND)),
        Err(err) => Ok(server_error_reply(err)),
    }
}

async fn handle_reset_words(
    auth_header: Option<String>,
    library: Arc<SharedLibrary>,
    password: Arc<String>,
) -> Result<JsonReply, warp::Rejection> {
    if let Err(reply) = authorize(auth_header, &password) {
        return Ok(reply);
    }

    match library.reset_words().await {
        Ok(total) => Ok(json_reply(
            &serde_json::json!({ "total": total }),
            StatusCode::OK,
        )),
        Err(err) => Ok(server_error_reply(err)),
    }
}

async fn handle_list_punishments(
    query: PunishmentQuery,
    library: Arc<SharedLibrary>,
) -> Result<JsonReply, warp::Rejection> {
    let punishments: Vec<_> = library
        .punishments()
        .await
        .into_iter()
        .filter(|entry| query.category.is_none_or(|c| entry.category == c))
        .collect();
    Ok(json_reply(&punishments, StatusCode::OK))
}

async fn handle_add_punishment(
    auth_header: Option<String>,
    punishment: NewPunishment,
    library: Arc<SharedLibrary>,
    password: Arc<String>,
) -> Result<JsonReply, warp::Rejection> {
    if let Err(reply) = authorize(auth_header, &password) {
        return Ok(reply);
    }

    match library.add_punishment(punishment).await {
        Ok(entry) => {
            info!("Punishment added: {}", entry.title);
            Ok(json_reply(&entry, StatusCode::CREATED))
        }
        Err(err) => Ok(server_error_reply(err)),
    }
}

async fn handle_remove_punishment(
    id: PunishmentId,
    auth_header: Option<String>,
    library: Arc<SharedLibrary>,
    password: Arc<String>,
) -> Result<JsonReply, warp::Rejection> {
    if let Err(reply) = authorize(auth_header, &password) {
        return Ok(reply);
    }

    match library.remove_punishment(id).await {
        Ok(()) => Ok(json_reply(
            &serde_json::json!({ "removed": id }),
            StatusCode::OK,
        )),
        Err(err) => Ok(server_error_reply(err)),
    }
}

async fn handle_reset_punishments(
    auth_header: Option<String>,
    library: Arc<SharedLibrary>,
    password: Arc<String>,
) -> Result<JsonReply, warp::Rejection> {
    if let Err(reply) = authorize(auth_header, &password) {
        return Ok(reply);
    }

    match library.reset_punishments().await {
        Ok(total) => Ok(json_reply(
            &serde_json::json!({ "total": total }),
            StatusCode::OK,
        )),
        Err(err) => Ok(server_error_reply(err)),
    }
}

async fn handle_get_time_config(
    library: Arc<SharedLibrary>,
) -> Result<JsonReply, warp::Rejection> {
    Ok(json_reply(&library.time_config().await, StatusCode::OK))
}

async fn handle_update_time_config(
    auth_header: Option<String>,
    update: TimeConfigUpdate,
    library: Arc<SharedLibrary>,
    password: Arc<String>,
) -> Result<JsonReply, warp::Rejection> {
    if let Err(reply) = authorize(auth_header, &password) {
        return Ok(reply);
    }

    match library.update_time_config(&update).await {
        Ok(config) => Ok(json_reply(&config, StatusCode::OK)),
        Err(err) => Ok(server_error_reply(err)),
    }
}

async fn handle_toggle_timer(
    auth_header: Option<String>,
    library: Arc<SharedLibrary>,
    password: Arc<String>,
) -> Result<JsonReply, warp::Rejection> {
    if let Err(reply) = authorize(auth_header, &password) {
        return Ok(reply);
    }

    match library.toggle_timer().await {
        Ok(config) => Ok(json_reply(&config, StatusCode::OK)),
        Err(err) => Ok(server_error_reply(err)),
    }
}

async fn handle_get_stats(library: Arc<SharedLibrary>) -> Result<JsonReply, warp::Rejection> {
    let stats = library.stats().await;
    let win_rate = stats.win_rate();
    Ok(json_reply(&StatsResponse { stats, win_rate }, StatusCode::OK))
}

async fn handle_reset_stats(
    auth_header: Option<String>,
    library: Arc<SharedLibrary>,
    password: Arc<String>,
) -> Result<JsonReply, warp::Rejection> {
    if let Err(reply) = authorize(auth_header, &password) {
        return Ok(reply);
    }

    match library.reset_stats().await {
        Ok(()) => Ok(json_reply(&GameStats::default(), StatusCode::OK)),
        Err(err) => Ok(server_error_reply(err)),
    }
}
