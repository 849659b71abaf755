use std::sync::Arc;
use warp::Filter;

use crate::library::SharedLibrary;
use crate::registry::SessionRegistry;
use hangman_types::MatchSettings;

pub mod admin;
pub mod config;
pub mod error;
pub mod library;
pub mod registry;
pub mod session;
pub mod websocket;

pub fn create_routes(
    registry: Arc<SessionRegistry>,
    library: Arc<SharedLibrary>,
    settings: MatchSettings,
    admin_password: Arc<String>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let registry_filter = warp::any().map({
        let registry = registry.clone();
        move || registry.clone()
    });

    let library_filter = warp::any().map({
        let library = library.clone();
        move || library.clone()
    });

    // WebSocket endpoint: one game session per connection
    let websocket = warp::path("ws")
        .and(warp::ws())
        .and(registry_filter)
        .and(library_filter)
        .map(
            move |ws: warp::ws::Ws, registry: Arc<SessionRegistry>, library: Arc<SharedLibrary>| {
                ws.on_upgrade(move |socket| {
                    websocket::handle_connection(socket, registry, library, settings)
                })
            },
        );

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", warp::http::StatusCode::OK));

    // CORS configuration
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type", "authorization"])
        .allow_methods(vec!["GET", "POST", "PUT", "DELETE"]);

    websocket
        .or(health)
        .or(admin::admin_routes(library, admin_password))
        .with(cors)
        .with(warp::log("hangman"))
}
