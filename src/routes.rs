use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, put},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, warn};

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{FilmDetailResponse, FilmResponse, UpdateDescriptionRequest},
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/films", get(list_films))
        .route("/api/films/status", get(status))
        .route("/api/films/{episode_id}", get(get_film).head(film_exists))
        .route("/api/films/{episode_id}/description", put(update_description))
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

pub async fn list_films(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<FilmResponse>>> {
    let mut films = state.store.get_all();
    films.sort_by_key(|f| f.episode_id);

    let films = films.iter().map(FilmResponse::from_film).collect::<AppResult<Vec<_>>>()?;
    Ok(Json(films))
}

pub async fn get_film(
    State(state): State<Arc<AppState>>,
    Path(episode_id): Path<u32>,
) -> AppResult<Json<FilmDetailResponse>> {
    let film = state.store.get_by_episode(episode_id)?;
    Ok(Json(film.into()))
}

pub async fn update_description(
    State(state): State<Arc<AppState>>,
    Path(episode_id): Path<u32>,
    body: Result<Json<UpdateDescriptionRequest>, JsonRejection>,
) -> AppResult<Json<FilmDetailResponse>> {
    let Json(req) = body.map_err(|rejection| {
        debug!(episode_id = episode_id, error = %rejection, "unreadable description body");
        AppError::InvalidInput { field: "description", message: rejection.body_text() }
    })?;
    let description = req.into_description()?;

    let film = state.store.update_description(episode_id, description).inspect_err(|err| {
        warn!(episode_id = episode_id, error = %err, "description update rejected");
    })?;
    Ok(Json(film.into()))
}

pub async fn film_exists(
    State(state): State<Arc<AppState>>,
    Path(episode_id): Path<u32>,
) -> StatusCode {
    if state.store.exists(episode_id) { StatusCode::OK } else { StatusCode::NOT_FOUND }
}

pub async fn status(State(state): State<Arc<AppState>>) -> String {
    format!("Star Wars API running. Films loaded: {}", state.store.count())
}
