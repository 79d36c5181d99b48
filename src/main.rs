mod config;
mod error;
mod models;
mod routes;
mod store;
mod swapi;

use std::{sync::Arc, time::Duration};

use wreq::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::{config::Config, store::FilmStore, swapi::SwapiClient};

#[derive(Clone)]
pub struct AppState {
    pub store: FilmStore,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,swapi_films=debug".to_string()),
        )
        .init();

    let config = Config::from_env()?;

    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static("swapi-films/0.1"));

    let http = wreq::Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(config.swapi_timeout_secs))
        .build()?;

    let swapi =
        SwapiClient::new(http, config.swapi_base_url.clone(), config.swapi_films_path.clone());

    let store = FilmStore::new();
    store.load(swapi.fetch_all_films().await);
    if store.count() == 0 {
        tracing::warn!(url = %swapi.films_url(), "no films loaded, serving an empty catalog");
    }

    let state = Arc::new(AppState { store });
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
