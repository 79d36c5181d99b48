use std::net::SocketAddr;

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub swapi_base_url: String,
    pub swapi_films_path: String,
    pub swapi_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "8080".to_string()).parse().context("PORT")?;

        let swapi_base_url = std::env::var("SWAPI_BASE_URL")
            .unwrap_or_else(|_| "https://swapi.py4e.com/api".to_string());
        let swapi_films_path =
            std::env::var("SWAPI_FILMS_PATH").unwrap_or_else(|_| "/films/".to_string());

        let swapi_timeout_secs: u64 =
            std::env::var("SWAPI_TIMEOUT_SECS").ok().and_then(|s| s.parse().ok()).unwrap_or(30);

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            swapi_base_url,
            swapi_films_path,
            swapi_timeout_secs,
        })
    }
}
