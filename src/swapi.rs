use jiff::Timestamp;
use serde::{Deserialize, Deserializer};
use tracing::{debug, info, warn};

use crate::models::Film;

/// Client for the public Star Wars catalog.
///
/// Fetching is fail-open: any failure is logged and surfaces as an empty film list, so a
/// broken catalog leaves the service running with nothing loaded.
pub struct SwapiClient {
    client: wreq::Client,
    base_url: String,
    films_path: String,
}

impl SwapiClient {
    pub fn new(client: wreq::Client, base_url: String, films_path: String) -> Self {
        Self { client, base_url, films_path }
    }

    pub fn films_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.films_path)
    }

    pub async fn fetch_all_films(&self) -> Vec<Film> {
        let url = self.films_url();
        info!(url = %url, "fetching films from SWAPI");

        match self.try_fetch(&url).await {
            Ok(films) => films,
            Err(err) => {
                warn!(url = %url, error = %err, "failed to fetch films from SWAPI");
                Vec::new()
            },
        }
    }

    async fn try_fetch(&self, url: &str) -> anyhow::Result<Vec<Film>> {
        let body = self.client.get(url).send().await?.error_for_status()?.text().await?;
        parse_films(&body)
    }
}

/// Decodes a films envelope. A `null` or missing `results` yields no films; a body that is
/// not a JSON object at all is an error.
fn parse_films(body: &str) -> anyhow::Result<Vec<Film>> {
    let envelope: Option<FilmsEnvelope> = serde_json::from_str(body)?;

    let Some(results) = envelope.and_then(|e| e.results) else {
        warn!("empty response from SWAPI");
        return Ok(Vec::new());
    };

    info!(count = results.len(), "received films from SWAPI");

    let films = results
        .into_iter()
        .filter_map(|entry| {
            let Some(episode_id) = entry.episode_id else {
                warn!(title = %entry.title, "skipping film without episode_id");
                return None;
            };
            debug!(episode_id = episode_id, title = %entry.title, "decoded film");
            Some(entry.into_film(episode_id))
        })
        .collect();

    Ok(films)
}

#[derive(Debug, Deserialize)]
struct FilmsEnvelope {
    #[serde(default)]
    results: Option<Vec<SwapiFilm>>,
}

#[derive(Debug, Deserialize)]
struct SwapiFilm {
    #[serde(default, deserialize_with = "null_as_default")]
    title: String,
    episode_id: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    opening_crawl: String,
    #[serde(default, deserialize_with = "null_as_default")]
    director: String,
    #[serde(default, deserialize_with = "null_as_default")]
    producer: String,
    #[serde(default, deserialize_with = "null_as_default")]
    release_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    characters: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    planets: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    starships: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    vehicles: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    species: Vec<String>,
    created: Option<Timestamp>,
    edited: Option<Timestamp>,
    #[serde(default, deserialize_with = "null_as_default")]
    url: String,
}

/// Reads an explicit `null` as the field's default, same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl SwapiFilm {
    fn into_film(self, episode_id: u32) -> Film {
        let mut film = Film::new(self.title, episode_id, self.opening_crawl);
        film.director = self.director;
        film.producer = self.producer;
        film.release_date = self.release_date;
        film.characters = self.characters;
        film.planets = self.planets;
        film.starships = self.starships;
        film.vehicles = self.vehicles;
        film.species = self.species;
        film.created = self.created;
        film.edited = self.edited;
        film.url = self.url;
        film
    }
}
