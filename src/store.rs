use std::sync::Arc;

use dashmap::DashMap;
use tracing::info;

use crate::{
    error::{AppError, AppResult},
    models::Film,
};

/// In-memory film catalog keyed by episode number.
///
/// Clones share the same map. Each entry is read and written under its shard lock, so a
/// reader never sees a half-applied description update.
#[derive(Clone, Default)]
pub struct FilmStore {
    films: Arc<DashMap<u32, Film>>,
}

impl FilmStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts every film, replacing any earlier film with the same episode.
    pub fn load(&self, films: Vec<Film>) {
        info!(received = films.len(), "loading films into memory");

        for film in films {
            self.films.insert(film.episode_id, film);
        }

        info!(loaded = self.films.len(), "films loaded into memory");
    }

    pub fn get_all(&self) -> Vec<Film> {
        self.films.iter().map(|entry| entry.value().clone()).collect()
    }

    pub fn get_by_episode(&self, episode_id: u32) -> AppResult<Film> {
        self.films
            .get(&episode_id)
            .map(|entry| entry.value().clone())
            .ok_or(AppError::NotFound { episode_id })
    }

    /// Sets the custom description, bumping the version and the last-modified time.
    pub fn update_description(&self, episode_id: u32, text: String) -> AppResult<Film> {
        let mut entry = self.films.get_mut(&episode_id).ok_or(AppError::NotFound { episode_id })?;

        let previous_version = entry.version;
        entry.apply_description(text);

        info!(
            episode_id = episode_id,
            previous_version = previous_version,
            version = entry.version,
            "film description updated"
        );

        Ok(entry.value().clone())
    }

    pub fn exists(&self, episode_id: u32) -> bool {
        self.films.contains_key(&episode_id)
    }

    pub fn count(&self) -> usize {
        self.films.len()
    }
}
