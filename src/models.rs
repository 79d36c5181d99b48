use jiff::{Timestamp, civil::Date};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

const MAX_OPENING_CRAWL_CHARS: usize = 200;

/// A film as held in memory, keyed by `episode_id`.
///
/// Everything except `custom_description`, `version` and `last_modified` comes straight from
/// the catalog and is never touched after load.
#[derive(Clone, Debug, PartialEq)]
pub struct Film {
    pub title: String,
    pub episode_id: u32,
    pub opening_crawl: String,
    pub director: String,
    pub producer: String,
    pub release_date: String,
    pub characters: Vec<String>,
    pub planets: Vec<String>,
    pub starships: Vec<String>,
    pub vehicles: Vec<String>,
    pub species: Vec<String>,
    pub created: Option<Timestamp>,
    pub edited: Option<Timestamp>,
    pub url: String,
    pub custom_description: Option<String>,
    pub version: u32,
    pub last_modified: Timestamp,
}

impl Film {
    pub fn new(title: impl Into<String>, episode_id: u32, opening_crawl: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            episode_id,
            opening_crawl: opening_crawl.into(),
            director: String::new(),
            producer: String::new(),
            release_date: String::new(),
            characters: Vec::new(),
            planets: Vec::new(),
            starships: Vec::new(),
            vehicles: Vec::new(),
            species: Vec::new(),
            created: None,
            edited: None,
            url: String::new(),
            custom_description: None,
            version: 1,
            last_modified: Timestamp::now(),
        }
    }

    /// The custom description when one was set, otherwise the opening crawl.
    pub fn current_description(&self) -> &str {
        self.custom_description.as_deref().unwrap_or(&self.opening_crawl)
    }

    pub(crate) fn apply_description(&mut self, text: String) {
        self.custom_description = Some(text);
        self.version = self.version.saturating_add(1);
        self.last_modified = Timestamp::now();
    }
}

/// Summary shape used by the film listing.
#[derive(Clone, Debug, Serialize)]
pub struct FilmResponse {
    pub title: String,
    pub episode_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening_crawl: Option<String>,
    pub director: String,
    pub producer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<Date>,
    pub version: u32,
    #[serde(rename = "customDescription", skip_serializing_if = "Option::is_none")]
    pub custom_description: Option<String>,
    #[serde(rename = "lastModified")]
    pub last_modified: Timestamp,
}

impl FilmResponse {
    pub fn from_film(film: &Film) -> AppResult<Self> {
        Ok(Self {
            title: film.title.clone(),
            episode_id: film.episode_id,
            opening_crawl: format_opening_crawl(&film.opening_crawl),
            director: film.director.clone(),
            producer: film.producer.clone(),
            release_date: parse_release_date(&film.release_date)?,
            version: film.version,
            custom_description: film.custom_description.clone(),
            last_modified: film.last_modified,
        })
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct FilmDetailResponse {
    pub title: String,
    pub episode_id: u32,
    pub opening_crawl: String,
    pub director: String,
    pub producer: String,
    pub release_date: String,
    pub characters: Vec<String>,
    pub planets: Vec<String>,
    pub starships: Vec<String>,
    pub vehicles: Vec<String>,
    pub species: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edited: Option<Timestamp>,
    pub url: String,
    pub version: u32,
    #[serde(rename = "customDescription", skip_serializing_if = "Option::is_none")]
    pub custom_description: Option<String>,
    #[serde(rename = "lastModified")]
    pub last_modified: Timestamp,
    #[serde(rename = "currentDescription")]
    pub current_description: String,
}

impl From<Film> for FilmDetailResponse {
    fn from(film: Film) -> Self {
        let current_description = film.current_description().to_string();
        Self {
            title: film.title,
            episode_id: film.episode_id,
            opening_crawl: film.opening_crawl,
            director: film.director,
            producer: film.producer,
            release_date: film.release_date,
            characters: film.characters,
            planets: film.planets,
            starships: film.starships,
            vehicles: film.vehicles,
            species: film.species,
            created: film.created,
            edited: film.edited,
            url: film.url,
            version: film.version,
            custom_description: film.custom_description,
            last_modified: film.last_modified,
            current_description,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateDescriptionRequest {
    #[serde(default)]
    pub description: Option<String>,
}

impl UpdateDescriptionRequest {
    pub fn into_description(self) -> AppResult<String> {
        match self.description {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(AppError::InvalidInput {
                field: "description",
                message: "description must not be blank".to_string(),
            }),
        }
    }
}

fn format_opening_crawl(crawl: &str) -> Option<String> {
    let cleaned = crawl.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        return None;
    }

    if cleaned.chars().count() > MAX_OPENING_CRAWL_CHARS {
        let mut truncated: String = cleaned.chars().take(MAX_OPENING_CRAWL_CHARS - 3).collect();
        truncated.push_str("...");
        return Some(truncated);
    }

    Some(cleaned)
}

fn parse_release_date(raw: &str) -> AppResult<Option<Date>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<Date>().map(Some).map_err(|_| AppError::InvalidDate(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a_new_hope() -> Film {
        let mut film = Film::new("A New Hope", 4, "It is a period of civil war...");
        film.director = "George Lucas".to_string();
        film.producer = "Gary Kurtz, Rick McCallum".to_string();
        film.release_date = "1977-05-25".to_string();
        film.characters = vec!["https://swapi.py4e.com/api/people/1/".to_string()];
        film.url = "https://swapi.py4e.com/api/films/1/".to_string();
        film
    }

    #[test]
    fn current_description_falls_back_to_opening_crawl() {
        let mut film = a_new_hope();
        assert_eq!(film.current_description(), "It is a period of civil war...");

        film.apply_description("Classic".to_string());
        assert_eq!(film.current_description(), "Classic");
        assert_eq!(film.version, 2);
    }

    #[test]
    fn version_saturates_instead_of_overflowing() {
        let mut film = a_new_hope();
        film.version = u32::MAX;

        film.apply_description("Again".to_string());
        assert_eq!(film.version, u32::MAX);
        assert_eq!(film.current_description(), "Again");
    }

    #[test]
    fn summary_parses_release_date() {
        let resp = FilmResponse::from_film(&a_new_hope()).unwrap();
        assert_eq!(resp.release_date, Some(jiff::civil::date(1977, 5, 25)));
        assert_eq!(resp.version, 1);
        assert_eq!(resp.custom_description, None);
    }

    #[test]
    fn summary_rejects_malformed_release_date() {
        let mut film = a_new_hope();
        film.release_date = "25/05/1977".to_string();

        let err = FilmResponse::from_film(&film).unwrap_err();
        assert!(matches!(err, AppError::InvalidDate(ref d) if d == "25/05/1977"));
    }

    #[test]
    fn summary_omits_blank_fields() {
        let mut film = a_new_hope();
        film.release_date = "  ".to_string();
        film.opening_crawl = "\r\n  ".to_string();

        let resp = FilmResponse::from_film(&film).unwrap();
        assert_eq!(resp.release_date, None);
        assert_eq!(resp.opening_crawl, None);

        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("release_date").is_none());
        assert!(json.get("opening_crawl").is_none());
        assert!(json.get("customDescription").is_none());
        assert!(json.get("lastModified").is_some());
    }

    #[test]
    fn opening_crawl_is_collapsed_and_truncated() {
        assert_eq!(
            format_opening_crawl("It is a period\r\nof civil   war.\r\n").as_deref(),
            Some("It is a period of civil war.")
        );

        let long = "word ".repeat(100);
        let formatted = format_opening_crawl(&long).unwrap();
        assert_eq!(formatted.chars().count(), MAX_OPENING_CRAWL_CHARS);
        assert!(formatted.ends_with("..."));
    }

    #[test]
    fn detail_carries_current_description() {
        let mut film = a_new_hope();
        film.apply_description("X".to_string());

        let json = serde_json::to_value(FilmDetailResponse::from(film)).unwrap();
        assert_eq!(json["episode_id"], 4);
        assert_eq!(json["version"], 2);
        assert_eq!(json["customDescription"], "X");
        assert_eq!(json["currentDescription"], "X");
        assert_eq!(json["release_date"], "1977-05-25");
        assert!(json.get("created").is_none());
    }

    #[test]
    fn blank_or_missing_description_is_rejected() {
        for description in [None, Some(String::new()), Some("   ".to_string())] {
            let err = UpdateDescriptionRequest { description }.into_description().unwrap_err();
            assert!(matches!(err, AppError::InvalidInput { field: "description", .. }));
        }

        let ok = UpdateDescriptionRequest { description: Some("New text".to_string()) };
        assert_eq!(ok.into_description().unwrap(), "New text");
    }
}
