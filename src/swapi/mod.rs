//! Film database integration
//!
//! Looks up how many films a planet appears in, by name.

use async_trait::async_trait;
use serde::Deserialize;

use crate::{Error, Result};

pub mod client;

pub use client::{SwapiClient, DEFAULT_BASE_URL};

/// Film count lookup capability
#[async_trait]
pub trait FilmCounter: Send + Sync {
    /// Number of films associated with the first planet matching `name`
    async fn get_film_count(&self, name: &str) -> Result<usize>;
}

/// Search envelope returned by the film database
#[derive(Debug, Clone, Deserialize)]
pub struct SwapiResponse {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub results: Vec<SwapiPlanet>,
}

impl SwapiResponse {
    /// Films of the first result, or zero when nothing matched
    pub fn film_count(&self) -> usize {
        self.results.first().map_or(0, |p| p.films.len())
    }
}

/// Single planet entry in a search result
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SwapiPlanet {
    pub name: String,
    pub climate: String,
    pub terrain: String,
    pub films: Vec<String>,
    pub url: String,
}

/// Film counter answering with a fixed outcome, for tests and offline runs
#[derive(Debug, Clone)]
pub enum StaticFilmCounter {
    Count(usize),
    Failing(String),
}

impl StaticFilmCounter {
    pub fn count(count: usize) -> Self {
        Self::Count(count)
    }

    pub fn failing(msg: impl Into<String>) -> Self {
        Self::Failing(msg.into())
    }
}

#[async_trait]
impl FilmCounter for StaticFilmCounter {
    async fn get_film_count(&self, _name: &str) -> Result<usize> {
        match self {
            Self::Count(count) => Ok(*count),
            Self::Failing(msg) => Err(Error::upstream(msg.clone())),
        }
    }
}
