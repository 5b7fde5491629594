//! HTTP client for the public film database

use std::time::Duration;

use async_trait::async_trait;

use crate::{Error, Result};

use super::{FilmCounter, SwapiResponse};

pub const DEFAULT_BASE_URL: &str = "https://swapi.dev/api/planets";

/// Film database client
#[derive(Clone)]
pub struct SwapiClient {
    http: reqwest::Client,
    base_url: String,
}

impl SwapiClient {
    /// Build a client whose requests give up after `timeout`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl FilmCounter for SwapiClient {
    async fn get_film_count(&self, name: &str) -> Result<usize> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("search", name)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::upstream(format!(
                "search for '{}' returned {}",
                name, status
            )));
        }

        let body: SwapiResponse = response.json().await?;
        let count = body.film_count();

        tracing::debug!(planet = name, films = count, "Fetched film count");
        Ok(count)
    }
}
