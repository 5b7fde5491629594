//! API server state

use std::sync::Arc;
use std::time::Duration;

use crate::config::FilmLookupPolicy;
use crate::storage::PlanetRepository;
use crate::swapi::FilmCounter;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// API server state
#[derive(Clone)]
pub struct AppState {
    /// Planet persistence
    pub repository: Arc<dyn PlanetRepository>,

    /// Film count lookups, consulted when a planet is created
    pub films: Arc<dyn FilmCounter>,

    /// Behaviour when the film lookup fails
    pub film_lookup: FilmLookupPolicy,

    /// Deadline applied to every inbound request
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(repository: Arc<dyn PlanetRepository>, films: Arc<dyn FilmCounter>) -> Self {
        Self {
            repository,
            films,
            film_lookup: FilmLookupPolicy::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_film_lookup(mut self, policy: FilmLookupPolicy) -> Self {
        self.film_lookup = policy;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
