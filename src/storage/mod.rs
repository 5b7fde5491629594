//! Storage abstraction layer
//!
//! Provides a unified interface over MongoDB and an in-process store

use std::sync::Arc;

use async_trait::async_trait;

use crate::types::{Filter, Planet};
use crate::Result;

pub mod memory;
pub mod mongo;

/// Planet repository trait
#[async_trait]
pub trait PlanetRepository: Send + Sync {
    /// Find planets matching every filter; an empty slice matches all
    async fn find(&self, filters: &[Filter]) -> Result<Vec<Planet>>;

    /// Store a planet under a freshly assigned id, returning the stored copy
    async fn add(&self, planet: Planet) -> Result<Planet>;

    /// Delete the planet with the given hex id
    async fn remove(&self, id: &str) -> Result<()>;
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    Mongo {
        url: String,
        database: String,
        collection: String,
    },
    Memory,
}

/// Create planet repository from config
pub async fn create_repository(config: StorageConfig) -> Result<Arc<dyn PlanetRepository>> {
    match config {
        StorageConfig::Mongo {
            url,
            database,
            collection,
        } => {
            let repo = mongo::MongoRepository::connect(&url, &database, &collection).await?;
            Ok(Arc::new(repo))
        }
        StorageConfig::Memory => Ok(Arc::new(memory::InMemoryRepository::new())),
    }
}
