//! MongoDB planet store

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};

use crate::types::{Filter, Planet, PlanetId};
use crate::{Error, Result};

use super::PlanetRepository;

pub const DEFAULT_DATABASE: &str = "swapi";
pub const DEFAULT_COLLECTION: &str = "planets";

/// Persisted layout of a planet, one document per planet
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PlanetDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    climate: String,
    terrain: String,
    film_counter: i64,
}

impl From<Planet> for PlanetDocument {
    fn from(planet: Planet) -> Self {
        Self {
            id: planet.id.object_id(),
            name: planet.name,
            climate: planet.climate,
            terrain: planet.terrain,
            film_counter: planet.film_counter,
        }
    }
}

impl From<PlanetDocument> for Planet {
    fn from(doc: PlanetDocument) -> Self {
        Self {
            id: PlanetId::from(doc.id),
            name: doc.name,
            climate: doc.climate,
            terrain: doc.terrain,
            film_counter: doc.film_counter,
        }
    }
}

/// Translate filters into a native query, AND-ing every constraint
fn build_query(filters: &[Filter]) -> Result<Document> {
    let mut query = Document::new();
    for filter in filters {
        if filter.is_id() {
            let id = PlanetId::parse_hex(&filter.value)?;
            query.insert("_id", id.object_id());
        } else {
            query.insert(filter.key.clone(), filter.value.clone());
        }
    }
    Ok(query)
}

/// MongoDB-backed repository
pub struct MongoRepository {
    planets: Collection<PlanetDocument>,
}

impl MongoRepository {
    /// Connect and verify the server answers before handing out the repository
    pub async fn connect(url: &str, database: &str, collection: &str) -> Result<Self> {
        let client = Client::with_uri_str(url)
            .await
            .map_err(|e| Error::storage(format!("connect to {} failed: {}", database, e)))?;

        let db = client.database(database);
        db.run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| Error::storage(format!("ping failed: {}", e)))?;

        tracing::info!(database, collection, "Connected to MongoDB");

        Ok(Self {
            planets: db.collection(collection),
        })
    }
}

#[async_trait]
impl PlanetRepository for MongoRepository {
    async fn find(&self, filters: &[Filter]) -> Result<Vec<Planet>> {
        let query = build_query(filters)?;

        let cursor = self.planets.find(query).await?;
        let documents: Vec<PlanetDocument> = cursor.try_collect().await?;

        Ok(documents.into_iter().map(Planet::from).collect())
    }

    async fn add(&self, mut planet: Planet) -> Result<Planet> {
        planet.id = PlanetId::new();
        self.planets
            .insert_one(PlanetDocument::from(planet.clone()))
            .await?;
        Ok(planet)
    }

    async fn remove(&self, id: &str) -> Result<()> {
        let id = PlanetId::parse_hex(id).map_err(|_| Error::NotFound)?;

        let result = self
            .planets
            .delete_one(doc! { "_id": id.object_id() })
            .await?;

        if result.deleted_count == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filters_build_empty_query() {
        assert!(build_query(&[]).unwrap().is_empty());
    }

    #[test]
    fn id_filter_targets_object_id() {
        let hex = "5f1d7a2b9c8e4a0012345678";
        let query = build_query(&[Filter::equals("name", "Hoth"), Filter::id(hex)]).unwrap();

        assert_eq!(query.get_str("name").unwrap(), "Hoth");
        assert_eq!(
            query.get_object_id("_id").unwrap(),
            ObjectId::parse_str(hex).unwrap()
        );
        assert!(query.get("id").is_none());
    }

    #[test]
    fn malformed_id_filter_is_rejected() {
        assert!(matches!(
            build_query(&[Filter::id("nope")]),
            Err(Error::InvalidId(_))
        ));
    }

    #[test]
    fn document_layout_round_trips() {
        let planet = Planet {
            id: PlanetId::new(),
            ..Planet::new("Naboo", "temperate", "grassy hills").with_film_counter(4)
        };
        let document = mongodb::bson::to_document(&PlanetDocument::from(planet.clone())).unwrap();

        let keys: Vec<&str> = document.keys().map(String::as_str).collect();
        assert_eq!(keys, ["_id", "name", "climate", "terrain", "film_counter"]);

        let decoded: PlanetDocument = mongodb::bson::from_document(document).unwrap();
        assert_eq!(Planet::from(decoded), planet);
    }
}
