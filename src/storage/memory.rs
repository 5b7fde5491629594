//! In-process planet store

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::types::{Filter, Planet, PlanetId};
use crate::{Error, Result};

use super::PlanetRepository;

/// Resolved form of a filter, with id filters already parsed
enum Predicate<'a> {
    Id(PlanetId),
    Field { key: &'a str, value: &'a str },
}

impl Predicate<'_> {
    fn matches(&self, planet: &Planet) -> bool {
        match self {
            Predicate::Id(id) => planet.id == *id,
            Predicate::Field { key, value } => planet.field(key) == Some(*value),
        }
    }
}

/// Planet store kept in memory, in insertion order
#[derive(Default)]
pub struct InMemoryRepository {
    planets: RwLock<Vec<Planet>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with planets as-is, keeping whatever ids they carry
    pub fn with_planets(planets: Vec<Planet>) -> Self {
        Self {
            planets: RwLock::new(planets),
        }
    }

    pub async fn len(&self) -> usize {
        self.planets.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.planets.read().await.is_empty()
    }

    /// Snapshot of every stored planet
    pub async fn all(&self) -> Vec<Planet> {
        self.planets.read().await.clone()
    }
}

#[async_trait]
impl PlanetRepository for InMemoryRepository {
    async fn find(&self, filters: &[Filter]) -> Result<Vec<Planet>> {
        let predicates = filters
            .iter()
            .map(|f| {
                if f.is_id() {
                    PlanetId::parse_hex(&f.value).map(Predicate::Id)
                } else {
                    Ok(Predicate::Field {
                        key: &f.key,
                        value: &f.value,
                    })
                }
            })
            .collect::<Result<Vec<_>>>()?;

        let planets = self.planets.read().await;
        Ok(planets
            .iter()
            .filter(|p| predicates.iter().all(|pred| pred.matches(p)))
            .cloned()
            .collect())
    }

    async fn add(&self, mut planet: Planet) -> Result<Planet> {
        planet.id = PlanetId::new();
        self.planets.write().await.push(planet.clone());
        Ok(planet)
    }

    async fn remove(&self, id: &str) -> Result<()> {
        let id = PlanetId::parse_hex(id).map_err(|_| Error::NotFound)?;

        let mut planets = self.planets.write().await;
        let index = planets
            .iter()
            .position(|p| p.id == id)
            .ok_or(Error::NotFound)?;
        planets.remove(index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded() -> (InMemoryRepository, Vec<Planet>) {
        let repo = InMemoryRepository::new();
        let mut stored = Vec::new();
        for (name, climate) in [("Hoth", "frozen"), ("Tatooine", "arid"), ("Jakku", "arid")] {
            stored.push(
                repo.add(Planet::new(name, climate, "rock"))
                    .await
                    .unwrap(),
            );
        }
        (repo, stored)
    }

    #[tokio::test]
    async fn add_assigns_fresh_ids() {
        let repo = InMemoryRepository::new();
        let mut planet = Planet::new("Hoth", "frozen", "tundra");
        planet.id = PlanetId::parse_hex("5f1d7a2b9c8e4a0012345678").unwrap();

        let first = repo.add(planet.clone()).await.unwrap();
        let second = repo.add(planet.clone()).await.unwrap();

        assert_ne!(first.id, planet.id);
        assert_ne!(first.id, second.id);
        assert!(!first.id.is_zero());
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn empty_filters_return_everything_in_order() {
        let (repo, stored) = seeded().await;
        assert_eq!(repo.find(&[]).await.unwrap(), stored);

        let empty = InMemoryRepository::new();
        assert!(empty.find(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn filters_are_combined_with_and() {
        let (repo, stored) = seeded().await;

        let arid = repo.find(&[Filter::equals("climate", "arid")]).await.unwrap();
        assert_eq!(arid.len(), 2);

        let found = repo
            .find(&[
                Filter::equals("name", "Tatooine"),
                Filter::id(stored[1].id.to_hex()),
            ])
            .await
            .unwrap();
        assert_eq!(found, vec![stored[1].clone()]);

        let none = repo
            .find(&[
                Filter::equals("name", "Hoth"),
                Filter::id(stored[1].id.to_hex()),
            ])
            .await
            .unwrap();
        assert!(none.is_empty());

        let unknown = repo.find(&[Filter::equals("gravity", "1")]).await.unwrap();
        assert!(unknown.is_empty());

        let counter = repo.find(&[Filter::equals("film_counter", "0")]).await.unwrap();
        assert!(counter.is_empty());
    }

    #[tokio::test]
    async fn malformed_id_filter_is_an_error() {
        let (repo, _) = seeded().await;
        let result = repo.find(&[Filter::id("zzz")]).await;
        assert!(matches!(result, Err(Error::InvalidId(_))));
    }

    #[tokio::test]
    async fn remove_deletes_exactly_one_planet() {
        let (repo, stored) = seeded().await;

        repo.remove(&stored[0].id.to_hex()).await.unwrap();
        assert_eq!(repo.all().await, stored[1..].to_vec());

        assert!(matches!(
            repo.remove(&stored[0].id.to_hex()).await,
            Err(Error::NotFound)
        ));
        assert!(matches!(repo.remove("bogus").await, Err(Error::NotFound)));
        assert_eq!(repo.len().await, 2);
    }
}
