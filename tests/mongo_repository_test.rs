//! MongoDB repository tests against a live server.
//!
//! Run with `MONGO_URL=mongodb://localhost:27017 cargo test -- --ignored`.

use std::time::{SystemTime, UNIX_EPOCH};

use mongodb::bson::Document;
use planetary::storage::mongo::MongoRepository;
use planetary::storage::PlanetRepository;
use planetary::types::{Filter, Planet, PlanetId};
use planetary::Error;

const TEST_DATABASE: &str = "planetary_test";

fn mongo_url() -> Option<String> {
    std::env::var("MONGO_URL").ok().filter(|url| !url.trim().is_empty())
}

fn unique_collection() -> String {
    format!(
        "planets-{}-{}",
        std::process::id(),
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    )
}

async fn drop_collection(url: &str, name: &str) {
    let client = mongodb::Client::with_uri_str(url).await.unwrap();
    client
        .database(TEST_DATABASE)
        .collection::<Document>(name)
        .drop()
        .await
        .unwrap();
}

#[tokio::test]
#[ignore = "requires a MongoDB server in MONGO_URL"]
async fn mongo_find_add_remove() {
    let Some(url) = mongo_url() else {
        eprintln!("MONGO_URL not set; skipping");
        return;
    };
    let collection = unique_collection();
    let repo = MongoRepository::connect(&url, TEST_DATABASE, &collection)
        .await
        .unwrap();

    assert!(repo.find(&[]).await.unwrap().is_empty());

    let supplied = PlanetId::parse_hex("5f1d7a2b9c8e4a0012345678").unwrap();
    let stored = repo
        .add(Planet {
            id: supplied,
            ..Planet::new("Bespin", "temperate", "gas giant").with_film_counter(1)
        })
        .await
        .unwrap();
    assert_ne!(stored.id, supplied);
    assert!(!stored.id.is_zero());

    repo.add(Planet::new("Mustafar", "hot", "volcanoes"))
        .await
        .unwrap();

    let all = repo.find(&[]).await.unwrap();
    assert_eq!(all.len(), 2);

    let found = repo
        .find(&[
            Filter::equals("name", "Bespin"),
            Filter::id(stored.id.to_hex()),
        ])
        .await
        .unwrap();
    assert_eq!(found, vec![stored.clone()]);

    let by_supplied_id = repo.find(&[Filter::id(supplied.to_hex())]).await.unwrap();
    assert!(by_supplied_id.is_empty());

    assert!(matches!(
        repo.find(&[Filter::id("nope")]).await,
        Err(Error::InvalidId(_))
    ));

    assert!(matches!(repo.remove("nope").await, Err(Error::NotFound)));
    assert!(matches!(
        repo.remove(&supplied.to_hex()).await,
        Err(Error::NotFound)
    ));

    repo.remove(&stored.id.to_hex()).await.unwrap();
    assert!(matches!(
        repo.remove(&stored.id.to_hex()).await,
        Err(Error::NotFound)
    ));

    let remaining = repo.find(&[]).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "Mustafar");

    drop_collection(&url, &collection).await;
}
