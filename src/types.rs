//! Core types for planetary

use std::fmt;
use std::str::FromStr;

use mongodb::bson::oid::ObjectId;
use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

/// Filter key that targets the document identifier rather than a field
pub const ID_FILTER_KEY: &str = "id";

/// Document identifier, rendered externally as a 24-character hex string.
///
/// The default value is the all-zero id, which is what a planet carries
/// before the repository assigns it a real one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlanetId(ObjectId);

impl PlanetId {
    /// Generate a fresh, unique id
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    pub fn parse_hex(s: &str) -> Result<Self> {
        ObjectId::parse_str(s)
            .map(Self)
            .map_err(|_| Error::InvalidId(s.to_string()))
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }

    pub fn is_zero(&self) -> bool {
        self.0.bytes() == [0u8; 12]
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl Default for PlanetId {
    fn default() -> Self {
        Self(ObjectId::from_bytes([0u8; 12]))
    }
}

impl From<ObjectId> for PlanetId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl FromStr for PlanetId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_hex(s)
    }
}

impl fmt::Display for PlanetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for PlanetId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PlanetId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::parse_hex(&hex).map_err(serde::de::Error::custom)
    }
}

/// A planet as exposed over the HTTP API
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Planet {
    #[serde(rename = "ID", default)]
    pub id: PlanetId,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Climate")]
    pub climate: String,
    #[serde(rename = "Terrain")]
    pub terrain: String,
    #[serde(rename = "FilmCounter", default)]
    pub film_counter: i64,
}

impl Planet {
    pub fn new(
        name: impl Into<String>,
        climate: impl Into<String>,
        terrain: impl Into<String>,
    ) -> Self {
        Self {
            id: PlanetId::default(),
            name: name.into(),
            climate: climate.into(),
            terrain: terrain.into(),
            film_counter: 0,
        }
    }

    pub fn with_film_counter(mut self, film_counter: i64) -> Self {
        self.film_counter = film_counter;
        self
    }

    /// String field compared by equality filters; other keys never match
    pub fn field(&self, key: &str) -> Option<&str> {
        match key {
            "name" => Some(&self.name),
            "climate" => Some(&self.climate),
            "terrain" => Some(&self.terrain),
            _ => None,
        }
    }
}

/// Single equality constraint used to narrow a planet query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub key: String,
    pub value: String,
}

impl Filter {
    pub fn equals(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn id(value: impl Into<String>) -> Self {
        Self::equals(ID_FILTER_KEY, value)
    }

    pub fn is_id(&self) -> bool {
        self.key == ID_FILTER_KEY
    }
}

/// Payload accepted by the create endpoint.
///
/// Keys match case-insensitively. Absent or `null` fields decode as empty
/// strings so validation reports them. A client-sent `ID` or `FilmCounter`
/// must be well-formed but is otherwise ignored.
#[derive(Debug, Clone, Default)]
pub struct CreatePlanetRequest {
    pub name: String,
    pub climate: String,
    pub terrain: String,
}

impl<'de> Deserialize<'de> for CreatePlanetRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(CreatePlanetVisitor)
    }
}

struct CreatePlanetVisitor;

impl<'de> Visitor<'de> for CreatePlanetVisitor {
    type Value = CreatePlanetRequest;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a planet object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
        let mut request = CreatePlanetRequest::default();

        while let Some(key) = map.next_key::<String>()? {
            match key.to_lowercase().as_str() {
                "name" => request.name = map.next_value::<Option<String>>()?.unwrap_or_default(),
                "climate" => {
                    request.climate = map.next_value::<Option<String>>()?.unwrap_or_default()
                }
                "terrain" => {
                    request.terrain = map.next_value::<Option<String>>()?.unwrap_or_default()
                }
                "id" => {
                    if let Some(hex) = map.next_value::<Option<String>>()? {
                        if !hex.is_empty() {
                            PlanetId::parse_hex(&hex).map_err(<A::Error as de::Error>::custom)?;
                        }
                    }
                }
                "filmcounter" => {
                    map.next_value::<Option<i64>>()?;
                }
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }

        Ok(request)
    }
}

impl CreatePlanetRequest {
    /// Check required fields in order, returning the message for the first empty one
    pub fn validate(&self) -> std::result::Result<(), &'static str> {
        if self.name.is_empty() {
            return Err("Name can't be empty");
        }
        if self.climate.is_empty() {
            return Err("Climate can't be empty");
        }
        if self.terrain.is_empty() {
            return Err("Terrain can't be empty");
        }
        Ok(())
    }

    pub fn into_planet(self) -> Planet {
        Planet::new(self.name, self.climate, self.terrain)
    }
}
