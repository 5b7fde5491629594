//! API handlers

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::api::AppState;
use crate::config::FilmLookupPolicy;
use crate::types::{CreatePlanetRequest, Filter};

/// Health check
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Recognised query parameters for listing planets
#[derive(Debug, Default)]
pub struct ListPlanetsParams {
    pub name: Option<String>,
    pub id: Option<String>,
}

impl ListPlanetsParams {
    /// Pick the first value of each recognised key; repeats and unknown keys are ignored
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();

        for (key, value) in pairs {
            match key.as_str() {
                "name" if params.name.is_none() => params.name = Some(value),
                "id" if params.id.is_none() => params.id = Some(value),
                _ => {}
            }
        }

        params
    }

    /// Filters for the supplied parameters, name before id
    pub fn filters(&self) -> Vec<Filter> {
        let mut filters = Vec::new();

        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            filters.push(Filter::equals("name", name));
        }
        if let Some(id) = self.id.as_deref().filter(|i| !i.is_empty()) {
            filters.push(Filter::id(id));
        }

        filters
    }
}

/// List planets, optionally narrowed by name and/or id
pub async fn list_planets(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let filters = ListPlanetsParams::from_pairs(pairs).filters();

    let planets = match state.repository.find(&filters).await {
        Ok(planets) => planets,
        Err(err) => {
            tracing::error!(error = %err, ?filters, "Failed to list planets");
            return (StatusCode::NOT_FOUND, err.to_string()).into_response();
        }
    };

    match serde_json::to_vec(&planets) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "Failed to serialize planets");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Create a planet, enriched with its film count
///
/// The body is decoded here rather than through the `Json` extractor so that
/// every malformed payload is a 400, whatever its content type.
pub async fn create_planet(State(state): State<AppState>, body: Bytes) -> Response {
    let request = match serde_json::from_slice::<Option<CreatePlanetRequest>>(&body) {
        Ok(request) => request.unwrap_or_default(),
        Err(err) => {
            tracing::warn!(error = %err, "Rejecting malformed planet payload");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    if let Err(message) = request.validate() {
        return (StatusCode::UNPROCESSABLE_ENTITY, message).into_response();
    }

    let film_counter = match state.films.get_film_count(&request.name).await {
        Ok(count) => count as i64,
        Err(err) => match state.film_lookup {
            FilmLookupPolicy::Degrade => {
                tracing::warn!(
                    error = %err,
                    planet = %request.name,
                    "Film lookup failed; storing planet without films"
                );
                0
            }
            FilmLookupPolicy::Reject => {
                tracing::error!(error = %err, planet = %request.name, "Film lookup failed");
                return (StatusCode::BAD_GATEWAY, "Film count lookup failed").into_response();
            }
        },
    };

    let planet = request.into_planet().with_film_counter(film_counter);

    match state.repository.add(planet).await {
        Ok(stored) => {
            tracing::info!(
                id = %stored.id,
                planet = %stored.name,
                films = stored.film_counter,
                "Created planet"
            );
            StatusCode::CREATED.into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "Failed to store planet");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Remove a planet by id
pub async fn remove_planet(
    State(state): State<AppState>,
    id: Option<Path<String>>,
) -> Response {
    let id = match id {
        Some(Path(id)) if !id.is_empty() => id,
        _ => return (StatusCode::BAD_REQUEST, "Planet id is required").into_response(),
    };

    match state.repository.remove(&id).await {
        Ok(()) => {
            tracing::info!(%id, "Removed planet");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(err) => {
            tracing::warn!(error = %err, %id, "Failed to remove planet");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_follow_supplied_params_in_order() {
        let params = ListPlanetsParams::default();
        assert!(params.filters().is_empty());

        let params = ListPlanetsParams {
            name: Some("Hoth".into()),
            id: Some("5f1d7a2b9c8e4a0012345678".into()),
        };
        assert_eq!(
            params.filters(),
            vec![
                Filter::equals("name", "Hoth"),
                Filter::id("5f1d7a2b9c8e4a0012345678"),
            ]
        );

        let params = ListPlanetsParams {
            name: Some(String::new()),
            id: Some("abc".into()),
        };
        assert_eq!(params.filters(), vec![Filter::id("abc")]);
    }

    #[test]
    fn repeated_params_keep_the_first_value() {
        let pairs = vec![
            ("id".to_string(), "abc".to_string()),
            ("name".to_string(), "Hoth".to_string()),
            ("name".to_string(), "Endor".to_string()),
            ("id".to_string(), "def".to_string()),
            ("climate".to_string(), "frozen".to_string()),
        ];
        assert_eq!(
            ListPlanetsParams::from_pairs(pairs).filters(),
            vec![Filter::equals("name", "Hoth"), Filter::id("abc")]
        );

        let pairs = vec![
            ("name".to_string(), String::new()),
            ("name".to_string(), "Endor".to_string()),
        ];
        assert!(ListPlanetsParams::from_pairs(pairs).filters().is_empty());
    }
}
