//! Planetary - a small REST service for Star Wars planets
//!
//! Planetary provides:
//! - CRUD-style HTTP endpoints over a planet collection
//! - Document storage in MongoDB, or in memory
//! - Film counts looked up from the public film database at creation time

pub mod api;
pub mod config;
pub mod error;
pub mod storage;
pub mod swapi;
pub mod types;

pub use error::{Error, Result};
