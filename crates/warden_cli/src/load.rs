//! Reading registry documents, actors and records from disk.

use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use warden_core::{Actor, InMemoryRegistry, Record};

/// One record or a list of records
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Records {
    /// A single JSON object
    One(Record),
    /// A JSON array of objects
    Many(Vec<Record>),
}

fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).wrap_err_with(|| format!("failed to read {}", path.display()))
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let text = read_to_string(path)?;
    serde_json::from_str(&text)
        .map_err(|err| eyre!("{} is not a valid {what}: {err}", path.display()))
}

/// Load an entity registry document
pub fn registry(path: &Path) -> Result<InMemoryRegistry> {
    let text = read_to_string(path)?;
    let registry = InMemoryRegistry::from_json_str(&text)
        .wrap_err_with(|| format!("failed to load registry {}", path.display()))?;
    tracing::info!(path = %path.display(), entities = registry.len(), "registry loaded");
    Ok(registry)
}

/// Load an actor
pub fn actor(path: &Path) -> Result<Actor> {
    read_json(path, "actor")
}

/// Load a JSON object (record or criteria)
pub fn object(path: &Path) -> Result<Record> {
    read_json(path, "JSON object")
}

/// Load a record or an array of records
pub fn records(path: &Path) -> Result<Records> {
    read_json(path, "record or record array")
}
