//! Document commands: get, create, update and plan.
//!
//! Documents are schemaless JSON objects keyed by the table's key schema.

use super::{snapshot, CommandResult};
use dynamorm_codec::AttributeValue;
use dynamorm_core::{
    document_modeler, Document, Entity, Key, Repository, RepositoryConfig, WriteIntent,
};
use dynamorm_storage::{Context, InMemoryStore};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Prints the document stored under `keys` (each `NAME=VALUE`) as JSON.
pub fn get(path: &Path, table: &str, keys: &[String], consistent: bool) -> CommandResult<String> {
    let store = Arc::new(snapshot::load(path)?);
    let repo = open(&store, table, consistent)?;
    let key = parse_key(keys)?;

    let document = repo.get(&Context::background(), &key)?;
    Ok(serde_json::to_string_pretty(&document.into_body())?)
}

/// Saves `document` with `intent` and persists the store.
pub fn save(path: &Path, table: &str, document: &str, intent: WriteIntent) -> CommandResult<()> {
    let store = Arc::new(snapshot::load(path)?);
    let repo = open(&store, table, false)?;
    let document = parse_document(&store, table, document)?;

    let ctx = Context::background();
    match intent {
        WriteIntent::Create => repo.create(&ctx, &document)?,
        WriteIntent::Update => repo.update(&ctx, &document)?,
    }
    snapshot::save(path, &store)?;

    info!("Saved {} in {} ({})", document.key(), table, intent);
    Ok(())
}

/// Returns the write group a save would send, as JSON.
pub fn plan(path: &Path, table: &str, document: &str, intent: WriteIntent) -> CommandResult<String> {
    let store = Arc::new(snapshot::load(path)?);
    let repo = open(&store, table, false)?;
    let document = parse_document(&store, table, document)?;

    let group = repo.plan(&document, intent)?;
    Ok(serde_json::to_string_pretty(&group)?)
}

fn key_names(store: &InMemoryStore, table: &str) -> CommandResult<Vec<String>> {
    store
        .key_schema(table)
        .ok_or_else(|| format!("Table not found: {table}").into())
}

fn open(
    store: &Arc<InMemoryStore>,
    table: &str,
    consistent: bool,
) -> CommandResult<Repository<Document, InMemoryStore>> {
    let names = key_names(store, table)?;
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    Ok(Repository::builder()
        .with_store(Arc::clone(store))
        .with_config(RepositoryConfig::new(table).consistent_read(consistent))
        .with_modeler(document_modeler(&names))
        .build()?)
}

fn parse_document(store: &InMemoryStore, table: &str, document: &str) -> CommandResult<Document> {
    let names = key_names(store, table)?;
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    let value: serde_json::Value =
        serde_json::from_str(document).map_err(|e| format!("Invalid document: {e}"))?;
    Ok(Document::from_json(&names, value)?)
}

/// Parses `NAME=VALUE` pairs. Values that read as JSON numbers become
/// numbers, everything else a string.
fn parse_key(pairs: &[String]) -> CommandResult<Key> {
    let mut key = Key::new();
    for pair in pairs {
        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("Key attribute must be NAME=VALUE, got {pair:?}"))?;
        let value = match serde_json::from_str::<serde_json::Number>(value) {
            Ok(number) => AttributeValue::N(number.to_string()),
            Err(_) => AttributeValue::S(value.to_string()),
        };
        key.insert(name, value);
    }
    Ok(key)
}
