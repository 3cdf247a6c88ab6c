//! Loading and saving the store snapshot file.

use super::CommandResult;
use dynamorm_storage::{InMemoryStore, StoreSnapshot};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Opens the store saved at `path`, or an empty store if there is no file yet.
pub fn load(path: &Path) -> CommandResult<InMemoryStore> {
    if !path.exists() {
        debug!("No snapshot at {:?}, starting empty", path);
        return Ok(InMemoryStore::new());
    }

    let data = fs::read(path)?;
    let snapshot: StoreSnapshot = serde_json::from_slice(&data)
        .map_err(|e| format!("Invalid snapshot {:?}: {e}", path))?;
    Ok(InMemoryStore::from_snapshot(snapshot)?)
}

/// Writes the store to `path`, replacing the previous snapshot.
pub fn save(path: &Path, store: &InMemoryStore) -> CommandResult<()> {
    let data = serde_json::to_vec_pretty(&store.snapshot())?;

    // Write beside the target, then rename, so a failed write keeps the old file.
    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(&data)?;
    file.sync_all()?;
    drop(file);
    fs::rename(&temp_path, path)?;

    debug!("Saved snapshot to {:?} ({} bytes)", path, data.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynamorm_codec::{AttributeValue, Item};
    use dynamorm_storage::{Context, ItemStore, PutRequest};
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_an_empty_store() {
        let dir = tempdir().unwrap();
        let store = load(&dir.path().join("store.json")).unwrap();
        assert!(store.table_names().is_empty());
    }

    #[test]
    fn snapshot_survives_a_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = InMemoryStore::new().with_table("users", &["PK"]);
        let mut item = Item::new();
        item.insert("PK".into(), AttributeValue::from("001"));
        item.insert("Age".into(), AttributeValue::from(42i64));
        store
            .put_item(&Context::background(), &PutRequest::new("users", item.clone()))
            .unwrap();
        save(&path, &store).unwrap();

        let reopened = load(&path).unwrap();
        assert_eq!(reopened.key_schema("users"), Some(vec!["PK".to_string()]));
        assert_eq!(reopened.items("users"), vec![item]);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn garbage_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, b"not json").unwrap();
        assert!(load(&path).is_err());
    }
}
