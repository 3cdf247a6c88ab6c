//! Table management commands.

use super::{snapshot, CommandResult};
use std::path::Path;
use tracing::info;

/// Adds `table` keyed by `keys` to the snapshot at `path`.
pub fn create(path: &Path, table: &str, keys: &[String]) -> CommandResult<()> {
    let store = snapshot::load(path)?;
    let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
    store.create_table(table, &keys)?;
    snapshot::save(path, &store)?;

    info!("Created table {} with key ({})", table, keys.join(", "));
    Ok(())
}

/// Prints every table with its key schema and item count.
pub fn list(path: &Path) -> CommandResult<()> {
    let store = snapshot::load(path)?;
    let names = store.table_names();
    if names.is_empty() {
        println!("No tables");
        return Ok(());
    }

    for name in names {
        let keys = store.key_schema(&name).unwrap_or_default();
        println!(
            "{:<24} key ({:<16}) {} items",
            name,
            keys.join(", "),
            store.item_count(&name)
        );
    }
    Ok(())
}
