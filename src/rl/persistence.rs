//! Saving and loading trained value tables
//!
//! A table is written as one JSON document: metadata plus a list of
//! `{ "state": [11 bools], "values": [3 floats] }` entries. Loading re-keys
//! each entry on its state array.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::agent::QAgent;
use super::state::EncodedState;
use super::table::{ActionValues, ValueTable};

/// Metadata saved with the table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableMetadata {
    /// Grid width the table was trained on
    pub grid_width: usize,

    /// Grid height the table was trained on
    pub grid_height: usize,

    /// Number of episodes trained
    pub episodes_trained: usize,

    /// Exploration rate when training stopped
    pub epsilon: f64,

    /// Version identifier for compatibility checking
    pub version: String,
}

impl TableMetadata {
    pub fn new(grid_width: usize, grid_height: usize, episodes_trained: usize, epsilon: f64) -> Self {
        Self {
            grid_width,
            grid_height,
            episodes_trained,
            epsilon,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct TableEntry {
    state: EncodedState,
    values: ActionValues,
}

#[derive(Debug, Serialize, Deserialize)]
struct TableFile {
    metadata: TableMetadata,
    entries: Vec<TableEntry>,
}

/// Save an agent's table to `path`, creating parent directories as needed
pub fn save_table(agent: &QAgent, grid_width: usize, grid_height: usize, path: &Path) -> Result<()> {
    let metadata = TableMetadata::new(
        grid_width,
        grid_height,
        agent.episodes_trained(),
        agent.epsilon(),
    );
    write_table(agent.table(), metadata, path)
}

/// Write a table and its metadata to `path`
pub fn write_table(table: &ValueTable, metadata: TableMetadata, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
    }

    let mut entries: Vec<TableEntry> = table
        .iter()
        .map(|(state, values)| TableEntry {
            state: *state,
            values: *values,
        })
        .collect();
    // Stable file contents for identical tables
    entries.sort_by_key(|entry| entry.state.to_array());

    let file = TableFile { metadata, entries };
    let json = serde_json::to_string_pretty(&file).context("Failed to serialize value table")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write value table to {:?}", path))?;

    Ok(())
}

/// Load a table previously written by [`save_table`]
pub fn load_table(path: &Path) -> Result<(ValueTable, TableMetadata)> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read value table from {:?}", path))?;
    let file: TableFile = serde_json::from_str(&json)
        .with_context(|| format!("Failed to deserialize value table from {:?}", path))?;

    let mut table = ValueTable::new();
    for entry in file.entries {
        table.insert(entry.state, entry.values);
    }

    Ok((table, file.metadata))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rl::{QConfig, Transition};
    use tempfile::TempDir;

    fn trained_agent() -> QAgent {
        let mut agent = QAgent::new(QConfig {
            seed: Some(3),
            ..QConfig::default()
        });
        let a = EncodedState::from_array([true; 11]);
        let b = EncodedState::from_array([false; 11]);
        agent.learn(&Transition {
            state: a,
            action: 2,
            reward: 10.0,
            next_state: b,
            terminal: false,
        });
        agent.learn(&Transition {
            state: b,
            action: 0,
            reward: -10.0,
            next_state: a,
            terminal: true,
        });
        agent.finish_episode();
        agent
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("snake_ai.json");
        let agent = trained_agent();

        save_table(&agent, 40, 30, &path).unwrap();
        let (table, metadata) = load_table(&path).unwrap();

        assert_eq!(&table, agent.table());
        assert_eq!(metadata.grid_width, 40);
        assert_eq!(metadata.grid_height, 30);
        assert_eq!(metadata.episodes_trained, 1);
        assert_eq!(metadata.epsilon, agent.epsilon());
    }

    #[test]
    fn test_entry_layout() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("table.json");

        let mut table = ValueTable::new();
        table.insert(EncodedState::from_array([false; 11]), [1.5, -2.0, 0.25]);
        write_table(&table, TableMetadata::new(10, 10, 0, 1.0), &path).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let entry = &raw["entries"][0];
        assert_eq!(entry["state"].as_array().unwrap().len(), 11);
        assert_eq!(entry["values"], serde_json::json!([1.5, -2.0, 0.25]));
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_table(&temp_dir.path().join("absent.json")).unwrap_err();
        assert!(format!("{:#}", err).contains("absent.json"));
    }

    #[test]
    fn test_load_rejects_short_state() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        std::fs::write(
            &path,
            r#"{"metadata":{"grid_width":1,"grid_height":1,"episodes_trained":0,"epsilon":1.0,"version":"0"},
               "entries":[{"state":[true,false],"values":[0.0,0.0,0.0]}]}"#,
        )
        .unwrap();

        assert!(load_table(&path).is_err());
    }
}
