use std::fs;
use std::path::Path;

use anyhow::Context;

use ludex_core::models::Dataset;

/// Loads a fixture dataset from disk.
///
/// The fixture format is a JSON object mapping record keys to canonical
/// record fields, exactly what `--output` prints.
pub fn load_fixture(path: &Path) -> anyhow::Result<Dataset> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read fixture file {}", path.display()))?;
    let dataset: Dataset = serde_json::from_str(&raw)
        .with_context(|| format!("Fixture file {} is not a valid dataset", path.display()))?;
    Ok(dataset)
}
