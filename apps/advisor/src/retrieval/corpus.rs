use std::path::Path;

use tracing::info;

use crate::errors::AdvisorError;

/// Reads the grounding corpus: one chunk per non-blank line.
///
/// A missing, unreadable or blank file is a configuration error; the process
/// must not start with an empty index.
pub fn load_chunks(path: &Path) -> Result<Vec<String>, AdvisorError> {
    if !path.exists() {
        return Err(AdvisorError::Configuration(format!(
            "retrieval corpus {} not found",
            path.display()
        )));
    }

    let raw = std::fs::read_to_string(path).map_err(|e| {
        AdvisorError::Configuration(format!(
            "cannot read retrieval corpus {}: {e}",
            path.display()
        ))
    })?;

    let chunks: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();

    if chunks.is_empty() {
        return Err(AdvisorError::Configuration(format!(
            "retrieval corpus {} is empty",
            path.display()
        )));
    }

    info!(path = %path.display(), chunks = chunks.len(), "Loaded retrieval corpus");
    Ok(chunks)
}
