use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a JSON request body from disk into a typed struct.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let request_path = resolve_path(path)?;
    tracing::debug!(path = %request_path.display(), "reading request body");

    let contents = fs::read_to_string(&request_path)
        .map_err(|e| format!("Failed to read '{}': {}", request_path.display(), e))?;
    let body: T = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", request_path.display(), e))?;
    Ok(body)
}

/// Resolve a relative path against the working directory and check it names a file.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let resolved = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !resolved.is_file() {
        return Err(format!("Request file not found: {}", resolved.display()).into());
    }

    Ok(resolved)
}
