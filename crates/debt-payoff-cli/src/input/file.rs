use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

/// Load a JSON request file, relative paths resolved against the working
/// directory.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let path = resolve_path(path)?;
    let file = File::open(&path)
        .map_err(|e| format!("Failed to open '{}': {}", path.display(), e))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| format!("Invalid request in '{}': {}", path.display(), e).into())
}

fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut resolved = std::env::current_dir()?;
    resolved.push(path);

    if !resolved.is_file() {
        return Err(format!("No such request file: {}", resolved.display()).into());
    }
    Ok(resolved)
}
