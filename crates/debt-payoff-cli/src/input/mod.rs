pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Read a typed request from `--input`, else from piped stdin.
pub fn read_request<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(Some(file::read_json(path)?));
    }
    match stdin::read_piped()? {
        Some(raw) => Ok(Some(
            serde_json::from_str(&raw).map_err(|e| format!("Invalid request on stdin: {e}"))?,
        )),
        None => Ok(None),
    }
}
