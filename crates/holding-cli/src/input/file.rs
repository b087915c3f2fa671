use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;

/// Deserialise a JSON scenario file into `T`.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let contents = read_text(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", path, e).into())
}

/// Whole contents of a scenario or configuration file.
/// Relative paths resolve against the working directory.
pub fn read_text(path: &str) -> Result<String, Box<dyn std::error::Error>> {
    let meta = fs::metadata(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => format!("File not found: {}", path),
        _ => format!("Failed to read '{}': {}", path, e),
    })?;
    if !meta.is_file() {
        return Err(format!("Not a file: {}", path).into());
    }
    fs::read_to_string(path).map_err(|e| format!("Failed to read '{}': {}", path, e).into())
}
