pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;
use std::path::Path;

/// Typed JSON from `--input <file>` if given, else from piped stdin.
/// `Ok(None)` means neither was supplied and the caller should fall back to flags.
pub fn load_json<T: DeserializeOwned>(
    path: Option<&Path>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(Some(file::read_json(path)?));
    }
    stdin::read_stdin()
}
