use std::{
    fs,
    io::{self, Read},
    path::Path,
};

use super::error::InfraError;

const STDIN_MARKER: &str = "-";

/// Read raw content from `path`, or from standard input when `path` is `-`.
pub fn read_content(path: &Path) -> Result<String, InfraError> {
    if path.as_os_str() == STDIN_MARKER {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|source| InfraError::read_content("<stdin>", source))?;
        return Ok(buffer);
    }

    fs::read_to_string(path)
        .map_err(|source| InfraError::read_content(path.display().to_string(), source))
}
