use std::path::PathBuf;

/// Parse an `ID=FILE` chunk argument.
///
/// The id is everything before the first `=`, so file paths may contain `=`.
///
/// # Errors
///
/// Returns a message when either side is empty or the `=` is missing.
pub fn parse_chunk(s: &str) -> Result<(String, PathBuf), String> {
    let (id, file) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ID=FILE, got '{}'", s))?;

    let id = id.trim();
    if id.is_empty() {
        return Err(format!("chunk id cannot be empty: '{}'", s));
    }
    if file.is_empty() {
        return Err(format!("chunk file cannot be empty: '{}'", s));
    }

    Ok((id.to_string(), PathBuf::from(file)))
}
