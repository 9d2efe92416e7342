use crate::error::WasherError;
use std::path::Path;

/// Identifiers a broken server serializer produces instead of a real id
const INVALID_FILE_IDS: &[&str] = &["undefined", "null"];

/// Validates file size against maximum limit
pub fn validate_file_size(size: u64, max_size: u64) -> Result<(), WasherError> {
    if size > max_size {
        tracing::warn!(
            "Rejected file of {} bytes (limit {} bytes)",
            size,
            max_size
        );
        return Err(WasherError::FileTooLarge {
            size,
            limit: max_size,
        });
    }
    Ok(())
}

/// Returns the server-issued file id if it is usable
pub fn validate_file_id(file_id: Option<&str>) -> Result<String, WasherError> {
    match file_id.map(str::trim) {
        Some(id) if !id.is_empty() && !INVALID_FILE_IDS.contains(&id) => Ok(id.to_string()),
        other => {
            tracing::error!("Server returned an unusable file id: {:?}", other);
            Err(WasherError::InvalidFileId)
        }
    }
}

/// Lowercased text after the last `.` of a file name, or the whole name when
/// there is no dot. `None` only when that text is empty (`"clip."`, `""`).
pub fn file_extension(filename: &str) -> Option<String> {
    let base = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);
    base.rsplit('.')
        .next()
        .filter(|e| !e.is_empty())
        .map(str::to_lowercase)
}

/// Prefers the server-reported extension and falls back to the local file name
pub fn resolve_file_ext(server_ext: Option<&str>, filename: &str) -> Option<String> {
    server_ext
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(|e| e.trim_start_matches('.').to_lowercase())
        .or_else(|| file_extension(filename))
}
