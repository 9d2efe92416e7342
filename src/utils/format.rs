use crate::models::Metadata;
use serde_json::Value;

/// Fields shown first in a metadata panel, in display order
pub const PRIORITY_FIELDS: &[&str] = &[
    "Artist",
    "Comment",
    "CompatibleBrands",
    "CompressorName",
    "CreateDate",
    "CreationTime",
    "Encoder",
    "FileModifyDate",
    "MajorBrand",
    "Make",
    "MaxBitrate",
    "MediaCreateDate",
    "MediaDataOffset",
    "MediaDataSize",
    "MediaModifyDate",
    "MinorVersion",
    "Model",
    "ModifyDate",
    "Software",
    "Title",
    "TrackCreateDate",
    "TrackModifyDate",
];

const SIZE_UNITS: &[&str] = &["Bytes", "KB", "MB", "GB"];

/// Human readable size in base-1024 units, rounded to two decimals
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut scaled = bytes;
    while scaled >= 1024 && unit < SIZE_UNITS.len() - 1 {
        scaled /= 1024;
        unit += 1;
    }

    let value = bytes as f64 / 1024f64.powi(unit as i32);
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, SIZE_UNITS[unit])
}

/// Display text for a single metadata value
pub fn format_metadata_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            // Whole floats print without a fraction, so 30.0 reads as 30
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{}", f as i64)
            }
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

/// Ordered `(key, value)` pairs for a metadata panel.
/// Priority fields come first, everything else follows alphabetically.
/// Null and empty-string values are dropped.
pub fn metadata_entries(metadata: &Metadata) -> Vec<(String, String)> {
    let mut priority: Vec<&String> = metadata
        .keys()
        .filter(|k| PRIORITY_FIELDS.contains(&k.as_str()))
        .collect();
    priority.sort_by_key(|k| PRIORITY_FIELDS.iter().position(|f| *f == k.as_str()));

    let mut others: Vec<&String> = metadata
        .keys()
        .filter(|k| !PRIORITY_FIELDS.contains(&k.as_str()))
        .collect();
    others.sort();

    priority
        .into_iter()
        .chain(others)
        .filter_map(|key| match metadata.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(value) => Some((key.clone(), format_metadata_value(value))),
        })
        .collect()
}
