use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// A metadata snapshot: field name to string, number or nested value
pub type Metadata = Map<String, Value>;

/// Body of a successful `POST /upload`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub file_id: Option<String>,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub file_size: u64,
    #[serde(default)]
    pub file_ext: Option<String>,
    #[serde(default)]
    pub metadata_before: Option<Metadata>,
}

/// Body of `POST /wash`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WashRequest {
    pub file_id: String,
    pub file_ext: String,
}

/// Body of a successful `POST /wash`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WashResponse {
    pub washed_filename: String,
    #[serde(default)]
    pub metadata_after: Option<Metadata>,
    #[serde(default)]
    pub file_size: u64,
}

/// Error body returned with non-2xx statuses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// Upload progress in whole percent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    pub sent: u64,
    pub total: u64,
}

impl UploadProgress {
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        // Round half up in integers so 0.5% is always 1%
        let sent = self.sent.min(self.total) as u128;
        let total = self.total as u128;
        ((sent * 100 + total / 2) / total) as u8
    }
}

/// How the user picked the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSource {
    Browse,
    Drop,
}

/// A local file chosen for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}

impl SelectedFile {
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>, size: u64) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            size,
        }
    }

    /// Reads the size from disk and takes the name from the last path component
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let meta = tokio::fs::metadata(path).await?;
        if !meta.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            ));
        }
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        Ok(Self::new(path, name, meta.len()))
    }
}

/// The one file the page is working on
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub file_id: Option<String>,
    pub file_ext: Option<String>,
    pub washed_filename: Option<String>,
    pub pending_before: Option<Metadata>,
    pub pending_after: Option<Metadata>,
}

impl SessionState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// The wash request body, if both identifiers are known
    pub fn wash_request(&self) -> Option<WashRequest> {
        match (&self.file_id, &self.file_ext) {
            (Some(file_id), Some(file_ext)) if !file_id.is_empty() && !file_ext.is_empty() => {
                Some(WashRequest {
                    file_id: file_id.clone(),
                    file_ext: file_ext.clone(),
                })
            }
            _ => None,
        }
    }

    /// Washed file name; only meaningful while a file id is held
    pub fn washed_filename(&self) -> Option<&str> {
        self.file_id.as_ref()?;
        self.washed_filename.as_deref()
    }
}
