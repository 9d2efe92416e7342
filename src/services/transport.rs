use crate::error::WasherError;
use crate::models::{ErrorBody, SelectedFile, UploadProgress, UploadResponse, WashRequest, WashResponse};
use async_trait::async_trait;
use futures::StreamExt;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, StatusCode};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::watch;
use tokio_util::io::ReaderStream;
use url::Url;

pub const UPLOAD_NETWORK_ERROR: &str = "Network error during upload";
pub const UPLOAD_CANCELLED: &str = "Upload cancelled";
pub const UPLOAD_FAILED: &str = "Upload failed";
pub const WASH_NETWORK_ERROR: &str = "Network error during wash";
pub const WASH_FAILED: &str = "Washing failed";
pub const DOWNLOAD_NETWORK_ERROR: &str = "Network error during download";
pub const DOWNLOAD_FAILED: &str = "Download failed";

/// Characters left alone when a file name becomes a path segment
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Site-relative download location of a washed file
pub fn download_path(washed_filename: &str) -> String {
    format!("/download/{}", utf8_percent_encode(washed_filename, SEGMENT))
}

/// Network seam between the controllers and the washer service
#[async_trait]
pub trait WasherTransport: Send + Sync {
    /// `POST /upload` with the file as multipart field `file`.
    /// Bytes handed to the connection are reported on `progress`.
    async fn upload(
        &self,
        file: &SelectedFile,
        progress: watch::Sender<UploadProgress>,
    ) -> Result<UploadResponse, WasherError>;

    /// `POST /wash` with a JSON body
    async fn wash(&self, request: &WashRequest) -> Result<WashResponse, WasherError>;

    /// `GET /download/{washed_filename}` saved into `dest_dir`
    async fn download(&self, washed_filename: &str, dest_dir: &Path)
    -> Result<PathBuf, WasherError>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> anyhow::Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("{} cannot be used as a base URL", base_url);
        }
        // Joining relative paths replaces the last segment unless it ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, relative: &str) -> Result<Url, WasherError> {
        self.base_url
            .join(relative)
            .map_err(|e| WasherError::Network(format!("Invalid endpoint {}: {}", relative, e)))
    }
}

/// Maps a non-2xx body to the server's message, or a fallback
fn server_error(status: StatusCode, body: &[u8], fallback: &str, non_json: Option<String>) -> WasherError {
    let message = match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody { error: Some(msg) }) if !msg.is_empty() => msg,
        Ok(_) => fallback.to_string(),
        Err(_) => non_json.unwrap_or_else(|| fallback.to_string()),
    };
    tracing::error!("Server responded {}: {}", status, message);
    WasherError::Server(message)
}

fn status_line(status: StatusCode) -> String {
    format!(
        "HTTP {}: {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("")
    )
}

#[async_trait]
impl WasherTransport for HttpTransport {
    async fn upload(
        &self,
        file: &SelectedFile,
        progress: watch::Sender<UploadProgress>,
    ) -> Result<UploadResponse, WasherError> {
        let url = self.endpoint("upload")?;
        let handle = tokio::fs::File::open(&file.path).await?;
        let total = file.size;
        let mut sent = 0u64;

        let stream = ReaderStream::new(handle).map(move |chunk| {
            if let Ok(bytes) = &chunk {
                sent += bytes.len() as u64;
                progress.send_replace(UploadProgress { sent, total });
            }
            chunk
        });

        let part = Part::stream_with_length(Body::wrap_stream(stream), total)
            .file_name(file.name.clone());
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Upload request failed: {}", e);
                if e.is_body() {
                    WasherError::Cancelled(UPLOAD_CANCELLED.to_string())
                } else {
                    WasherError::Network(UPLOAD_NETWORK_ERROR.to_string())
                }
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            tracing::error!("Failed to read upload response: {}", e);
            WasherError::Network(UPLOAD_NETWORK_ERROR.to_string())
        })?;

        if !status.is_success() {
            return Err(server_error(status, &body, UPLOAD_FAILED, None));
        }

        serde_json::from_slice(&body).map_err(|e| {
            tracing::error!("Unparseable upload response: {}", e);
            WasherError::MalformedResponse
        })
    }

    async fn wash(&self, request: &WashRequest) -> Result<WashResponse, WasherError> {
        let url = self.endpoint("wash")?;
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Wash request failed: {}", e);
                WasherError::Network(WASH_NETWORK_ERROR.to_string())
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            tracing::error!("Failed to read wash response: {}", e);
            WasherError::Network(WASH_NETWORK_ERROR.to_string())
        })?;

        if !status.is_success() {
            return Err(server_error(
                status,
                &body,
                WASH_FAILED,
                Some(status_line(status)),
            ));
        }

        serde_json::from_slice(&body).map_err(|e| {
            tracing::error!("Unparseable wash response: {}", e);
            WasherError::MalformedResponse
        })
    }

    async fn download(
        &self,
        washed_filename: &str,
        dest_dir: &Path,
    ) -> Result<PathBuf, WasherError> {
        let url = self.endpoint(download_path(washed_filename).trim_start_matches('/'))?;

        // Never let a server-chosen name escape the destination directory
        let local_name = Path::new(washed_filename)
            .file_name()
            .ok_or_else(|| WasherError::Server(format!("Invalid file name: {}", washed_filename)))?;
        let dest = dest_dir.join(local_name);

        let response = self.client.get(url).send().await.map_err(|e| {
            tracing::error!("Download request failed: {}", e);
            WasherError::Network(DOWNLOAD_NETWORK_ERROR.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(server_error(status, &body, DOWNLOAD_FAILED, None));
        }

        // Partial bodies land in a temp file that is removed on drop;
        // `dest` is only replaced once the whole body is on disk
        let partial = tempfile::NamedTempFile::new_in(dest_dir)?;
        let mut out = tokio::fs::File::from_std(partial.reopen()?);
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| {
                tracing::error!("Download interrupted: {}", e);
                WasherError::Network(DOWNLOAD_NETWORK_ERROR.to_string())
            })?;
            out.write_all(&chunk).await?;
        }
        out.flush().await?;
        out.sync_all().await?;
        drop(out);
        partial.persist(&dest).map_err(|e| WasherError::Io(e.error))?;

        tracing::info!("💾 Saved {}", dest.display());
        Ok(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_path() {
        assert_eq!(download_path("clip_washed.mov"), "/download/clip_washed.mov");
        assert_eq!(download_path("my clip.mov"), "/download/my%20clip.mov");
        assert_eq!(download_path("../etc/passwd"), "/download/..%2Fetc%2Fpasswd");
    }

    #[test]
    fn test_base_url_keeps_prefix() {
        let transport = HttpTransport::new("http://localhost:8080/washer").unwrap();
        assert_eq!(
            transport.endpoint("upload").unwrap().as_str(),
            "http://localhost:8080/washer/upload"
        );

        let transport = HttpTransport::new("http://localhost:8080").unwrap();
        assert_eq!(
            transport.endpoint("wash").unwrap().as_str(),
            "http://localhost:8080/wash"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(HttpTransport::new("not a url").is_err());
        assert!(HttpTransport::new("mailto:someone@example.com").is_err());
    }

    #[test]
    fn test_server_error_messages() {
        let err = server_error(
            StatusCode::BAD_REQUEST,
            br#"{"error": "File type not allowed"}"#,
            UPLOAD_FAILED,
            None,
        );
        assert_eq!(err.to_string(), "File type not allowed");

        let err = server_error(StatusCode::BAD_GATEWAY, b"<html>", UPLOAD_FAILED, None);
        assert_eq!(err.to_string(), UPLOAD_FAILED);

        let err = server_error(StatusCode::INTERNAL_SERVER_ERROR, b"{}", WASH_FAILED, None);
        assert_eq!(err.to_string(), WASH_FAILED);

        let status = StatusCode::BAD_GATEWAY;
        let err = server_error(status, b"<html>", WASH_FAILED, Some(status_line(status)));
        assert_eq!(err.to_string(), "HTTP 502: Bad Gateway");
    }
}
