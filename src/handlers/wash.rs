use crate::Washer;
use crate::error::WasherError;
use crate::models::WashResponse;
use crate::services::overlay::ProcessKind;
use crate::services::transport::download_path;
use crate::utils::format::format_file_size;
use crate::view::{WASH_LABEL, WASHING_LABEL};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, warn};

impl Washer {
    /// Sends the current file through the wash. One successful wash per upload.
    pub async fn wash(&mut self) -> Result<(), WasherError> {
        let Some(request) = self.session.wash_request() else {
            let e = WasherError::MissingFileInfo;
            error!("❌ Wash requested without file id/extension");
            self.alert(&e);
            return Err(e);
        };

        // A disabled trigger cannot be clicked, so there is nothing to alert
        if !self.controls.wash_button.enabled {
            warn!("Wash trigger is disabled for {}", request.file_id);
            return Err(WasherError::WashUnavailable);
        }

        info!("🧼 Washing {}.{}", request.file_id, request.file_ext);
        self.controls.wash_button.enabled = false;
        self.controls.wash_button.label = WASHING_LABEL.to_string();
        self.controls.wash_busy = true;
        self.overlay.start(ProcessKind::Wash);
        self.render();

        let started = Instant::now();
        let result = self.transport.wash(&request).await;
        info!(
            "Wash request finished in {:.1}s",
            started.elapsed().as_secs_f64()
        );

        match result {
            Ok(response) => {
                self.finish_wash(response).await;
                Ok(())
            }
            Err(e) => {
                error!("❌ Wash failed: {}", e);
                self.overlay.hide();
                self.controls.wash_busy = false;
                self.controls.wash_button.label = WASH_LABEL.to_string();
                self.controls.wash_button.enabled = true;
                self.render();
                self.alert(&e);
                Err(e)
            }
        }
    }

    async fn finish_wash(&mut self, response: WashResponse) {
        self.play_timeline(ProcessKind::Wash).await;
        self.complete_overlay().await;

        info!("✅ Washed file ready: {}", response.washed_filename);
        self.controls.wash_busy = false;
        self.session.washed_filename = Some(response.washed_filename);
        self.session.pending_after = Some(response.metadata_after.unwrap_or_default());

        if let Some(info) = self.controls.file_info.as_mut() {
            info.size_label = format_file_size(response.file_size);
        }
        self.controls.success_banner = true;
        self.controls.download_visible = true;
        self.controls.wash_button.label = WASH_LABEL.to_string();
        self.controls.wash_button.enabled = false;

        self.update_metadata_visibility();
    }

    /// Absolute URL of the washed file, once there is one
    pub fn download_url(&self) -> Option<String> {
        let name = self.session.washed_filename()?;
        Some(format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            download_path(name)
        ))
    }

    /// Saves the washed file into `dest_dir`
    pub async fn download_to(&mut self, dest_dir: &Path) -> Result<PathBuf, WasherError> {
        let Some(name) = self.session.washed_filename().map(str::to_string) else {
            let e = WasherError::MissingFileInfo;
            self.alert(&e);
            return Err(e);
        };

        info!("⬇️  Downloading {}", name);
        match self.transport.download(&name, dest_dir).await {
            Ok(path) => Ok(path),
            Err(e) => {
                error!("❌ Download failed: {}", e);
                self.alert(&e);
                Err(e)
            }
        }
    }
}
