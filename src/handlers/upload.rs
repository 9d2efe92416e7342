use crate::Washer;
use crate::error::WasherError;
use crate::models::{FileSource, SelectedFile, UploadProgress, UploadResponse};
use crate::services::overlay::ProcessKind;
use crate::utils::format::format_file_size;
use crate::utils::validation::{resolve_file_ext, validate_file_id, validate_file_size};
use crate::view::{FileInfoView, WashButtonView};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info};

impl Washer {
    pub fn drag_enter(&mut self) {
        if self.controls.drop_target.enabled && !self.controls.drop_target.highlighted {
            self.controls.drop_target.highlighted = true;
            self.render();
        }
    }

    pub fn drag_leave(&mut self) {
        if self.controls.drop_target.highlighted {
            self.controls.drop_target.highlighted = false;
            self.render();
        }
    }

    /// Files dropped on the target; only the first one is used
    pub async fn drop_files(&mut self, files: Vec<SelectedFile>) -> Result<(), WasherError> {
        self.drag_leave();
        match files.into_iter().next() {
            Some(file) => self.handle_file(file, FileSource::Drop).await,
            None => Ok(()),
        }
    }

    /// Files picked from the browse dialog; only the first one is used
    pub async fn browse_files(&mut self, files: Vec<SelectedFile>) -> Result<(), WasherError> {
        match files.into_iter().next() {
            Some(file) => self.handle_file(file, FileSource::Browse).await,
            None => Ok(()),
        }
    }

    /// Validates, uploads and captures the before snapshot for one file
    pub async fn handle_file(
        &mut self,
        file: SelectedFile,
        source: FileSource,
    ) -> Result<(), WasherError> {
        if let Err(e) = validate_file_size(file.size, self.config.max_file_size) {
            self.alert(&e);
            return Err(e);
        }

        info!(
            "📤 Uploading {} ({}) via {:?}",
            file.name,
            format_file_size(file.size),
            source
        );

        self.session.reset();
        self.controls.begin_upload();
        self.overlay.start(ProcessKind::Upload);
        self.render();

        let response = match self.transmit(&file).await {
            Ok(response) => response,
            Err(e) => return Err(self.fail_upload(e)),
        };

        let file_id = match validate_file_id(response.file_id.as_deref()) {
            Ok(id) => id,
            Err(e) => return Err(self.fail_upload(e)),
        };
        let Some(file_ext) = resolve_file_ext(response.file_ext.as_deref(), &file.name) else {
            error!("No extension for {} from server or file name", file.name);
            return Err(self.fail_upload(WasherError::MissingFileInfo));
        };
        info!("✅ Uploaded {} as {}", file.name, file_id);

        let display_name = if response.filename.is_empty() {
            file.name.clone()
        } else {
            response.filename
        };

        self.session.file_id = Some(file_id);
        self.session.file_ext = Some(file_ext);
        self.session.pending_before = Some(response.metadata_before.unwrap_or_default());

        self.controls.end_upload();
        self.controls.file_info = Some(FileInfoView {
            name: display_name,
            size_label: format_file_size(response.file_size),
        });
        self.controls.comparison_visible = true;
        self.update_metadata_visibility();

        self.play_timeline(ProcessKind::Upload).await;
        self.complete_overlay().await;

        self.controls.wash_button = WashButtonView {
            visible: true,
            enabled: true,
            ..WashButtonView::default()
        };
        self.render();
        Ok(())
    }

    /// Runs the upload request and renders progress while it is in flight
    async fn transmit(&mut self, file: &SelectedFile) -> Result<UploadResponse, WasherError> {
        let (tx, mut rx) = watch::channel(UploadProgress {
            sent: 0,
            total: file.size,
        });
        let transport = Arc::clone(&self.transport);
        let upload = transport.upload(file, tx);
        tokio::pin!(upload);

        loop {
            tokio::select! {
                result = &mut upload => {
                    let last = *rx.borrow_and_update();
                    self.show_progress(last);
                    return result;
                }
                Ok(()) = rx.changed() => {
                    let progress = *rx.borrow_and_update();
                    self.show_progress(progress);
                }
            }
        }
    }

    fn show_progress(&mut self, progress: UploadProgress) {
        if !self.controls.drop_target.loading {
            return;
        }
        let percent = progress.percent();
        if self.controls.drop_target.progress != Some(percent) {
            debug!("Upload progress {}%", percent);
            self.controls.drop_target.progress = Some(percent);
            self.render();
        }
    }

    /// Clears loading state and anything the failed attempt left behind
    fn fail_upload(&mut self, e: WasherError) -> WasherError {
        error!("❌ Upload failed: {}", e);
        self.session.reset();
        self.controls.end_upload();
        self.overlay.hide();
        self.render();
        self.alert(&e);
        e
    }
}
