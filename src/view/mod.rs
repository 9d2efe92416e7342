//! Declarative view of the page.
//!
//! Controllers never touch a UI toolkit. They mutate [`Controls`] and the
//! component state, and [`ViewState::compose`] folds everything into one
//! snapshot that a [`Renderer`] draws.

pub mod terminal;

use crate::models::{Metadata, SessionState};
use crate::services::gate::MetadataGate;
use crate::services::overlay::{OverlayStep, ProcessKind, ProcessOverlay};
use crate::services::transport::download_path;
use crate::utils::format::metadata_entries;

pub const WASH_LABEL: &str = "Wash Video";
pub const WASHING_LABEL: &str = "Washing...";
pub const NO_METADATA: &str = "No metadata available";

/// Draws view snapshots and shows blocking alerts
pub trait Renderer: Send {
    fn render(&mut self, view: &ViewState);

    fn alert(&mut self, message: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTargetView {
    pub enabled: bool,
    pub highlighted: bool,
    pub loading: bool,
    /// Whole percent while an upload runs
    pub progress: Option<u8>,
}

impl Default for DropTargetView {
    fn default() -> Self {
        Self {
            enabled: true,
            highlighted: false,
            loading: false,
            progress: None,
        }
    }
}

impl DropTargetView {
    pub fn progress_label(&self) -> Option<String> {
        self.progress.map(|p| format!("{}%", p))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfoView {
    pub name: String,
    pub size_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WashButtonView {
    pub visible: bool,
    pub enabled: bool,
    pub label: String,
}

impl Default for WashButtonView {
    fn default() -> Self {
        Self {
            visible: false,
            enabled: false,
            label: WASH_LABEL.to_string(),
        }
    }
}

/// Widget state owned by the controllers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Controls {
    pub drop_target: DropTargetView,
    pub file_info: Option<FileInfoView>,
    pub comparison_visible: bool,
    pub wash_button: WashButtonView,
    pub wash_busy: bool,
    pub success_banner: bool,
    pub download_visible: bool,
}

impl Controls {
    /// Everything from a previous file disappears and the drop target shows 0%
    pub fn begin_upload(&mut self) {
        self.drop_target = DropTargetView {
            enabled: false,
            highlighted: false,
            loading: true,
            progress: Some(0),
        };
        self.file_info = None;
        self.comparison_visible = false;
        self.wash_button = WashButtonView::default();
        self.wash_busy = false;
        self.success_banner = false;
        self.download_visible = false;
    }

    pub fn end_upload(&mut self) {
        self.drop_target = DropTargetView::default();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataEntry {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MetadataPanel {
    /// Nothing rendered: locked, or no snapshot captured yet
    #[default]
    Hidden,
    /// Snapshot captured but it holds no displayable fields
    Empty,
    Entries(Vec<MetadataEntry>),
}

impl MetadataPanel {
    pub fn from_snapshot(snapshot: Option<&Metadata>) -> Self {
        let Some(snapshot) = snapshot else {
            return MetadataPanel::Hidden;
        };
        let entries = metadata_entries(snapshot);
        if entries.is_empty() {
            return MetadataPanel::Empty;
        }
        MetadataPanel::Entries(
            entries
                .into_iter()
                .map(|(key, value)| MetadataEntry { key, value })
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        match self {
            MetadataPanel::Entries(entries) => entries
                .iter()
                .find(|e| e.key == key)
                .map(|e| e.value.as_str()),
            _ => None,
        }
    }

    pub fn is_rendered(&self) -> bool {
        !matches!(self, MetadataPanel::Hidden)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatePromptView {
    pub input: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataView {
    pub visible: bool,
    pub locked: bool,
    /// Code entry shown while locked
    pub prompt: Option<GatePromptView>,
    pub before: MetadataPanel,
    pub after: MetadataPanel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayView {
    pub kind: ProcessKind,
    pub steps: Vec<OverlayStep>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadView {
    pub href: String,
}

/// Everything a renderer needs to draw the page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub drop_target: DropTargetView,
    pub file_info: Option<FileInfoView>,
    pub wash_button: WashButtonView,
    pub wash_busy: bool,
    pub success_banner: bool,
    pub download: Option<DownloadView>,
    pub overlay: Option<OverlayView>,
    pub metadata: MetadataView,
}

impl ViewState {
    pub fn compose(
        controls: &Controls,
        session: &SessionState,
        gate: &MetadataGate,
        overlay: &ProcessOverlay,
    ) -> Self {
        let unlocked = gate.is_unlocked();
        let panel = |snapshot: Option<&Metadata>| {
            if unlocked {
                MetadataPanel::from_snapshot(snapshot)
            } else {
                MetadataPanel::Hidden
            }
        };

        let download = session
            .washed_filename()
            .filter(|_| controls.download_visible)
            .map(|name| DownloadView {
                href: download_path(name),
            });

        Self {
            drop_target: controls.drop_target.clone(),
            file_info: controls.file_info.clone(),
            wash_button: controls.wash_button.clone(),
            wash_busy: controls.wash_busy,
            success_banner: controls.success_banner,
            download,
            overlay: overlay.kind().map(|kind| OverlayView {
                kind,
                steps: overlay.steps().to_vec(),
            }),
            metadata: MetadataView {
                visible: controls.comparison_visible,
                locked: !unlocked,
                prompt: (!unlocked).then(|| GatePromptView {
                    input: gate.input().to_string(),
                    error: gate.error().map(str::to_string),
                }),
                before: panel(session.pending_before.as_ref()),
                after: panel(session.pending_after.as_ref()),
            },
        }
    }
}
