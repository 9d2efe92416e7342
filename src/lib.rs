pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod utils;
pub mod view;

use crate::config::WasherConfig;
use crate::error::WasherError;
use crate::models::SessionState;
use crate::services::gate::MetadataGate;
use crate::services::overlay::{ProcessKind, ProcessOverlay};
use crate::services::transport::WasherTransport;
use crate::view::{Controls, Renderer, ViewState};
use std::sync::Arc;

/// Page controller: owns the session, the gate, the overlay and the widget
/// state, and drives them from user actions.
///
/// Every action takes `&mut self`, so two actions can never interleave.
pub struct Washer {
    config: WasherConfig,
    transport: Arc<dyn WasherTransport>,
    renderer: Box<dyn Renderer>,
    session: SessionState,
    gate: MetadataGate,
    overlay: ProcessOverlay,
    controls: Controls,
}

impl Washer {
    pub fn new(
        config: WasherConfig,
        transport: Arc<dyn WasherTransport>,
        renderer: Box<dyn Renderer>,
    ) -> Self {
        let gate = MetadataGate::new(&config.gate);
        let mut washer = Self {
            config,
            transport,
            renderer,
            session: SessionState::default(),
            gate,
            overlay: ProcessOverlay::new(),
            controls: Controls::default(),
        };
        washer.render();
        washer
    }

    pub fn config(&self) -> &WasherConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn view(&self) -> ViewState {
        ViewState::compose(&self.controls, &self.session, &self.gate, &self.overlay)
    }

    fn render(&mut self) {
        let view = self.view();
        self.renderer.render(&view);
    }

    fn alert(&mut self, error: &WasherError) {
        self.renderer.alert(&error.alert_message());
    }

    /// Plays the scripted success transitions for `kind`, one render per step
    async fn play_timeline(&mut self, kind: ProcessKind) {
        for entry in kind.success_timeline() {
            tokio::time::sleep(self.config.overlay_step_delay).await;
            self.overlay.set_step_state(entry.step, entry.state);
            self.render();
        }
    }

    /// Dismisses the overlay after the success pause
    async fn complete_overlay(&mut self) {
        tokio::time::sleep(self.config.overlay_close_delay).await;
        self.hide_overlay();
    }

    fn hide_overlay(&mut self) {
        self.overlay.hide();
        self.render();
    }
}
