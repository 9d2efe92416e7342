use crate::Washer;
use crate::services::gate::GateOutcome;
use tracing::debug;

impl Washer {
    pub fn metadata_unlocked(&self) -> bool {
        self.gate.is_unlocked()
    }

    /// Current text of the access code input
    pub fn gate_input(&self) -> &str {
        self.gate.input()
    }

    /// Checks an access code; on success the pending snapshots show immediately
    pub fn submit_access_code(&mut self, code: &str) -> GateOutcome {
        let outcome = self.gate.submit(code);
        match outcome {
            GateOutcome::Unlocked => self.update_metadata_visibility(),
            _ => self.render(),
        }
        outcome
    }

    /// Re-derives both metadata panels from the gate and the pending snapshots
    pub fn update_metadata_visibility(&mut self) {
        debug!(
            "Metadata visibility: unlocked={}, before={}, after={}",
            self.gate.is_unlocked(),
            self.session.pending_before.is_some(),
            self.session.pending_after.is_some()
        );
        self.render();
    }
}
