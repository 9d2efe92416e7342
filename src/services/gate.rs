use crate::config::GateConfig;
use crate::utils::hash::hash_access_code;

pub const EMPTY_CODE_MESSAGE: &str = "Please enter the access code";
pub const WRONG_CODE_MESSAGE: &str = "Incorrect access code";

/// Result of submitting an access code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    Unlocked,
    AlreadyUnlocked,
    EmptyCode,
    Mismatch,
}

/// Client-side visibility gate for metadata panels.
///
/// The expected hash and the comparison both live in the client, so anyone
/// holding the binary can bypass this. Real protection has to be enforced by
/// the server.
#[derive(Debug)]
pub struct MetadataGate {
    expected_hash: String,
    unlocked: bool,
    error: Option<String>,
    input: String,
}

impl MetadataGate {
    pub fn new(config: &GateConfig) -> Self {
        let unlocked = !config.is_locking();
        if unlocked {
            tracing::debug!("Metadata gate disabled");
        }
        Self {
            expected_hash: config.code_hash.trim().to_string(),
            unlocked,
            error: None,
            input: String::new(),
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Inline message shown next to the code input
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Text held in the code input
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Checks a code. Once unlocked the gate stays open for the session.
    /// There is no attempt limit.
    pub fn submit(&mut self, code: &str) -> GateOutcome {
        if self.unlocked {
            return GateOutcome::AlreadyUnlocked;
        }

        self.input = code.to_string();
        let code = code.trim();
        if code.is_empty() {
            self.error = Some(EMPTY_CODE_MESSAGE.to_string());
            return GateOutcome::EmptyCode;
        }

        if hash_access_code(code) == self.expected_hash {
            self.unlocked = true;
            self.error = None;
            self.input.clear();
            tracing::info!("🔓 Metadata unlocked");
            GateOutcome::Unlocked
        } else {
            self.error = Some(WRONG_CODE_MESSAGE.to_string());
            tracing::warn!("Rejected metadata access code");
            GateOutcome::Mismatch
        }
    }
}
