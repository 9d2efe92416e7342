//! Step tracker shown while an upload or a wash runs.
//!
//! The wash timeline is scripted: the server reports nothing but the final
//! result, so the intermediate steps are a fixed-pace UX affordance and do not
//! reflect what the backend is actually doing.

use std::fmt;

/// Which operation the overlay is tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessKind {
    Upload,
    Wash,
}

impl ProcessKind {
    pub fn steps(&self) -> &'static [StepDefinition] {
        match self {
            ProcessKind::Upload => UPLOAD_STEPS,
            ProcessKind::Wash => WASH_STEPS,
        }
    }

    /// Transitions played after the request succeeds
    pub fn success_timeline(&self) -> &'static [TimelineEntry] {
        match self {
            ProcessKind::Upload => UPLOAD_TIMELINE,
            ProcessKind::Wash => WASH_TIMELINE,
        }
    }
}

impl fmt::Display for ProcessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessKind::Upload => write!(f, "upload"),
            ProcessKind::Wash => write!(f, "wash"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StepState {
    Pending,
    Active,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDefinition {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineEntry {
    pub step: &'static str,
    pub state: StepState,
}

const fn entry(step: &'static str, state: StepState) -> TimelineEntry {
    TimelineEntry { step, state }
}

pub const UPLOAD_STEPS: &[StepDefinition] = &[
    StepDefinition {
        id: "upload",
        title: "Uploading",
        description: "Sending your video to the server",
    },
    StepDefinition {
        id: "metadata",
        title: "Reading metadata",
        description: "Capturing the original metadata snapshot",
    },
];

pub const WASH_STEPS: &[StepDefinition] = &[
    StepDefinition {
        id: "prep",
        title: "Removing originals",
        description: "Stripping existing metadata",
    },
    StepDefinition {
        id: "rewrite",
        title: "Writing new identity",
        description: "Applying fresh device metadata",
    },
    StepDefinition {
        id: "finalize",
        title: "Optimizing",
        description: "Finalizing the washed file",
    },
];

pub const UPLOAD_TIMELINE: &[TimelineEntry] = &[
    entry("upload", StepState::Complete),
    entry("metadata", StepState::Complete),
];

pub const WASH_TIMELINE: &[TimelineEntry] = &[
    entry("prep", StepState::Complete),
    entry("rewrite", StepState::Active),
    entry("rewrite", StepState::Complete),
    entry("finalize", StepState::Active),
    entry("finalize", StepState::Complete),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayStep {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub state: StepState,
}

#[derive(Debug, Default)]
pub struct ProcessOverlay {
    kind: Option<ProcessKind>,
    steps: Vec<OverlayStep>,
}

impl ProcessOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any previous step list; the first step starts active
    pub fn start(&mut self, kind: ProcessKind) {
        self.kind = Some(kind);
        self.steps = kind
            .steps()
            .iter()
            .enumerate()
            .map(|(i, def)| OverlayStep {
                id: def.id,
                title: def.title,
                description: def.description,
                state: if i == 0 {
                    StepState::Active
                } else {
                    StepState::Pending
                },
            })
            .collect();
        tracing::debug!("Overlay started for {}", kind);
    }

    /// Relabels one step. Callers are trusted to advance steps in order.
    pub fn set_step_state(&mut self, step_id: &str, state: StepState) -> bool {
        match self.steps.iter_mut().find(|s| s.id == step_id) {
            Some(step) => {
                step.state = state;
                tracing::debug!("Overlay step {} -> {:?}", step_id, state);
                true
            }
            None => {
                tracing::debug!("Overlay has no step {}", step_id);
                false
            }
        }
    }

    pub fn hide(&mut self) {
        self.kind = None;
        self.steps.clear();
    }

    pub fn is_visible(&self) -> bool {
        self.kind.is_some()
    }

    pub fn kind(&self) -> Option<ProcessKind> {
        self.kind
    }

    pub fn steps(&self) -> &[OverlayStep] {
        &self.steps
    }

    pub fn step_state(&self, step_id: &str) -> Option<StepState> {
        self.steps.iter().find(|s| s.id == step_id).map(|s| s.state)
    }
}
