use super::{MetadataPanel, NO_METADATA, Renderer, ViewState};
use crate::services::overlay::StepState;

/// Prints view changes to stdout, one line per change
#[derive(Default)]
pub struct TerminalRenderer {
    last: ViewState,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn print_panel(title: &str, panel: &MetadataPanel) {
        match panel {
            MetadataPanel::Hidden => {}
            MetadataPanel::Empty => println!("── {} ──\n  {}", title, NO_METADATA),
            MetadataPanel::Entries(entries) => {
                println!("── {} ──", title);
                for entry in entries {
                    println!("  {}: {}", entry.key, entry.value);
                }
            }
        }
    }
}

impl Renderer for TerminalRenderer {
    fn render(&mut self, view: &ViewState) {
        let last = &self.last;

        if view.drop_target.progress != last.drop_target.progress {
            if let Some(label) = view.drop_target.progress_label() {
                println!("⏫ Uploading... {}", label);
            }
        }

        if view.overlay != last.overlay {
            if let Some(overlay) = &view.overlay {
                for step in &overlay.steps {
                    let was = last
                        .overlay
                        .as_ref()
                        .filter(|o| o.kind == overlay.kind)
                        .and_then(|o| o.steps.iter().find(|s| s.id == step.id))
                        .map(|s| s.state);
                    if was == Some(step.state) {
                        continue;
                    }
                    let marker = match step.state {
                        StepState::Pending => "·",
                        StepState::Active => "▶",
                        StepState::Complete => "✔",
                    };
                    println!("  {} {}: {}", marker, step.title, step.description);
                }
            }
        }

        if view.file_info != last.file_info {
            if let Some(info) = &view.file_info {
                println!("📄 {} ({})", info.name, info.size_label);
            }
        }

        if view.metadata.prompt != last.metadata.prompt {
            if let Some(prompt) = &view.metadata.prompt {
                match &prompt.error {
                    Some(error) => println!("🔒 {}", error),
                    None => println!("🔒 Metadata is locked. Enter the access code to view it."),
                }
            }
        }

        if view.metadata.visible && view.metadata.before != last.metadata.before {
            Self::print_panel("Metadata before", &view.metadata.before);
        }
        if view.metadata.visible && view.metadata.after != last.metadata.after {
            Self::print_panel("Metadata after", &view.metadata.after);
        }

        if view.success_banner && !last.success_banner {
            println!("✨ Video washed successfully!");
        }

        if view.download != last.download {
            if let Some(download) = &view.download {
                println!("⬇️  Download: {}", download.href);
            }
        }

        self.last = view.clone();
    }

    fn alert(&mut self, message: &str) {
        eprintln!("⚠️  {}", message);
    }
}
