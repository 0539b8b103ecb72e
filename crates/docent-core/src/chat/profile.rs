//! Per-mode behavior: default title, session policy and user-facing wording.
//!
//! The general and document-grounded stacks share one orchestrator; this is
//! everything that differs between them. The two deliberately disagree on
//! whether a query may go out without a document.

use docent_types::conversation::Sender;
use docent_types::error::ApiError;
use docent_types::mode::ChatMode;

use super::binder::SessionPolicy;

/// Behavior profile for one chat mode.
#[derive(Debug, Clone)]
pub struct ModeProfile {
    pub mode: ChatMode,
    pub default_title: String,
    pub policy: SessionPolicy,
    /// Sender used for upload confirmations and upload failures.
    pub notice_sender: Sender,
}

impl ModeProfile {
    pub fn for_mode(mode: ChatMode) -> Self {
        match mode {
            ChatMode::General => Self::general(),
            ChatMode::Document => Self::document(),
        }
    }

    pub fn general() -> Self {
        Self {
            mode: ChatMode::General,
            default_title: "New Chat".to_string(),
            policy: SessionPolicy::Optional,
            notice_sender: Sender::System,
        }
    }

    pub fn document() -> Self {
        Self {
            mode: ChatMode::Document,
            default_title: "New RAG Chat".to_string(),
            policy: SessionPolicy::Required,
            notice_sender: Sender::Assistant,
        }
    }

    pub fn upload_confirmation(&self, filename: &str) -> String {
        match self.mode {
            ChatMode::General => format!(
                "Successfully processed \"{filename}\". You can ask me questions about it now."
            ),
            ChatMode::Document => {
                format!("✅ PDF \"{filename}\" uploaded and is ready for questions.")
            }
        }
    }

    pub fn upload_failure(&self, error: &ApiError) -> String {
        match self.mode {
            ChatMode::General => {
                "❌ Error uploading file. It might be corrupted or empty. Please try another."
                    .to_string()
            }
            ChatMode::Document => format!("❌ Upload error: {}", error.failure()),
        }
    }

    pub fn query_failure(&self, error: &ApiError) -> String {
        match self.mode {
            ChatMode::General => {
                "Sorry, I encountered an error while trying to respond. Please try again."
                    .to_string()
            }
            ChatMode::Document => format!("Error: {}", error.failure()),
        }
    }

    /// Shown instead of querying when the policy requires a document.
    pub fn guard_message(&self) -> String {
        "❌ Please upload a PDF first!".to_string()
    }
}
