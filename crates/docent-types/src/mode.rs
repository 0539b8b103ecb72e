//! Chat modes.
//!
//! The client runs two independent conversation stacks that share one
//! design: a general-purpose assistant and a strictly document-grounded one.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which assistant a conversation stack talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    /// General assistant; a document is optional.
    #[default]
    General,
    /// Document-grounded assistant; refuses to query until a document is uploaded.
    Document,
}

impl fmt::Display for ChatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatMode::General => write!(f, "general"),
            ChatMode::Document => write!(f, "document"),
        }
    }
}

impl FromStr for ChatMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "general" | "chat" => Ok(ChatMode::General),
            "document" | "doc" | "rag" => Ok(ChatMode::Document),
            other => Err(format!("invalid chat mode: '{other}'")),
        }
    }
}
