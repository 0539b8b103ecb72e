//! One-shot question command.

use std::path::PathBuf;

use anyhow::Result;
use console::style;

use docent_infra::document::read_document;
use docent_types::error::ChatError;
use docent_types::mode::ChatMode;

use crate::cli::spinner;
use crate::state::AppState;

use super::chat::renderer::ChatRenderer;

/// Ask `question` in a fresh conversation, uploading `file` first if given.
///
/// Failures are still rendered as the conversation shows them, then returned
/// so the process exits non-zero.
pub async fn ask(
    state: &AppState,
    question: &str,
    mode: ChatMode,
    file: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let mut orchestrator = state.orchestrator_for(mode)?;
    let renderer = ChatRenderer::new(mode);

    if let Some(path) = file {
        let document = read_document(&path).await?;
        let progress = (!json).then(|| spinner(&format!("uploading {}...", document.name)));
        let uploaded = orchestrator.upload_document(document).await;
        if let Some(progress) = progress {
            progress.finish_and_clear();
        }
        if let Err(e) = uploaded {
            return report(json, question, mode, false, e);
        }
        if !json {
            if let Some(notice) = orchestrator
                .store()
                .current()
                .and_then(|c| c.last_message())
            {
                renderer.print_message(notice);
            }
        }
    }

    let progress = (!json).then(|| spinner("thinking..."));
    let answer = orchestrator.submit_message(question).await;
    if let Some(progress) = progress {
        progress.finish_and_clear();
    }
    let session_bound = orchestrator.current_session_bound();

    let message = match answer {
        Ok(Some(message)) => message,
        Ok(None) => anyhow::bail!("question is empty"),
        Err(e) => return report(json, question, mode, session_bound, e),
    };

    if json {
        let output = serde_json::json!({
            "question": question,
            "answer": message.content,
            "mode": mode.to_string(),
            "model": orchestrator.model(),
            "session_bound": session_bound,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    renderer.print_message(&message);
    Ok(())
}

/// Print a failed ask and turn it into the command's error.
fn report(
    json: bool,
    question: &str,
    mode: ChatMode,
    session_bound: bool,
    error: ChatError,
) -> Result<()> {
    if json {
        let output = serde_json::json!({
            "question": question,
            "answer": null,
            "mode": mode.to_string(),
            "session_bound": session_bound,
            "error": error.to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let label = match &error {
            ChatError::PreconditionNotMet => "Blocked",
            _ => "Failed",
        };
        eprintln!("\n  {} {label}: {error}\n", style("!").red().bold());
    }
    Err(error.into())
}
