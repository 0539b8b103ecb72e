//! `docent summarize`: index a PDF and print its summary.

use std::path::Path;

use anyhow::Result;
use console::style;

use docent_core::summarize::Summarizer;
use docent_infra::document::read_document;
use docent_types::mode::ChatMode;

use crate::cli::spinner;
use crate::state::AppState;

use super::chat::renderer::{format_size, ChatRenderer};

pub async fn summarize(state: &AppState, path: &Path, json: bool) -> Result<()> {
    let document = read_document(path).await?;
    let mut summarizer = Summarizer::new(
        state.backend_client(ChatMode::General)?,
        state.config.summary_query.clone(),
        state.config.default_model.clone(),
    );

    let progress = (!json).then(|| spinner(&format!("summarizing {}...", document.name)));
    let result = summarizer.summarize_document(&document).await;
    if let Some(progress) = progress {
        progress.finish_and_clear();
    }
    let summary = result?;

    if json {
        let output = serde_json::json!({
            "file": document.name,
            "size_bytes": document.size_bytes(),
            "model": state.config.default_model,
            "summary": summary,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} {} {}",
        style("📄").bold(),
        style(&document.name).cyan().bold(),
        style(format!("({})", format_size(document.size_bytes()))).dim()
    );
    println!("  {}", style("---").dim());
    let renderer = ChatRenderer::new(ChatMode::Document);
    for line in renderer.render_markdown(&summary).trim_end().lines() {
        println!("  {line}");
    }
    println!();
    Ok(())
}
