//! Effective configuration and backend reachability.

use anyhow::Result;
use console::style;

use docent_types::mode::ChatMode;

use crate::state::AppState;

/// Display the resolved configuration and probe the backend's health route.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let config = &state.config;
    let client = state.backend_client(ChatMode::General)?;
    let health = client.health().await;

    if json {
        let (reachable, detail) = match &health {
            Ok(reply) => (true, reply.message.clone()),
            Err(e) => (false, e.to_string()),
        };
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": state.data_dir.display().to_string(),
            "base_url": client.base_url(),
            "model": config.default_model,
            "chunking": {
                "max_chars": config.chunking.max_chars,
                "overlap": config.chunking.overlap,
            },
            "routes": config.routes,
            "backend": {
                "reachable": reachable,
                "detail": detail,
            },
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!("  {} Docent v{}", style("📚").bold(), env!("CARGO_PKG_VERSION"));
    println!();

    println!("  {}", style("── Backend ──").dim());
    println!("  Address: {}", style(client.base_url()).bold());
    match &health {
        Ok(reply) => println!(
            "  Health:  {} {}",
            style("✓").green().bold(),
            style(&reply.message).dim()
        ),
        Err(e) => println!("  Health:  {} {}", style("✗").red().bold(), style(e).dim()),
    }
    println!();

    println!("  {}", style("── Queries ──").dim());
    println!("  Model:    {}", style(&config.default_model).bold());
    println!(
        "  Chunking: {} chars, {} overlap",
        config.chunking.max_chars, config.chunking.overlap
    );
    println!();

    println!("  {}", style("── Routes ──").dim());
    for mode in [ChatMode::General, ChatMode::Document] {
        let routes = config.routes.for_mode(mode);
        println!(
            "  {:<9} upload {}  query {}",
            format!("{mode}:"),
            style(&routes.upload).dim(),
            style(&routes.query).dim()
        );
    }
    println!(
        "  {:<9} index {}  summarize {}  health {}",
        "summary:",
        style(&config.routes.index).dim(),
        style(&config.routes.summarize).dim(),
        style(&config.routes.health).dim()
    );
    println!();

    println!("  {}", style("── System ──").dim());
    println!("  Data dir: {}", style(state.data_dir.display()).dim());
    println!();

    Ok(())
}
