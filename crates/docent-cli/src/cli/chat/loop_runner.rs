//! Main chat loop orchestration.
//!
//! Spawns the conversation driver for one mode, prints the welcome banner,
//! then reads lines: slash commands manage conversations, anything else is
//! submitted as a question. Replies arrive as driver events and are rendered
//! as they land.

use std::path::{Path, PathBuf};
use std::time::Instant;

use console::style;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};

use docent_core::chat::driver::{self, DriverHandle};
use docent_infra::document::read_document;
use docent_types::conversation::{Message, Sender};
use docent_types::event::ChatEvent;
use docent_types::mode::ChatMode;

use crate::cli::conversations::{conversation_at, print_conversation_table, print_history};
use crate::cli::{expand_path, spinner};
use crate::state::AppState;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::ChatRenderer;

/// Capacity of the driver's command queue.
const DRIVER_QUEUE: usize = 64;

/// Run the interactive chat loop for `mode`, optionally uploading `file` first.
pub async fn run_chat_loop(
    state: &AppState,
    mode: ChatMode,
    file: Option<PathBuf>,
) -> anyhow::Result<()> {
    let orchestrator = state.orchestrator_for(mode)?;
    let handle = driver::spawn(orchestrator, DRIVER_QUEUE);
    let mut events = handle.subscribe();

    let mut model = state.config.default_model.clone();
    print_welcome_banner(mode, &model, &state.config.base_url);
    let renderer = ChatRenderer::new(mode);

    if let Some(path) = file {
        upload_path(&handle, &mut events, &renderer, &path).await?;
    }

    let prompt = ChatInput::prompt_for(handle.snapshot().await?.session_bound);
    let (mut chat_input, _writer) = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        let text = match chat_input.read_line().await {
            InputEvent::Eof => {
                println!("\n  {}", style("Session ended.").dim());
                break;
            }
            InputEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
                continue;
            }
            InputEvent::Line(text) => text,
        };
        if text.is_empty() {
            continue;
        }

        if let Some(cmd) = commands::parse(&text) {
            match cmd {
                ChatCommand::Help => commands::print_help(),
                ChatCommand::Clear => chat_input.clear(),
                ChatCommand::Exit => {
                    println!("\n  {}", style("Session ended.").dim());
                    break;
                }
                ChatCommand::New => {
                    let id = handle.create_conversation().await?;
                    info!(conversation_id = %id, "Conversation started");
                    print_notice("Started a new conversation.");
                }
                ChatCommand::List => print_conversation_table(&handle.snapshot().await?),
                ChatCommand::Switch(position) => {
                    let snapshot = handle.snapshot().await?;
                    match conversation_at(&snapshot, position) {
                        Some(conversation) => {
                            handle.select_conversation(conversation.id).await?;
                            print_notice(&format!("Switched to \"{}\".", conversation.title));
                        }
                        None => print_missing(position),
                    }
                }
                ChatCommand::Rename(title) => {
                    let renamed = match handle.snapshot().await?.current {
                        Some(id) => handle.rename_conversation(id, title.as_str()).await?,
                        None => false,
                    };
                    if renamed {
                        print_notice(&format!("Renamed to \"{title}\"."));
                    } else {
                        print_no_current();
                    }
                }
                ChatCommand::Delete(position) => {
                    let snapshot = handle.snapshot().await?;
                    let target = match position {
                        Some(n) => conversation_at(&snapshot, n),
                        None => snapshot.current_conversation(),
                    };
                    match (target, position) {
                        (Some(conversation), _) => {
                            if handle.delete_conversation(conversation.id).await? {
                                print_notice(&format!("Deleted \"{}\".", conversation.title));
                            }
                        }
                        (None, Some(n)) => print_missing(n),
                        (None, None) => print_no_current(),
                    }
                }
                ChatCommand::Upload(raw) => {
                    let path = expand_path(&raw);
                    upload_path(&handle, &mut events, &renderer, &path).await?;
                }
                ChatCommand::History => print_history(&handle.snapshot().await?, &renderer),
                ChatCommand::Close => {
                    handle.clear_current().await?;
                    print_notice("Conversation closed. Your next message starts a new one.");
                }
                ChatCommand::Model(name) => {
                    handle.set_model(name.as_str()).await?;
                    print_notice(&format!("Model set to {name}."));
                    model = name;
                }
                ChatCommand::Unknown(detail) => {
                    println!(
                        "\n  {} Unknown command: {}. Type /help for available commands.\n",
                        style("?").yellow().bold(),
                        style(detail).dim()
                    );
                }
            }
            refresh_prompt(&handle, &mut chat_input).await?;
            continue;
        }

        let spinner = spinner("thinking...");
        let start_time = Instant::now();
        handle.submit(text).await?;
        let reply = wait_for_reply(&mut events).await;
        spinner.finish_and_clear();

        let reply = reply?;
        renderer.print_message(&reply);
        if reply.sender == Sender::Assistant {
            renderer.print_footer(start_time.elapsed().as_millis() as u64, &model);
        }
        refresh_prompt(&handle, &mut chat_input).await?;
    }

    Ok(())
}

/// Read `path`, upload it into the current conversation and render the notice.
///
/// Unreadable or non-PDF files are reported without contacting the backend.
async fn upload_path(
    handle: &DriverHandle,
    events: &mut broadcast::Receiver<ChatEvent>,
    renderer: &ChatRenderer,
    path: &Path,
) -> anyhow::Result<()> {
    let file = match read_document(path).await {
        Ok(file) => file,
        Err(e) => {
            println!("\n  {} {e}\n", style("!").red().bold());
            return Ok(());
        }
    };

    let spinner = spinner(&format!("uploading {}...", file.name));
    handle.upload(file).await?;
    let notice = wait_for_reply(events).await;
    spinner.finish_and_clear();

    renderer.print_message(&notice?);
    Ok(())
}

/// Next message not authored by the user: an answer, a guard or a notice.
async fn wait_for_reply(events: &mut broadcast::Receiver<ChatEvent>) -> anyhow::Result<Message> {
    loop {
        match events.recv().await {
            Ok(ChatEvent::MessageAppended { message, .. }) if message.sender != Sender::User => {
                return Ok(message);
            }
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => warn!(skipped, "Chat events lagged"),
            Err(RecvError::Closed) => anyhow::bail!("chat driver stopped"),
        }
    }
}

async fn refresh_prompt(handle: &DriverHandle, input: &mut ChatInput) -> anyhow::Result<()> {
    let snapshot = handle.snapshot().await?;
    input.update_prompt(&ChatInput::prompt_for(snapshot.session_bound));
    Ok(())
}

fn print_notice(text: &str) {
    println!("\n  {} {}\n", style("*").cyan().bold(), text);
}

fn print_missing(position: usize) {
    println!(
        "\n  {} No conversation #{position}. Use /list to see them.\n",
        style("?").yellow().bold()
    );
}

fn print_no_current() {
    println!("\n  {} No conversation selected.\n", style("i").blue().bold());
}
