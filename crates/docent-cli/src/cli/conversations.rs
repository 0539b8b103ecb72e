//! Conversation listing and history views used by `docent chat`.

use chrono::Local;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use docent_core::chat::driver::ChatSnapshot;
use docent_types::conversation::Conversation;

use super::chat::renderer::ChatRenderer;

/// Conversation at a 1-based `/list` position.
pub fn conversation_at(snapshot: &ChatSnapshot, position: usize) -> Option<&Conversation> {
    position
        .checked_sub(1)
        .and_then(|index| snapshot.conversations.get(index))
}

/// Table of conversations, most recently created first.
pub fn print_conversation_table(snapshot: &ChatSnapshot) {
    if snapshot.conversations.is_empty() {
        println!();
        println!(
            "  {} No conversations yet. Type a message or {} to start one.",
            style("i").blue().bold(),
            style("/new").yellow()
        );
        println!();
        return;
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("#").fg(Color::White),
        Cell::new("Title").fg(Color::White),
        Cell::new("Messages").fg(Color::White),
        Cell::new("Updated").fg(Color::White),
    ]);

    for (index, conversation) in snapshot.conversations.iter().enumerate() {
        let is_current = snapshot.current == Some(conversation.id);
        let marker = if is_current { "*" } else { "" };
        let title_cell = if is_current {
            Cell::new(&conversation.title).fg(Color::Cyan)
        } else {
            Cell::new(&conversation.title)
        };
        table.add_row(vec![
            Cell::new(format!("{}{marker}", index + 1)),
            title_cell,
            Cell::new(conversation.message_count()),
            Cell::new(
                conversation
                    .updated_at
                    .with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M")
                    .to_string(),
            ),
        ]);
    }

    println!();
    println!("{table}");
    println!();
}

/// Every message of the current conversation, in order.
pub fn print_history(snapshot: &ChatSnapshot, renderer: &ChatRenderer) {
    let Some(conversation) = snapshot.current_conversation() else {
        println!();
        println!("  {} No conversation selected.", style("i").blue().bold());
        println!();
        return;
    };

    println!();
    println!(
        "  {} {}",
        style(&conversation.title).bold(),
        style(format!("({} messages)", conversation.message_count())).dim()
    );
    println!("  {}", style("---").dim());
    for message in &conversation.messages {
        renderer.print_message(message);
    }
}
