//! Terminal rendering of conversation messages.
//!
//! Assistant answers are markdown: prose goes through `termimad`, fenced code
//! through `syntect`. User messages are echoed plainly and system notices are
//! dimmed.

use crossterm::style::Color;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::as_24_bit_terminal_escaped;
use termimad::MadSkin;

use docent_types::conversation::{Message, Sender};
use docent_types::mode::ChatMode;

const CODE_THEME: &str = "base16-ocean.dark";

pub struct ChatRenderer {
    skin: MadSkin,
    syntax_set: SyntaxSet,
    theme: Theme,
    assistant_label: &'static str,
}

impl ChatRenderer {
    /// Renderer accented for `mode`.
    pub fn new(mode: ChatMode) -> Self {
        let accent = match mode {
            ChatMode::General => Color::Cyan,
            ChatMode::Document => Color::Magenta,
        };
        let mut skin = MadSkin::default_dark();
        let tc = Self::crossterm_to_termimad(accent);
        skin.bold.set_fg(tc);
        skin.headers[0].set_fg(tc);
        skin.headers[1].set_fg(tc);
        skin.inline_code
            .set_fg(termimad::crossterm::style::Color::Yellow);

        let mut themes = ThemeSet::load_defaults();
        let theme = themes
            .themes
            .remove(CODE_THEME)
            .or_else(|| themes.themes.into_values().next())
            .unwrap_or_default();

        Self {
            skin,
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
            assistant_label: match mode {
                ChatMode::General => "Docent",
                ChatMode::Document => "Docent (doc)",
            },
        }
    }

    /// Print one message with a sender label.
    pub fn print_message(&self, message: &Message) {
        match message.sender {
            Sender::User => {
                println!("  {} {}", console::style("You").green().bold(), message.content);
            }
            Sender::Assistant => {
                println!();
                println!("  {}", console::style(self.assistant_label).cyan().bold());
                let rendered = self.render_markdown(&message.content);
                for line in rendered.trim_end().lines() {
                    println!("  {line}");
                }
                println!();
            }
            Sender::System => {
                println!();
                println!("  {} {}", console::style("•").dim(), console::style(&message.content).dim());
                println!();
            }
        }
        if let Some(attachment) = &message.attachment {
            println!(
                "    {} {} ({})",
                console::style("📎").dim(),
                console::style(&attachment.name).dim(),
                console::style(format_size(attachment.size_bytes)).dim()
            );
        }
    }

    /// Dim footer after an answer: elapsed time and model.
    pub fn print_footer(&self, elapsed_ms: u64, model: &str) {
        let seconds = elapsed_ms as f64 / 1000.0;
        println!(
            "  {} {:.1}s {} {}",
            console::style("|").dim(),
            console::style(seconds).dim(),
            console::style("\u{00b7}").dim(),
            console::style(model).dim(),
        );
        println!();
    }

    /// Render markdown with highlighted code fences.
    pub fn render_markdown(&self, markdown: &str) -> String {
        let mut output = String::new();
        let mut in_code_block = false;
        let mut code_lang = String::new();
        let mut code_buf = String::new();

        for line in markdown.lines() {
            if line.starts_with("```") {
                if in_code_block {
                    output.push_str(&self.highlight_code(&code_buf, &code_lang));
                } else {
                    code_lang = line.trim_start_matches('`').trim().to_string();
                    code_buf.clear();
                }
                in_code_block = !in_code_block;
            } else if in_code_block {
                code_buf.push_str(line);
                code_buf.push('\n');
            } else {
                output.push_str(&self.skin.term_text(line).to_string());
            }
        }

        // Unterminated fence
        if in_code_block && !code_buf.is_empty() {
            output.push_str(&self.highlight_code(&code_buf, &code_lang));
        }

        output
    }

    fn highlight_code(&self, code: &str, lang: &str) -> String {
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());
        let mut highlighter = HighlightLines::new(syntax, &self.theme);

        let mut output = String::new();
        if !lang.is_empty() {
            output.push_str(&format!("{}\n", console::style(format!("--- {lang} ---")).dim()));
        }
        for line in code.lines() {
            let ranges: Vec<(Style, &str)> = highlighter
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_default();
            let escaped = as_24_bit_terminal_escaped(&ranges[..], false);
            output.push_str(&format!("{escaped}\x1b[0m\n"));
        }
        output
    }

    fn crossterm_to_termimad(color: Color) -> termimad::crossterm::style::Color {
        match color {
            Color::Magenta => termimad::crossterm::style::Color::Magenta,
            Color::Green => termimad::crossterm::style::Color::Green,
            Color::Yellow => termimad::crossterm::style::Color::Yellow,
            Color::Rgb { r, g, b } => termimad::crossterm::style::Color::Rgb { r, g, b },
            _ => termimad::crossterm::style::Color::Cyan,
        }
    }
}

/// Human-readable byte count.
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_render_markdown_keeps_code_text() {
        let renderer = ChatRenderer::new(ChatMode::General);
        let rendered = renderer.render_markdown("Intro\n```rust\nfn main() {}\n```\nOutro");
        assert!(rendered.contains("--- rust ---"));
        assert!(rendered.contains("main"));
        assert!(rendered.contains("Outro"));
    }

    #[test]
    fn test_render_unterminated_fence() {
        let renderer = ChatRenderer::new(ChatMode::Document);
        let rendered = renderer.render_markdown("```\nlet x = 1;");
        assert!(rendered.contains("let x = 1;"));
    }
}
