//! Welcome banner printed when a chat session starts.

use console::style;

use docent_types::mode::ChatMode;

pub fn print_welcome_banner(mode: ChatMode, model: &str, base_url: &str) {
    let (icon, name, tagline) = match mode {
        ChatMode::General => ("💬", "Docent", "General assistant. Upload a PDF any time with /upload."),
        ChatMode::Document => (
            "📄",
            "Docent (document mode)",
            "Answers only from an uploaded PDF. Start with /upload PATH.",
        ),
    };

    println!();
    println!("  {} {}", icon, style(name).cyan().bold());
    println!("  {}", style(tagline).dim());
    println!();
    println!("  {}    {}", style("Model:").bold(), style(model).dim());
    println!("  {}  {}", style("Backend:").bold(), style(base_url).dim());
    println!();
    println!("  {}", style("Type /help for commands, Ctrl+D to exit").dim());
    println!("  {}", style("---").dim());
    println!();
}
