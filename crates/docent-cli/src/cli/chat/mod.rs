//! Interactive chat for Docent.
//!
//! Runs one conversation stack on a background driver task and renders its
//! events: markdown answers, upload notices, spinners while a request is in
//! flight, and slash commands for managing conversations.
//! Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
