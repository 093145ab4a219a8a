//! `tg-clone` CLI: argument parsing, terminal prompts and run wiring.

pub mod app;
pub mod cli;
pub mod terminal;

pub use app::run;
pub use cli::{Cli, Commands, RunArgs};
pub use terminal::TerminalPrompter;
