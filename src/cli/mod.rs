//! CLI module

pub mod commands;
pub mod terminal;

pub fn run() -> anyhow::Result<()> {
    commands::run()
}
