//! Discord bot with gambling, music and help modules.
//!
//! The binary in `main.rs` only wires the pieces up: configuration, logging,
//! the poise framework and (with the `music` feature) songbird.

pub mod commands;
pub mod config;
#[cfg(feature = "music")]
pub mod events;
pub mod utils;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
pub type CommandResult = Result<(), Error>;

/// Application state handed to every command invocation.
pub struct Data {
    pub config: config::Config,
    pub help: commands::help::HelpRegistry,
    #[cfg(feature = "music")]
    pub music: std::sync::Arc<commands::music::SongbirdMusic>,
}
