//! Unit tests exercising the public API of individual modules

pub mod config;
pub mod gambling;
#[cfg(feature = "music")]
pub mod ytdlp;
