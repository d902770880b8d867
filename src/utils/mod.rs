//! This module aggregates various utility submodules used throughout the application.

/// Sending messages with a direct-message fallback when a channel is locked.
pub mod communication;
/// Embed formatting shared by every command module.
pub mod embeds;
