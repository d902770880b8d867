//! Runtime configuration read from the environment (and `.env`, via `dotenv`).

use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Errors raised while reading the configuration.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Missing required variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("Inactivity poll interval must be non-zero and not exceed the timeout")]
    PollInterval,
}

/// Settings of the music subsystem.
#[derive(Debug, Clone, PartialEq)]
pub struct MusicSettings {
    /// Disconnect after this much accrued idle time.
    pub inactivity_timeout: Duration,
    /// How often the inactivity watchdog looks at the session.
    pub poll_interval: Duration,
    /// Volume applied to every track, `1.0` being unchanged.
    pub volume: f32,
    /// Result cap of the interactive `search` command.
    pub search_limit: usize,
}

impl Default for MusicSettings {
    fn default() -> Self {
        Self {
            inactivity_timeout: Duration::from_secs(600),
            poll_interval: Duration::from_secs(30),
            volume: 0.5,
            search_limit: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub discord_token: String,
    pub command_prefix: String,
    pub music: MusicSettings,
}

impl Config {
    /// Load the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let discord_token = lookup("DISCORD_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;

        let command_prefix = lookup("COMMAND_PREFIX").unwrap_or_else(|| "!".to_string());

        let defaults = MusicSettings::default();
        let music = MusicSettings {
            inactivity_timeout: parse_or(&lookup, "INACTIVITY_TIMEOUT_SECS", 600u64)
                .map(Duration::from_secs)?,
            poll_interval: parse_or(&lookup, "INACTIVITY_POLL_SECS", 30u64)
                .map(Duration::from_secs)?,
            volume: parse_or(&lookup, "DEFAULT_VOLUME", defaults.volume)?,
            search_limit: parse_or(&lookup, "SEARCH_RESULT_LIMIT", defaults.search_limit)?,
        };

        if music.poll_interval.is_zero() || music.poll_interval > music.inactivity_timeout {
            return Err(ConfigError::PollInterval);
        }
        if !(0.0..=2.0).contains(&music.volume) {
            return Err(ConfigError::Invalid {
                key: "DEFAULT_VOLUME",
                value: music.volume.to_string(),
            });
        }
        // Discord select menus hold at most 25 options.
        if music.search_limit == 0 || music.search_limit > 25 {
            return Err(ConfigError::Invalid {
                key: "SEARCH_RESULT_LIMIT",
                value: music.search_limit.to_string(),
            });
        }

        Ok(Self {
            discord_token,
            command_prefix,
            music,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
