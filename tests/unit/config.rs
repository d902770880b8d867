use discord_bot::config::{Config, ConfigError, MusicSettings};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::time::Duration;

fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
    move |key| {
        pairs
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.to_string())
    }
}

#[test]
fn defaults_match_the_documented_values() {
    let settings = MusicSettings::default();
    assert_eq!(settings.inactivity_timeout, Duration::from_secs(600));
    assert_eq!(settings.poll_interval, Duration::from_secs(30));
}

#[test]
fn custom_prefix_is_kept() {
    let config = Config::from_lookup(lookup(&[
        ("DISCORD_TOKEN", "token"),
        ("COMMAND_PREFIX", "?"),
    ]))
    .unwrap();
    assert_eq!(config.command_prefix, "?");
    assert_eq!(config.discord_token, "token");
}

#[rstest]
#[case("DEFAULT_VOLUME", "3.5")]
#[case("SEARCH_RESULT_LIMIT", "0")]
#[case("SEARCH_RESULT_LIMIT", "26")]
#[case("INACTIVITY_POLL_SECS", "soon")]
fn out_of_range_settings_are_rejected(#[case] key: &str, #[case] value: &str) {
    let result = Config::from_lookup(lookup(&[("DISCORD_TOKEN", "token"), (key, value)]));
    assert!(
        matches!(result, Err(ConfigError::Invalid { key: found, .. }) if found == key),
        "{key}={value} was accepted"
    );
}

#[test]
fn blank_token_counts_as_missing() {
    let result = Config::from_lookup(lookup(&[("DISCORD_TOKEN", "   ")]));
    assert_eq!(result.unwrap_err(), ConfigError::Missing("DISCORD_TOKEN"));
}

#[test]
fn zero_poll_interval_is_rejected() {
    let result = Config::from_lookup(lookup(&[
        ("DISCORD_TOKEN", "token"),
        ("INACTIVITY_POLL_SECS", "0"),
    ]));
    assert_eq!(result.unwrap_err(), ConfigError::PollInterval);
}
