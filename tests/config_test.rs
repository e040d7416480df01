use std::collections::HashMap;

use music_fleet::config::{Config, ConfigError, DEFAULT_PORT};

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn test_config_without_tokens_fails() {
    let result = Config::from_lookup(lookup(&[("PORT", "8080")]));
    assert!(matches!(result, Err(ConfigError::NoCredentials)));
}

#[test]
fn test_config_blank_tokens_do_not_count() {
    let result = Config::from_lookup(lookup(&[
        ("DISCORD_BOT_TOKEN_1", ""),
        ("DISCORD_BOT_TOKEN_2", "   "),
    ]));
    assert!(matches!(result, Err(ConfigError::NoCredentials)));
}

#[test]
fn test_config_defaults_port() {
    let config = Config::from_lookup(lookup(&[("DISCORD_BOT_TOKEN_3", "abc")])).unwrap();
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.identities(), vec![3]);
}

#[test]
fn test_config_reads_port_and_keeps_identity_order() {
    let config = Config::from_lookup(lookup(&[
        ("DISCORD_BOT_TOKEN_16", "p"),
        ("DISCORD_BOT_TOKEN_2", "q"),
        ("DISCORD_BOT_TOKEN_9", "r"),
        ("PORT", "8080"),
    ]))
    .unwrap();
    assert_eq!(config.port, 8080);
    assert_eq!(config.identities(), vec![2, 9, 16]);
}

#[test]
fn test_config_rejects_bad_port() {
    let result = Config::from_lookup(lookup(&[
        ("DISCORD_BOT_TOKEN_1", "abc"),
        ("PORT", "not-a-port"),
    ]));
    assert!(matches!(result, Err(ConfigError::InvalidPort(raw)) if raw == "not-a-port"));
}
