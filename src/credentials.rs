/// Number of bot slots the process can run.
pub const MAX_IDENTITIES: u8 = 16;

pub const TOKEN_VAR_PREFIX: &str = "DISCORD_BOT_TOKEN_";

#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub identity: u8,
    pub token: String,
}

// Tokens never show up in logs.
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("identity", &self.identity)
            .field("token", &"<redacted>")
            .finish()
    }
}

pub fn var_name(identity: u8) -> String {
    format!("{TOKEN_VAR_PREFIX}{identity}")
}

/// Trimmed token for one slot, `None` when unset or blank.
pub fn token<F>(lookup: F, identity: u8) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(&var_name(identity))
        .map(|raw| raw.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Every usable slot in ascending order. An empty result is not an error here.
pub fn load<F>(lookup: F) -> Vec<Credential>
where
    F: Fn(&str) -> Option<String>,
{
    (1..=MAX_IDENTITIES)
        .filter_map(|identity| {
            token(&lookup, identity).map(|token| Credential { identity, token })
        })
        .collect()
}

pub fn from_env() -> Vec<Credential> {
    load(|key| std::env::var(key).ok())
}
