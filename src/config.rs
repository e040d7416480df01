use crate::credentials::{self, Credential};

pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no valid bot tokens found (set DISCORD_BOT_TOKEN_1 .. DISCORD_BOT_TOKEN_16)")]
    NoCredentials,
    #[error("PORT must be a port number, got {0:?}")]
    InvalidPort(String),
}

#[derive(Debug)]
pub struct Config {
    pub credentials: Vec<Credential>,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_parts(credentials::from_env(), std::env::var("PORT").ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_parts(credentials::load(&lookup), lookup("PORT"))
    }

    fn from_parts(credentials: Vec<Credential>, port: Option<String>) -> Result<Self, ConfigError> {
        if credentials.is_empty() {
            return Err(ConfigError::NoCredentials);
        }

        let port = match port {
            Some(raw) if !raw.trim().is_empty() => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            _ => DEFAULT_PORT,
        };

        Ok(Self { credentials, port })
    }

    pub fn identities(&self) -> Vec<u8> {
        self.credentials.iter().map(|c| c.identity).collect()
    }
}
