//! Environment configuration for the bridge service and the Discord relay.
//!
//! Both configs are loaded once at startup and passed down explicitly.
//! Nothing below the binary reads the environment at runtime.
//!
//! # Environment Variables
//!
//! - `SECRET_KEY` -> shared secret (required by both)
//! - `PORT` -> bridge listen port (default 3000)
//! - `BIND_ADDR` -> bridge listen address (default 0.0.0.0)
//! - `DISCORD_TOKEN` -> relay bot token
//! - `DISCORD_GUILD_ID` -> guild the `/clean` command is registered in
//! - `OWNER_ROLE_ID` -> role allowed to run `/clean`
//! - `BRIDGE_URL` -> base URL the relay enqueues against

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::error::ConfigError;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BIND_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Static credential compared verbatim by producer and consumer.
///
/// `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct SharedSecret(String);

impl SharedSecret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Whether a presented credential matches. A missing credential never does.
    pub fn matches(&self, candidate: Option<&str>) -> bool {
        candidate.is_some_and(|c| c == self.0)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(***)")
    }
}

/// Bridge service configuration.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub secret: SharedSecret,
    pub bind_addr: IpAddr,
    pub port: u16,
}

impl BridgeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let secret = required_secret(&lookup)?;

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|e| ConfigError::Invalid {
                var: "PORT",
                reason: format!("{e}"),
            })?,
            None => DEFAULT_PORT,
        };

        let bind_addr = match lookup("BIND_ADDR") {
            Some(raw) => raw.trim().parse().map_err(|e| ConfigError::Invalid {
                var: "BIND_ADDR",
                reason: format!("{e}"),
            })?,
            None => DEFAULT_BIND_ADDR,
        };

        Ok(Self {
            secret,
            bind_addr,
            port,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    /// URL a process-local relay should use to reach this bridge.
    pub fn local_url(&self) -> String {
        let host = if self.bind_addr.is_unspecified() {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        } else {
            self.bind_addr
        };
        format!("http://{}", SocketAddr::new(host, self.port))
    }
}

/// Discord relay configuration.
#[derive(Clone)]
pub struct RelayConfig {
    pub bot_token: String,
    pub guild_id: u64,
    pub owner_role_id: u64,
    pub secret: SharedSecret,
    /// Unset means the caller must supply one (e.g. the co-hosted bridge).
    pub bridge_url: Option<String>,
}

impl RelayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bot_token = lookup("DISCORD_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::Missing {
                var: "DISCORD_TOKEN",
            })?;

        let guild_id = required_snowflake(&lookup, "DISCORD_GUILD_ID")?;
        let owner_role_id = required_snowflake(&lookup, "OWNER_ROLE_ID")?;
        let secret = required_secret(&lookup)?;

        let bridge_url = lookup("BRIDGE_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());

        if let Some(url) = &bridge_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Invalid {
                    var: "BRIDGE_URL",
                    reason: format!("'{url}' is not an http(s) URL"),
                });
            }
        }

        Ok(Self {
            bot_token,
            guild_id,
            owner_role_id,
            secret,
            bridge_url,
        })
    }
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("bot_token", &"***")
            .field("guild_id", &self.guild_id)
            .field("owner_role_id", &self.owner_role_id)
            .field("secret", &self.secret)
            .field("bridge_url", &self.bridge_url)
            .finish()
    }
}

fn required_secret(lookup: &impl Fn(&str) -> Option<String>) -> Result<SharedSecret, ConfigError> {
    match lookup("SECRET_KEY") {
        Some(secret) if !secret.is_empty() => Ok(SharedSecret::new(secret)),
        Some(_) => Err(ConfigError::Invalid {
            var: "SECRET_KEY",
            reason: "must not be empty".to_string(),
        }),
        None => Err(ConfigError::Missing { var: "SECRET_KEY" }),
    }
}

/// Discord ids are non-zero u64 snowflakes.
fn required_snowflake(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<u64, ConfigError> {
    let raw = lookup(var).ok_or(ConfigError::Missing { var })?;
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::Invalid {
            var,
            reason: "id must be non-zero".to_string(),
        }),
        Ok(id) => Ok(id),
        Err(e) => Err(ConfigError::Invalid {
            var,
            reason: format!("'{raw}' is not a Discord id: {e}"),
        }),
    }
}
