//! Server configuration
//!
//! Read once at startup from the process environment, after `.env` has been
//! loaded by `main`.
//!
//! | Variable              | Default        | Meaning                                  |
//! |-----------------------|----------------|------------------------------------------|
//! | `BIND_ADDR`           | `0.0.0.0:3000` | Address the HTTP API listens on          |
//! | `MAX_ENGINE_SESSIONS` | unset          | Cap on concurrent engine processes       |
//! | `STOCKFISH_PATH`      | `engines/...`  | Engine binary (see [`uci_engine::config`]) |

use anyhow::Context;
use std::net::SocketAddr;
use uci_engine::EngineConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// `None` leaves concurrent analyses unbounded
    pub max_sessions: Option<usize>,
    pub engine: EngineConfig,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("BIND_ADDR")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .trim()
            .parse()
            .with_context(|| format!("Invalid BIND_ADDR: {bind_addr}"))?;

        let max_sessions = match lookup("MAX_ENGINE_SESSIONS").filter(|v| !v.trim().is_empty()) {
            Some(value) => Some(
                value
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid MAX_ENGINE_SESSIONS: {value}"))?,
            ),
            None => None,
        };

        let engine = EngineConfig::from_lookup(&lookup);

        Ok(Self {
            bind_addr,
            max_sessions,
            engine,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn config_from(vars: &[(&str, &str)]) -> anyhow::Result<ServerConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).expect("defaults parse");
        assert_eq!(config.bind_addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.max_sessions, None);
        assert_eq!(config.engine.path_override, None);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("MAX_ENGINE_SESSIONS", "4"),
            ("STOCKFISH_PATH", "/usr/games/stockfish"),
        ])
        .expect("overrides parse");

        assert_eq!(config.bind_addr, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.max_sessions, Some(4));
        assert_eq!(
            config.engine.path_override,
            Some(PathBuf::from("/usr/games/stockfish"))
        );
    }

    #[test]
    fn test_blank_values_count_as_unset() {
        let config = config_from(&[("MAX_ENGINE_SESSIONS", " "), ("STOCKFISH_PATH", "")])
            .expect("blank values parse");
        assert_eq!(config.max_sessions, None);
        assert_eq!(config.engine.path_override, None);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(config_from(&[("BIND_ADDR", "not-an-addr")]).is_err());
        assert!(config_from(&[("MAX_ENGINE_SESSIONS", "many")]).is_err());
    }
}
