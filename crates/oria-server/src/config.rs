use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

/// Admin tokens that must never reach production.
const PLACEHOLDER_TOKENS: &[&str] = &["change-me", "changeme", "admin", "dev-token-change-me"];

const MIN_ADMIN_TOKEN_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Database { path: PathBuf },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub storage: StorageBackend,
    pub admin_token: Option<String>,
    pub static_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset and empty values fall back
    /// to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = var("ORIA_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let ip: IpAddr = host
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse()
            .with_context(|| format!("ORIA_HOST must be an IP address, got \"{}\"", host))?;
        let port: u16 = var("ORIA_PORT")
            .unwrap_or_else(|| "5000".into())
            .parse()
            .context("ORIA_PORT must be a port number")?;
        let addr = SocketAddr::new(ip, port);

        let storage = match var("ORIA_STORAGE").as_deref().unwrap_or("database") {
            "memory" => StorageBackend::Memory,
            "database" => StorageBackend::Database {
                path: var("ORIA_DB_PATH").unwrap_or_else(|| "oria.db".into()).into(),
            },
            other => bail!("ORIA_STORAGE must be \"memory\" or \"database\", got \"{}\"", other),
        };

        let admin_token = var("ORIA_ADMIN_TOKEN");
        if let Some(token) = &admin_token {
            if PLACEHOLDER_TOKENS.contains(&token.as_str()) {
                bail!("ORIA_ADMIN_TOKEN is still a placeholder");
            }
            if token.len() < MIN_ADMIN_TOKEN_LEN {
                bail!("ORIA_ADMIN_TOKEN must be at least {} characters", MIN_ADMIN_TOKEN_LEN);
            }
        }

        Ok(Self {
            addr,
            storage,
            admin_token,
            static_dir: var("ORIA_STATIC_DIR").map(PathBuf::from),
        })
    }
}
