use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = lookup("GATHER_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = match lookup("GATHER_PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("GATHER_PORT is not a valid port: {raw}"))?,
            None => 3000,
        };
        let db_path = lookup("GATHER_DB_PATH").unwrap_or_else(|| "gather.db".into());

        Ok(Self {
            host,
            port,
            db_path: PathBuf::from(db_path),
        })
    }

    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}
