use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub startup: StartupConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    /// Unset means "use the binary's own default port".
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,
    /// Side port for `/healthz` + `/metrics` on the RPC service.
    #[serde(default = "default_admin_port")]
    pub admin_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: None,
            worker_threads: Some(default_worker_threads()),
            max_concurrent_requests: default_max_concurrent_requests(),
            admin_port: default_admin_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Full connection URL. When empty it is taken from `DATABASE_URL`,
    /// or composed from the `DB_*` parts below.
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_db_host")]
    pub host: String,
    #[serde(default = "default_db_port")]
    pub port: u16,
    #[serde(default = "default_db_name")]
    pub name: String,
    #[serde(default = "default_db_user")]
    pub user: String,
    #[serde(default = "default_db_password")]
    pub password: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            host: default_db_host(),
            port: default_db_port(),
            name: default_db_name(),
            user: default_db_user(),
            password: default_db_password(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

/// Store polling performed once at process start.
#[derive(Debug, Clone, Deserialize)]
pub struct StartupConfig {
    #[serde(default = "default_init_attempts")]
    pub init_attempts: u32,
    #[serde(default = "default_init_retry_delay")]
    pub init_retry_delay_secs: u64,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self { init_attempts: default_init_attempts(), init_retry_delay_secs: default_init_retry_delay() }
    }
}

impl StartupConfig {
    pub fn retry_delay(&self) -> Duration { Duration::from_secs(self.init_retry_delay_secs) }
}

fn default_host() -> String { "0.0.0.0".into() }
fn default_worker_threads() -> usize { 4 }
fn default_max_concurrent_requests() -> usize { 50 }
fn default_admin_port() -> u16 { 9188 }
fn default_db_host() -> String { "localhost".into() }
fn default_db_port() -> u16 { 5432 }
fn default_db_name() -> String { "pharmacy".into() }
fn default_db_user() -> String { "postgres".into() }
fn default_db_password() -> String { "postgres".into() }
fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 1 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_init_attempts() -> u32 { 10 }
fn default_init_retry_delay() -> u64 { 3 }

pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_default() -> Result<AppConfig> {
    load_from_file(&config_path())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`) when present, fall back to
    /// defaults when it is missing, then apply env overrides and validate.
    /// A file that exists but does not parse is an error.
    pub fn load_and_validate() -> Result<Self> {
        let path = config_path();
        let mut cfg = if Path::new(&path).exists() {
            load_from_file(&path).map_err(|e| anyhow!("cannot load {path}: {e}"))?
        } else {
            AppConfig::default()
        };
        cfg.apply_env_overrides();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = env_parse::<u16>("SERVER_PORT") {
            self.server.port = Some(port);
        }
        if let Some(w) = env_parse::<usize>("TOKIO_WORKER_THREADS") {
            self.server.worker_threads = Some(w);
        }
        if let Some(p) = env_parse::<u16>("ADMIN_PORT") {
            self.server.admin_port = p;
        }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.normalize_from_env();
        self.database.validate()?;
        self.startup.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == Some(0) {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(default_worker_threads()),
        }
        if self.max_concurrent_requests == 0 {
            return Err(anyhow!("server.max_concurrent_requests must be >= 1"));
        }
        Ok(())
    }

    /// Resolve the listen address, using `default_port` when none is configured.
    pub fn bind_addr(&self, default_port: u16) -> Result<SocketAddr> {
        let port = self.port.unwrap_or(default_port);
        Ok(format!("{}:{}", self.host, port).parse()?)
    }

    pub fn admin_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.admin_port).parse()?)
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        if !self.url.trim().is_empty() {
            return;
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            if !url.trim().is_empty() {
                self.url = url;
                return;
            }
        }
        if let Ok(v) = std::env::var("DB_HOST") { self.host = v; }
        if let Some(v) = env_parse::<u16>("DB_PORT") { self.port = v; }
        if let Ok(v) = std::env::var("DB_NAME") { self.name = v; }
        if let Ok(v) = std::env::var("DB_USER") { self.user = v; }
        if let Ok(v) = std::env::var("DB_PASS") { self.password = v; }
        self.url = self.compose_url();
    }

    /// Postgres URL built from the individual connection parts.
    pub fn compose_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.name
        )
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml, DATABASE_URL or DB_* variables"));
        }
        let lower = self.url.to_lowercase();
        let supported = ["postgresql://", "postgres://", "sqlite:"];
        if !supported.iter().any(|p| lower.starts_with(p)) {
            return Err(anyhow!("database.url must start with postgres://, postgresql:// or sqlite:"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }

    /// Config for an in-memory SQLite store; a single pooled connection keeps
    /// every statement on the same database.
    pub fn sqlite_memory() -> Self {
        Self {
            url: "sqlite::memory:".into(),
            max_connections: 1,
            min_connections: 1,
            ..Self::default()
        }
    }
}

impl StartupConfig {
    fn validate(&self) -> Result<()> {
        if self.init_attempts == 0 {
            return Err(anyhow!("startup.init_attempts must be >= 1"));
        }
        Ok(())
    }
}
