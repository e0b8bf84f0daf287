use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteConfig {
    #[serde(default = "default_site_name")]
    pub name: String,
    /// Public base URL, used for the sitemap location in robots.txt.
    #[serde(default = "default_site_url")]
    pub url: String,
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_site_name(),
            url: default_site_url(),
            language: default_language(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_host")]
    pub host: String,
    #[serde(default = "default_db_port")]
    pub port: u16,
    #[serde(default = "default_db_user")]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_db_name")]
    pub name: String,
    /// Maximum number of pooled connections.
    #[serde(default = "default_connection_limit")]
    pub connection_limit: u32,
    /// Queue callers while every connection is busy instead of failing them.
    #[serde(default = "default_true")]
    pub wait_for_connections: bool,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: default_db_host(),
            port: default_db_port(),
            user: default_db_user(),
            password: String::new(),
            name: default_db_name(),
            connection_limit: default_connection_limit(),
            wait_for_connections: true,
            acquire_timeout_secs: default_acquire_timeout(),
        }
    }
}

/// Upper bound on acquiring a connection when callers must not queue. Still
/// long enough to open a fresh connection to a reachable server.
const NO_WAIT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(1);

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        let configured = Duration::from_secs(self.acquire_timeout_secs);
        if self.wait_for_connections {
            configured
        } else {
            configured.min(NO_WAIT_ACQUIRE_TIMEOUT)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureAlgorithm {
    #[default]
    Sha1,
    Sha256,
}

impl SignatureAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureAlgorithm::Sha1 => "sha1",
            SignatureAlgorithm::Sha256 => "sha256",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MediaConfig {
    #[serde(default)]
    pub cloud_name: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_secret: String,
    #[serde(default)]
    pub signature_algorithm: SignatureAlgorithm,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie: default_session_cookie(),
        }
    }
}

fn default_site_name() -> String {
    "Bánh Tằm Cô Đào".to_string()
}

fn default_site_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_language() -> String {
    "vi".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    3306
}

fn default_db_user() -> String {
    "root".to_string()
}

fn default_db_name() -> String {
    "codao".to_string()
}

fn default_connection_limit() -> u32 {
    10
}

fn default_acquire_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_session_cookie() -> String {
    "token".to_string()
}

impl Config {
    /// Reads `path`, applies environment overrides and validates.
    ///
    /// With `required == false` a missing file falls back to defaults.
    pub fn load(path: &Path, required: bool) -> Result<Self> {
        let mut config = if path.exists() || required {
            let content = std::fs::read_to_string(path).map_err(|e| {
                anyhow::anyhow!("Could not read config file '{}': {}", path.display(), e)
            })?;
            toml::from_str(&content)
                .with_context(|| format!("Invalid config file '{}'", path.display()))?
        } else {
            tracing::info!(
                "No config file at '{}', using defaults",
                path.display()
            );
            Config::default()
        };

        config.apply_env(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Overrides fields from environment-style variables looked up via `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("BASE_URL") {
            self.site.url = v;
        }
        if let Some(v) = lookup("HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("PORT") {
            self.server.port = parse_var("PORT", &v)?;
        }
        if let Some(v) = lookup("DB_HOST") {
            self.database.host = v;
        }
        if let Some(v) = lookup("DB_PORT") {
            self.database.port = parse_var("DB_PORT", &v)?;
        }
        if let Some(v) = lookup("DB_USER") {
            self.database.user = v;
        }
        if let Some(v) = lookup("DB_PASSWORD") {
            self.database.password = v;
        }
        if let Some(v) = lookup("DB_NAME") {
            self.database.name = v;
        }
        if let Some(v) = lookup("DB_CONNECTION_LIMIT") {
            self.database.connection_limit = parse_var("DB_CONNECTION_LIMIT", &v)?;
        }
        if let Some(v) = lookup("CLOUDINARY_CLOUD_NAME") {
            self.media.cloud_name = v;
        }
        if let Some(v) = lookup("CLOUDINARY_API_KEY") {
            self.media.api_key = v;
        }
        if let Some(v) = lookup("CLOUDINARY_API_SECRET") {
            self.media.api_secret = v;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.site.url)
            .with_context(|| format!("site.url '{}' is not a valid URL", self.site.url))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            anyhow::bail!("site.url must use http or https");
        }
        if self.server.port == 0 {
            anyhow::bail!("server.port must be greater than 0");
        }
        if self.database.connection_limit == 0 {
            anyhow::bail!("database.connection_limit must be greater than 0");
        }
        if self.database.connection_limit > 100 {
            anyhow::bail!("database.connection_limit must be 100 or less");
        }
        if self.auth.session_cookie.is_empty() {
            anyhow::bail!("auth.session_cookie must not be empty");
        }
        if self.media.api_secret.is_empty() {
            tracing::warn!("media.api_secret is not set; image upload signing will fail");
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid {} value '{}': {}", key, value, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.database.connection_limit, 10);
        assert!(config.database.wait_for_connections);
        assert_eq!(config.auth.session_cookie, "token");
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn env_overrides_fields() {
        let mut config = Config::default();
        config
            .apply_env(lookup_from(&[
                ("DB_HOST", "db.internal"),
                ("DB_PORT", "3307"),
                ("DB_USER", "codao"),
                ("DB_PASSWORD", "secret"),
                ("DB_NAME", "orders"),
                ("DB_CONNECTION_LIMIT", "25"),
                ("CLOUDINARY_API_SECRET", "shh"),
                ("BASE_URL", "https://codao.vn"),
            ]))
            .unwrap();

        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 3307);
        assert_eq!(config.database.user, "codao");
        assert_eq!(config.database.password, "secret");
        assert_eq!(config.database.name, "orders");
        assert_eq!(config.database.connection_limit, 25);
        assert_eq!(config.media.api_secret, "shh");
        assert_eq!(config.site.url, "https://codao.vn");
    }

    #[test]
    fn env_rejects_bad_number() {
        let mut config = Config::default();
        let err = config
            .apply_env(lookup_from(&[("PORT", "eighty")]))
            .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = Config::default();
        config.site.url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.site.url = "ftp://codao.vn".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.database.connection_limit = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.database.connection_limit = 101;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.auth.session_cookie.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn acquire_timeout_follows_queueing() {
        let mut db = DatabaseConfig::default();
        assert_eq!(db.acquire_timeout(), Duration::from_secs(30));
        db.wait_for_connections = false;
        assert_eq!(db.acquire_timeout(), Duration::from_secs(1));
        db.acquire_timeout_secs = 0;
        assert_eq!(db.acquire_timeout(), Duration::ZERO);
    }

    #[test]
    fn parses_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [database]
            host = "mysql"
            connection_limit = 5

            [media]
            signature_algorithm = "sha256"
            "#,
        )
        .unwrap();

        assert_eq!(config.database.host, "mysql");
        assert_eq!(config.database.connection_limit, 5);
        assert_eq!(config.database.port, 3306);
        assert_eq!(config.media.signature_algorithm, SignatureAlgorithm::Sha256);
        assert_eq!(config.site.language, "vi");
    }

    #[test]
    fn load_missing_optional_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codao.toml");
        assert!(Config::load(&path, false).is_ok());
        assert!(Config::load(&path, true).is_err());
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codao.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[server]\nport = 8080\n[auth]\nsession_cookie = \"sid\"").unwrap();

        let config = Config::load(&path, true).unwrap();
        assert_eq!(config.auth.session_cookie, "sid");
    }
}
