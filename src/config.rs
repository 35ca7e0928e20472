//! Configuration module for revdash.

use serde::Deserialize;
use std::path::Path;

use crate::{Result, RevdashError};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/chat.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/revdash.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Web server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Allowed CORS origins. Empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Serve the dashboard's static assets.
    #[serde(default)]
    pub serve_static: bool,
    /// Path to the static asset directory.
    #[serde(default = "default_static_path")]
    pub static_path: String,
}

fn default_static_path() -> String {
    "static".to_string()
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(),
            serve_static: false,
            static_path: default_static_path(),
        }
    }
}

/// Chat configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Number of messages returned by the history endpoint when no limit is given.
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,
}

fn default_history_limit() -> u32 {
    200
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
        }
    }
}

/// CodeRabbit report API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CodeRabbitConfig {
    /// Base URL of the report API.
    #[serde(default = "default_coderabbit_api_base")]
    pub api_base: String,
    /// API key. Empty means reports are served from mock data.
    #[serde(default)]
    pub api_key: String,
    /// Total request timeout in seconds.
    #[serde(default = "default_coderabbit_timeout")]
    pub timeout_secs: u64,
    /// Default window (in days) for report sync.
    #[serde(default = "default_sync_days")]
    pub sync_days: u32,
}

fn default_coderabbit_api_base() -> String {
    "https://api.coderabbit.ai/api/v1".to_string()
}

fn default_coderabbit_timeout() -> u64 {
    60
}

fn default_sync_days() -> u32 {
    7
}

impl Default for CodeRabbitConfig {
    fn default() -> Self {
        Self {
            api_base: default_coderabbit_api_base(),
            api_key: String::new(),
            timeout_secs: default_coderabbit_timeout(),
            sync_days: default_sync_days(),
        }
    }
}

/// GitHub API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubConfig {
    /// Base URL of the REST API.
    #[serde(default = "default_github_api_base")]
    pub api_base: String,
    /// Personal access token.
    #[serde(default)]
    pub token: String,
    /// How comments are posted to a pull request ("review" or "issue").
    #[serde(default = "default_comment_mode")]
    pub comment_mode: String,
    /// Page size used when fetching comments.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_github_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_comment_mode() -> String {
    "review".to_string()
}

fn default_per_page() -> u32 {
    100
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base: default_github_api_base(),
            token: String::new(),
            comment_mode: default_comment_mode(),
            per_page: default_per_page(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Web configuration.
    #[serde(default)]
    pub web: WebConfig,
    /// Chat configuration.
    #[serde(default)]
    pub chat: ChatConfig,
    /// CodeRabbit configuration.
    #[serde(default)]
    pub coderabbit: CodeRabbitConfig,
    /// GitHub configuration.
    #[serde(default)]
    pub github: GitHubConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(RevdashError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| RevdashError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `CODERABBIT_API_KEY`
    /// - `GITHUB_TOKEN`
    /// - `GITHUB_COMMENT_MODE`
    /// - `REVDASH_DATABASE_PATH`
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup. Empty values are ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("CODERABBIT_API_KEY") {
            self.coderabbit.api_key = key;
        }
        if let Some(token) = non_empty("GITHUB_TOKEN") {
            self.github.token = token;
        }
        if let Some(mode) = non_empty("GITHUB_COMMENT_MODE") {
            self.github.comment_mode = mode.trim().to_lowercase();
        }
        if let Some(path) = non_empty("REVDASH_DATABASE_PATH") {
            self.database.path = path;
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.github.comment_mode.as_str(), "review" | "issue") {
            return Err(RevdashError::Config(format!(
                "github.comment_mode must be \"review\" or \"issue\", got \"{}\"",
                self.github.comment_mode
            )));
        }
        if self.coderabbit.timeout_secs == 0 {
            return Err(RevdashError::Config(
                "coderabbit.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.chat.history_limit == 0 {
            return Err(RevdashError::Config(
                "chat.history_limit must be greater than zero".to_string(),
            ));
        }
        for (name, base) in [
            ("coderabbit.api_base", &self.coderabbit.api_base),
            ("github.api_base", &self.github.api_base),
        ] {
            let parsed = url::Url::parse(base)
                .map_err(|e| RevdashError::Config(format!("{name} is not a valid URL: {e}")))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(RevdashError::Config(format!(
                    "{name} must use http or https, got \"{}\"",
                    parsed.scheme()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.database.path, "data/chat.db");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, "logs/revdash.log");
        assert!(config.web.cors_origins.is_empty());
        assert!(!config.web.serve_static);
        assert_eq!(config.web.static_path, "static");
        assert_eq!(config.chat.history_limit, 200);
        assert_eq!(config.coderabbit.api_base, "https://api.coderabbit.ai/api/v1");
        assert!(config.coderabbit.api_key.is_empty());
        assert_eq!(config.coderabbit.timeout_secs, 60);
        assert_eq!(config.coderabbit.sync_days, 7);
        assert_eq!(config.github.api_base, "https://api.github.com");
        assert_eq!(config.github.comment_mode, "review");
        assert_eq!(config.github.per_page, 100);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000

[database]
path = "custom/chat.sqlite"

[logging]
level = "debug"
file = "custom/logs/app.log"

[web]
cors_origins = ["http://localhost:5173"]
serve_static = true
static_path = "public"

[chat]
history_limit = 50

[coderabbit]
api_base = "http://localhost:4000/api/v1"
api_key = "cr-key"
timeout_secs = 10
sync_days = 14

[github]
api_base = "http://localhost:4001"
token = "ghp_test"
comment_mode = "issue"
per_page = 30
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.database.path, "custom/chat.sqlite");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.web.cors_origins, vec!["http://localhost:5173"]);
        assert!(config.web.serve_static);
        assert_eq!(config.web.static_path, "public");
        assert_eq!(config.chat.history_limit, 50);
        assert_eq!(config.coderabbit.api_key, "cr-key");
        assert_eq!(config.coderabbit.timeout_secs, 10);
        assert_eq!(config.coderabbit.sync_days, 14);
        assert_eq!(config.github.token, "ghp_test");
        assert_eq!(config.github.comment_mode, "issue");
        assert_eq!(config.github.per_page, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.chat.history_limit, 200);
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("[server\nport = 1");
        match result {
            Err(RevdashError::Config(msg)) => assert!(msg.contains("config parse error")),
            other => panic!("Expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load("nonexistent-revdash.toml");
        assert!(matches!(result, Err(RevdashError::Io(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = 8123").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.port, 8123);
    }

    #[test]
    fn test_apply_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("CODERABBIT_API_KEY", "env-key"),
            ("GITHUB_TOKEN", "env-token"),
            ("GITHUB_COMMENT_MODE", " Issue "),
            ("REVDASH_DATABASE_PATH", "/tmp/chat.db"),
        ]);

        let mut config = Config::default();
        config.apply_overrides_from(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.coderabbit.api_key, "env-key");
        assert_eq!(config.github.token, "env-token");
        assert_eq!(config.github.comment_mode, "issue");
        assert_eq!(config.database.path, "/tmp/chat.db");
    }

    #[test]
    fn test_apply_overrides_empty_value() {
        let mut config = Config::default();
        config.github.token = "original".to_string();
        config.apply_overrides_from(|k| (k == "GITHUB_TOKEN").then(|| "  ".to_string()));

        assert_eq!(config.github.token, "original");
    }

    #[test]
    fn test_validate_comment_mode() {
        let mut config = Config::default();
        config.github.comment_mode = "pr".to_string();

        match config.validate() {
            Err(RevdashError::Config(msg)) => assert!(msg.contains("comment_mode")),
            other => panic!("Expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_zero_values() {
        let mut config = Config::default();
        config.coderabbit.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.chat.history_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_api_base() {
        let mut config = Config::default();
        config.github.api_base = "not a url".to_string();
        match config.validate() {
            Err(RevdashError::Config(msg)) => assert!(msg.contains("github.api_base")),
            other => panic!("Expected Config error, got {other:?}"),
        }

        let mut config = Config::default();
        config.coderabbit.api_base = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }
}
