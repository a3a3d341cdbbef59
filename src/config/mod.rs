// Configuration module entry point
// Loads layered configuration and builds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

pub use state::AppState;
pub use types::{Config, CorpusConfig};

use crate::sampler::DEFAULT_CORPUS_URL;

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SAMPLER").separator("__"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("corpus.url", DEFAULT_CORPUS_URL)?
            .set_default("corpus.require_success_status", true)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::args().nth(1).unwrap_or_else(|| "config".to_string());
        Self::load_from(&path)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Keep-alive is on/off only; idle connections are still bounded by `connection_timeout`
    pub const fn keep_alive_enabled(&self) -> bool {
        self.performance.keep_alive_timeout > 0
    }

    /// Upper bound for a single connection, request handling included
    pub fn connection_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(std::cmp::max(
            self.performance.read_timeout,
            self.performance.write_timeout,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "corpus_sampler_{name}_{}.toml",
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("/nonexistent/corpus_sampler_config").unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.corpus.url, DEFAULT_CORPUS_URL);
        assert!(cfg.corpus.require_success_status);
        assert_eq!(cfg.corpus.timeout_secs, None);
        assert_eq!(cfg.corpus.max_body_size, None);
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert_eq!(cfg.performance.max_connections, None);
        assert!(cfg.keep_alive_enabled());
    }

    #[test]
    fn test_zero_keep_alive_disables_it() {
        let mut cfg = Config::load_from("/nonexistent/corpus_sampler_config").unwrap();
        cfg.performance.keep_alive_timeout = 0;
        assert!(!cfg.keep_alive_enabled());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let path = write_config(
            "override",
            r#"
[server]
port = 9090
workers = 2

[corpus]
url = "http://localhost:1234/lines.txt"
max_body_size = 1024
require_success_status = false

[performance]
read_timeout = 5
write_timeout = 12
max_connections = 100
"#,
        );

        let cfg = Config::load_from(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.workers, Some(2));
        assert_eq!(cfg.corpus.url, "http://localhost:1234/lines.txt");
        assert_eq!(cfg.corpus.max_body_size, Some(1024));
        assert!(!cfg.corpus.require_success_status);
        assert_eq!(cfg.performance.max_connections, Some(100));
        assert_eq!(cfg.connection_timeout().as_secs(), 12);
    }

    #[test]
    fn test_socket_addr() {
        let mut cfg = Config::load_from("/nonexistent/corpus_sampler_config").unwrap();
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 8080);

        cfg.server.host = "not a host".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }
}
