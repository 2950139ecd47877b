//! Process-wide configuration.
//!
//! Built once at startup from defaults overlaid by environment variables,
//! then passed by reference to every component. Nothing in the business
//! logic reads the environment directly.

/// Log level for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parses a level name, returning `None` for unrecognized values.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Directive string accepted by `tracing_subscriber::EnvFilter`.
    pub fn as_filter(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Transport selector for the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Stdio,
    Tcp,
}

/// Settings for the external signing executable.
#[derive(Debug, Clone)]
pub struct SignerConfig {
    /// Path to the uber-apk-signer executable (or its .jar).
    pub path: String,
    /// Subprocess execution timeout in milliseconds.
    pub timeout_ms: u64,
    /// Default log level when RUST_LOG is unset.
    pub log_level: LogLevel,
}

/// Settings for the server identity and transport.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub name: String,
    pub version: String,
    pub transport: Transport,
    pub tcp_host: String,
    pub tcp_port: u16,
}

/// Security limits.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub allow_insecure_connections: bool,
    /// Maximum APK file size in bytes.
    pub max_file_size: u64,
}

/// Complete server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub signer: SignerConfig,
    pub server: ServerConfig,
    pub security: SecurityConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            signer: SignerConfig {
                path: "uber-apk-signer".to_string(),
                timeout_ms: 300_000,
                log_level: LogLevel::Info,
            },
            server: ServerConfig {
                name: "uber-apk-signer-mcp".to_string(),
                version: "1.0.0".to_string(),
                transport: Transport::Stdio,
                tcp_host: "localhost".to_string(),
                tcp_port: 3000,
            },
            security: SecurityConfig {
                allow_insecure_connections: false,
                max_file_size: 100 * 1024 * 1024,
            },
        }
    }
}

impl Config {
    /// Loads configuration from environment variables with defaults.
    ///
    /// Unparseable numeric or enum values fall back to the default rather
    /// than failing startup.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("UBER_APK_SIGNER_PATH") {
            if !val.is_empty() {
                config.signer.path = val;
            }
        }

        if let Ok(val) = std::env::var("UBER_APK_SIGNER_TIMEOUT") {
            if let Ok(v) = val.parse() {
                config.signer.timeout_ms = v;
            }
        }

        if let Ok(val) = std::env::var("UBER_APK_SIGNER_LOG_LEVEL") {
            if let Some(level) = LogLevel::parse(&val) {
                config.signer.log_level = level;
            }
        }

        if let Ok(val) = std::env::var("MCP_SERVER_NAME") {
            if !val.is_empty() {
                config.server.name = val;
            }
        }

        if let Ok(val) = std::env::var("MCP_SERVER_VERSION") {
            if !val.is_empty() {
                config.server.version = val;
            }
        }

        if let Ok(val) = std::env::var("MCP_TRANSPORT") {
            match val.as_str() {
                "stdio" => config.server.transport = Transport::Stdio,
                "tcp" => config.server.transport = Transport::Tcp,
                _ => {}
            }
        }

        if let Ok(val) = std::env::var("MCP_TCP_HOST") {
            if !val.is_empty() {
                config.server.tcp_host = val;
            }
        }

        if let Ok(val) = std::env::var("MCP_TCP_PORT") {
            if let Ok(v) = val.parse() {
                config.server.tcp_port = v;
            }
        }

        if let Ok(val) = std::env::var("MCP_ALLOW_INSECURE") {
            config.security.allow_insecure_connections = val == "true";
        }

        if let Ok(val) = std::env::var("MCP_MAX_FILE_SIZE") {
            if let Ok(v) = val.parse() {
                config.security.max_file_size = v;
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.signer.path, "uber-apk-signer");
        assert_eq!(config.signer.timeout_ms, 300_000);
        assert_eq!(config.signer.log_level, LogLevel::Info);
        assert_eq!(config.server.name, "uber-apk-signer-mcp");
        assert_eq!(config.server.transport, Transport::Stdio);
        assert_eq!(config.server.tcp_host, "localhost");
        assert_eq!(config.server.tcp_port, 3000);
        assert!(!config.security.allow_insecure_connections);
        assert_eq!(config.security.max_file_size, 100 * 1024 * 1024);
    }

    #[test]
    fn env_overrides_are_applied() {
        temp_env::with_vars(
            [
                ("UBER_APK_SIGNER_PATH", Some("/opt/uber-apk-signer.jar")),
                ("UBER_APK_SIGNER_TIMEOUT", Some("60000")),
                ("UBER_APK_SIGNER_LOG_LEVEL", Some("debug")),
                ("MCP_TRANSPORT", Some("tcp")),
                ("MCP_TCP_PORT", Some("4000")),
                ("MCP_ALLOW_INSECURE", Some("true")),
            ],
            || {
                let config = Config::from_env();
                assert_eq!(config.signer.path, "/opt/uber-apk-signer.jar");
                assert_eq!(config.signer.timeout_ms, 60_000);
                assert_eq!(config.signer.log_level, LogLevel::Debug);
                assert_eq!(config.server.transport, Transport::Tcp);
                assert_eq!(config.server.tcp_port, 4000);
                assert!(config.security.allow_insecure_connections);
            },
        );
    }

    #[test]
    fn unparseable_values_fall_back_to_defaults() {
        temp_env::with_vars(
            [
                ("UBER_APK_SIGNER_TIMEOUT", Some("not-a-number")),
                ("UBER_APK_SIGNER_LOG_LEVEL", Some("verbose")),
                ("MCP_TRANSPORT", Some("websocket")),
            ],
            || {
                let config = Config::from_env();
                assert_eq!(config.signer.timeout_ms, 300_000);
                assert_eq!(config.signer.log_level, LogLevel::Info);
                assert_eq!(config.server.transport, Transport::Stdio);
            },
        );
    }
}
