use serde::Deserialize;
use skein_network::prelude::*;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing_core::LevelFilter;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] json5::Error),
    #[error("Network {network}: {source}")]
    InvalidName {
        network: String,
        #[source]
        source: InvalidNameError,
    },
    #[error("Session {0} is defined more than once")]
    DuplicateSession(String),
    #[error("Logs can't go to stdout; it carries the replication stream")]
    LogToStdout,
}

#[derive(Clone, Debug, serde::Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinLogTarget {
    Stdout,
    Stderr,
}

#[derive(Clone, Debug, serde::Serialize, Deserialize)]
#[serde(untagged)]
pub enum LogTarget {
    File { filename: PathBuf },
    Builtin(BuiltinLogTarget),
}

#[derive(Clone, Copy, Debug, serde::Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LogEntry {
    pub target: LogTarget,
    #[serde(default)]
    pub modules: Vec<String>,
    pub level: Option<LogLevel>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LoggingConfig {
    /// Directory for file targets
    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,
    pub default_level: Option<LogLevel>,
    #[serde(default)]
    pub module_levels: HashMap<String, LogLevel>,
    pub targets: Vec<LogEntry>,
}

impl LoggingConfig {
    pub fn writes_to_stdout(&self) -> bool {
        self.targets
            .iter()
            .any(|t| matches!(t.target, LogTarget::Builtin(BuiltinLogTarget::Stdout)))
    }
}

fn default_log_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for LoggingConfig {
    /// Informational messages and above to stderr; stdout carries the
    /// replication stream
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            default_level: None,
            module_levels: HashMap::new(),
            targets: vec![LogEntry {
                target: LogTarget::Builtin(BuiltinLogTarget::Stderr),
                modules: Vec::new(),
                level: Some(LogLevel::Info),
            }],
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(arg: LogLevel) -> LevelFilter {
        match arg {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Off => LevelFilter::OFF,
        }
    }
}

fn default_port() -> u16 {
    6667
}

/// One remote endpoint, as configured
#[derive(Clone, Debug, Deserialize)]
pub struct NetworkConfig {
    pub name: String,
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub nick: String,
    /// Defaults to the nickname
    pub username: Option<String>,
    /// Defaults to the nickname
    pub realname: Option<String>,
    #[serde(default)]
    pub channels: Vec<String>,
}

impl NetworkConfig {
    /// Validate names and fill in defaults
    pub fn to_settings(&self) -> Result<state::NetworkSettings, ConfigError> {
        let invalid = |source| ConfigError::InvalidName {
            network: self.name.clone(),
            source,
        };

        let nick = Nickname::from_str(&self.nick).map_err(invalid)?;
        let channels = self
            .channels
            .iter()
            .map(|c| ChannelName::from_str(c))
            .collect::<Result<Vec<_>, _>>()
            .map_err(invalid)?;

        Ok(state::NetworkSettings {
            name: self.name.clone(),
            host: self.host.clone(),
            port: self.port,
            username: self.username.clone().unwrap_or_else(|| self.nick.clone()),
            realname: self.realname.clone().unwrap_or_else(|| self.nick.clone()),
            nick,
            channels,
        })
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct SessionConfig {
    pub id: String,
    pub networks: Vec<NetworkConfig>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    pub sessions: Vec<SessionConfig>,
}

impl ClientConfig {
    /// Load configuration from a file
    pub fn load_file<P: AsRef<Path>>(filename: P) -> Result<Self, ConfigError> {
        let config = std::fs::read_to_string(filename)?;
        Self::parse(&config)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(json5::from_str(text)?)
    }

    /// Check everything that can be checked without connecting
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.logging.writes_to_stdout() {
            return Err(ConfigError::LogToStdout);
        }

        let mut seen = HashSet::new();
        for session in &self.sessions {
            if !seen.insert(&session.id) {
                return Err(ConfigError::DuplicateSession(session.id.clone()));
            }
            for network in &session.networks {
                network.to_settings()?;
            }
        }
        Ok(())
    }
}
