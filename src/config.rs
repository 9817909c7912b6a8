//! Configuration management
//!
//! Settings are read from environment variables with defaults that reproduce
//! the stock deployment: build `janatonese/` with `flutter build web` and serve
//! the result on port 3000.
//!
//! # Environment Variables
//!
//! - `PORT`: listen port - default: 3000 (unparsable values count as unset)
//! - `HOST`: bind host - default: "0.0.0.0"
//! - `JANATONESE_FRONTEND_ROOT`: front-end project root - default: "janatonese"
//! - `JANATONESE_BUILD_TOOL`: build executable - default: "flutter"
//! - `JANATONESE_BUILD_ARGS`: whitespace-separated arguments - default: "build web"
//! - `JANATONESE_BUILD_TIMEOUT`: seconds before the build is killed, 0 disables - default: "900"
//! - `JANATONESE_WAIT_FOR_CONTENT`: hold requests until content is ready - default: "false"
//! - `JANATONESE_READY_TIMEOUT`: longest a held request waits, in seconds - default: "30"
//! - `JANATONESE_STRICT_FS`: exit when the fallback page cannot be written - default: "false"
//! - `JANATONESE_LOG_LEVEL`: logging level - default: "info"
//! - `JANATONESE_LOG_JSON`: emit JSON log lines - default: "false"

use std::env;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3000;
const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_FRONTEND_ROOT: &str = "janatonese";
const DEFAULT_BUILD_TOOL: &str = "flutter";
const DEFAULT_BUILD_ARGS: &str = "build web";
const DEFAULT_BUILD_TIMEOUT_SECS: u64 = 900;
const DEFAULT_READY_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Build output location relative to the front-end root.
pub const OUTPUT_SUBDIR: [&str; 2] = ["build", "web"];

/// Entry document inside the output directory.
pub const INDEX_FILE: &str = "index.html";

/// URL prefix under which the front-end project root is exposed.
pub const PROJECT_MOUNT: &str = "/janatonese";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,

    /// Root of the project the build tool runs in
    pub frontend_root: PathBuf,

    pub build_tool: String,
    pub build_args: Vec<String>,

    /// `None` lets the build run for as long as it takes
    pub build_timeout: Option<Duration>,

    /// Hold requests until the orchestration cycle reaches Ready
    pub wait_for_content: bool,
    pub ready_timeout: Duration,

    /// Treat a failed fallback write as fatal
    pub strict_fs: bool,

    pub log_level: String,
    pub log_json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl ServerConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_port(lookup("PORT").as_deref());

        let host = lookup("HOST")
            .and_then(|v| v.trim().parse::<IpAddr>().ok())
            .unwrap_or(DEFAULT_HOST);

        let frontend_root = lookup("JANATONESE_FRONTEND_ROOT")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FRONTEND_ROOT));

        let build_tool = lookup("JANATONESE_BUILD_TOOL")
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|| DEFAULT_BUILD_TOOL.to_string());

        let build_args = lookup("JANATONESE_BUILD_ARGS")
            .unwrap_or_else(|| DEFAULT_BUILD_ARGS.to_string())
            .split_whitespace()
            .map(str::to_string)
            .collect();

        let build_timeout = match lookup("JANATONESE_BUILD_TIMEOUT")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_BUILD_TIMEOUT_SECS)
        {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        let wait_for_content = parse_bool(lookup("JANATONESE_WAIT_FOR_CONTENT")).unwrap_or(false);

        let ready_timeout = Duration::from_secs(
            lookup("JANATONESE_READY_TIMEOUT")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(DEFAULT_READY_TIMEOUT_SECS),
        );

        let strict_fs = parse_bool(lookup("JANATONESE_STRICT_FS")).unwrap_or(false);

        let log_level = lookup("JANATONESE_LOG_LEVEL")
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        let log_json = parse_bool(lookup("JANATONESE_LOG_JSON")).unwrap_or(false);

        Self {
            host,
            port,
            frontend_root,
            build_tool,
            build_args,
            build_timeout,
            wait_for_content,
            ready_timeout,
            strict_fs,
            log_level,
            log_json,
        }
    }

    /// Checks values that would otherwise fail later at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.build_tool.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Build tool name must not be empty".to_string(),
            ));
        }

        if self.wait_for_content && self.ready_timeout.is_zero() {
            return Err(ConfigError::ValidationFailed(
                "Ready timeout must be at least 1 second when waiting for content".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    /// Directory the build tool writes to and the server reads from.
    pub fn output_dir(&self) -> PathBuf {
        OUTPUT_SUBDIR
            .iter()
            .fold(self.frontend_root.clone(), |path, part| path.join(part))
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Parses `PORT`. Missing, malformed or out-of-range values yield the default.
pub fn parse_port(raw: Option<&str>) -> u16 {
    raw.and_then(|v| v.trim().parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT)
}

fn parse_bool(raw: Option<String>) -> Option<bool> {
    raw.and_then(|v| match v.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    })
}

impl fmt::Display for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Server Configuration:")?;
        writeln!(f, "  Bind: {}", self.bind_addr())?;
        writeln!(f, "  Front-end Root: {}", self.frontend_root.display())?;
        writeln!(f, "  Output Dir: {}", self.output_dir().display())?;
        writeln!(
            f,
            "  Build Command: {} {}",
            self.build_tool,
            self.build_args.join(" ")
        )?;
        match self.build_timeout {
            Some(t) => writeln!(f, "  Build Timeout: {}s", t.as_secs())?,
            None => writeln!(f, "  Build Timeout: none")?,
        }
        writeln!(f, "  Wait For Content: {}", self.wait_for_content)?;
        writeln!(f, "  Strict FS: {}", self.strict_fs)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}
