use crate::utils::error::{CheckError, Result};
use crate::utils::validation::{
    validate_domain_pattern, validate_positive_number, validate_request_path,
    validate_time_format, Validate,
};
use clap::Parser;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "domain-check")]
#[command(about = "Checks that domains found in a web-server config resolve to the expected servers and serve two paths over HTTP")]
pub struct CheckConfig {
    /// Path to the web-server configuration file to scan for domains
    pub config_file: Option<PathBuf>,

    /// Number of concurrent domain workers
    #[arg(long, default_value = "10")]
    pub workers: usize,

    /// Address a domain is expected to resolve to; repeat or comma-separate for more
    #[arg(long = "expected-address", value_delimiter = ',')]
    pub expected_addresses: Vec<IpAddr>,

    /// First request path probed on every validated domain
    #[arg(long, default_value = "/")]
    pub path1: String,

    /// Second request path probed on every validated domain
    #[arg(long, default_value = "/index.html")]
    pub path2: String,

    /// Per-request HTTP timeout in seconds
    #[arg(long, default_value = "5")]
    pub timeout_secs: u64,

    /// Port used for the HTTP probes
    #[arg(long, default_value = "80")]
    pub http_port: u16,

    /// Line pattern matching one domain per config line; the single capture
    /// group is the domain name
    #[arg(long, default_value = r"^\s*server_name\s+([A-Za-z0-9._-]+);\s*$")]
    pub domain_pattern: String,

    /// Directory for the two run log files; defaults to the executable's directory
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Timestamp format prefixed to every log line
    #[arg(long, default_value = "%Y-%m-%d %H:%M:%S")]
    pub time_log_format: String,

    /// Timestamp format used in log file names
    #[arg(long, default_value = "%Y%m%d-%H%M")]
    pub time_file_format: String,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,
}

impl CheckConfig {
    pub fn expected_set(&self) -> HashSet<IpAddr> {
        self.expected_addresses.iter().copied().collect()
    }

    pub fn compiled_pattern(&self) -> Result<Regex> {
        validate_domain_pattern("domain_pattern", &self.domain_pattern)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Log files land beside the executable unless --log-dir says otherwise.
    pub fn resolve_log_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.log_dir {
            return Ok(dir.clone());
        }

        let exe = std::env::current_exe()?;
        exe.parent()
            .map(|p| p.to_path_buf())
            .ok_or_else(|| CheckError::ConfigError {
                message: "cannot determine the executable's directory for log files".to_string(),
            })
    }
}

impl Validate for CheckConfig {
    fn validate(&self) -> Result<()> {
        validate_positive_number("workers", self.workers, 1)?;
        validate_positive_number("timeout_secs", self.timeout_secs as usize, 1)?;
        validate_request_path("path1", &self.path1)?;
        validate_request_path("path2", &self.path2)?;
        validate_time_format("time_log_format", &self.time_log_format)?;
        validate_time_format("time_file_format", &self.time_file_format)?;
        self.compiled_pattern()?;

        if self.expected_addresses.is_empty() {
            return Err(CheckError::ConfigError {
                message: "expected_addresses: provide at least one --expected-address".to_string(),
            });
        }

        Ok(())
    }
}
