/* splashgate - server-driven startup screens for mobile clients
 * Copyright (C) 2024 Withings
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published
 * by the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>. */

use crate::screen::{Platform, ScreenConfig};

use serde::{Serialize, Deserialize};
use std::net::IpAddr;
use std::fs::File;
use std::path::{Path, PathBuf};
use directories::ProjectDirs;
use serde_with::{DisplayFromStr, serde_as};
use thiserror::Error;
use serde_yaml;
use log;

/// Configuration defaults
pub mod defaults {
    use crate::screen::Platform;
    use std::net::{IpAddr, Ipv4Addr};
    use std::time::Duration;

    pub fn backend_url() -> String { String::from("http://localhost:8080/api/v1") }
    pub fn backend_health_timeout() -> humantime::Duration { Duration::from_secs(5).into() }

    pub fn device_app_version() -> String { String::from(env!("CARGO_PKG_VERSION")) }
    pub fn device_platform() -> Platform { Platform::Android }
    pub fn device_id() -> String { String::from("splashgate-cli") }

    pub fn logging_level() -> log::LevelFilter { log::LevelFilter::Info }

    pub fn mock_ip() -> IpAddr { IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)) }
    pub fn mock_port() -> u16 { 8080 }
    pub fn mock_payload_size_limit() -> u64 { 16 * 1024 }
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("{0}: {1}")]
    Io(String, std::io::Error),
    #[error("{0}: {1}")]
    Parse(String, serde_yaml::Error),
}

/// Backend block
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Backend {
    /// API root, routes are appended to it
    #[serde(default = "defaults::backend_url")]
    pub url: String,
    /// Give up on the health check after this long, eg. "5s"
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default = "defaults::backend_health_timeout")]
    pub health_timeout: humantime::Duration,
}

impl Default for Backend {
    /// Builds a default backend block in case none is provided
    fn default() -> Self {
        return Self {
            url: defaults::backend_url(),
            health_timeout: defaults::backend_health_timeout(),
        }
    }
}

/// Device block
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Device {
    #[serde(default = "defaults::device_app_version")]
    pub app_version: String,
    #[serde(default = "defaults::device_platform")]
    pub platform: Platform,
    #[serde(default = "defaults::device_id")]
    pub id: String,
}

impl Default for Device {
    /// Builds a default device block in case none is provided
    fn default() -> Self {
        return Self {
            app_version: defaults::device_app_version(),
            platform: defaults::device_platform(),
            id: defaults::device_id(),
        }
    }
}

/// Storage block
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Storage {
    /// Where local state lives, defaults to the XDG data directory
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Storage {
    /// The configured path, or one inferred for the current user
    pub fn resolve(&self) -> PathBuf {
        self.path.clone()
            .or(ProjectDirs::from("com", "withings", "splashgate").map(|dirs| dirs.data_dir().join("state.json")))
            .unwrap_or(PathBuf::from("splashgate-state.json"))
    }
}

/// Links block
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Links {
    /// Program used to open URLs, defaults to the desktop handler
    #[serde(default)]
    pub opener: Option<String>,
}

/// Logging block
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Logging {
    #[serde(default = "defaults::logging_level")]
    pub level: log::LevelFilter,
    /// Log to this file instead of stderr
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for Logging {
    /// Builds a default logging block in case none is provided
    fn default() -> Self {
        return Self {
            level: defaults::logging_level(),
            file: None,
        }
    }
}

/// Mock backend block
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Mock {
    /// The IP we're going to bind to
    #[serde(default = "defaults::mock_ip")]
    pub ip: IpAddr,
    /// The port we're going to listen on
    #[serde(default = "defaults::mock_port")]
    pub port: u16,
    /// Request bodies larger than this are refused
    #[serde(default = "defaults::mock_payload_size_limit")]
    pub payload_size_limit: u64,
    /// A list of allowed origins (CORS), any origin when empty
    #[serde(default)]
    pub origins: Vec<String>,
    /// The screen served to every client, none when absent
    #[serde(default)]
    pub screen: Option<ScreenConfig>,
}

impl Default for Mock {
    /// Builds a default mock block in case none is provided
    fn default() -> Self {
        return Self {
            ip: defaults::mock_ip(),
            port: defaults::mock_port(),
            payload_size_limit: defaults::mock_payload_size_limit(),
            origins: vec!(),
            screen: None,
        }
    }
}

/// The overall configuration file
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Configuration {
    #[serde(default)]
    pub backend: Backend,
    #[serde(default)]
    pub device: Device,
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub links: Links,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub mock: Mock,
}

/// Parse a configuration file given a path
fn parse_configuration_file(path: &Path) -> Result<Configuration, ConfigurationError> {
    let path_str = path.display().to_string();
    let file = File::open(path).map_err(|e| ConfigurationError::Io(path_str.clone(), e))?;
    let configuration = serde_yaml::from_reader(file).map_err(|e| ConfigurationError::Parse(path_str, e))?;
    Ok(configuration)
}

/// Locates and parses the configuration file, defaults apply when there is none
pub fn get_configuration(cmd_arg: Option<&String>) -> Result<Configuration, ConfigurationError> {
    let given_location = cmd_arg
        .map(|s| PathBuf::from(s))
        .or(std::env::var("SPLASHGATE_CONFIG").map(|s| PathBuf::from(s)).ok());

    /* If a path was given on the command line, ignore all other options */
    if let Some(path) = given_location {
        return parse_configuration_file(path.as_path());
    }

    /* Otherwise, try and guess */
    let xdg_dirs = ProjectDirs::from("com", "withings", "splashgate");
    let inferred_locations = [
        Some(PathBuf::from("/etc/splashgate/splashgate.yml")),
        Some(PathBuf::from("/etc/splashgate/splashgate.yaml")),
        xdg_dirs.as_ref().map(|dirs| PathBuf::from(dirs.config_dir()).join("splashgate.yml")),
        xdg_dirs.as_ref().map(|dirs| PathBuf::from(dirs.config_dir()).join("splashgate.yaml")),
        std::env::current_dir().map(|p| p.join("splashgate.yml")).ok(),
        std::env::current_dir().map(|p| p.join("splashgate.yaml")).ok(),
    ];

    match inferred_locations.iter().flatten().find(|p| p.as_path().is_file()) {
        Some(path) => parse_configuration_file(path),
        None => Ok(Configuration::default()),
    }
}
