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

//! Everything the startup screen core needs from the host application

pub mod device;
pub mod http;
pub mod opener;
pub mod splash;
pub mod store;

use crate::screen::{Platform, ScreenConfig, ScreenRequest};

use std::fmt::Display;
use chrono::{DateTime, Utc};
use thiserror::Error;
use async_trait::async_trait;

/// Errors which end the startup screen flow for this launch
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Health check failed or timed out
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Non-2xx reply or malformed body, with the HTTP status when there was one
    #[error("failed to fetch startup screen config: {message}")]
    ConfigFetch { status: Option<u16>, message: String },
}

/// Local storage failures, never fatal
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    #[error("failed to read {0}: {1}")]
    Read(String, String),
    #[error("failed to write {0}: {1}")]
    Write(String, String),
}

/// External link failures, reported to the user as a notice
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkOpenError {
    #[error("malformed URL {0}: {1}")]
    InvalidUrl(String, String),
    #[error("no application available to open {0}")]
    NoHandler(String),
    #[error("failed to open {0}: {1}")]
    Failed(String, String),
}

/// Native splash control failure, logged and swallowed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SplashError {
    #[error("failed to hide splash screen: {0}")]
    Hide(String),
}

/// Network access to the startup screen backend
#[async_trait]
pub trait Transport: Display + Send + Sync {
    /// Succeeds iff the backend answers its health route with a 2xx
    async fn health(&self) -> Result<(), FetchError>;
    /// Submits the request and parses the configuration
    async fn fetch_config(&self, request: &ScreenRequest) -> Result<ScreenConfig, FetchError>;
}

/// String key-value persistence
#[async_trait]
pub trait KeyValueStore: Display + Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;
}

/// Identifies the app and the device it runs on
pub trait DeviceContext: Send + Sync {
    fn app_version(&self) -> String;
    fn device_id(&self) -> String;
    fn platform(&self) -> Platform;
}

/// Hands URLs over to a browser or store app
#[async_trait]
pub trait LinkOpener: Send + Sync {
    async fn open(&self, url: &str) -> Result<(), LinkOpenError>;
}

/// The native splash screen
pub trait Splash: Send + Sync {
    fn hide(&self) -> Result<(), SplashError>;
}

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
