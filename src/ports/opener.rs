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

use crate::ports::{LinkOpener, LinkOpenError};

use async_trait::async_trait;
use reqwest::Url;
use tokio::process::Command;
use log;

/// Platform default URL handler
#[cfg(target_os = "macos")]
const DEFAULT_OPENER: &str = "open";
#[cfg(not(target_os = "macos"))]
const DEFAULT_OPENER: &str = "xdg-open";

/// Opens links by running a desktop handler program with the URL as its only argument
pub struct CommandOpener {
    program: String,
}

impl CommandOpener {
    pub fn new(program: Option<&str>) -> Self {
        Self { program: program.unwrap_or(DEFAULT_OPENER).to_string() }
    }
}

/// Only absolute URLs are handed over
fn validate(url: &str) -> Result<Url, LinkOpenError> {
    Url::parse(url).map_err(|e| LinkOpenError::InvalidUrl(url.to_string(), e.to_string()))
}

#[async_trait]
impl LinkOpener for CommandOpener {
    async fn open(&self, url: &str) -> Result<(), LinkOpenError> {
        let url = validate(url)?;
        log::debug!("opening {} with {}", url, self.program);

        let status = Command::new(&self.program)
            .arg(url.as_str())
            .status()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => LinkOpenError::NoHandler(url.to_string()),
                _ => LinkOpenError::Failed(url.to_string(), e.to_string()),
            })?;

        match status.success() {
            true => Ok(()),
            false => Err(LinkOpenError::Failed(url.to_string(), format!("{} exited with {}", self.program, status))),
        }
    }
}
