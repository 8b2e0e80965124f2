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

use crate::eligibility::evaluate;
use crate::ports::{Clock, DeviceContext, FetchError, KeyValueStore, Transport};
use crate::ports::store::ShownRecord;
use crate::screen::{ScreenConfig, ScreenRequest};

use std::sync::Arc;
use std::time::Duration;
use chrono::{DateTime, Utc};
use tokio;
use log;

/// Outcome of one fetch/evaluate cycle
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub config: Option<ScreenConfig>,
    pub should_show: bool,
    /// The time eligibility was evaluated at
    pub evaluated_at: DateTime<Utc>,
}

/// Turns the backend's answer and local state into a display decision
pub struct ConfigFetcher {
    transport: Arc<dyn Transport>,
    device: Arc<dyn DeviceContext>,
    shown: ShownRecord,
    clock: Arc<dyn Clock>,
    health_timeout: Duration,
}

impl ConfigFetcher {
    pub fn new(
        transport: Arc<dyn Transport>,
        device: Arc<dyn DeviceContext>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        health_timeout: Duration,
    ) -> Self {
        Self {
            transport,
            device,
            shown: ShownRecord::new(store),
            clock,
            health_timeout,
        }
    }

    /// Health check, fetch, evaluation, and the shown record when the screen is due
    pub async fn fetch_decision(&self) -> Result<Decision, FetchError> {
        self.check_health().await?;

        let request = self.build_request().await;
        log::info!(
            device = request.device_id.as_str();
            "requesting startup screen from {} for {} {} (last shown: {:?})",
            self.transport, request.platform, request.app_version, request.last_shown_at
        );
        let config = self.transport.fetch_config(&request).await?;

        let now = self.clock.now();
        let should_show = evaluate(Some(&config), now);

        if should_show {
            /* Best effort: a failed write never prevents the display */
            if let Err(e) = self.shown.record(now).await {
                log::warn!("error recording startup screen shown: {}", e);
            }
        }

        log::debug!("startup screen decision: show={}", should_show);
        Ok(Decision { config: Some(config), should_show, evaluated_at: now })
    }

    /// Bounded health probe, a timeout counts as unavailable
    async fn check_health(&self) -> Result<(), FetchError> {
        match tokio::time::timeout(self.health_timeout, self.transport.health()).await {
            Ok(result) => result.map_err(|e| {
                log::warn!("health check failed for {}: {}", self.transport, e);
                e
            }),
            Err(_) => {
                log::warn!("health check timed out after {:?} for {}", self.health_timeout, self.transport);
                Err(FetchError::BackendUnavailable(format!("health check timed out after {:?}", self.health_timeout)))
            }
        }
    }

    async fn build_request(&self) -> ScreenRequest {
        ScreenRequest {
            app_version: self.device.app_version(),
            platform: self.device.platform(),
            device_id: self.device.device_id(),
            last_shown_at: self.shown.load().await,
        }
    }
}
