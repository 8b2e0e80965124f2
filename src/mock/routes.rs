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

use crate::screen::{ScreenConfig, ScreenRequest};

use std::sync::Arc;
use chrono::Utc;
use serde_json;
use warp;
use log;

/// Health route
pub async fn health() -> Result<impl warp::Reply, warp::Rejection> {
    Ok(warp::reply::json(&serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    })))
}

/// Startup screen route: every client gets the same screen
pub async fn startup_screen(screen: Arc<ScreenConfig>, request: ScreenRequest) -> Result<impl warp::Reply, warp::Rejection> {
    log::info!(
        device = request.device_id.as_str();
        "startup screen request: app_version={} platform={} last_shown_at={:?}",
        request.app_version, request.platform, request.last_shown_at
    );
    Ok(warp::reply::json(screen.as_ref()))
}
