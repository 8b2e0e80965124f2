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

//! A stand-in backend which serves one fixed startup screen

pub mod middleware;
pub mod routes;

use crate::config;
use crate::screen::ScreenConfig;

use std::convert::Infallible;
use std::sync::Arc;
use warp;
use warp::Filter;

fn with_screen(screen: Arc<ScreenConfig>) -> impl Filter<Extract = (Arc<ScreenConfig>,), Error = Infallible> + Clone {
    warp::any().map(move || screen.clone())
}

/// The API routes, under /api/v1
pub fn api(screen: Arc<ScreenConfig>, payload_size_limit: u64) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    /* Paths first, so that unknown paths are 404s rather than 405s */
    let health_route = warp::path!("api" / "v1" / "health")
        .and(warp::get())
        .and_then(routes::health);

    let startup_screen_route = warp::path!("api" / "v1" / "startup-screen")
        .and(warp::post())
        .and(with_screen(screen))
        .and(warp::body::content_length_limit(payload_size_limit))
        .and(warp::body::json())
        .and_then(routes::startup_screen);

    health_route.or(startup_screen_route)
}

/// The whole service: routes, CORS, error replies and access log
pub fn service(screen: Arc<ScreenConfig>, mock_config: &config::Mock) -> impl Filter<Extract = (impl warp::Reply,), Error = Infallible> + Clone {
    api(screen, mock_config.payload_size_limit)
        .with(middleware::cors(&mock_config.origins))
        .recover(middleware::handle_rejection)
        .with(warp::log::custom(middleware::request_logger))
}
