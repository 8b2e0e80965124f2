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

use crate::ports::{FetchError, Transport};
use crate::screen::{DEVICE_ID_HEADER, ScreenConfig, ScreenRequest};

use std::fmt::Display;
use async_trait::async_trait;
use serde_json;
use log;

/// Used when an error reply carries no message of its own
const GENERIC_FETCH_ERROR: &str = "Failed to fetch startup screen config";

/// Talks JSON over HTTP to the startup screen backend
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Builds a transport for an API root such as http://localhost:8080/api/v1
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("splashgate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::BackendUnavailable(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, route: &str) -> String {
        format!("{}/{}", self.base_url, route)
    }
}

/// Extracts the "message" field of an error body, if it has one
fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body).ok()
        .map(|v| v.get("message").map(|m| m.as_str().map(String::from)).flatten())
        .flatten()
        .unwrap_or(GENERIC_FETCH_ERROR.to_string())
}

impl Display for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        write!(f, "http:{}", self.base_url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn health(&self) -> Result<(), FetchError> {
        let response = self.client.get(self.url("health")).send().await
            .map_err(|e| FetchError::BackendUnavailable(e.to_string()))?;

        match response.status().is_success() {
            true => Ok(()),
            false => Err(FetchError::BackendUnavailable(format!("health check returned {}", response.status()))),
        }
    }

    async fn fetch_config(&self, request: &ScreenRequest) -> Result<ScreenConfig, FetchError> {
        let response = self.client.post(self.url("startup-screen"))
            .header(DEVICE_ID_HEADER, request.device_id.as_str())
            .json(request)
            .send()
            .await
            .map_err(|e| FetchError::ConfigFetch { status: None, message: e.to_string() })?;

        let status = response.status();
        let body = response.bytes().await
            .map_err(|e| FetchError::ConfigFetch { status: Some(status.as_u16()), message: e.to_string() })?;

        if !status.is_success() {
            let message = error_message(&body);
            log::debug!("startup screen endpoint returned {}: {}", status, message);
            return Err(FetchError::ConfigFetch { status: Some(status.as_u16()), message });
        }

        serde_json::from_slice(&body).map_err(|e| FetchError::ConfigFetch {
            status: Some(status.as_u16()),
            message: format!("malformed startup screen config: {}", e),
        })
    }
}

#[cfg(all(test, feature = "mock"))]
mod tests {
    use super::*;
    use crate::config;
    use crate::mock;
    use crate::screen::{ActionKind, Platform, ScreenAction};
    use std::net::SocketAddr;
    use std::sync::Arc;
    use warp::Filter;

    fn request() -> ScreenRequest {
        ScreenRequest {
            app_version: "2.3.0".into(),
            platform: Platform::Ios,
            device_id: "device-1".into(),
            last_shown_at: None,
        }
    }

    /// Runs a filter on an ephemeral port, yields the API root
    macro_rules! spawn {
        ($filter:expr) => {{
            let (addr, server) = warp::serve($filter).bind_ephemeral(SocketAddr::from(([127, 0, 0, 1], 0)));
            tokio::spawn(server);
            format!("http://{}/api/v1", addr)
        }};
    }

    #[tokio::test]
    async fn round_trip_through_mock_backend() {
        let screen = ScreenConfig {
            show_screen: true,
            is_blocking: true,
            title: "Update Required".into(),
            actions: vec!(ScreenAction {
                text: "Update Now".into(),
                kind: ActionKind::ForceUpdate { url: "https://store/app".into() },
                is_primary: true,
            }),
            ..ScreenConfig::default()
        };
        let base_url = spawn!(mock::service(Arc::new(screen.clone()), &config::Mock::default()));
        let transport = HttpTransport::new(&base_url).unwrap();

        assert_eq!(transport.health().await, Ok(()));
        assert_eq!(transport.fetch_config(&request()).await, Ok(screen));
    }

    #[tokio::test]
    async fn device_id_travels_as_a_header() {
        let base_url = spawn!(warp::path!("api" / "v1" / "startup-screen")
            .and(warp::header::<String>(DEVICE_ID_HEADER))
            .map(|device: String| warp::reply::json(&ScreenConfig { title: device, ..ScreenConfig::default() })));
        let transport = HttpTransport::new(&base_url).unwrap();
        let config = transport.fetch_config(&request()).await.unwrap();
        assert_eq!(config.title, "device-1");
    }

    #[tokio::test]
    async fn unreachable_backend() {
        /* Nothing listens on the discard port locally */
        let transport = HttpTransport::new("http://127.0.0.1:9/api/v1").unwrap();
        assert!(matches!(transport.health().await, Err(FetchError::BackendUnavailable(_))));
        assert!(matches!(transport.fetch_config(&request()).await, Err(FetchError::ConfigFetch { status: None, .. })));
    }

    #[tokio::test]
    async fn failing_health_route() {
        let base_url = spawn!(warp::path!("api" / "v1" / "health")
            .map(|| warp::reply::with_status("KO", warp::http::StatusCode::SERVICE_UNAVAILABLE)));
        let transport = HttpTransport::new(&base_url).unwrap();
        assert!(matches!(transport.health().await, Err(FetchError::BackendUnavailable(_))));
    }

    #[tokio::test]
    async fn error_replies_carry_server_message() {
        let base_url = spawn!(warp::path!("api" / "v1" / "startup-screen")
            .map(|| warp::reply::with_status(
                warp::reply::json(&serde_json::json!({"message": "maintenance in progress"})),
                warp::http::StatusCode::SERVICE_UNAVAILABLE,
            )));
        let transport = HttpTransport::new(&base_url).unwrap();
        assert_eq!(
            transport.fetch_config(&request()).await,
            Err(FetchError::ConfigFetch { status: Some(503), message: "maintenance in progress".into() })
        );
    }

    #[tokio::test]
    async fn error_replies_without_message() {
        let base_url = spawn!(warp::path!("api" / "v1" / "startup-screen")
            .map(|| warp::reply::with_status("oops", warp::http::StatusCode::INTERNAL_SERVER_ERROR)));
        let transport = HttpTransport::new(&base_url).unwrap();
        assert_eq!(
            transport.fetch_config(&request()).await,
            Err(FetchError::ConfigFetch { status: Some(500), message: GENERIC_FETCH_ERROR.into() })
        );
    }

    #[tokio::test]
    async fn malformed_config() {
        let base_url = spawn!(warp::path!("api" / "v1" / "startup-screen")
            .map(|| warp::reply::json(&serde_json::json!({"show_screen": "yes please"}))));
        let transport = HttpTransport::new(&base_url).unwrap();
        match transport.fetch_config(&request()).await {
            Err(FetchError::ConfigFetch { status: Some(200), message }) => assert!(message.starts_with("malformed")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn trailing_slashes_are_trimmed() {
        let transport = HttpTransport::new("http://backend/api/v1/").unwrap();
        assert_eq!(transport.url("health"), "http://backend/api/v1/health");
        assert_eq!(transport.to_string(), "http:http://backend/api/v1");
    }
}
