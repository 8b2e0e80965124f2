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

use crate::screen::DEVICE_ID_HEADER;

use warp;
use warp::http::{HeaderMap, Method, StatusCode};
use std::convert::Infallible;
use std::net::SocketAddr;
use log;

pub fn cors(origins: &Vec<String>) -> warp::cors::Builder {
    let builder = warp::cors()
        .allow_methods(&[Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(["content-type", DEVICE_ID_HEADER]);

    match origins.is_empty() {
        true => builder.allow_any_origin(),
        false => builder.allow_origins(origins.iter().map(|s| s.as_str())),
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).map(|value| value.to_str().ok()).flatten()
}

/// Closest known client address: proxy headers first, then the socket peer
fn client_ip(headers: &HeaderMap, remote_addr: Option<SocketAddr>) -> String {
    header(headers, "x-real-ip")
        .or_else(|| header(headers, "x-forwarded-for").map(|chain| chain.split(',').next()).flatten())
        .map(|ip| String::from(ip.trim()))
        .or(remote_addr.map(|addr| addr.ip().to_string()))
        .unwrap_or(String::from("?"))
}

/// One access line per request, tagged with the device when the client names it
pub fn request_logger(request_info: warp::log::Info) {
    let headers = request_info.request_headers();
    log::info!(
        device = header(headers, DEVICE_ID_HEADER).unwrap_or("-");
        "[access] {} {} from {} ({}) status {} in {:?}",
        request_info.method(),
        request_info.path(),
        client_ip(headers, request_info.remote_addr()),
        request_info.user_agent().unwrap_or("unknown client"),
        request_info.status().as_u16(),
        request_info.elapsed(),
    );
}

/// Error replies carry a "message" field, which clients show to users
fn error_reply(message: &str, status: StatusCode) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(warp::reply::json(&serde_json::json!({ "message": message })), status)
}

pub async fn handle_rejection(rejection: warp::Rejection) -> Result<impl warp::Reply, Infallible> {
    log::debug!("rejecting request: {:?}", rejection);

    if rejection.is_not_found() {
        Ok(error_reply("Not found", StatusCode::NOT_FOUND))
    } else if let Some(_) = rejection.find::<warp::cors::CorsForbidden>() {
        Ok(error_reply("Origin not allowed", StatusCode::FORBIDDEN))
    } else if let Some(_) = rejection.find::<warp::reject::MethodNotAllowed>() {
        Ok(error_reply("Method not allowed", StatusCode::METHOD_NOT_ALLOWED))
    } else if let Some(_) = rejection.find::<warp::reject::LengthRequired>() {
        Ok(error_reply("Content length required", StatusCode::LENGTH_REQUIRED))
    } else if let Some(_) = rejection.find::<warp::reject::PayloadTooLarge>() {
        Ok(error_reply("Payload too large", StatusCode::PAYLOAD_TOO_LARGE))
    } else {
        Ok(error_reply("Invalid request body", StatusCode::BAD_REQUEST))
    }
}
