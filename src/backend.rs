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

use splashgate::config;
use splashgate::logging::init_logger;
use splashgate::mock;
use splashgate::screen::ScreenConfig;

use std::net::SocketAddr;
use std::sync::Arc;
use clap::Parser;
use warp;
use log;

#[derive(Parser)]
#[command(name = "splashgate-mock", about = "Serves a fixed startup screen for local development")]
struct Args {
    /// Path to the configuration file
    config: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    /* Set a panic hook: we want a task panic to crash the whole process */
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        default_panic(info);
        std::process::exit(1);
    }));

    let configuration = match config::get_configuration(args.config.as_ref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("failed to process configuration file: {}", e);
            std::process::exit(1);
        }
    };

    let _logger = match init_logger(&configuration.logging) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("failed to start logger: {}", e);
            std::process::exit(1);
        }
    };

    let screen = match configuration.mock.screen.clone() {
        Some(screen) => screen,
        None => {
            log::warn!("no screen configured, serving a hidden one");
            ScreenConfig::hidden()
        }
    };

    let address = SocketAddr::new(configuration.mock.ip, configuration.mock.port);
    log::info!("serving startup screen \"{}\" on {}", screen.title, address);
    warp::serve(mock::service(Arc::new(screen), &configuration.mock)).run(address).await;
}
