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
use splashgate::dispatcher::{ActionDispatcher, DispatchOutcome};
use splashgate::fetcher::ConfigFetcher;
use splashgate::launcher::Launcher;
use splashgate::logging::init_logger;
use splashgate::ports::SystemClock;
use splashgate::ports::device::StaticDevice;
use splashgate::ports::http::HttpTransport;
use splashgate::ports::opener::CommandOpener;
use splashgate::ports::splash::ConsoleSplash;
use splashgate::ports::store::FileStore;
use splashgate::view::ScreenView;

use std::sync::Arc;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use log;

#[derive(Parser)]
#[command(name = "splashgate", about = "Checks for a startup screen, then shows it in the terminal")]
struct Args {
    /// Path to the configuration file
    config: Option<String>,
}

/// Reads one trimmed line, None on EOF or a broken stdin
async fn prompt(lines: &mut Lines<BufReader<Stdin>>, question: &str) -> Option<String> {
    println!("{}", question);
    match lines.next_line().await {
        Ok(line) => line.map(|l| String::from(l.trim())),
        Err(e) => {
            log::error!("failed to read from stdin: {}", e);
            None
        }
    }
}

/// The host application: splash, startup screen, then the main content
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    /* Locate and parse the configuration file, see config.rs */
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

    let splash = Arc::new(ConsoleSplash::show());

    let transport = match HttpTransport::new(&configuration.backend.url) {
        Ok(t) => t,
        Err(e) => {
            log::error!("failed to set up the backend transport: {}", e);
            std::process::exit(1);
        }
    };

    let storage_path = configuration.storage.resolve();
    log::debug!("keeping state in {}", storage_path.display());

    let fetcher = ConfigFetcher::new(
        Arc::new(transport),
        Arc::new(StaticDevice::from(&configuration.device)),
        Arc::new(FileStore::new(storage_path)),
        Arc::new(SystemClock),
        *configuration.backend.health_timeout,
    );
    let mut launcher = Launcher::new(fetcher, splash);
    let dispatcher = ActionDispatcher::new(Arc::new(CommandOpener::new(configuration.links.opener.as_deref())));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    /* Startup failures never block the app: the user may retry or carry on */
    let mut outcome = launcher.launch().await;
    while let Some(notice) = outcome.notice.as_ref() {
        println!("Error: {}", notice);
        match prompt(&mut lines, "Type r to retry, or press enter to continue:").await.as_deref() {
            Some("r") => outcome = launcher.retry().await,
            _ => break,
        }
    }

    if let Some(mut screen) = outcome.screen {
        while screen.state().is_visible() {
            println!("\n{}", ScreenView::new(&screen));
            let question = match screen.can_close() {
                true => "Pick an action, or c to close:",
                false => "Pick an action:",
            };
            let choice = match prompt(&mut lines, question).await {
                Some(choice) => choice,
                None => break,
            };

            let result = match choice.as_str() {
                "c" => screen.close().map(|state| DispatchOutcome { state, notice: None }),
                number => match number.parse::<usize>() {
                    Ok(n) if n >= 1 => dispatcher.dispatch(&mut screen, n - 1).await,
                    _ => {
                        println!("Unknown choice: {}", number);
                        continue;
                    }
                },
            };

            match result {
                Ok(DispatchOutcome { notice: Some(notice), .. }) => println!("{}", notice),
                Ok(_) => (),
                Err(e) => println!("{}", e),
            }
        }

        /* Out of input with the screen still up: the app content stays out of reach */
        if !screen.releases_app() {
            log::error!("startup screen still up ({:?}), not starting the app", screen.state());
            std::process::exit(1);
        }
    }

    println!("\nWelcome to the app!");
}
