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

use crate::fetcher::{ConfigFetcher, Decision};
use crate::machine::StartupScreen;
use crate::ports::{FetchError, Splash};

use std::sync::Arc;
use log;

/// Shown in the app shell when the backend cannot be reached
pub const BACKEND_UNAVAILABLE_NOTICE: &str = "API service is not available";

/// Result of a launch, for the app shell
#[derive(Debug)]
pub struct LaunchOutcome {
    /// The startup screen, already visible, if one is due
    pub screen: Option<StartupScreen>,
    /// A user-facing error, the app remains usable
    pub notice: Option<String>,
}

/// The launch-time boundary: no error gets past it
pub struct Launcher {
    fetcher: ConfigFetcher,
    splash: Arc<dyn Splash>,
    splash_hidden: bool,
    /// Set when the last launch ended on a notice
    retryable: bool,
}

impl Launcher {
    pub fn new(fetcher: ConfigFetcher, splash: Arc<dyn Splash>) -> Self {
        Self { fetcher, splash, splash_hidden: false, retryable: false }
    }

    /// Runs a whole fetch/evaluate cycle, then lets go of the splash screen
    pub async fn launch(&mut self) -> LaunchOutcome {
        let outcome = match self.fetcher.fetch_decision().await {
            Ok(decision) => LaunchOutcome { screen: present(decision), notice: None },
            Err(FetchError::BackendUnavailable(reason)) => {
                log::warn!("API is not available, skipping startup screen check: {}", reason);
                LaunchOutcome { screen: None, notice: Some(BACKEND_UNAVAILABLE_NOTICE.to_string()) }
            },
            Err(FetchError::ConfigFetch { status, message }) => {
                log::error!("failed to fetch startup screen config (status {:?}): {}", status, message);
                LaunchOutcome { screen: None, notice: Some(message) }
            },
        };

        self.hide_splash();
        self.retryable = outcome.notice.is_some();
        outcome
    }

    /// User-triggered re-attempt, from scratch, only after a launch which ended on a notice
    pub async fn retry(&mut self) -> LaunchOutcome {
        if !self.retryable {
            log::debug!("nothing to retry, last launch went through");
            return LaunchOutcome { screen: None, notice: None };
        }
        log::info!("retrying startup screen check");
        self.launch().await
    }

    /// Once per launcher, failures are only logged
    fn hide_splash(&mut self) {
        if self.splash_hidden {
            return;
        }
        self.splash_hidden = true;
        if let Err(e) = self.splash.hide() {
            log::info!("splash screen: {}", e);
        }
    }
}

/// Builds and shows the screen a decision calls for
fn present(decision: Decision) -> Option<StartupScreen> {
    let config = match (decision.should_show, decision.config) {
        (true, Some(config)) => config,
        _ => return None,
    };

    let mut screen = StartupScreen::new(config);
    match screen.show(decision.evaluated_at) {
        Ok(_) => Some(screen),
        Err(e) => {
            log::warn!("not showing startup screen: {}", e);
            None
        }
    }
}
