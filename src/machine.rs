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

//! Lifecycle of the startup screen modal, independent of any rendering

use crate::eligibility::evaluate;
use crate::screen::{ActionKind, ScreenAction, ScreenConfig};

use chrono::{DateTime, Utc};
use thiserror::Error;
use log;

/// Label of the synthesized action when the config has no button text
pub const DEFAULT_BUTTON_TEXT: &str = "Continue";

/// Where the modal is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    /// Not presented (yet)
    Hidden,
    /// Presented, the user may close it
    Visible,
    /// Presented, closing is disabled
    Blocked,
    /// Closed for good
    Dismissed,
}

impl ScreenState {
    pub fn is_visible(&self) -> bool {
        matches!(self, ScreenState::Visible | ScreenState::Blocked)
    }
}

/// Refused transitions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("startup screen is not eligible for display")]
    NotEligible,
    #[error("cannot {0} a startup screen in state {1:?}")]
    InvalidState(&'static str, ScreenState),
    #[error("blocking startup screens cannot be closed")]
    Blocking,
    #[error("no action at index {0}")]
    UnknownAction(usize),
    #[error("action {0} is disabled")]
    ActionDisabled(usize),
}

/// An action as offered to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferedAction {
    pub action: ScreenAction,
    pub enabled: bool,
}

/// A startup screen and its state
#[derive(Debug, Clone)]
pub struct StartupScreen {
    config: ScreenConfig,
    actions: Vec<OfferedAction>,
    state: ScreenState,
}

impl StartupScreen {
    /// Wraps a fetched configuration, hidden until shown
    pub fn new(config: ScreenConfig) -> Self {
        let actions = offered_actions(&config);
        Self { config, actions, state: ScreenState::Hidden }
    }

    pub fn config(&self) -> &ScreenConfig {
        &self.config
    }

    pub fn state(&self) -> ScreenState {
        self.state
    }

    pub fn actions(&self) -> &[OfferedAction] {
        &self.actions
    }

    /// Whether the close affordance (back button, close gesture) is available
    pub fn can_close(&self) -> bool {
        self.state == ScreenState::Visible
    }

    /// Whether the app content may be reached: never while the screen is still up
    pub fn releases_app(&self) -> bool {
        !self.state.is_visible()
    }

    /// Presents the screen, if it is eligible at `now`
    pub fn show(&mut self, now: DateTime<Utc>) -> Result<ScreenState, TransitionError> {
        if self.state != ScreenState::Hidden {
            return Err(TransitionError::InvalidState("show", self.state));
        }

        if !evaluate(Some(&self.config), now) {
            return Err(TransitionError::NotEligible);
        }

        self.state = match self.config.is_blocking {
            true => ScreenState::Blocked,
            false => ScreenState::Visible,
        };
        log::debug!("startup screen shown: {:?}", self.state);
        Ok(self.state)
    }

    /// Closes the screen, through a dismiss action or the close affordance
    pub fn close(&mut self) -> Result<ScreenState, TransitionError> {
        match self.state {
            ScreenState::Visible => {
                self.state = ScreenState::Dismissed;
                log::debug!("startup screen dismissed");
                Ok(self.state)
            },
            ScreenState::Blocked => Err(TransitionError::Blocking),
            state => Err(TransitionError::InvalidState("close", state)),
        }
    }

    /// Looks up an action the user may press right now
    pub fn pressable(&self, index: usize) -> Result<&OfferedAction, TransitionError> {
        if !self.state.is_visible() {
            return Err(TransitionError::InvalidState("act on", self.state));
        }

        let offered = self.actions.get(index).ok_or(TransitionError::UnknownAction(index))?;
        match offered.enabled {
            true => Ok(offered),
            false => Err(TransitionError::ActionDisabled(index)),
        }
    }

    /// Called once an action's link has been opened
    pub(crate) fn link_opened(&mut self, kind: &ActionKind) -> ScreenState {
        if let (ActionKind::Redirect { .. }, ScreenState::Visible) = (kind, self.state) {
            self.state = ScreenState::Dismissed;
            log::debug!("startup screen dismissed after redirect");
        }
        self.state
    }
}

/// The configured actions, or a single dismiss action when there are none
/// Dismissing is never offered on blocking screens
fn offered_actions(config: &ScreenConfig) -> Vec<OfferedAction> {
    let actions = match config.actions.is_empty() {
        true => {
            let label = match config.button_text.is_empty() {
                true => DEFAULT_BUTTON_TEXT,
                false => config.button_text.as_str(),
            };
            vec!(ScreenAction::dismiss(label, true))
        },
        false => config.actions.clone(),
    };

    actions.into_iter()
        .map(|action| OfferedAction {
            enabled: !(config.is_blocking && action.kind == ActionKind::Dismiss),
            action,
        })
        .collect()
}
