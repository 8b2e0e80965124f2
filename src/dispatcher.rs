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

use crate::machine::{ScreenState, StartupScreen, TransitionError};
use crate::ports::LinkOpener;
use crate::screen::ActionKind;

use std::fmt::Display;
use std::sync::Arc;
use log;

/// A transient, non-fatal alert for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn error(message: &str) -> Self {
        Self { title: String::from("Error"), message: message.to_string() }
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        write!(f, "{}: {}", self.title, self.message)
    }
}

/// What pressing an action led to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub state: ScreenState,
    pub notice: Option<Notice>,
}

/// Carries out screen actions
pub struct ActionDispatcher {
    opener: Arc<dyn LinkOpener>,
}

impl ActionDispatcher {
    pub fn new(opener: Arc<dyn LinkOpener>) -> Self {
        Self { opener }
    }

    /// Presses the action at `index`; link failures become notices, never errors
    pub async fn dispatch(&self, screen: &mut StartupScreen, index: usize) -> Result<DispatchOutcome, TransitionError> {
        let action = screen.pressable(index)?.action.clone();
        log::debug!("dispatching {} action {:?}", action.kind, action.text);

        let (url, failure_message) = match &action.kind {
            ActionKind::Dismiss => {
                let state = screen.close()?;
                return Ok(DispatchOutcome { state, notice: None });
            },
            ActionKind::Redirect { url } => (url, "Unable to open link"),
            ActionKind::ForceUpdate { url } => (url, "Unable to open app store"),
        };

        match self.opener.open(url).await {
            Ok(()) => Ok(DispatchOutcome { state: screen.link_opened(&action.kind), notice: None }),
            Err(e) => {
                log::warn!("failed to open {} action link: {}", action.kind, e);
                Ok(DispatchOutcome { state: screen.state(), notice: Some(Notice::error(failure_message)) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::{ScreenAction, ScreenConfig};
    use crate::testing::{live_screen, RecordingOpener};
    use chrono::Utc;

    fn shown(config: ScreenConfig) -> StartupScreen {
        let mut screen = StartupScreen::new(config);
        screen.show(Utc::now()).unwrap();
        screen
    }

    fn action(text: &str, kind: ActionKind) -> ScreenAction {
        ScreenAction { text: text.into(), kind, is_primary: true }
    }

    #[tokio::test]
    async fn default_action_dismisses() {
        let opener = Arc::new(RecordingOpener::default());
        let dispatcher = ActionDispatcher::new(opener.clone());
        let mut screen = shown(ScreenConfig { is_blocking: false, button_text: "Got it".into(), ..live_screen() });

        assert_eq!(screen.actions().len(), 1);
        assert_eq!(screen.actions()[0].action.text, "Got it");
        assert!(screen.actions()[0].enabled);

        let outcome = dispatcher.dispatch(&mut screen, 0).await.unwrap();
        assert_eq!(outcome, DispatchOutcome { state: ScreenState::Dismissed, notice: None });
        assert!(opener.opened().is_empty());
    }

    #[tokio::test]
    async fn force_update_keeps_blocking_screen_up() {
        let opener = Arc::new(RecordingOpener::default());
        let dispatcher = ActionDispatcher::new(opener.clone());
        let mut screen = shown(ScreenConfig {
            is_blocking: true,
            actions: vec!(action("Update Now", ActionKind::ForceUpdate { url: "https://store/app".into() })),
            ..live_screen()
        });

        assert_eq!(screen.actions().len(), 1);
        let outcome = dispatcher.dispatch(&mut screen, 0).await.unwrap();
        assert_eq!(outcome, DispatchOutcome { state: ScreenState::Blocked, notice: None });
        assert!(outcome.state.is_visible());
        assert!(!screen.can_close());
        assert_eq!(opener.opened(), vec!(String::from("https://store/app")));

        /* And again: there is no way out */
        dispatcher.dispatch(&mut screen, 0).await.unwrap();
        assert_eq!(screen.state(), ScreenState::Blocked);
    }

    #[tokio::test]
    async fn force_update_failure_is_a_notice() {
        let dispatcher = ActionDispatcher::new(Arc::new(RecordingOpener::failing()));
        let mut screen = shown(ScreenConfig {
            actions: vec!(action("Update Now", ActionKind::ForceUpdate { url: "https://store/app".into() })),
            ..live_screen()
        });

        let outcome = dispatcher.dispatch(&mut screen, 0).await.unwrap();
        assert_eq!(outcome.state, ScreenState::Visible);
        assert_eq!(outcome.notice, Some(Notice::error("Unable to open app store")));
    }

    #[tokio::test]
    async fn redirect_dismisses_non_blocking_screens() {
        let opener = Arc::new(RecordingOpener::default());
        let dispatcher = ActionDispatcher::new(opener.clone());
        let mut screen = shown(ScreenConfig {
            actions: vec!(action("Learn More", ActionKind::Redirect { url: "https://promo".into() })),
            ..live_screen()
        });

        let outcome = dispatcher.dispatch(&mut screen, 0).await.unwrap();
        assert_eq!(outcome, DispatchOutcome { state: ScreenState::Dismissed, notice: None });
        assert_eq!(opener.opened(), vec!(String::from("https://promo")));
    }

    #[tokio::test]
    async fn redirect_keeps_blocking_screens() {
        let dispatcher = ActionDispatcher::new(Arc::new(RecordingOpener::default()));
        let mut screen = shown(ScreenConfig {
            is_blocking: true,
            actions: vec!(action("Release notes", ActionKind::Redirect { url: "https://notes".into() })),
            ..live_screen()
        });

        let outcome = dispatcher.dispatch(&mut screen, 0).await.unwrap();
        assert_eq!(outcome.state, ScreenState::Blocked);
    }

    #[tokio::test]
    async fn redirect_failure_leaves_state_unchanged() {
        let opener = Arc::new(RecordingOpener::failing());
        let dispatcher = ActionDispatcher::new(opener.clone());
        let mut screen = shown(ScreenConfig {
            is_blocking: false,
            actions: vec!(action("Learn More", ActionKind::Redirect { url: "https://promo".into() })),
            ..live_screen()
        });

        let outcome = dispatcher.dispatch(&mut screen, 0).await.unwrap();
        assert_eq!(outcome, DispatchOutcome {
            state: ScreenState::Visible,
            notice: Some(Notice::error("Unable to open link")),
        });
        assert_eq!(screen.state(), ScreenState::Visible);
        assert_eq!(opener.opened().len(), 1);
    }

    #[tokio::test]
    async fn refused_presses() {
        let opener = Arc::new(RecordingOpener::default());
        let dispatcher = ActionDispatcher::new(opener.clone());

        let mut blocking = shown(ScreenConfig { is_blocking: true, ..live_screen() });
        assert_eq!(dispatcher.dispatch(&mut blocking, 0).await, Err(TransitionError::ActionDisabled(0)));
        assert_eq!(dispatcher.dispatch(&mut blocking, 1).await, Err(TransitionError::UnknownAction(1)));

        let mut dismissed = shown(live_screen());
        dispatcher.dispatch(&mut dismissed, 0).await.unwrap();
        assert_eq!(
            dispatcher.dispatch(&mut dismissed, 0).await,
            Err(TransitionError::InvalidState("act on", ScreenState::Dismissed))
        );
        assert!(opener.opened().is_empty());
    }
}
