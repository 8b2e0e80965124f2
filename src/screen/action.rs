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

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// What pressing an action button does, as sent in the "type" field
/// Redirects and force updates cannot exist without a URL
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionKind {
    /// Close the screen
    Dismiss,
    /// Open a link, close the screen if it is not blocking
    Redirect { url: String },
    /// Open the store/update link, never close the screen
    ForceUpdate { url: String },
}

impl ActionKind {
    /// The link to open, if any
    pub fn url(&self) -> Option<&str> {
        match self {
            ActionKind::Dismiss => None,
            ActionKind::Redirect { url } | ActionKind::ForceUpdate { url } => Some(url.as_str()),
        }
    }
}

impl Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        f.write_str(match self {
            ActionKind::Dismiss => "dismiss",
            ActionKind::Redirect { .. } => "redirect",
            ActionKind::ForceUpdate { .. } => "force_update",
        })
    }
}

/// An action button on the startup screen
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ScreenAction {
    pub text: String,
    #[serde(flatten)]
    pub kind: ActionKind,
    #[serde(default)]
    pub is_primary: bool,
}

impl ScreenAction {
    /// Builds a plain dismiss action
    pub fn dismiss(text: &str, is_primary: bool) -> Self {
        Self {
            text: text.to_string(),
            kind: ActionKind::Dismiss,
            is_primary,
        }
    }
}
