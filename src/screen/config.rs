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

use crate::screen::action::ScreenAction;

use std::collections::HashMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, skip_serializing_none, DefaultOnNull};

/// The startup screen configuration, as served by the backend
#[serde_as]
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ScreenConfig {
    /// Authoritative gate: nothing is shown when false
    #[serde(default)]
    pub show_screen: bool,
    /// Blocking screens cannot be closed
    #[serde(default)]
    pub is_blocking: bool,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    /// Label of the default action when no actions are given
    #[serde(default)]
    pub button_text: String,
    pub image_url: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    /// Version bounds, enforced by the backend only
    pub min_app_version: Option<String>,
    pub max_app_version: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub actions: Vec<ScreenAction>,
    /// Opaque, passed through untouched
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl ScreenConfig {
    /// The "nothing to show" configuration
    pub fn hidden() -> Self {
        Self::default()
    }

    /// Whether the screen has an expiry date which is strictly before now
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|expires_at| now > expires_at).unwrap_or(false)
    }
}
