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

//! What a startup screen looks like, for whichever toolkit draws it

use crate::machine::StartupScreen;

use std::fmt::Display;
use lazy_static::lazy_static;
use regex::Regex;
use log;

pub const DEFAULT_BACKGROUND_COLOR: &str = "#4A90E2";
pub const DEFAULT_TEXT_COLOR: &str = "#FFFFFF";
pub const BLOCKING_NOTE: &str = "This update is required to continue using the app";

lazy_static! {
    static ref HEX_COLOR: Regex = Regex::new(r"^#(?:[0-9A-Fa-f]{3}|[0-9A-Fa-f]{6}|[0-9A-Fa-f]{8})$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBarStyle {
    /// Light text, for dark backgrounds
    LightContent,
    DarkContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    Primary,
    Secondary,
}

/// A single action button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonView {
    pub label: String,
    pub style: ButtonStyle,
    pub enabled: bool,
    /// None is transparent
    pub fill_color: Option<String>,
    pub label_color: String,
    pub border_color: Option<String>,
}

/// The whole screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenView {
    pub background_color: String,
    pub text_color: String,
    pub status_bar: StatusBarStyle,
    /// Drawn above the title
    pub image_url: Option<String>,
    pub title: String,
    pub message: String,
    pub buttons: Vec<ButtonView>,
    pub closable: bool,
    pub blocking_note: Option<&'static str>,
}

/// The configured color if it is a usable hex color, the default otherwise
fn color_or(configured: Option<&String>, default: &str) -> String {
    match configured {
        Some(c) if HEX_COLOR.is_match(c) => c.clone(),
        Some(c) => {
            log::warn!("ignoring invalid color {:?}, using {}", c, default);
            default.to_string()
        },
        None => default.to_string(),
    }
}

impl ScreenView {
    pub fn new(screen: &StartupScreen) -> Self {
        let config = screen.config();
        let background_color = color_or(config.background_color.as_ref(), DEFAULT_BACKGROUND_COLOR);
        let text_color = color_or(config.text_color.as_ref(), DEFAULT_TEXT_COLOR);

        let buttons = screen.actions().iter()
            .map(|offered| match offered.action.is_primary {
                true => ButtonView {
                    label: offered.action.text.clone(),
                    style: ButtonStyle::Primary,
                    enabled: offered.enabled,
                    fill_color: Some(text_color.clone()),
                    label_color: background_color.clone(),
                    border_color: None,
                },
                false => ButtonView {
                    label: offered.action.text.clone(),
                    style: ButtonStyle::Secondary,
                    enabled: offered.enabled,
                    fill_color: None,
                    label_color: text_color.clone(),
                    border_color: Some(text_color.clone()),
                },
            })
            .collect();

        Self {
            status_bar: match text_color.eq_ignore_ascii_case(DEFAULT_TEXT_COLOR) {
                true => StatusBarStyle::LightContent,
                false => StatusBarStyle::DarkContent,
            },
            image_url: config.image_url.clone().filter(|url| !url.is_empty()),
            title: config.title.clone(),
            message: config.message.clone(),
            buttons,
            closable: screen.can_close(),
            blocking_note: match config.is_blocking {
                true => Some(BLOCKING_NOTE),
                false => None,
            },
            background_color,
            text_color,
        }
    }
}

/// Plain text rendering, for terminals
impl Display for ScreenView {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        writeln!(f, "+{}+", "-".repeat(58))?;
        if let Some(image_url) = &self.image_url {
            writeln!(f, "  [image: {}]", image_url)?;
            writeln!(f)?;
        }
        writeln!(f, "  {}", self.title.to_uppercase())?;
        writeln!(f)?;
        for line in self.message.lines() {
            writeln!(f, "  {}", line)?;
        }
        writeln!(f)?;

        for (index, button) in self.buttons.iter().enumerate() {
            let label = match button.style {
                ButtonStyle::Primary => format!("[ {} ]", button.label),
                ButtonStyle::Secondary => format!("  {}  ", button.label),
            };
            let disabled = match button.enabled {
                true => "",
                false => " (disabled)",
            };
            writeln!(f, "  {}) {}{}", index + 1, label, disabled)?;
        }

        if let Some(note) = self.blocking_note {
            writeln!(f)?;
            writeln!(f, "  {}", note)?;
        }
        write!(f, "+{}+", "-".repeat(58))
    }
}
