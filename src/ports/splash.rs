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

use crate::ports::{Splash, SplashError};

use std::io::Write;

/// A "Loading..." line on stderr standing in for the native splash screen
pub struct ConsoleSplash;

impl ConsoleSplash {
    /// Draws the splash right away
    pub fn show() -> Self {
        eprint!("Loading...");
        Self
    }
}

impl Splash for ConsoleSplash {
    fn hide(&self) -> Result<(), SplashError> {
        let mut stderr = std::io::stderr();
        /* Carriage return, then erase the whole line */
        write!(stderr, "\r\x1b[2K")
            .and_then(|_| stderr.flush())
            .map_err(|e| SplashError::Hide(e.to_string()))
    }
}
