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

//! Server-driven startup screens: decide at launch whether to show one,
//! then drive it until the user is let through (or told to update).

pub mod config;
pub mod dispatcher;
pub mod eligibility;
pub mod fetcher;
pub mod launcher;
pub mod logging;
pub mod machine;
#[cfg(feature = "mock")]
pub mod mock;
pub mod ports;
pub mod screen;
pub mod view;

#[cfg(test)]
mod testing;
