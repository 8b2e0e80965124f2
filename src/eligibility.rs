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

use crate::screen::ScreenConfig;

use chrono::{DateTime, Utc};

/// Decides whether a fetched configuration should be displayed at `now`
///
/// `show_screen` is the authoritative gate. The version bounds are not
/// compared here: the backend already targeted this request using the
/// app version it was sent, and the client trusts that answer.
pub fn evaluate(config: Option<&ScreenConfig>, now: DateTime<Utc>) -> bool {
    let config = match config {
        Some(c) if c.show_screen => c,
        _ => return false,
    };

    if config.is_expired(now) {
        log::info!("startup screen expired at {:?}, not showing", config.expires_at);
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::{ActionKind, ScreenAction};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    /// A handful of configurations varying every field but show_screen
    fn variations(show_screen: bool) -> Vec<ScreenConfig> {
        let base = ScreenConfig { show_screen, ..ScreenConfig::default() };
        vec!(
            base.clone(),
            ScreenConfig { is_blocking: true, ..base.clone() },
            ScreenConfig { expires_at: Some(now() + Duration::days(1)), ..base.clone() },
            ScreenConfig { expires_at: Some(now()), ..base.clone() },
            ScreenConfig { min_app_version: Some("99.0.0".into()), max_app_version: Some("0.0.1".into()), ..base.clone() },
            ScreenConfig {
                actions: vec!(ScreenAction {
                    text: "Update Now".into(),
                    kind: ActionKind::ForceUpdate { url: "https://store/app".into() },
                    is_primary: true,
                }),
                ..base.clone()
            },
        )
    }

    #[test]
    fn nothing_to_show() {
        assert!(!evaluate(None, now()));
        for config in variations(false) {
            assert!(!evaluate(Some(&config), now()), "{:?}", config);
        }
    }

    #[test]
    fn expired_screens_are_never_shown() {
        for delta in [Duration::seconds(1), Duration::hours(3), Duration::days(400)] {
            let config = ScreenConfig {
                show_screen: true,
                expires_at: Some(now() - delta),
                ..ScreenConfig::default()
            };
            assert!(!evaluate(Some(&config), now()));
        }
    }

    #[test]
    fn live_screens_are_shown() {
        for config in variations(true) {
            assert!(evaluate(Some(&config), now()), "{:?}", config);
        }
    }

    #[test]
    fn version_bounds_do_not_gate_on_the_client() {
        let config = ScreenConfig {
            show_screen: true,
            min_app_version: Some("3.0.0".into()),
            max_app_version: Some("3.1.0".into()),
            ..ScreenConfig::default()
        };
        assert!(evaluate(Some(&config), now()));
    }

    #[test]
    fn deterministic() {
        let config = ScreenConfig { show_screen: true, expires_at: Some(now()), ..ScreenConfig::default() };
        let first = evaluate(Some(&config), now());
        for _ in 0..10 {
            assert_eq!(evaluate(Some(&config), now()), first);
        }
    }
}
