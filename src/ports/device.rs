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

use crate::config;
use crate::ports::DeviceContext;
use crate::screen::Platform;

/// Device identity fixed at startup, usually from the configuration file
#[derive(Debug, Clone)]
pub struct StaticDevice {
    app_version: String,
    platform: Platform,
    device_id: String,
}

impl StaticDevice {
    pub fn new(app_version: &str, platform: Platform, device_id: &str) -> Self {
        Self {
            app_version: app_version.to_string(),
            platform,
            device_id: device_id.to_string(),
        }
    }
}

impl From<&config::Device> for StaticDevice {
    fn from(device: &config::Device) -> Self {
        Self::new(&device.app_version, device.platform, &device.id)
    }
}

impl DeviceContext for StaticDevice {
    fn app_version(&self) -> String {
        self.app_version.clone()
    }

    fn device_id(&self) -> String {
        self.device_id.clone()
    }

    fn platform(&self) -> Platform {
        self.platform
    }
}
