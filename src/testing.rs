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

//! In-memory stand-ins for the host ports, for tests

use crate::ports::{Clock, FetchError, KeyValueStore, LinkOpener, LinkOpenError, PersistenceError, Splash, SplashError, Transport};
use crate::ports::device::StaticDevice;
use crate::screen::{Platform, ScreenConfig, ScreenRequest};

use std::fmt::Display;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub fn test_device() -> StaticDevice {
    StaticDevice::new("2.0.1", Platform::Ios, "device-under-test")
}

/// A plain, non-blocking, never expiring screen
pub fn live_screen() -> ScreenConfig {
    ScreenConfig {
        show_screen: true,
        title: "Welcome".into(),
        message: "Manage your home from anywhere.".into(),
        button_text: "Got it".into(),
        ..ScreenConfig::default()
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

enum Health {
    Up,
    Down,
    Hanging,
}

/// Scripted backend which remembers what it was asked
pub struct FakeTransport {
    health: Health,
    reply: Result<ScreenConfig, FetchError>,
    requests: Mutex<Vec<ScreenRequest>>,
}

impl FakeTransport {
    fn new(health: Health, reply: Result<ScreenConfig, FetchError>) -> Self {
        Self { health, reply, requests: Mutex::new(vec!()) }
    }

    pub fn serving(config: ScreenConfig) -> Self {
        Self::new(Health::Up, Ok(config))
    }

    pub fn failing(error: FetchError) -> Self {
        Self::new(Health::Up, Err(error))
    }

    pub fn unhealthy() -> Self {
        Self::new(Health::Down, Ok(ScreenConfig::hidden()))
    }

    /// Health check never answers in time
    pub fn hanging() -> Self {
        Self::new(Health::Hanging, Ok(ScreenConfig::hidden()))
    }

    pub fn requests(&self) -> Vec<ScreenRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Display for FakeTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        f.write_str("fake")
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn health(&self) -> Result<(), FetchError> {
        match self.health {
            Health::Up => Ok(()),
            Health::Down => Err(FetchError::BackendUnavailable("connection refused".into())),
            Health::Hanging => {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok(())
            }
        }
    }

    async fn fetch_config(&self, request: &ScreenRequest) -> Result<ScreenConfig, FetchError> {
        self.requests.lock().unwrap().push(request.clone());
        self.reply.clone()
    }
}

/// Every read and write fails
pub struct FailingStore;

impl Display for FailingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        f.write_str("failing")
    }
}

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Err(PersistenceError::Read(key.into(), "disk on fire".into()))
    }

    async fn set(&self, key: &str, _value: &str) -> Result<(), PersistenceError> {
        Err(PersistenceError::Write(key.into(), "disk on fire".into()))
    }
}

/// Remembers opened links, optionally failing every open
#[derive(Default)]
pub struct RecordingOpener {
    pub fail: bool,
    opened: Mutex<Vec<String>>,
}

impl RecordingOpener {
    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

#[async_trait]
impl LinkOpener for RecordingOpener {
    async fn open(&self, url: &str) -> Result<(), LinkOpenError> {
        self.opened.lock().unwrap().push(url.to_string());
        match self.fail {
            true => Err(LinkOpenError::NoHandler(url.to_string())),
            false => Ok(()),
        }
    }
}

/// Counts hide calls, optionally failing them
#[derive(Default)]
pub struct CountingSplash {
    pub fail: bool,
    hides: AtomicUsize,
}

impl CountingSplash {
    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    pub fn hides(&self) -> usize {
        self.hides.load(Ordering::SeqCst)
    }
}

impl Splash for CountingSplash {
    fn hide(&self) -> Result<(), SplashError> {
        self.hides.fetch_add(1, Ordering::SeqCst);
        match self.fail {
            true => Err(SplashError::Hide("no native module".into())),
            false => Ok(()),
        }
    }
}
