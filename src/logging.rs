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

use flexi_logger::{DeferredNow, FileSpec, FlexiLoggerError, LogSpecification, Logger, LoggerHandle};

/// Starts the logger; the handle must be kept alive for as long as logs are wanted
pub fn init_logger(log_config: &config::Logging) -> Result<LoggerHandle, FlexiLoggerError> {
    let mut spec = LogSpecification::builder();
    spec.module("splashgate", log_config.level);
    spec.module("splashgate_mock", log_config.level);
    let logger = Logger::with(spec.build());

    /* stdout belongs to the screen, logs go to stderr unless a file is given */
    let logger = match &log_config.file {
        Some(path) => logger.log_to_file(FileSpec::try_from(path)?).format(record_formatter),
        None => logger.log_to_stderr().format(record_formatter),
    };

    logger.start()
}

fn record_formatter(
    writer: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &log::Record) -> Result<(), std::io::Error> {
    writeln!(
        writer,
        "{} {} [{}]{} {}",
        now.format_rfc3339(),
        record.level(),
        record.module_path().unwrap_or("splashgate::<unknown>"),
        record.key_values().get("device".into()).map(|d| format!(" [{}]", d)).unwrap_or("".into()),
        record.args(),
    )
}
