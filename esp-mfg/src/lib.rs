// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bench tooling for provisioning ESP32-S3 devices. An operator picks a
//! device model to fetch its firmware set, then erases / flashes a board
//! over a serial port with `esptool`, watches (and logs) its serial output,
//! and prints the QR label produced from the MAC address the device reports.
//!
//! Everything that touches the host (serial ports, the network,
//! subprocesses) goes through the `Station` trait. The interactive flow is
//! the `Menu` state machine.

use esp_mfg_models::DEFAULT_FIRMWARE_URL;
use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

pub mod firmware;
pub mod flash;
pub mod interrupt;
pub mod menu;
pub mod monitor;
pub mod ports;
pub mod qr;
pub mod station;

#[cfg(test)]
mod mock;

pub use crate::interrupt::Interrupt;
pub use crate::menu::{FlashKind, Menu, State};
pub use crate::station::{HostStation, RunStatus, Station, StationError};

/// Baud rate the device firmware logs at.
pub const MONITOR_BAUD: u32 = 460800;

/// Serial log, appended to by every monitoring session.
pub const LOG_FILE: &str = "serial_log.txt";

/// Knobs for the provisioning session. `Default` gives the values the bench
/// has always used.
#[derive(Clone, Debug)]
pub struct Config {
    /// Interpreter used for `esptool` and the helper scripts.
    pub python: String,
    /// Base URL of the firmware repository, model directories live below it.
    pub firmware_url: String,
    /// Where firmware images, the serial log and the QR image live. Also the
    /// working directory of every subprocess we start so `esptool` finds
    /// the images by their bare file names.
    pub work_dir: PathBuf,
    pub monitor_baud: u32,
    /// Relative paths are resolved against `work_dir`.
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            python: String::from("python"),
            firmware_url: String::from(DEFAULT_FIRMWARE_URL),
            work_dir: PathBuf::from("."),
            monitor_baud: MONITOR_BAUD,
            log_file: PathBuf::from(LOG_FILE),
        }
    }
}

impl Config {
    pub fn log_path(&self) -> PathBuf {
        self.work_dir.join(&self.log_file)
    }
}

/// Write `prompt` and read one line of operator input. The line ending is
/// stripped, nothing else. Returns `None` once input is closed.
pub fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    prompt: &str,
) -> io::Result<Option<String>> {
    write!(out, "{}", prompt)?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }

    let len = line.trim_end_matches(&['\r', '\n'][..]).len();
    line.truncate(len);

    Ok(Some(line))
}
