// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use chrono::Local;
use log::{debug, info, warn};
use std::{
    fs::OpenOptions,
    io::{self, BufRead, BufReader, Read, Write},
    time::Duration,
};
use thiserror::Error;

use crate::{
    station::{Station, StationError},
    Config, Interrupt,
};

/// Read timeout on the monitored port. Also bounds how long a Ctrl-C takes
/// to be noticed.
pub const READ_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error(transparent)]
    Station(#[from] StationError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Decode serial output for display and logging. Device output is mostly
/// ASCII but garbage shows up around resets and baud changes: invalid UTF-8
/// sequences are dropped rather than replaced or treated as an error.
pub fn decode_lossy(bytes: &[u8]) -> String {
    let mut line = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        line.push_str(chunk.valid());
    }
    line
}

/// Marker separating sessions in the serial log.
pub fn session_marker() -> String {
    format!(
        "\n\n--- Serial session started at {} ---\n",
        Local::now().format("%Y-%m-%d %H:%M:%S%.6f")
    )
}

/// Splits a serial byte stream into lines. Reads time out when the device
/// is quiet; whatever arrived before a timeout is returned as a line of its
/// own.
pub struct LineReader<R> {
    inner: BufReader<R>,
}

impl<R: Read> LineReader<R> {
    pub fn new(inner: R) -> Self {
        LineReader {
            inner: BufReader::new(inner),
        }
    }

    /// The next line including its `\n`, if any. `Ok(None)` means the read
    /// timed out with nothing received.
    pub fn read_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut line = Vec::new();
        match self.inner.read_until(b'\n', &mut line) {
            Ok(0) => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "serial port closed",
            )),
            Ok(_) => Ok(Some(line)),
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
                ) =>
            {
                Ok((!line.is_empty()).then_some(line))
            }
            Err(e) => Err(e),
        }
    }
}

/// Copy lines from `serial` to `out` and `log` until `interrupt` trips or
/// something fails. Returns the number of lines logged.
pub fn pump<R: Read, L: Write, W: Write>(
    serial: R,
    log: &mut L,
    out: &mut W,
    interrupt: &Interrupt,
) -> io::Result<usize> {
    let mut lines = LineReader::new(serial);
    let mut count = 0;

    while !interrupt.is_tripped() {
        let Some(raw) = lines.read_line()? else {
            continue;
        };

        let line = decode_lossy(&raw);
        let line = line.trim_end();
        writeln!(out, "{}", line)?;
        writeln!(log, "{}", line)?;
        count += 1;
    }

    Ok(count)
}

fn session<S: Station + ?Sized, W: Write>(
    station: &S,
    config: &Config,
    port: &str,
    interrupt: &Interrupt,
    out: &mut W,
) -> Result<usize, MonitorError> {
    let serial = station.open_serial(port, config.monitor_baud, READ_TIMEOUT)?;

    let log_path = config.log_path();
    let mut log = OpenOptions::new().create(true).append(true).open(&log_path)?;
    info!("logging {} to {}", port, log_path.display());

    writeln!(out, "Monitoreando {}... (Presiona Ctrl+C para detener)", port)?;
    log.write_all(session_marker().as_bytes())?;

    let _armed = interrupt.arm();
    Ok(pump(serial, &mut log, out, interrupt)?)
}

/// Watch the device on `port`, echoing its output to the console and
/// appending it to the serial log. Runs until Ctrl-C or an error; either
/// way the port and the log are closed before returning to the menu.
pub fn monitor<S: Station + ?Sized, W: Write>(
    station: &S,
    config: &Config,
    port: &str,
    interrupt: &Interrupt,
    out: &mut W,
) -> io::Result<()> {
    match session(station, config, port, interrupt, out) {
        Ok(count) => {
            debug!("monitoring {} stopped after {} lines", port, count);
            writeln!(out, "\nMonitoreo detenido por el usuario.")
        }
        Err(e) => {
            warn!("monitoring {} failed: {}", port, e);
            writeln!(out, "Error: {}", e)
        }
    }
}
