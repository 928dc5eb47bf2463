// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use esp_mfg_models::PortDescriptor;
use log::{debug, info, warn};
use serialport::SerialPort;
use std::{
    fmt,
    io::{self, Read, Write},
    path::Path,
    process::{Command, ExitStatus},
    time::Duration,
};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::Config;

#[derive(Debug, Error)]
pub enum StationError {
    #[error("failed to enumerate serial ports: {0}")]
    Enumerate(serialport::Error),
    #[error("failed to open serial port {port}: {source}")]
    Open {
        port: String,
        source: serialport::Error,
    },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("failed to run {program}: {source}")]
    Spawn { program: String, source: io::Error },
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// How a subprocess ended. `code` is `None` when it was killed by a signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunStatus {
    pub code: Option<i32>,
}

impl RunStatus {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<ExitStatus> for RunStatus {
    fn from(status: ExitStatus) -> Self {
        RunStatus {
            code: status.code(),
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {}", code),
            None => write!(f, "terminated by signal"),
        }
    }
}

/// The host resources a provisioning session needs. `HostStation` is the
/// real thing, tests substitute a scripted station.
pub trait Station {
    /// Serial ports currently visible to the OS. Never cached.
    fn list_ports(&self) -> Result<Vec<PortDescriptor>, StationError>;
    /// Fetch `url` into `dest`, returning the number of bytes written.
    /// `dest` is left untouched when the request or the body transfer
    /// fails.
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64, StationError>;
    /// Run `program` to completion with inherited stdio.
    fn run(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
    ) -> Result<RunStatus, StationError>;
    /// Open `port` for reading. Reads block for at most `timeout` and then
    /// fail with `ErrorKind::TimedOut`.
    fn open_serial(
        &self,
        port: &str,
        baud: u32,
        timeout: Duration,
    ) -> Result<Box<dyn Read>, StationError>;
}

pub struct HostStation {
    client: reqwest::blocking::Client,
}

impl HostStation {
    pub fn new() -> Result<Self, StationError> {
        let client = reqwest::blocking::Client::builder().build()?;

        Ok(HostStation { client })
    }
}

struct SerialReader(Box<dyn SerialPort>);

impl Read for SerialReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf)
    }
}

impl Station for HostStation {
    fn list_ports(&self) -> Result<Vec<PortDescriptor>, StationError> {
        let ports = serialport::available_ports()
            .map_err(StationError::Enumerate)?;
        debug!("found {} serial ports", ports.len());

        Ok(ports.into_iter().map(PortDescriptor::from).collect())
    }

    fn fetch(&self, url: &str, dest: &Path) -> Result<u64, StationError> {
        info!("GET {}", url);
        let mut response = self.client.get(url).send()?.error_for_status()?;

        // stage next to `dest` so the final rename stays on one filesystem
        let dir = match dest.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut staged = NamedTempFile::new_in(dir)?;
        let size = response.copy_to(&mut staged)?;
        staged.flush()?;
        staged.persist(dest).map_err(|e| StationError::Io(e.error))?;
        debug!("wrote {} bytes to {}", size, dest.display());

        Ok(size)
    }

    fn run(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
    ) -> Result<RunStatus, StationError> {
        let mut cmd = Command::new(program);
        cmd.args(args).current_dir(cwd);

        info!("cmd: {:?}", cmd);

        let status = cmd.status().map_err(|e| StationError::Spawn {
            program: program.to_string(),
            source: e,
        })?;
        debug!("{} finished with {}", program, status);

        Ok(status.into())
    }

    fn open_serial(
        &self,
        port: &str,
        baud: u32,
        timeout: Duration,
    ) -> Result<Box<dyn Read>, StationError> {
        debug!("opening {} at {} baud, timeout {:?}", port, baud, timeout);
        let serial = serialport::new(port, baud)
            .timeout(timeout)
            .open()
            .map_err(|e| StationError::Open {
                port: port.to_string(),
                source: e,
            })?;

        Ok(Box::new(SerialReader(serial)))
    }
}

/// Run `python <args>` in the work directory. The tools we drive report
/// their own progress on the inherited stdio; a failure to start or a
/// non-zero exit is surfaced to the operator as a warning and otherwise
/// ignored. Returns whether the tool reported success.
pub fn run_python<S: Station + ?Sized, W: Write>(
    station: &S,
    config: &Config,
    args: &[String],
    out: &mut W,
) -> io::Result<bool> {
    match station.run(&config.python, args, &config.work_dir) {
        Ok(status) if status.success() => Ok(true),
        Ok(status) => {
            warn!("{} {:?} failed with {}", config.python, args, status);
            writeln!(
                out,
                "Warning: `{} {}` finished with {}.",
                config.python,
                args.join(" "),
                status
            )?;
            Ok(false)
        }
        Err(e) => {
            warn!("{}", e);
            writeln!(out, "Warning: {}", e)?;
            Ok(false)
        }
    }
}
