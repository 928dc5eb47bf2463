// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use esp_mfg_models::PortDescriptor;
use std::{
    cell::RefCell,
    fs,
    io::{self, Cursor, Read},
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    station::{RunStatus, Station, StationError},
    Interrupt,
};

/// What a scripted serial port does once its data runs out.
#[derive(Clone, Debug, Default)]
pub enum SerialEnd {
    /// Trip the interrupt and keep timing out, like an operator hitting
    /// Ctrl-C while the device is quiet.
    #[default]
    Interrupt,
    /// Fail the read, like a device being unplugged.
    Disconnect,
}

/// A `Station` that records what it was asked to do and serves scripted
/// ports, downloads and serial data.
#[derive(Default)]
pub struct MockStation {
    pub ports: Vec<PortDescriptor>,
    /// URLs that fail to download.
    pub missing: Vec<String>,
    /// Bytes the device sends on each `open_serial`.
    pub serial: Vec<u8>,
    pub serial_end: SerialEnd,
    pub serial_open_fails: bool,
    /// Tripped by the serial port once its data is exhausted.
    pub interrupt: Interrupt,
    /// Exit code for every subprocess, `None` means success.
    pub exit_code: Option<i32>,
    pub spawn_fails: bool,
    pub fetches_log: RefCell<Vec<(String, PathBuf)>>,
    pub runs_log: RefCell<Vec<(String, Vec<String>)>>,
    pub opened_log: RefCell<Vec<(String, u32)>>,
}

impl MockStation {
    pub fn with_ports(ports: &[&str]) -> Self {
        MockStation {
            ports: ports.iter().map(|p| PortDescriptor::new(*p)).collect(),
            ..Default::default()
        }
    }

    pub fn fetches(&self) -> Vec<(String, PathBuf)> {
        self.fetches_log.borrow().clone()
    }

    pub fn fetched_urls(&self) -> Vec<String> {
        self.fetches_log.borrow().iter().map(|(u, _)| u.clone()).collect()
    }

    pub fn runs(&self) -> Vec<(String, Vec<String>)> {
        self.runs_log.borrow().clone()
    }

    pub fn opened(&self) -> Vec<(String, u32)> {
        self.opened_log.borrow().clone()
    }
}

struct ScriptedSerial {
    data: Cursor<Vec<u8>>,
    end: SerialEnd,
    interrupt: Interrupt,
}

impl Read for ScriptedSerial {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.data.read(buf)?;
        if n > 0 {
            return Ok(n);
        }

        match self.end {
            SerialEnd::Interrupt => {
                self.interrupt.trip();
                Err(io::Error::new(io::ErrorKind::TimedOut, "timed out"))
            }
            SerialEnd::Disconnect => Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "device disconnected",
            )),
        }
    }
}

impl Station for MockStation {
    fn list_ports(&self) -> Result<Vec<PortDescriptor>, StationError> {
        Ok(self.ports.clone())
    }

    fn fetch(&self, url: &str, dest: &Path) -> Result<u64, StationError> {
        self.fetches_log
            .borrow_mut()
            .push((url.to_string(), dest.to_path_buf()));

        if self.missing.iter().any(|m| m == url) {
            return Err(StationError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                "404 Not Found",
            )));
        }

        fs::write(dest, url)?;
        Ok(url.len() as u64)
    }

    fn run(
        &self,
        program: &str,
        args: &[String],
        _cwd: &Path,
    ) -> Result<RunStatus, StationError> {
        self.runs_log.borrow_mut().push((program.to_string(), args.to_vec()));

        if self.spawn_fails {
            return Err(StationError::Spawn {
                program: program.to_string(),
                source: io::Error::new(
                    io::ErrorKind::NotFound,
                    "No such file or directory",
                ),
            });
        }

        Ok(RunStatus {
            code: Some(self.exit_code.unwrap_or(0)),
        })
    }

    fn open_serial(
        &self,
        port: &str,
        baud: u32,
        _timeout: Duration,
    ) -> Result<Box<dyn Read>, StationError> {
        self.opened_log.borrow_mut().push((port.to_string(), baud));

        if self.serial_open_fails {
            return Err(StationError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "Permission denied",
            )));
        }

        Ok(Box::new(ScriptedSerial {
            data: Cursor::new(self.serial.clone()),
            end: self.serial_end.clone(),
            interrupt: self.interrupt.clone(),
        }))
    }
}
