// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use esp_mfg_models::DeviceModel;
use log::debug;
use std::io::{self, BufRead, Write};

use crate::{
    firmware, flash, monitor, ports, prompt, qr, station::Station, Config,
    Interrupt,
};

const RULE: &str = "==============================================";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlashKind {
    /// Erase the flash chip only.
    Erase,
    /// Write the downloaded firmware set, then run the monitor script.
    WriteAndMonitor,
}

/// Where the operator is in the tool. Every handler state returns to
/// `MainMenu` once it's done; `Exit` is the only terminal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    MainMenu,
    ModelSelect,
    Flashing(FlashKind),
    Monitoring,
    Printing,
    Exit,
}

fn banner<W: Write>(
    out: &mut W,
    title: &str,
    entries: &[&str],
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", RULE)?;
    writeln!(out, "{:^width$}", title, width = RULE.len())?;
    writeln!(out, "{}", RULE)?;
    for (i, entry) in entries.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, entry)?;
    }
    writeln!(out)
}

/// The interactive provisioning menu, driven one state at a time from
/// operator input on `input`. Console output goes to `out`.
pub struct Menu<'a, S: ?Sized, R, W> {
    station: &'a S,
    config: &'a Config,
    interrupt: Interrupt,
    input: R,
    out: W,
}

impl<'a, S, R, W> Menu<'a, S, R, W>
where
    S: Station + ?Sized,
    R: BufRead,
    W: Write,
{
    pub fn new(
        station: &'a S,
        config: &'a Config,
        interrupt: Interrupt,
        input: R,
        out: W,
    ) -> Self {
        Menu {
            station,
            config,
            interrupt,
            input,
            out,
        }
    }

    /// Run from the main menu until the operator exits or input closes.
    /// Only console I/O failures are returned; everything else is reported
    /// to the operator and the menu carries on.
    pub fn run(&mut self) -> io::Result<()> {
        let mut state = State::MainMenu;
        while state != State::Exit {
            state = self.step(state)?;
        }
        Ok(())
    }

    /// Perform the work of `state` and return the state to move to.
    pub fn step(&mut self, state: State) -> io::Result<State> {
        debug!("state: {:?}", state);

        match state {
            State::MainMenu => self.main_menu(),
            State::ModelSelect => self.model_select(),
            State::Flashing(kind) => {
                if let Some(port) = self.select_port()? {
                    match kind {
                        FlashKind::Erase => flash::erase(
                            self.station,
                            self.config,
                            &port,
                            &mut self.out,
                        )?,
                        FlashKind::WriteAndMonitor => flash::write_and_monitor(
                            self.station,
                            self.config,
                            &port,
                            &mut self.out,
                        )?,
                    }
                }
                Ok(State::MainMenu)
            }
            State::Monitoring => {
                if let Some(port) = self.select_port()? {
                    monitor::monitor(
                        self.station,
                        self.config,
                        &port,
                        &self.interrupt,
                        &mut self.out,
                    )?;
                }
                Ok(State::MainMenu)
            }
            State::Printing => {
                qr::print(self.station, self.config, &mut self.out)?;
                Ok(State::MainMenu)
            }
            State::Exit => Ok(State::Exit),
        }
    }

    fn select_port(&mut self) -> io::Result<Option<String>> {
        ports::select_port(self.station, &mut self.input, &mut self.out)
    }

    fn main_menu(&mut self) -> io::Result<State> {
        banner(
            &mut self.out,
            "ESP32 Tools Menu",
            &[
                "Flash",
                "Update Firmware and Monitor Serial",
                "Print QR Code",
                "Select Device Model",
                "Exit",
                "Ver Monitor Serial",
            ],
        )?;

        let Some(choice) =
            prompt(&mut self.input, &mut self.out, "Select an option: ")?
        else {
            return Ok(State::Exit);
        };

        let next = match choice.as_str() {
            "1" => State::Flashing(FlashKind::Erase),
            "2" => State::Flashing(FlashKind::WriteAndMonitor),
            "3" => State::Printing,
            "4" => State::ModelSelect,
            "5" => State::Exit,
            "6" => State::Monitoring,
            _ => {
                writeln!(self.out, "Invalid option.")?;
                State::MainMenu
            }
        };

        Ok(next)
    }

    fn model_select(&mut self) -> io::Result<State> {
        let mut entries: Vec<String> =
            DeviceModel::ALL.iter().map(|m| m.to_string()).collect();
        entries.push(String::from("Exit"));
        let entries: Vec<&str> = entries.iter().map(|e| e.as_str()).collect();
        banner(&mut self.out, "Select Device Model", &entries)?;

        let Some(choice) =
            prompt(&mut self.input, &mut self.out, "Select an option: ")?
        else {
            return Ok(State::Exit);
        };

        if let Some(model) = DeviceModel::from_menu_choice(&choice) {
            firmware::download(
                self.station,
                self.config,
                model,
                &mut self.out,
            )?;
            Ok(State::MainMenu)
        } else if choice == entries.len().to_string() {
            Ok(State::MainMenu)
        } else {
            writeln!(self.out, "Invalid selection.")?;
            Ok(State::ModelSelect)
        }
    }
}
