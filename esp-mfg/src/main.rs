// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Builder;
use esp_mfg::{Config, HostStation, Interrupt, Menu, LOG_FILE, MONITOR_BAUD};
use esp_mfg_models::DEFAULT_FIRMWARE_URL;
use log::{info, LevelFilter};
use std::{io, path::PathBuf};

/// Interactive bench tool for ESP32-S3 devices: download a model's firmware
/// set, erase / flash a board with esptool, monitor and log its serial
/// output, and print its QR label.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Python interpreter used to run esptool and the helper scripts
    #[clap(long, env, default_value = "python")]
    python: String,

    /// Base URL of the firmware repository
    #[clap(long, env, default_value = DEFAULT_FIRMWARE_URL)]
    firmware_url: String,

    /// Directory holding firmware images, the serial log and the QR image
    #[clap(long, env, default_value = ".")]
    work_dir: PathBuf,

    /// baud rate for the serial monitor
    #[clap(long, default_value_t = MONITOR_BAUD)]
    monitor_baud: u32,

    /// Serial log file, relative to the work directory
    #[clap(long, default_value = LOG_FILE)]
    log_file: PathBuf,

    /// verbosity
    #[clap(long, env)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut builder = Builder::from_default_env();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    builder.filter(None, level).init();

    let interrupt = Interrupt::install().context("set Ctrl-C handler")?;
    let station = HostStation::new().context("create HTTP client")?;

    let config = Config {
        python: args.python,
        firmware_url: args.firmware_url,
        work_dir: args.work_dir,
        monitor_baud: args.monitor_baud,
        log_file: args.log_file,
    };
    info!("config: {:?}", config);

    let mut menu = Menu::new(
        &station,
        &config,
        interrupt,
        io::stdin().lock(),
        io::stdout().lock(),
    );
    menu.run().context("console I/O")?;

    Ok(())
}
