// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use log::debug;
use std::io::{self, Write};

use crate::{station::run_python, station::Station, Config};

/// Label image written by the monitor script once it has seen the device's
/// MAC address.
pub const QR_IMAGE: &str = "mac_qr.png";

pub const QR_SCRIPT: &str = "print_qr.py";

/// Send the QR label to the printer, if the monitor script has produced one.
pub fn print<S: Station + ?Sized, W: Write>(
    station: &S,
    config: &Config,
    out: &mut W,
) -> io::Result<()> {
    let image = config.work_dir.join(QR_IMAGE);
    if !image.exists() {
        debug!("{} not found", image.display());
        writeln!(
            out,
            "QR code not found. Please run the serial monitor first."
        )?;
        return Ok(());
    }

    run_python(station, config, &[String::from(QR_SCRIPT)], out)?;
    Ok(())
}
