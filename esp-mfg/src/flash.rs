// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use esp_mfg_models::{esptool_args, FlashOp};
use std::io::{self, Write};

use crate::{station::run_python, station::Station, Config};

/// Helper script that watches the device after flashing and captures its
/// MAC address for the QR label.
pub const MONITOR_SCRIPT: &str = "monitor_serial.py";

/// `python` arguments running esptool as a module.
pub fn esptool_command(op: FlashOp, port: &str) -> Vec<String> {
    let mut args = vec![String::from("-m"), String::from("esptool")];
    args.extend(esptool_args(op, port));
    args
}

/// Erase the whole flash of the device on `port`.
pub fn erase<S: Station + ?Sized, W: Write>(
    station: &S,
    config: &Config,
    port: &str,
    out: &mut W,
) -> io::Result<()> {
    run_python(station, config, &esptool_command(FlashOp::Erase, port), out)?;
    Ok(())
}

/// Write the firmware set from the work directory to the device on `port`,
/// then hand the port to the monitor script. The monitor runs even if
/// esptool reported a failure; the operator has already been warned.
pub fn write_and_monitor<S: Station + ?Sized, W: Write>(
    station: &S,
    config: &Config,
    port: &str,
    out: &mut W,
) -> io::Result<()> {
    let args = esptool_command(FlashOp::Write, port);
    let written = run_python(station, config, &args, out)?;

    if written {
        writeln!(
            out,
            "Firmware updated successfully. Now monitoring serial..."
        )?;
    } else {
        writeln!(out, "Now monitoring serial...")?;
    }

    run_python(
        station,
        config,
        &[String::from(MONITOR_SCRIPT), String::from(port)],
        out,
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockStation;

    #[test]
    fn erase_command() {
        let station = MockStation::default();
        let mut out = Vec::new();

        erase(&station, &Config::default(), "COM3", &mut out).unwrap();

        let runs = station.runs();
        assert_eq!(runs.len(), 1);
        let (program, args) = &runs[0];
        assert_eq!(program, "python");
        assert_eq!(
            args,
            &[
                "-m",
                "esptool",
                "--chip",
                "esp32s3",
                "--port",
                "COM3",
                "erase_flash"
            ]
        );
        assert!(out.is_empty());
    }

    #[test]
    fn write_then_monitor() {
        let station = MockStation::default();
        let config = Config {
            python: String::from("python3"),
            ..Default::default()
        };
        let mut out = Vec::new();

        write_and_monitor(&station, &config, "/dev/ttyUSB0", &mut out).unwrap();

        let runs = station.runs();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].0, "python3");
        assert_eq!(runs[0].1, esptool_command(FlashOp::Write, "/dev/ttyUSB0"));
        assert_eq!(
            &runs[0].1[runs[0].1.len() - 6..],
            &[
                "0x0",
                "bootloader.bin",
                "0x8000",
                "partitions.bin",
                "0x10000",
                "firmware.bin"
            ]
        );
        assert_eq!(
            runs[1],
            (
                String::from("python3"),
                vec![
                    String::from("monitor_serial.py"),
                    String::from("/dev/ttyUSB0")
                ]
            )
        );
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Firmware updated successfully. Now monitoring serial...\n"
        );
    }

    // a failed flash is reported but the monitor still runs
    #[test]
    fn write_failure_is_not_fatal() {
        let station = MockStation {
            exit_code: Some(2),
            ..Default::default()
        };
        let mut out = Vec::new();

        write_and_monitor(&station, &Config::default(), "COM3", &mut out)
            .unwrap();

        assert_eq!(station.runs().len(), 2);
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("Warning: `python -m esptool --chip esp32s3"));
        let tail = "finished with exit code 2.\nNow monitoring serial...\n";
        assert!(out.contains(tail));
        assert!(!out.contains("successfully"));
    }
}
