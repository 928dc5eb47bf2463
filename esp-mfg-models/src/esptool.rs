// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::{image::FirmwareImage, CHIP};

/// Baud rate used while writing flash. Monitoring uses its own rate.
pub const FLASH_BAUD: u32 = 115200;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlashOp {
    /// Erase the whole flash chip.
    Erase,
    /// Write the bootloader, partition table and application images from
    /// the work directory.
    Write,
}

/// Build the argument list for `esptool` (everything after
/// `python -m esptool`) for the given operation on `port`.
pub fn esptool_args(op: FlashOp, port: &str) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "--chip".into(),
        CHIP.into(),
        "--port".into(),
        port.into(),
    ];

    match op {
        FlashOp::Erase => args.push("erase_flash".into()),
        FlashOp::Write => {
            args.push("--baud".into());
            args.push(FLASH_BAUD.to_string());
            args.extend(
                [
                    "--before",
                    "default_reset",
                    "--after",
                    "hard_reset",
                    "write_flash",
                    "-z",
                    "--flash_mode",
                    "dio",
                    "--flash_freq",
                    "40m",
                    "--flash_size",
                    "detect",
                ]
                .iter()
                .map(|s| s.to_string()),
            );
            for image in FirmwareImage::ALL {
                args.push(image.address().into());
                args.push(image.file_name().into());
            }
        }
    }

    args
}
