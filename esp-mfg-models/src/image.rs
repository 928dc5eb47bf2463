// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;

/// One of the three images making up a firmware set. The images are
/// downloaded next to each other in the work directory and written to the
/// fixed flash offsets below.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FirmwareImage {
    Bootloader,
    Partitions,
    Application,
}

impl FirmwareImage {
    /// Download order, which is also the order of the address / file pairs
    /// on the flash command line.
    pub const ALL: [FirmwareImage; 3] =
        [Self::Bootloader, Self::Partitions, Self::Application];

    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Bootloader => "bootloader.bin",
            Self::Partitions => "partitions.bin",
            Self::Application => "firmware.bin",
        }
    }

    /// Flash offset as passed to `esptool write_flash`.
    pub fn address(&self) -> &'static str {
        match self {
            Self::Bootloader => "0x0",
            Self::Partitions => "0x8000",
            Self::Application => "0x10000",
        }
    }

    /// `base_url` is expected to end in `/`, see `firmware_base_url`.
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url, self.file_name())
    }
}

impl fmt::Display for FirmwareImage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.file_name())
    }
}
