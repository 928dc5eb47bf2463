// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Types shared by the ESP32-S3 provisioning tools: the device models we
//! ship firmware for, the images that make up a firmware set and where they
//! land in flash, the argument lists handed to `esptool`, and the
//! descriptors used to present serial ports to an operator.

pub mod esptool;
pub mod image;
pub mod model;
pub mod port;

pub use crate::esptool::{esptool_args, FlashOp};
pub use crate::image::FirmwareImage;
pub use crate::model::{firmware_base_url, DeviceModel, ModelError};
pub use crate::port::PortDescriptor;

/// Chip type passed to the flash tool for every operation.
pub const CHIP: &str = "esp32s3";

/// Repository hosting the prebuilt firmware sets, one directory per model.
pub const DEFAULT_FIRMWARE_URL: &str =
    "https://github.com/AIOTRONIC-ORG/Binary_Firmware/raw/main";
