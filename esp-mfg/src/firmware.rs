// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use esp_mfg_models::{firmware_base_url, DeviceModel, FirmwareImage};
use log::{debug, warn};
use std::io::{self, Write};

use crate::{station::Station, Config};

/// Fetch the firmware set for `model` into the work directory, one image
/// at a time. A failed image is reported and skipped so the remaining ones
/// are still attempted; nothing checks that the resulting set is complete.
/// Returns the number of images fetched.
pub fn download<S: Station + ?Sized, W: Write>(
    station: &S,
    config: &Config,
    model: DeviceModel,
    out: &mut W,
) -> io::Result<usize> {
    let base_url = firmware_base_url(&config.firmware_url, model);
    debug!("fetching firmware for {} from {}", model, base_url);

    let mut fetched = 0;
    for image in FirmwareImage::ALL {
        writeln!(out, "Downloading {}...", image)?;

        let dest = config.work_dir.join(image.file_name());
        match station.fetch(&image.url(&base_url), &dest) {
            Ok(size) => {
                debug!("{}: {} bytes", image, size);
                writeln!(out, "{} downloaded successfully.", image)?;
                fetched += 1;
            }
            Err(e) => {
                warn!("fetching {} failed: {}", image, e);
                writeln!(out, "Error downloading {}: {}", image, e)?;
            }
        }
    }

    Ok(fetched)
}
