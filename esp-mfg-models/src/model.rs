// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::{fmt, str::FromStr};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("unknown device model identifier: \"{0}\"")]
    Unknown(String),
}

/// The device variants we have firmware for. Each maps to a directory in
/// the firmware repository named by its model identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceModel {
    Energy23,
    SocialVoz,
    ToroShock,
}

impl DeviceModel {
    /// Models in the order they're offered to the operator.
    pub const ALL: [DeviceModel; 3] =
        [Self::Energy23, Self::SocialVoz, Self::ToroShock];

    /// Short code identifying the firmware variant.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Energy23 => "EA01J",
            Self::SocialVoz => "CA01N",
            Self::ToroShock => "EB01M",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Energy23 => "Energy 23",
            Self::SocialVoz => "Social Voz",
            Self::ToroShock => "Toro Shock",
        }
    }

    /// Map a 1-based model menu label to the model it selects.
    pub fn from_menu_choice(choice: &str) -> Option<Self> {
        let index: usize = choice.parse().ok()?;
        index.checked_sub(1).and_then(|i| Self::ALL.get(i)).copied()
    }
}

impl fmt::Display for DeviceModel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.id())
    }
}

impl FromStr for DeviceModel {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|m| m.id() == s)
            .copied()
            .ok_or_else(|| ModelError::Unknown(s.to_string()))
    }
}

/// Directory URL holding the firmware set for `model`. The result always
/// ends in `/` so image file names can be appended directly.
pub fn firmware_base_url(base: &str, model: DeviceModel) -> String {
    format!("{}/{}/", base.trim_end_matches('/'), model.id())
}
