// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;

/// Placeholder for descriptor fields the OS doesn't report.
pub const NOT_AVAILABLE: &str = "n/a";

/// A serial port as presented to the operator. Built fresh from the OS on
/// every enumeration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortDescriptor {
    /// Path or name used to open the port, e.g. `/dev/ttyUSB0` or `COM3`.
    pub device: String,
    pub description: String,
    /// Hardware ID, for USB ports `USB VID:PID=XXXX:XXXX SER=...`.
    pub hwid: String,
}

impl PortDescriptor {
    pub fn new(device: impl Into<String>) -> Self {
        PortDescriptor {
            device: device.into(),
            description: NOT_AVAILABLE.to_string(),
            hwid: NOT_AVAILABLE.to_string(),
        }
    }
}

impl fmt::Display for PortDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} - {} [{}]", self.device, self.description, self.hwid)
    }
}

#[cfg(feature = "serialport")]
fn usb_hwid(vid: u16, pid: u16, serial: Option<&str>) -> String {
    match serial {
        Some(sn) if !sn.is_empty() => {
            format!("USB VID:PID={:04X}:{:04X} SER={}", vid, pid, sn)
        }
        _ => format!("USB VID:PID={:04X}:{:04X}", vid, pid),
    }
}

#[cfg(feature = "serialport")]
impl From<serialport::SerialPortInfo> for PortDescriptor {
    fn from(info: serialport::SerialPortInfo) -> Self {
        use serialport::SerialPortType;

        let mut port = PortDescriptor::new(info.port_name);
        match info.port_type {
            SerialPortType::UsbPort(usb) => {
                if let Some(desc) =
                    usb.product.clone().or_else(|| usb.manufacturer.clone())
                {
                    port.description = desc;
                }
                port.hwid =
                    usb_hwid(usb.vid, usb.pid, usb.serial_number.as_deref());
            }
            SerialPortType::PciPort => port.hwid = "PCI".to_string(),
            SerialPortType::BluetoothPort => {
                port.hwid = "BLUETOOTH".to_string()
            }
            SerialPortType::Unknown => (),
        }

        port
    }
}
