// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use esp_mfg_models::PortDescriptor;
use log::{debug, warn};
use std::io::{self, BufRead, Write};

use crate::{prompt, station::Station};

/// List the serial ports the OS currently knows about and have the operator
/// pick one by its 1-based index. Returns `None` when there is nothing to
/// pick or the answer isn't a listed index; the caller goes back to the
/// main menu in that case rather than asking again.
pub fn select_port<S: Station + ?Sized, R: BufRead, W: Write>(
    station: &S,
    input: &mut R,
    out: &mut W,
) -> io::Result<Option<String>> {
    writeln!(out, "Buscando puertos disponibles...\n")?;

    let ports = match station.list_ports() {
        Ok(ports) => ports,
        Err(e) => {
            warn!("{}", e);
            writeln!(out, "Error: {}", e)?;
            Vec::new()
        }
    };

    if ports.is_empty() {
        writeln!(out, "No se encontraron puertos COM.")?;
        return Ok(None);
    }

    writeln!(out, "Puertos disponibles:")?;
    for (i, port) in ports.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, port)?;
    }

    let answer = prompt(
        input,
        out,
        "\nSelecciona el número del puerto que quieres usar: ",
    )?;

    match answer.as_deref().and_then(|a| pick(&ports, a)) {
        Some(port) => {
            debug!("selected {}", port);
            Ok(Some(port.device.clone()))
        }
        None => {
            writeln!(out, "Selección inválida.")?;
            Ok(None)
        }
    }
}

/// Resolve a 1-based index typed by the operator. Surrounding whitespace
/// is accepted; zero, negative and out of range indices are not.
fn pick<'a>(
    ports: &'a [PortDescriptor],
    answer: &str,
) -> Option<&'a PortDescriptor> {
    let index: usize = answer.trim().parse().ok()?;
    ports.get(index.checked_sub(1)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockStation;

    fn select(station: &MockStation, input: &str) -> (Option<String>, String) {
        let mut input = input.as_bytes();
        let mut out = Vec::new();
        let port = select_port(station, &mut input, &mut out).unwrap();
        (port, String::from_utf8(out).unwrap())
    }

    #[test]
    fn no_ports() {
        let station = MockStation::default();
        let (port, out) = select(&station, "1\n");
        assert_eq!(port, None);
        assert_eq!(
            out,
            "Buscando puertos disponibles...\n\n\
             No se encontraron puertos COM.\n"
        );
    }

    #[test]
    fn lists_and_selects() {
        let station =
            MockStation::with_ports(&["/dev/ttyUSB0", "/dev/ttyACM0"]);
        let (port, out) = select(&station, "2\n");
        assert_eq!(port.as_deref(), Some("/dev/ttyACM0"));
        assert_eq!(
            out,
            "Buscando puertos disponibles...\n\n\
             Puertos disponibles:\n\
             1. /dev/ttyUSB0 - n/a [n/a]\n\
             2. /dev/ttyACM0 - n/a [n/a]\n\
             \nSelecciona el número del puerto que quieres usar: "
        );
    }

    #[test]
    fn whitespace_around_index() {
        let station = MockStation::with_ports(&["COM3"]);
        let (port, _) = select(&station, " 1 \n");
        assert_eq!(port.as_deref(), Some("COM3"));
    }

    #[test]
    fn invalid_selection() {
        let station = MockStation::with_ports(&["COM3", "COM4"]);
        for answer in ["0\n", "3\n", "-1\n", "uno\n", "\n", ""] {
            let (port, out) = select(&station, answer);
            assert_eq!(port, None, "answer {:?}", answer);
            assert!(
                out.ends_with("Selección inválida.\n"),
                "answer {:?}",
                answer
            );
        }
    }
}
