// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Exit code used when Ctrl-C arrives outside of a monitoring session.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Ctrl-C handling shared between the signal handler and the serial
/// monitor. While armed, Ctrl-C only trips a flag the monitor loop polls.
/// Otherwise it ends the process, as an unhandled interrupt would.
#[derive(Clone, Debug, Default)]
pub struct Interrupt {
    armed: Arc<AtomicBool>,
    tripped: Arc<AtomicBool>,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the process-wide Ctrl-C handler. Only one may exist.
    pub fn install() -> Result<Self, ctrlc::Error> {
        let interrupt = Self::new();
        let handler = interrupt.clone();
        ctrlc::set_handler(move || {
            if !handler.handle() {
                std::process::exit(INTERRUPTED_EXIT_CODE);
            }
        })?;

        Ok(interrupt)
    }

    /// Record a Ctrl-C. Returns `false` if nobody is listening.
    fn handle(&self) -> bool {
        if self.armed.load(Ordering::SeqCst) {
            self.tripped.store(true, Ordering::SeqCst);
            true
        } else {
            false
        }
    }

    /// Start catching Ctrl-C until the returned guard is dropped.
    pub fn arm(&self) -> Armed<'_> {
        self.tripped.store(false, Ordering::SeqCst);
        self.armed.store(true, Ordering::SeqCst);
        Armed(self)
    }

    pub fn trip(&self) {
        self.tripped.store(true, Ordering::SeqCst);
    }

    pub fn is_tripped(&self) -> bool {
        self.tripped.load(Ordering::SeqCst)
    }
}

pub struct Armed<'a>(&'a Interrupt);

impl Drop for Armed<'_> {
    fn drop(&mut self) {
        self.0.armed.store(false, Ordering::SeqCst);
        self.0.tripped.store(false, Ordering::SeqCst);
    }
}
