//! Scan progress spinner

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown while recursive listings are in flight.
///
/// Cosmetic only: the engine bumps it per indexed entry and clears it at the
/// join barrier, but nothing about the comparison depends on it. Cloning is
/// cheap and all clones drive the same bar, so both listing tasks can share
/// one spinner.
#[derive(Clone)]
pub struct ScanSpinner {
    bar: ProgressBar,
}

impl ScanSpinner {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.enable_steady_tick(Duration::from_millis(100));
        if let Ok(style) = ProgressStyle::with_template("{spinner} Scanning... {pos} entries") {
            bar.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
        }
        Self { bar }
    }

    /// Record one indexed entry.
    pub fn entry_indexed(&self) {
        self.bar.inc(1);
    }

    /// Stop ticking and erase the spinner line.
    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for ScanSpinner {
    fn default() -> Self {
        Self::new()
    }
}
