//! Export progress tracking.

use std::time::{Duration, Instant};

use log::info;

/// Counters for one export run. All of them only ever increase.
#[derive(Debug)]
pub struct ExportProgress {
    started: Instant,
    /// Rows the source expects to yield, when known
    expected: Option<u64>,
    pub rows_fetched: u64,
    pub rows_written: u64,
    pub pages: u64,
}

impl ExportProgress {
    pub fn start(expected: Option<u64>) -> Self {
        Self {
            started: Instant::now(),
            expected,
            rows_fetched: 0,
            rows_written: 0,
            pages: 0,
        }
    }

    pub fn record_page(&mut self, fetched: u64, written: u64) {
        self.pages += 1;
        self.rows_fetched += fetched;
        self.rows_written += written;
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Rows still expected, when the total is known.
    pub fn remaining(&self) -> Option<u64> {
        self.expected
            .map(|total| total.saturating_sub(self.rows_written))
    }

    pub fn rows_per_second(&self) -> f64 {
        let secs = self.elapsed().as_secs_f64();
        if secs > 0.0 {
            self.rows_written as f64 / secs
        } else {
            0.0
        }
    }

    /// Estimated time to write the remaining rows at the current rate.
    pub fn eta(&self) -> Option<Duration> {
        let remaining = self.remaining()?;
        let rate = self.rows_per_second();
        if rate > 0.0 {
            Some(Duration::from_secs_f64(remaining as f64 / rate))
        } else {
            None
        }
    }

    /// Logs a one-line status after a page.
    pub fn log(&self) {
        match self.expected {
            Some(total) if total > 0 => {
                let percent = self.rows_written as f64 * 100.0 / total as f64;
                let eta = self
                    .eta()
                    .map(|d| format!("{:.0}s", d.as_secs_f64()))
                    .unwrap_or_else(|| "?".to_string());
                info!(
                    "Progress: {}/{} rows ({:.1}%), {:.0} rows/s, {} remaining, ETA {}",
                    self.rows_written,
                    total,
                    percent,
                    self.rows_per_second(),
                    self.remaining().unwrap_or(0),
                    eta
                );
            }
            _ => info!(
                "Progress: {} rows written, {:.0} rows/s",
                self.rows_written,
                self.rows_per_second()
            ),
        }
    }
}
