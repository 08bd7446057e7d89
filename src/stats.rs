// src/stats.rs
//
// Timing and interaction counters for one tour attempt. The component feeds
// in `js_sys::Date::now()` timestamps; keeping the clock external keeps this
// module testable off-wasm.

/// Per-attempt metrics: when the attempt started, how many clicks landed in
/// the content area, and the elapsed time frozen at completion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionStats {
    started_at_ms: f64,
    click_count: u32,
    frozen_elapsed_ms: Option<f64>,
}

impl SessionStats {
    pub fn start(now_ms: f64) -> Self {
        Self {
            started_at_ms: now_ms,
            click_count: 0,
            frozen_elapsed_ms: None,
        }
    }

    /// Every click inside the tour content counts, not just hotspot hits.
    pub fn record_click(&mut self) {
        self.click_count += 1;
    }

    pub fn click_count(&self) -> u32 {
        self.click_count
    }

    pub fn elapsed_ms(&self, now_ms: f64) -> f64 {
        match self.frozen_elapsed_ms {
            Some(ms) => ms,
            None => now_ms - self.started_at_ms,
        }
    }

    /// Called once at completion; the displayed duration stops running after
    /// this.
    pub fn freeze(&mut self, now_ms: f64) {
        if self.frozen_elapsed_ms.is_none() {
            self.frozen_elapsed_ms = Some(now_ms - self.started_at_ms);
        }
    }
}

/// Formats a duration as `"3m 25s"` past the minute mark, `"42s"` below it.
pub fn format_duration(elapsed_ms: f64) -> String {
    let total_seconds = (elapsed_ms / 1000.0).round() as u64;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
