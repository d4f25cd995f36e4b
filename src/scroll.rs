use std::time::{Duration, Instant};

pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(3000);

/// Origin of a scroll event. Commands issued by the widget come back tagged
/// `Auto` so they never count as user interaction (echo suppression).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollSource {
    User,
    Auto,
}

/// A scroll the host should perform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollCommand {
    pub offset: f64,
    pub animated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    /// Auto-scroll turned off by configuration. Permanent.
    Disabled,
    Auto,
    Suppressed { until: Instant },
}

/// Gate deciding whether playback-driven scrolling is currently allowed.
///
/// A user scroll suspends auto-scroll for a cooldown window; the next
/// active-line change at or past the deadline resumes it. All methods take
/// `now` so tests control the clock.
#[derive(Debug)]
pub struct AutoScroll {
    mode: Mode,
    cooldown: Duration,
}

impl AutoScroll {
    pub fn new(enabled: bool, cooldown: Duration) -> Self {
        Self {
            mode: if enabled { Mode::Auto } else { Mode::Disabled },
            cooldown,
        }
    }

    /// Feed a scroll event. Only `User` events suppress; `Auto` events are
    /// our own echoes and are ignored.
    pub fn on_scroll(&mut self, source: ScrollSource, now: Instant) {
        if source != ScrollSource::User || self.mode == Mode::Disabled {
            return;
        }
        self.mode = Mode::Suppressed {
            until: now + self.cooldown,
        };
        tracing::trace!(cooldown_ms = self.cooldown.as_millis() as u64, "auto-scroll suppressed");
    }

    /// The active line changed; may this trigger an automatic scroll?
    /// Clears suppression once the cooldown has elapsed.
    pub fn on_active_line_change(&mut self, now: Instant) -> bool {
        match self.mode {
            Mode::Disabled => false,
            Mode::Auto => true,
            Mode::Suppressed { until } => {
                if now >= until {
                    self.mode = Mode::Auto;
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Whether an automatic scroll would be allowed right now, without
    /// changing state. Used when fresh geometry lands mid-line.
    pub fn allows_auto(&self, now: Instant) -> bool {
        match self.mode {
            Mode::Disabled => false,
            Mode::Auto => true,
            Mode::Suppressed { until } => now >= until,
        }
    }

    /// Explicit scroll-to-current-line: drops any suppression immediately.
    /// The command itself is always honored by the caller, even when
    /// disabled; this only resets the gate.
    pub fn force(&mut self) {
        if self.mode != Mode::Disabled {
            self.mode = Mode::Auto;
        }
    }

    pub fn is_suppressed(&self, now: Instant) -> bool {
        matches!(self.mode, Mode::Suppressed { until } if now < until)
    }
}
