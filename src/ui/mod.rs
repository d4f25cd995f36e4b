pub mod lyrics;

pub use lyrics::{render, Measurement};

use crate::config::LyricsConfig;
use crate::layout::{ContainerGeometry, MeasureRequest, OffsetTable};
use crate::lrc::{self, LyricLine};
use crate::scroll::{AutoScroll, ScrollCommand, ScrollSource};
use crate::sync;
use ratatui::text::Line;
use std::time::{Duration, Instant};

/// Fired whenever the active line changes; carries the new index and line,
/// or `None` when no line is active.
pub type LineChangeCallback = Box<dyn FnMut(Option<usize>, Option<&LyricLine>)>;

/// Custom per-line renderer: `(line, index, active) -> styled Line`.
pub type LineRenderer = Box<dyn Fn(&LyricLine, usize, bool) -> Line<'static>>;

/// State object behind the synced-lyrics widget.
///
/// Owns the parsed lines, the active-line index, the offset table and the
/// auto-scroll gate. The host drives it with discrete events (new lyric text,
/// playback ticks, scroll events, geometry reports) and executes the
/// `ScrollCommand`s it hands back. A command the host performs must be
/// reported back as a scroll event tagged [`ScrollSource::Auto`] so it does
/// not count as user interaction.
pub struct LyricsView {
    lines: Vec<LyricLine>,
    config: LyricsConfig,
    active: Option<usize>,
    time_ms: i64,
    offsets: OffsetTable,
    auto: AutoScroll,
    scroll_offset: f64,
    on_line_change: Option<LineChangeCallback>,
    line_renderer: Option<LineRenderer>,
}

impl LyricsView {
    pub fn new(config: LyricsConfig) -> Self {
        // With auto-scroll off there is no anchoring, so no top spacing
        let space_top = if config.auto_scroll {
            config.space_top.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            lines: Vec::new(),
            active: None,
            time_ms: 0,
            offsets: OffsetTable::new(space_top),
            auto: AutoScroll::new(config.auto_scroll, Duration::from_millis(config.cooldown_ms)),
            scroll_offset: 0.0,
            on_line_change: None,
            line_renderer: None,
            config,
        }
    }

    pub fn config(&self) -> &LyricsConfig {
        &self.config
    }

    pub fn on_line_change(
        &mut self,
        callback: impl FnMut(Option<usize>, Option<&LyricLine>) + 'static,
    ) {
        self.on_line_change = Some(Box::new(callback));
    }

    pub fn set_line_renderer(
        &mut self,
        renderer: impl Fn(&LyricLine, usize, bool) -> Line<'static> + 'static,
    ) {
        self.line_renderer = Some(Box::new(renderer));
    }

    /// Replace the lyric source text. The line list is rebuilt from scratch,
    /// pending geometry is invalidated, and the active line is re-located at
    /// the last known playback position.
    pub fn set_lyrics(&mut self, text: &str) {
        self.lines = lrc::parse(text);
        self.offsets.invalidate();
        self.active = sync::locate(&self.lines, self.time_ms);
        self.fire_line_change();
    }

    /// Playback tick. Returns the scroll command to execute when the active
    /// line changed and the auto-scroll gate allows it.
    pub fn sync(&mut self, time_ms: i64, now: Instant) -> Option<ScrollCommand> {
        self.time_ms = time_ms;
        let index = sync::locate(&self.lines, time_ms);
        if index == self.active {
            return None;
        }
        self.active = index;
        self.fire_line_change();

        if self.auto.on_active_line_change(now) {
            Some(self.command_for_active())
        } else {
            None
        }
    }

    /// Scroll event from the host, tagged with its origin.
    pub fn handle_scroll(&mut self, source: ScrollSource, offset: f64, now: Instant) {
        self.scroll_offset = offset;
        self.auto.on_scroll(source, now);
    }

    /// Imperative query: current active index and line.
    pub fn current_line(&self) -> (Option<usize>, Option<&LyricLine>) {
        (self.active, self.active.and_then(|i| self.lines.get(i)))
    }

    /// Imperative command: scroll to the active line right now. Always
    /// honored, and clears any user-scroll suppression.
    pub fn scroll_to_current_line(&mut self) -> ScrollCommand {
        self.auto.force();
        self.command_for_active()
    }

    pub fn begin_measure(&self) -> MeasureRequest {
        self.offsets.begin_measure()
    }

    /// Geometry report from the host, completing a measurement started on an
    /// earlier tick. Stale reports (line list or geometry changed since) are
    /// dropped. When fresh offsets land while auto-scroll is allowed, a
    /// corrective command for the active line is returned.
    pub fn apply_measure(
        &mut self,
        request: MeasureRequest,
        container: ContainerGeometry,
        line_tops: &[(usize, f64)],
        now: Instant,
    ) -> Option<ScrollCommand> {
        if !self.offsets.apply(request, container, line_tops) {
            return None;
        }
        if self.active.is_some() && self.auto.allows_auto(now) {
            Some(self.command_for_active())
        } else {
            None
        }
    }

    /// Call on container resize or re-layout; queued measurements for the
    /// old geometry will be discarded.
    pub fn invalidate_layout(&mut self) {
        self.offsets.invalidate();
    }

    pub fn lines(&self) -> &[LyricLine] {
        &self.lines
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    pub fn space_top(&self) -> f64 {
        self.offsets.space_top()
    }

    pub fn is_suppressed(&self, now: Instant) -> bool {
        self.auto.is_suppressed(now)
    }

    fn command_for_active(&mut self) -> ScrollCommand {
        let offset = self
            .active
            .map(|i| self.offsets.offset_for(i))
            .unwrap_or(0.0);
        self.scroll_offset = offset;
        ScrollCommand {
            offset,
            animated: true,
        }
    }

    fn fire_line_change(&mut self) {
        if let Some(callback) = self.on_line_change.as_mut() {
            let line = self.active.and_then(|i| self.lines.get(i));
            callback(self.active, line);
        }
    }

    pub(crate) fn render_line(&self, line: &LyricLine, index: usize, active: bool) -> Line<'static> {
        match &self.line_renderer {
            Some(renderer) => renderer(line, index, active),
            None => lyrics::default_line(line, active),
        }
    }
}
