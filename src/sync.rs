use crate::lrc::LyricLine;

/// Find the active line for playback position `time_ms`: the last line whose
/// `time_ms` does not exceed it. `None` means no line is active yet (position
/// before the first line, or empty list).
///
/// `lines` must be sorted ascending by `time_ms`, which `lrc::parse`
/// guarantees. Runs in O(log n); this is called on every playback tick.
pub fn locate(lines: &[LyricLine], time_ms: i64) -> Option<usize> {
    let after = lines.partition_point(|l| (l.time_ms as i64) <= time_ms);
    after.checked_sub(1)
}
