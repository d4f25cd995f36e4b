use serde::{Deserialize, Serialize};

/// One timed lyric line. `id` is unique within a parse result and reflects
/// final sort order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LyricLine {
    pub id: String,
    pub time_ms: u64,
    pub text: String,
}

/// Parse LRC text into lines sorted ascending by `time_ms` (stable for ties).
///
/// A source line may carry several `[mm:ss.xx]` tags; each tag yields one
/// `LyricLine` sharing the text. Lines without a valid tag are dropped, and
/// malformed tags are skipped rather than failing the whole parse.
pub fn parse(content: &str) -> Vec<LyricLine> {
    let mut entries: Vec<(u64, String)> = Vec::new();
    let mut dropped_tags = 0usize;

    for raw in content.lines() {
        let mut rest = raw.trim_start();
        let mut stamps = Vec::new();

        while rest.starts_with('[') {
            let Some(end) = rest.find(']') else { break };
            match parse_timestamp(&rest[1..end]) {
                Some(ms) => stamps.push(ms),
                // Metadata tags ([ar:..], [ti:..]) and garbage land here
                None => dropped_tags += 1,
            }
            rest = &rest[end + 1..];
        }

        if stamps.is_empty() {
            continue;
        }

        let text = rest.trim().to_string();
        for ms in stamps {
            entries.push((ms, text.clone()));
        }
    }

    // sort_by_key is stable, so equal timestamps keep source order
    entries.sort_by_key(|(ms, _)| *ms);

    if dropped_tags > 0 {
        tracing::debug!(dropped_tags, kept = entries.len(), "parsed LRC with skipped tags");
    }

    entries
        .into_iter()
        .enumerate()
        .map(|(i, (time_ms, text))| LyricLine {
            id: format!("line-{}", i),
            time_ms,
            text,
        })
        .collect()
}

/// Parse the inside of a `[mm:ss.xx]` tag into milliseconds.
///
/// The fraction is a decimal fraction of a second at variable precision:
/// `.5` is 500ms, `.34` is 340ms, `.345` is 345ms (extra digits truncated).
fn parse_timestamp(tag: &str) -> Option<u64> {
    let (min_str, rest) = tag.split_once(':')?;
    let min: u64 = min_str.trim().parse().ok()?;

    let (sec_str, frac_str) = match rest.split_once('.') {
        Some((s, f)) => (s, Some(f)),
        None => (rest, None),
    };
    let sec: u64 = sec_str.trim().parse().ok()?;

    let ms: u64 = match frac_str {
        Some(frac) => {
            if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let frac = &frac[..frac.len().min(3)];
            format!("{:0<3}", frac).parse().ok()?
        }
        None => 0,
    };

    let total = min
        .checked_mul(60_000)?
        .checked_add(sec.checked_mul(1000)?)?
        .checked_add(ms)?;
    // locate() compares times as i64, so anything past that is as bogus as
    // an overflow
    if total > i64::MAX as u64 {
        return None;
    }
    Some(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorts_ascending() {
        let lines = parse("[00:01.00]A\n[00:00.50]B");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].time_ms, 500);
        assert_eq!(lines[0].text, "B");
        assert_eq!(lines[1].time_ms, 1000);
        assert_eq!(lines[1].text, "A");
    }

    #[test]
    fn test_timestamp_arithmetic() {
        let lines = parse("[01:02.34]Hello");
        assert_eq!(lines[0].time_ms, 62_340);
    }

    #[test]
    fn test_fraction_precision() {
        assert_eq!(parse("[00:01.5]x")[0].time_ms, 1500);
        assert_eq!(parse("[00:01.505]x")[0].time_ms, 1505);
        // Extra digits truncated to millisecond precision
        assert_eq!(parse("[00:01.5059]x")[0].time_ms, 1505);
        assert_eq!(parse("[00:01]x")[0].time_ms, 1000);
    }

    #[test]
    fn test_untagged_line_dropped() {
        let lines = parse("just a plain line\n[00:01.00]tagged");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "tagged");
    }

    #[test]
    fn test_multiple_tags_fan_out() {
        let lines = parse("[00:01.00][00:02.00]Same");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].time_ms, 1000);
        assert_eq!(lines[1].time_ms, 2000);
        assert_eq!(lines[0].text, "Same");
        assert_eq!(lines[1].text, "Same");
    }

    #[test]
    fn test_malformed_tags_skipped() {
        let lines = parse("[ar:Some Artist]\n[xx:yy.zz]garbage\n[00:03.00]ok");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].time_ms, 3000);
    }

    #[test]
    fn test_overflowing_timestamp_skipped() {
        // Huge-but-numeric minute fields must be dropped like any other bad
        // tag, not wrap or panic
        let lines = parse(
            "[18446744073709551615:00.00]x\n\
             [99999999999999999:00.00]y\n\
             [200000000000000:00.00]z\n\
             [00:01.00]ok",
        );
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "ok");
        assert_eq!(lines[0].time_ms, 1000);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").is_empty());
        assert!(parse("   \n\t\n").is_empty());
    }

    #[test]
    fn test_idempotent_and_ids_unique() {
        let input = "[00:02.00]B\n[00:01.00]A\n[00:02.00]C";
        let a = parse(input);
        let b = parse(input);

        let order_a: Vec<_> = a.iter().map(|l| (l.time_ms, l.text.clone())).collect();
        let order_b: Vec<_> = b.iter().map(|l| (l.time_ms, l.text.clone())).collect();
        assert_eq!(order_a, order_b);

        // Equal timestamps keep source order
        assert_eq!(a[1].text, "B");
        assert_eq!(a[2].text, "C");

        let mut ids: Vec<_> = a.iter().map(|l| l.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), a.len());
    }
}
