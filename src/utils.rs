use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use std::io::Read;

pub const BAR_FILLED: char = '▓';
pub const BAR_EMPTY: char = '░';

pub fn read_stdin() -> anyhow::Result<Vec<u8>> {
    let mut buf = Vec::new();
    std::io::stdin().read_to_end(&mut buf)?;
    Ok(buf)
}

/// Parse an ISO-8601 timestamp into epoch seconds. Hosts disagree on offset
/// syntax, so several formats are tried before giving up; `None` means the
/// caller should treat the value as absent.
pub fn parse_timestamp(text: &str) -> Option<i64> {
    let s = text.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp());
    }
    // Some emitters use "+0000" offsets, which RFC 3339 rejects; map a
    // trailing Z onto that form and retry with the %z formats.
    let rewritten = if s.ends_with('Z') || s.ends_with('z') {
        format!("{}+0000", &s[..s.len() - 1])
    } else {
        s.to_string()
    };
    for fmt in ["%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%dT%H:%M:%S%.f%z"] {
        if let Ok(dt) = DateTime::parse_from_str(&rewritten, fmt) {
            return Some(dt.timestamp());
        }
    }
    // Bare timestamp with no offset at all: assume UTC.
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc().timestamp());
    }
    None
}

/// Format epoch seconds as "HH:MM" in local time.
pub fn format_epoch_hm(epoch: i64) -> String {
    match Local.timestamp_opt(epoch, 0) {
        chrono::LocalResult::Single(dt) => dt.format("%H:%M").to_string(),
        _ => "--:--".to_string(),
    }
}

/// Total clamp into [0, 100]; NaN and infinities collapse to 0.
pub fn clamp_percent(value: f64) -> u8 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    if value >= 100.0 {
        return 100;
    }
    value as u8
}

/// Cell counts for a progress bar: filled floor-scales with pct, and
/// filled + empty always equals width. Out-of-range pct saturates at 100.
pub fn bar_cells(pct: u8, width: usize) -> (usize, usize) {
    let filled = (pct.min(100) as usize * width) / 100;
    (filled, width - filled)
}

pub fn render_progress_bar(pct: u8, width: usize) -> String {
    let (filled, empty) = bar_cells(pct, width);
    let mut bar = String::with_capacity(width * BAR_FILLED.len_utf8());
    for _ in 0..filled {
        bar.push(BAR_FILLED);
    }
    for _ in 0..empty {
        bar.push(BAR_EMPTY);
    }
    bar
}

/// Intensity banding for the progress bar. Affects presentation only; the
/// glyph counts come from [`bar_cells`] regardless of tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarTier {
    Healthy,
    Caution,
    Danger,
}

pub fn bar_tier(pct: u8) -> BarTier {
    if pct > 70 {
        BarTier::Danger
    } else if pct > 40 {
        BarTier::Caution
    } else {
        BarTier::Healthy
    }
}

pub fn format_path(p: &str) -> String {
    if let Some(b) = directories::BaseDirs::new() {
        let home_s = b.home_dir().to_string_lossy();
        if p.starts_with(&*home_s) {
            return format!("~{}", &p[home_s.len()..]);
        }
    }
    p.to_owned()
}

pub fn format_currency(v: f64) -> String {
    format!("{v:.2}")
}

pub fn format_tokens(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.1}B", n as f64 / 1e9)
    } else if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1e6)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1e3)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_formats() {
        // RFC 3339 with Z and with a colon offset agree on the same instant
        let z = parse_timestamp("2025-03-01T12:00:00Z").unwrap();
        let offset = parse_timestamp("2025-03-01T13:00:00+01:00").unwrap();
        assert_eq!(z, offset);

        // Non-colon offset falls through to the %z strategy
        let compact = parse_timestamp("2025-03-01T12:00:00+0000").unwrap();
        assert_eq!(z, compact);

        // Fractional seconds
        let frac = parse_timestamp("2025-03-01T12:00:00.500Z").unwrap();
        assert_eq!(z, frac);

        // Bare timestamp is taken as UTC
        let naive = parse_timestamp("2025-03-01T12:00:00").unwrap();
        assert_eq!(z, naive);

        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("not a time"), None);
        assert_eq!(parse_timestamp("2025-13-45T99:00:00Z"), None);
    }

    #[test]
    fn test_clamp_percent_total_and_idempotent() {
        assert_eq!(clamp_percent(f64::NAN), 0);
        assert_eq!(clamp_percent(f64::INFINITY), 100);
        assert_eq!(clamp_percent(f64::NEG_INFINITY), 0);
        assert_eq!(clamp_percent(-5.0), 0);
        assert_eq!(clamp_percent(0.0), 0);
        assert_eq!(clamp_percent(42.9), 42);
        assert_eq!(clamp_percent(100.0), 100);
        assert_eq!(clamp_percent(250.0), 100);
        for v in [-10.0, 0.0, 55.5, 100.0, 1e9] {
            let once = clamp_percent(v);
            assert_eq!(clamp_percent(once as f64), once);
        }
    }

    #[test]
    fn test_bar_cells_geometry() {
        let mut prev_filled = 0;
        for pct in 0..=100u8 {
            let (filled, empty) = bar_cells(pct, 10);
            assert_eq!(filled + empty, 10);
            assert!(filled >= prev_filled, "filled must be monotonic in pct");
            prev_filled = filled;
        }
        assert_eq!(bar_cells(0, 10), (0, 10));
        assert_eq!(bar_cells(25, 10), (2, 8));
        assert_eq!(bar_cells(100, 10), (10, 0));
        assert_eq!(bar_cells(250, 10), (10, 0));
    }

    #[test]
    fn test_render_progress_bar() {
        let bar = render_progress_bar(50, 10);
        assert_eq!(bar.chars().count(), 10);
        assert_eq!(bar.chars().filter(|c| *c == BAR_FILLED).count(), 5);
        assert_eq!(bar.chars().filter(|c| *c == BAR_EMPTY).count(), 5);
        assert_eq!(render_progress_bar(0, 4), "░░░░");
        assert_eq!(render_progress_bar(100, 4), "▓▓▓▓");
    }

    #[test]
    fn test_bar_tier_boundaries() {
        assert_eq!(bar_tier(0), BarTier::Healthy);
        assert_eq!(bar_tier(40), BarTier::Healthy);
        assert_eq!(bar_tier(41), BarTier::Caution);
        assert_eq!(bar_tier(70), BarTier::Caution);
        assert_eq!(bar_tier(71), BarTier::Danger);
        assert_eq!(bar_tier(100), BarTier::Danger);
    }

    #[test]
    fn test_format_tokens() {
        assert_eq!(format_tokens(999), "999");
        assert_eq!(format_tokens(1_500), "1.5K");
        assert_eq!(format_tokens(2_300_000), "2.3M");
        assert_eq!(format_tokens(1_200_000_000), "1.2B");
    }

    #[test]
    fn test_format_epoch_hm_shape() {
        // Local-timezone dependent; assert shape, not value
        let s = format_epoch_hm(1_700_000_000);
        assert_eq!(s.len(), 5);
        assert_eq!(s.as_bytes()[2], b':');
    }
}
