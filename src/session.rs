//! # Session Module
//!
//! Resolves the active usage window by querying the external `ccusage` tool
//! and turns it into countdown text and a progress bar. Every failure mode
//! (tool missing, timeout, no active window, unparseable timestamps) yields
//! `None` so the dependent segments are simply omitted.

use std::env;
use std::io::Read;
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::cli::FeatureConfig;
use crate::models::BlocksReport;
use crate::utils::{clamp_percent, format_epoch_hm, parse_timestamp, render_progress_bar};

pub const USAGE_TIMEOUT_MS: u64 = 5_000;
pub const SESSION_BAR_WIDTH: usize = 10;

/// Resolved state of the active usage window. `text` and `bar` are each
/// present only when the corresponding feature asked for them.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionMetrics {
    pub elapsed_pct: u8,
    pub remaining_seconds: u64,
    pub reset_epoch: i64,
    pub text: Option<String>,
    pub bar: Option<String>,
}

/// Query the usage tool and compute session metrics for `now_epoch`.
/// Returns `None` unless a feature needs the query, the tool responds within
/// the timeout, and the response contains an active window with parseable
/// bounds.
pub fn resolve_session(now_epoch: i64, features: &FeatureConfig) -> Option<SessionMetrics> {
    if !features.needs_usage_query() || !fetch_enabled() {
        return None;
    }
    let output = run_usage_tool()?;
    let report: BlocksReport = serde_json::from_slice(&output).ok()?;
    let active = report.blocks.into_iter().find(|b| b.is_active)?;

    let start = parse_timestamp(active.start_time.as_deref()?)?;
    // The reset time is authoritative when present; the window end otherwise
    let end_str = active
        .usage_limit_reset_time
        .as_deref()
        .or(active.end_time.as_deref())?;
    let end = parse_timestamp(end_str)?;

    Some(window_metrics(now_epoch, start, end, features))
}

/// Pure window math, separated from the subprocess so it can be exercised
/// with fixed clocks.
pub fn window_metrics(
    now_epoch: i64,
    start_epoch: i64,
    end_epoch: i64,
    features: &FeatureConfig,
) -> SessionMetrics {
    // Floor of 1 second: degenerate windows must not divide by zero
    let total = (end_epoch - start_epoch).max(1);
    let elapsed = (now_epoch - start_epoch).clamp(0, total);
    let elapsed_pct = clamp_percent((elapsed * 100 / total) as f64);
    let remaining_seconds = (end_epoch - now_epoch).max(0) as u64;

    let text = features.show_session.then(|| {
        let hours = remaining_seconds / 3600;
        let minutes = (remaining_seconds % 3600) / 60;
        format!(
            "{hours}h {minutes}m until reset at {} ({elapsed_pct}%)",
            format_epoch_hm(end_epoch)
        )
    });
    let bar = features
        .show_progress_bar
        .then(|| render_progress_bar(elapsed_pct, SESSION_BAR_WIDTH));

    SessionMetrics {
        elapsed_pct,
        remaining_seconds,
        reset_epoch: end_epoch,
        text,
        bar,
    }
}

fn usage_command() -> String {
    env::var("CLAUDE_LINE_USAGE_CMD")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "ccusage".to_string())
}

fn usage_timeout() -> Duration {
    let ms = env::var("CLAUDE_LINE_USAGE_TIMEOUT_MS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|ms| *ms > 0)
        .unwrap_or(USAGE_TIMEOUT_MS);
    Duration::from_millis(ms)
}

fn fetch_enabled() -> bool {
    match env::var("CLAUDE_LINE_FETCH_USAGE") {
        Ok(val) => {
            let trimmed = val.trim();
            trimmed.is_empty()
                || matches!(
                    trimmed.to_ascii_lowercase().as_str(),
                    "1" | "true" | "yes" | "on"
                )
        }
        Err(_) => true,
    }
}

/// Run `ccusage blocks --json` with a bounded deadline. Stdout is drained on
/// a reader thread; if the deadline passes first the child is killed, which
/// also unblocks the reader. No retries: a failed call suppresses the
/// session segments for this render only.
fn run_usage_tool() -> Option<Vec<u8>> {
    let mut child = Command::new(usage_command())
        .args(["blocks", "--json"])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .ok()?;

    let mut stdout = child.stdout.take()?;
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = stdout.read_to_end(&mut buf);
        let _ = tx.send(buf);
    });

    let buf = match rx.recv_timeout(usage_timeout()) {
        Ok(buf) => buf,
        Err(_) => {
            let _ = child.kill();
            let _ = child.wait();
            return None;
        }
    };

    let status = child.wait().ok()?;
    if !status.success() || buf.is_empty() {
        return None;
    }
    Some(buf)
}
