//! # Extract Module
//!
//! Pulls the telemetry fields out of the raw snapshot and derives the
//! cost/token metrics. Two extraction strategies exist: the structured parser
//! (preferred) and a text-scan fallback for environments where the structured
//! parser is unusable. Both must agree on well-formed input.

use once_cell::sync::Lazy;
use regex::Regex;
use std::env;

use crate::cli::FeatureConfig;
use crate::models::StatusSnapshot;
use crate::session::SessionMetrics;

/// Flat, strategy-neutral view of the snapshot fields this crate consumes.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SnapshotFields {
    pub cost_usd: Option<f64>,
    pub total_duration_ms: Option<u64>,
    pub total_input_tokens: Option<u64>,
    pub total_output_tokens: Option<u64>,
    pub model_display_name: Option<String>,
    pub current_dir: Option<String>,
    pub project_dir: Option<String>,
}

/// Computed per-render metrics. `None` always means "insufficient data, omit
/// the segment", never zero.
#[derive(Debug, Default, Clone)]
pub struct DerivedMetrics {
    pub cost_usd: Option<f64>,
    pub cost_per_hour: Option<f64>,
    pub total_tokens: Option<u64>,
    pub tokens_per_minute: Option<f64>,
    pub session: Option<SessionMetrics>,
}

pub trait SnapshotExtractor {
    fn name(&self) -> &'static str;
    fn extract(&self, raw: &[u8]) -> SnapshotFields;
}

/// Preferred strategy: deserialize the whole snapshot.
pub struct StructuredExtractor;

impl SnapshotExtractor for StructuredExtractor {
    fn name(&self) -> &'static str {
        "structured"
    }

    fn extract(&self, raw: &[u8]) -> SnapshotFields {
        let Ok(snap) = serde_json::from_slice::<StatusSnapshot>(raw) else {
            return SnapshotFields::default();
        };
        SnapshotFields {
            cost_usd: snap.cost.as_ref().and_then(|c| c.total_cost_usd),
            total_duration_ms: snap.cost.as_ref().and_then(|c| c.total_duration_ms),
            total_input_tokens: snap
                .context_window
                .as_ref()
                .and_then(|w| w.total_input_tokens),
            total_output_tokens: snap
                .context_window
                .as_ref()
                .and_then(|w| w.total_output_tokens),
            model_display_name: snap.model.and_then(|m| m.display_name),
            current_dir: snap.workspace.as_ref().and_then(|w| w.current_dir.clone()),
            project_dir: snap.workspace.and_then(|w| w.project_dir),
        }
    }
}

static COST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""total_cost_usd"\s*:\s*([0-9]+(?:\.[0-9]+)?)"#).unwrap());
static DURATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""total_duration_ms"\s*:\s*([0-9]+)"#).unwrap());
static INPUT_TOKENS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""total_input_tokens"\s*:\s*([0-9]+)"#).unwrap());
static OUTPUT_TOKENS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""total_output_tokens"\s*:\s*([0-9]+)"#).unwrap());
static DISPLAY_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""display_name"\s*:\s*"([^"]*)""#).unwrap());
static CURRENT_DIR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""current_dir"\s*:\s*"([^"]*)""#).unwrap());
static PROJECT_DIR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""project_dir"\s*:\s*"([^"]*)""#).unwrap());

/// Fallback strategy: scan the raw text for the known field keys. Used when
/// the structured parser is unavailable in the deployment environment; the
/// numeric fields match the structured strategy on any well-formed snapshot.
pub struct TextScanExtractor;

impl SnapshotExtractor for TextScanExtractor {
    fn name(&self) -> &'static str {
        "text-scan"
    }

    fn extract(&self, raw: &[u8]) -> SnapshotFields {
        let text = String::from_utf8_lossy(raw);
        SnapshotFields {
            cost_usd: capture_num(&COST_RE, &text),
            total_duration_ms: capture_num(&DURATION_RE, &text),
            total_input_tokens: capture_num(&INPUT_TOKENS_RE, &text),
            total_output_tokens: capture_num(&OUTPUT_TOKENS_RE, &text),
            model_display_name: capture_str(&DISPLAY_NAME_RE, &text),
            current_dir: capture_str(&CURRENT_DIR_RE, &text),
            project_dir: capture_str(&PROJECT_DIR_RE, &text),
        }
    }
}

fn capture_num<T: std::str::FromStr>(re: &Regex, text: &str) -> Option<T> {
    re.captures(text)?.get(1)?.as_str().parse().ok()
}

fn capture_str(re: &Regex, text: &str) -> Option<String> {
    Some(re.captures(text)?.get(1)?.as_str().to_string())
}

/// Pick the extraction strategy for this process. The structured path is
/// probed once at startup; CLAUDE_LINE_TEXT_SCAN forces the fallback, which
/// is a capability override, not a data condition.
pub fn select_extractor() -> Box<dyn SnapshotExtractor> {
    if structured_parser_available() {
        Box::new(StructuredExtractor)
    } else {
        Box::new(TextScanExtractor)
    }
}

fn structured_parser_available() -> bool {
    if force_text_scan() {
        return false;
    }
    serde_json::from_str::<serde_json::Value>(r#"{"probe":1}"#).is_ok()
}

fn force_text_scan() -> bool {
    match env::var("CLAUDE_LINE_TEXT_SCAN") {
        Ok(val) => matches!(
            val.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => false,
    }
}

/// Derive the cost/token metrics from the extracted fields. Rates require a
/// positive duration; a token sum of exactly zero collapses to absent.
pub fn derive_metrics(fields: &SnapshotFields, features: &FeatureConfig) -> DerivedMetrics {
    let cost_usd = fields.cost_usd.filter(|v| v.is_finite() && *v >= 0.0);

    let cost_per_hour = match (cost_usd, fields.total_duration_ms) {
        (Some(cost), Some(ms)) if ms > 0 => Some(cost * 3_600_000.0 / ms as f64),
        _ => None,
    };

    let total_tokens = match (fields.total_input_tokens, fields.total_output_tokens) {
        (Some(input), Some(output)) => {
            let sum = input + output;
            (sum > 0).then_some(sum)
        }
        _ => None,
    };

    // The rate is only worth computing when it will also be displayed
    let tokens_per_minute = if features.show_tokens && features.show_burn_rate {
        match (total_tokens, fields.total_duration_ms) {
            (Some(tokens), Some(ms)) if ms > 0 => Some(tokens as f64 * 60_000.0 / ms as f64),
            _ => None,
        }
    } else {
        None
    };

    DerivedMetrics {
        cost_usd,
        cost_per_hour,
        total_tokens,
        tokens_per_minute,
        session: None,
    }
}
