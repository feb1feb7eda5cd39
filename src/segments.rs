//! # Segments Module
//!
//! Decides which segments a render includes and in what form. Order is fixed
//! as {directory, git, model, session, cost, tokens}; a disabled or absent
//! segment is skipped outright, never rendered as a placeholder.

use crate::cli::FeatureConfig;
use crate::extract::DerivedMetrics;

/// Display inputs that come from the snapshot and the repository rather than
/// from the metric computations.
#[derive(Debug, Default, Clone)]
pub struct RenderContext {
    pub directory: Option<String>,
    pub git: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Directory(String),
    Git(String),
    Model(String),
    Session {
        text: Option<String>,
        bar: Option<String>,
        elapsed_pct: u8,
    },
    Cost {
        usd: f64,
        per_hour: Option<f64>,
    },
    Tokens {
        total: u64,
        per_minute: Option<f64>,
    },
}

pub fn assemble(
    ctx: &RenderContext,
    metrics: &DerivedMetrics,
    features: &FeatureConfig,
) -> Vec<Segment> {
    let mut segments = Vec::new();

    if let Some(dir) = &ctx.directory {
        segments.push(Segment::Directory(dir.clone()));
    }
    if let Some(git) = &ctx.git {
        segments.push(Segment::Git(git.clone()));
    }
    if let Some(model) = &ctx.model {
        segments.push(Segment::Model(model.clone()));
    }

    if let Some(session) = &metrics.session {
        if session.text.is_some() || session.bar.is_some() {
            segments.push(Segment::Session {
                text: session.text.clone(),
                bar: session.bar.clone(),
                elapsed_pct: session.elapsed_pct,
            });
        }
    }

    if features.show_cost {
        if let Some(usd) = metrics.cost_usd {
            segments.push(Segment::Cost {
                usd,
                per_hour: metrics.cost_per_hour,
            });
        }
    }

    if features.show_tokens {
        if let Some(total) = metrics.total_tokens {
            // The flag gates the rate even when it was computable
            let per_minute = if features.show_burn_rate {
                metrics.tokens_per_minute
            } else {
                None
            };
            segments.push(Segment::Tokens { total, per_minute });
        }
    }

    segments
}
