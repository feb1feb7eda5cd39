//! # Claude Line
//!
//! A single-line statusline for Claude Code sessions. The host pipes one JSON
//! snapshot of session state to stdin per render; this crate extracts cost and
//! token telemetry from it, optionally queries the `ccusage` tool for the
//! active usage window, and prints one line of labeled segments.
//!
//! ## Overview
//!
//! - Cost and burn rate ($/hour) from the snapshot's cost summary
//! - Token totals and tokens-per-minute from the context window counters
//! - Session countdown and progress bar from the active usage window
//! - Working directory, git state, and model identity
//!
//! Every metric degrades to "absent" on missing or malformed input; a render
//! never fails because one segment could not be computed.
//!
//! ## Features
//!
//! - `git` (default): Enables repository inspection via gix
//! - `colors` (default): Enables terminal color output via owo-colors

/// Command-line argument parsing and the feature configuration
pub mod cli;

/// Line rendering: labels, colors, and segment formatting
pub mod display;

/// Snapshot field extraction and derived cost/token metrics
pub mod extract;

/// Git repository inspection (feature-gated)
#[cfg(feature = "git")]
pub mod git;

/// Data models for the snapshot, usage blocks, and git info
pub mod models;

/// Segment selection and ordering
pub mod segments;

/// Usage-window resolution via the external usage tool
pub mod session;

/// Utility functions for timestamps, percentages, and formatting
pub mod utils;
