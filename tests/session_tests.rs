//! Resolver tests against a fake usage tool installed in a tempdir. These
//! mutate process environment variables and are serialized for that reason.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;

use chrono::{TimeZone, Utc};
use serial_test::serial;
use tempfile::TempDir;

use claude_line::cli::FeatureConfig;
use claude_line::session::resolve_session;

fn set_env(key: &str, value: &str) {
    unsafe { std::env::set_var(key, value) };
}

fn unset_env(key: &str) {
    unsafe { std::env::remove_var(key) };
}

fn reset_resolver_env() {
    unset_env("CLAUDE_LINE_USAGE_CMD");
    unset_env("CLAUDE_LINE_USAGE_TIMEOUT_MS");
    unset_env("CLAUDE_LINE_FETCH_USAGE");
}

/// Install a fake `ccusage` that prints `payload` and exits 0.
fn install_fake_tool(dir: &TempDir, payload: &str) -> String {
    install_fake_tool_script(dir, &format!("#!/bin/sh\ncat <<'EOF'\n{payload}\nEOF\n"))
}

fn install_fake_tool_script(dir: &TempDir, script: &str) -> String {
    let path = dir.path().join("ccusage");
    fs::write(&path, script).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path.to_string_lossy().into_owned()
}

fn rfc3339(epoch: i64) -> String {
    Utc.timestamp_opt(epoch, 0).unwrap().to_rfc3339()
}

fn blocks_payload(start: i64, end: i64, is_active: bool) -> String {
    format!(
        r#"{{"blocks":[{{"startTime":"{}","endTime":"{}","isActive":{}}}]}}"#,
        rfc3339(start),
        rfc3339(end),
        is_active
    )
}

#[test]
#[serial]
fn active_window_resolves_to_metrics() {
    reset_resolver_env();
    let now = Utc::now().timestamp();
    let dir = TempDir::new().unwrap();
    let tool = install_fake_tool(&dir, &blocks_payload(now - 900, now + 2700, true));
    set_env("CLAUDE_LINE_USAGE_CMD", &tool);

    let metrics = resolve_session(now, &FeatureConfig::default()).unwrap();
    assert_eq!(metrics.elapsed_pct, 25);
    assert_eq!(metrics.remaining_seconds, 2700);
    assert!(metrics.text.is_some());
    assert!(metrics.bar.is_some());

    reset_resolver_env();
}

#[test]
#[serial]
fn reset_time_wins_over_end_time() {
    reset_resolver_env();
    let now = Utc::now().timestamp();
    let dir = TempDir::new().unwrap();
    let payload = format!(
        r#"{{"blocks":[{{"startTime":"{}","endTime":"{}","usageLimitResetTime":"{}","isActive":true}}]}}"#,
        rfc3339(now - 1800),
        rfc3339(now + 600),
        rfc3339(now + 1800),
    );
    let tool = install_fake_tool(&dir, &payload);
    set_env("CLAUDE_LINE_USAGE_CMD", &tool);

    let metrics = resolve_session(now, &FeatureConfig::default()).unwrap();
    assert_eq!(metrics.remaining_seconds, 1800);
    assert_eq!(metrics.elapsed_pct, 50);

    reset_resolver_env();
}

#[test]
#[serial]
fn first_active_window_is_authoritative() {
    reset_resolver_env();
    let now = Utc::now().timestamp();
    let dir = TempDir::new().unwrap();
    let payload = format!(
        r#"{{"blocks":[
            {{"startTime":"{}","endTime":"{}","isActive":false}},
            {{"startTime":"{}","endTime":"{}","isActive":true}},
            {{"startTime":"{}","endTime":"{}","isActive":true}}
        ]}}"#,
        rfc3339(now - 40_000),
        rfc3339(now - 22_000),
        rfc3339(now - 900),
        rfc3339(now + 2700),
        rfc3339(now - 1),
        rfc3339(now + 17_999),
    );
    let tool = install_fake_tool(&dir, &payload);
    set_env("CLAUDE_LINE_USAGE_CMD", &tool);

    let metrics = resolve_session(now, &FeatureConfig::default()).unwrap();
    assert_eq!(metrics.elapsed_pct, 25);

    reset_resolver_env();
}

#[test]
#[serial]
fn no_active_window_yields_nothing() {
    reset_resolver_env();
    let now = Utc::now().timestamp();
    let dir = TempDir::new().unwrap();
    let tool = install_fake_tool(&dir, &blocks_payload(now - 900, now + 2700, false));
    set_env("CLAUDE_LINE_USAGE_CMD", &tool);

    assert_eq!(resolve_session(now, &FeatureConfig::default()), None);

    let empty = install_fake_tool(&dir, r#"{"blocks":[]}"#);
    set_env("CLAUDE_LINE_USAGE_CMD", &empty);
    assert_eq!(resolve_session(now, &FeatureConfig::default()), None);

    reset_resolver_env();
}

#[test]
#[serial]
fn unparseable_timestamps_yield_nothing() {
    reset_resolver_env();
    let now = Utc::now().timestamp();
    let dir = TempDir::new().unwrap();
    let payload =
        r#"{"blocks":[{"startTime":"yesterday-ish","endTime":"2025-03-01T12:00:00Z","isActive":true}]}"#;
    let tool = install_fake_tool(&dir, payload);
    set_env("CLAUDE_LINE_USAGE_CMD", &tool);

    assert_eq!(resolve_session(now, &FeatureConfig::default()), None);

    reset_resolver_env();
}

#[test]
#[serial]
fn missing_tool_yields_nothing() {
    reset_resolver_env();
    set_env("CLAUDE_LINE_USAGE_CMD", "/nonexistent/usage-tool");
    assert_eq!(
        resolve_session(Utc::now().timestamp(), &FeatureConfig::default()),
        None
    );
    reset_resolver_env();
}

#[test]
#[serial]
fn failing_tool_yields_nothing() {
    reset_resolver_env();
    let dir = TempDir::new().unwrap();
    let tool = install_fake_tool_script(&dir, "#!/bin/sh\nexit 3\n");
    set_env("CLAUDE_LINE_USAGE_CMD", &tool);
    assert_eq!(
        resolve_session(Utc::now().timestamp(), &FeatureConfig::default()),
        None
    );
    reset_resolver_env();
}

#[test]
#[serial]
fn slow_tool_hits_timeout() {
    reset_resolver_env();
    let dir = TempDir::new().unwrap();
    let tool = install_fake_tool_script(
        &dir,
        "#!/bin/sh\nsleep 2\necho '{\"blocks\":[]}'\n",
    );
    set_env("CLAUDE_LINE_USAGE_CMD", &tool);
    set_env("CLAUDE_LINE_USAGE_TIMEOUT_MS", "200");

    assert_eq!(
        resolve_session(Utc::now().timestamp(), &FeatureConfig::default()),
        None
    );

    reset_resolver_env();
}

#[test]
#[serial]
fn kill_switch_disables_query() {
    reset_resolver_env();
    let now = Utc::now().timestamp();
    let dir = TempDir::new().unwrap();
    let tool = install_fake_tool(&dir, &blocks_payload(now - 900, now + 2700, true));
    set_env("CLAUDE_LINE_USAGE_CMD", &tool);
    set_env("CLAUDE_LINE_FETCH_USAGE", "0");

    assert_eq!(resolve_session(now, &FeatureConfig::default()), None);

    reset_resolver_env();
}

#[test]
#[serial]
fn disabled_features_skip_the_query_entirely() {
    reset_resolver_env();
    // Point at a tool that would blow up the test if it were ever spawned
    set_env("CLAUDE_LINE_USAGE_CMD", "/nonexistent/usage-tool");
    let features = FeatureConfig {
        show_session: false,
        show_progress_bar: false,
        ..FeatureConfig::default()
    };
    assert_eq!(resolve_session(Utc::now().timestamp(), &features), None);
    reset_resolver_env();
}

#[test]
#[serial]
fn malformed_tool_output_yields_nothing() {
    reset_resolver_env();
    let dir = TempDir::new().unwrap();
    let tool = install_fake_tool(&dir, "this is not json");
    set_env("CLAUDE_LINE_USAGE_CMD", &tool);
    assert_eq!(
        resolve_session(Utc::now().timestamp(), &FeatureConfig::default()),
        None
    );
    reset_resolver_env();
}
