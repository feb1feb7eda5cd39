use serde::Deserialize;

#[derive(Deserialize, Debug, Default)]
pub struct SnapshotModel {
    pub id: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct SnapshotWorkspace {
    pub current_dir: Option<String>,
    pub project_dir: Option<String>,
}

/// Aggregate cost summary provided by the host's statusline input
#[derive(Deserialize, Debug, Default)]
pub struct SnapshotCost {
    pub total_cost_usd: Option<f64>,
    pub total_duration_ms: Option<u64>,
}

#[derive(Deserialize, Debug, Default)]
pub struct SnapshotContextWindow {
    pub total_input_tokens: Option<u64>,
    pub total_output_tokens: Option<u64>,
}

/// One render's snapshot of session state, as piped to stdin by the host.
/// Every section is optional; unknown fields are ignored.
#[derive(Deserialize, Debug, Default)]
pub struct StatusSnapshot {
    pub model: Option<SnapshotModel>,
    pub workspace: Option<SnapshotWorkspace>,
    pub cost: Option<SnapshotCost>,
    pub context_window: Option<SnapshotContextWindow>,
}
