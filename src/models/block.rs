use serde::Deserialize;

/// One usage window as reported by `ccusage blocks --json`.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct UsageBlock {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    #[serde(default)]
    pub usage_limit_reset_time: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Deserialize, Debug, Default)]
pub struct BlocksReport {
    #[serde(default)]
    pub blocks: Vec<UsageBlock>,
}
