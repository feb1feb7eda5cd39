#[derive(Debug, Default, Clone)]
pub struct GitInfo {
    pub branch: Option<String>,
    pub short_commit: Option<String>,
    pub is_clean: Option<bool>,
}
