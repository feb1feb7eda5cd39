//! # Git Module
//!
//! Repository inspection for the git segment using the gix library. Any
//! failure to read the repository yields `None` and the segment is omitted.

use crate::models::GitInfo;
use std::path::Path;

pub fn read_git_info(start_dir: &Path) -> Option<GitInfo> {
    let repo = gix::discover(start_dir).ok()?;
    let mut info = GitInfo::default();

    // HEAD: branch name, or short commit id when detached
    let mut head = repo.head().ok()?;
    if let Some(name) = head.referent_name() {
        info.branch = Some(name.shorten().to_string());
    }
    if let Ok(Some(id)) = head.try_peel_to_id_in_place() {
        let hex = id.to_hex().to_string();
        info.short_commit = Some(hex.chars().take(7).collect());
    }

    // Dirty status via index vs worktree (untracked files do not affect it)
    match repo.is_dirty() {
        Ok(dirty) => info.is_clean = Some(!dirty),
        Err(_) => info.is_clean = None,
    }

    Some(info)
}
