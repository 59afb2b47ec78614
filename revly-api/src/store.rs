//! Approval-flag store
//!
//! A flat JSON object in `<data_dir>/approvals.json` mapping canonical
//! review ids (`"source:localid"`) to booleans. Last-writer-wins: writes
//! go through a temp file and atomic rename. The normalization pipeline
//! only ever sees the map as a value; all writes happen here.

use std::path::{Path, PathBuf};

use revly_common::model::ApprovalMap;
use revly_common::{Error, Result};

const APPROVALS_FILE: &str = "approvals.json";

fn approvals_path(data_dir: &Path) -> PathBuf {
    data_dir.join(APPROVALS_FILE)
}

/// Load the approval map. A missing file is an empty map, not an error,
/// so the pipeline treats every review as unapproved.
pub async fn load_approvals(data_dir: &Path) -> Result<ApprovalMap> {
    let path = approvals_path(data_dir);
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(ApprovalMap::new()),
        Err(err) => Err(Error::Io(err)),
    }
}

/// Persist one approval flag and return the updated map.
pub async fn set_approval(data_dir: &Path, review_id: &str, approved: bool) -> Result<ApprovalMap> {
    let mut approvals = load_approvals(data_dir).await?;
    approvals.insert(review_id.to_string(), approved);
    write_approvals(data_dir, &approvals).await?;
    Ok(approvals)
}

/// Write the full map atomically: temp file first, then rename.
async fn write_approvals(data_dir: &Path, approvals: &ApprovalMap) -> Result<()> {
    tokio::fs::create_dir_all(data_dir).await?;

    let path = approvals_path(data_dir);
    let temp_path = path.with_extension("json.tmp");
    let bytes = serde_json::to_vec_pretty(approvals)?;

    if let Err(err) = tokio::fs::write(&temp_path, &bytes).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(Error::Io(err));
    }
    if let Err(err) = tokio::fs::rename(&temp_path, &path).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(Error::Io(err));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_loads_as_empty_map() {
        let dir = tempfile::tempdir().expect("tempdir");
        let approvals = load_approvals(dir.path()).await.expect("loads");
        assert!(approvals.is_empty());
    }

    #[tokio::test]
    async fn test_set_approval_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");

        let updated = set_approval(dir.path(), "hostaway:1", true)
            .await
            .expect("writes");
        assert_eq!(updated.get("hostaway:1"), Some(&true));

        let reloaded = load_approvals(dir.path()).await.expect("loads");
        assert_eq!(reloaded.get("hostaway:1"), Some(&true));

        // Last writer wins
        set_approval(dir.path(), "hostaway:1", false)
            .await
            .expect("writes");
        let reloaded = load_approvals(dir.path()).await.expect("loads");
        assert_eq!(reloaded.get("hostaway:1"), Some(&false));
    }

    #[tokio::test]
    async fn test_write_leaves_no_temp_file_behind() {
        let dir = tempfile::tempdir().expect("tempdir");
        set_approval(dir.path(), "google:1:Jane", true)
            .await
            .expect("writes");

        let leftover: Vec<_> = std::fs::read_dir(dir.path())
            .expect("readdir")
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "tmp"))
            .collect();
        assert!(leftover.is_empty());
    }
}
