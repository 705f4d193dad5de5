//! Presence checks for the files a deployment needs.

use std::io;
use std::path::Path;

use super::check::{CheckItem, CollectAll, ValidationReport};

/// Check that every path in `paths` exists under `root`.
///
/// All checks are fatal and all are evaluated. The report entries are named by
/// the relative path, so `report.failures()` lists exactly the absent files.
pub fn check_artifacts(root: &Path, paths: &[&str]) -> ValidationReport {
    let items = paths.iter().map(|rel| {
        let full = root.join(rel);
        CheckItem::fatal(*rel, format!("{} exists", rel), move || artifact_exists(&full))
    });
    CollectAll::run(items)
}

/// Whether `path` exists. Errors other than "not found" (permission denied,
/// an unreadable parent) also count as missing but are logged with their kind.
fn artifact_exists(path: &Path) -> bool {
    match std::fs::metadata(path) {
        Ok(_) => true,
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                kind = ?e.kind(),
                error = %e,
                "Cannot inspect artifact, treating as missing"
            );
            false
        }
    }
}
