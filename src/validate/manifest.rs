//! Required-script checks against `package.json`.

use std::path::Path;

use super::check::{CheckItem, CollectAll, ValidationReport};
use super::tree::Node;
use super::ValidationError;

/// Read and decode the manifest. Both failures halt the manifest stage.
pub fn load_manifest(root: &Path, rel: &str) -> Result<Node, ValidationError> {
    let text = std::fs::read_to_string(root.join(rel)).map_err(|e| {
        ValidationError::ManifestUnreadable {
            path: rel.to_string(),
            reason: e.to_string(),
        }
    })?;
    Node::from_json_str(&text).map_err(|e| ValidationError::ManifestParse {
        path: rel.to_string(),
        reason: e.to_string(),
    })
}

/// Check that `scripts.<name>` is declared with a truthy value for every name.
///
/// `false`, `0`, `""` and `null` all count as missing. Every script is checked
/// even after a failure. A manifest with no `scripts`
/// mapping reports all of them missing.
pub fn check_scripts(manifest: &Node, required: &[&str]) -> ValidationReport {
    let items = required.iter().map(|&script| {
        CheckItem::fatal(
            script,
            format!("script '{}' is declared", script),
            move || {
                manifest
                    .get_path(&["scripts", script])
                    .is_some_and(Node::is_truthy)
            },
        )
    });
    CollectAll::run(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn manifest(json: &str) -> Node {
        Node::from_json_str(json).unwrap()
    }

    #[test]
    fn test_both_scripts_present() {
        let m = manifest(r#"{"scripts": {"start": "node index.js", "build": "echo build"}}"#);
        let report = check_scripts(&m, &["start", "build"]);
        assert!(report.passed());
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn test_missing_build_still_checks_start() {
        let m = manifest(r#"{"scripts": {"start": "node index.js"}}"#);
        let report = check_scripts(&m, &["build", "start"]);
        assert!(!report.passed());
        assert_eq!(report.failures(), vec!["build"]);
        assert_eq!(report.len(), 2);
        assert!(report.entries()[1].passed);
    }

    #[test]
    fn test_empty_script_counts_as_missing() {
        let m = manifest(r#"{"scripts": {"start": "", "build": "tsc"}}"#);
        assert_eq!(check_scripts(&m, &["start", "build"]).failures(), vec!["start"]);
    }

    #[test]
    fn test_falsy_script_values_count_as_missing() {
        let m = manifest(r#"{"scripts": {"start": false, "build": 0, "test": null, "lint": true}}"#);
        assert_eq!(
            check_scripts(&m, &["start", "build", "test", "lint"]).failures(),
            vec!["start", "build", "test"]
        );
    }

    #[test]
    fn test_no_scripts_mapping() {
        let m = manifest(r#"{"name": "app"}"#);
        assert_eq!(
            check_scripts(&m, &["start", "build"]).failures(),
            vec!["start", "build"]
        );
    }

    #[test]
    fn test_load_manifest_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_manifest(dir.path(), "package.json").unwrap_err();
        assert!(matches!(err, ValidationError::ManifestUnreadable { .. }));

        fs::write(dir.path().join("package.json"), "{ not json").unwrap();
        let err = load_manifest(dir.path(), "package.json").unwrap_err();
        assert!(matches!(err, ValidationError::ManifestParse { .. }));
    }
}
