//! Deployment readiness validator.
//!
//! A one-shot run over a project directory with three stages:
//!
//! 1. **Artifacts** – every required file exists (exhaustive).
//! 2. **Manifest** – `package.json` declares every required script (exhaustive).
//! 3. **Workflow** – the deploy workflow parses and has the required keys
//!    (halts on the first missing key).
//!
//! A stage whose input file was already reported missing by the artifact stage
//! is skipped rather than failed twice. [`validate_project`] returns a
//! [`RunSummary`]; mapping it to an exit code is left to the caller.

pub mod artifacts;
pub mod check;
pub mod manifest;
pub mod output;
pub mod tree;
pub mod workflow;

use std::path::{Path, PathBuf};

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use tracing::instrument;

use crate::config::{MANIFEST_PATH, REQUIRED_ARTIFACTS, REQUIRED_SCRIPTS, WORKFLOW_PATH};

pub use check::{CheckItem, CheckOutcome, CollectAll, HaltOnFirst, Halted, ValidationReport};
pub use tree::Node;
pub use workflow::{validate_workflow, WorkflowOutcome, WorkflowState};

/// Everything that can fail a validation run.
///
/// `MissingArtifacts` and `MissingScripts` summarize collected outcomes; the
/// other variants stop the stage that raised them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("Required files are missing: {}", .paths.join(", "))]
    MissingArtifacts { paths: Vec<String> },

    #[error("Failed to read {path}: {reason}")]
    ManifestUnreadable { path: String, reason: String },

    #[error("Failed to parse {path}: {reason}")]
    ManifestParse { path: String, reason: String },

    #[error("Scripts missing from {path}: {}", .scripts.join(", "))]
    MissingScripts { path: String, scripts: Vec<String> },

    #[error("Failed to read {path}: {reason}")]
    WorkflowUnreadable { path: String, reason: String },

    #[error("Workflow is not valid YAML: {reason}")]
    ParseFailure { reason: String },

    #[error("Workflow validation failed: `{key}` is missing ({assertion})")]
    MissingSchemaKey { key: String, assertion: String },
}

/// Inputs of a validation run. [`ValidatorConfig::for_root`] uses the fixed
/// deployment lists; tests substitute their own.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    pub root: PathBuf,
    pub artifacts: Vec<String>,
    pub manifest_path: String,
    pub scripts: Vec<String>,
    pub workflow_path: String,
}

impl ValidatorConfig {
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            artifacts: REQUIRED_ARTIFACTS.iter().map(|s| s.to_string()).collect(),
            manifest_path: MANIFEST_PATH.to_string(),
            scripts: REQUIRED_SCRIPTS.iter().map(|s| s.to_string()).collect(),
            workflow_path: WORKFLOW_PATH.to_string(),
        }
    }
}

/// Structured result of a whole run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub artifacts: ValidationReport,
    /// `None` when the manifest stage did not run or could not read its input
    pub scripts: Option<ValidationReport>,
    /// `None` when the workflow stage did not run or could not read its input
    pub workflow: Option<WorkflowOutcome>,
    /// Failures in the order they were found
    pub errors: Vec<ValidationError>,
}

impl RunSummary {
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Serialize for RunSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("RunSummary", 5)?;
        state.serialize_field("passed", &self.passed())?;
        state.serialize_field("artifacts", &self.artifacts)?;
        state.serialize_field("scripts", &self.scripts)?;
        state.serialize_field("workflow", &self.workflow)?;
        state.serialize_field("errors", &self.errors)?;
        state.end()
    }
}

/// Run all three stages against `config.root`.
#[instrument(name = "validate::project", skip(config), fields(root = %config.root.display()))]
pub fn validate_project(config: &ValidatorConfig) -> RunSummary {
    let root = config.root.as_path();
    let mut errors = Vec::new();

    let artifact_paths: Vec<&str> = config.artifacts.iter().map(String::as_str).collect();
    let artifacts = artifacts::check_artifacts(root, &artifact_paths);
    let missing: Vec<String> = artifacts.failures().iter().map(|s| s.to_string()).collect();
    if !missing.is_empty() {
        tracing::info!(missing = ?missing, "Required files are missing");
        errors.push(ValidationError::MissingArtifacts {
            paths: missing.clone(),
        });
    }

    let scripts = if missing.contains(&config.manifest_path) {
        None
    } else {
        run_manifest_stage(root, config, &mut errors)
    };

    let workflow = if missing.contains(&config.workflow_path) {
        None
    } else {
        run_workflow_stage(root, &config.workflow_path, &mut errors)
    };

    tracing::info!(passed = errors.is_empty(), errors = errors.len(), "Validation finished");

    RunSummary {
        artifacts,
        scripts,
        workflow,
        errors,
    }
}

fn run_manifest_stage(
    root: &Path,
    config: &ValidatorConfig,
    errors: &mut Vec<ValidationError>,
) -> Option<ValidationReport> {
    let manifest = match manifest::load_manifest(root, &config.manifest_path) {
        Ok(manifest) => manifest,
        Err(e) => {
            tracing::warn!(error = %e, "Manifest stage halted");
            errors.push(e);
            return None;
        }
    };

    let required: Vec<&str> = config.scripts.iter().map(String::as_str).collect();
    let report = manifest::check_scripts(&manifest, &required);
    let missing = report.failures();
    if !missing.is_empty() {
        errors.push(ValidationError::MissingScripts {
            path: config.manifest_path.clone(),
            scripts: missing.iter().map(|s| s.to_string()).collect(),
        });
    }
    Some(report)
}

fn run_workflow_stage(
    root: &Path,
    rel: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<WorkflowOutcome> {
    let text = match std::fs::read_to_string(root.join(rel)) {
        Ok(text) => text,
        Err(e) => {
            errors.push(ValidationError::WorkflowUnreadable {
                path: rel.to_string(),
                reason: e.to_string(),
            });
            return None;
        }
    };

    let outcome = validate_workflow(&text);
    if let Some(e) = &outcome.error {
        tracing::warn!(error = %e, state = ?outcome.reached, "Workflow stage halted");
        errors.push(e.clone());
    }
    Some(outcome)
}
