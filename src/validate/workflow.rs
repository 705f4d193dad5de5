//! Schema validation for the GitHub Actions deploy workflow.
//!
//! The workflow is parsed into a [`Node`] tree and a fixed sequence of key
//! assertions is run with [`HaltOnFirst`]: each assertion presupposes the
//! previous one (no `jobs`, no jobs to look into), so the first failure ends
//! the sequence. Progress is tracked as a [`WorkflowState`].
//!
//! ```text
//! Unparsed -> Parsed -> NameChecked -> TriggersChecked -> JobsPresent
//!          -> BuildJobChecked -> DeployJobChecked -> Done
//! (any state) -> Failed
//! ```

use serde::Serialize;

use super::check::{CheckItem, HaltOnFirst, ValidationReport};
use super::tree::Node;
use super::ValidationError;
use crate::config::{BUILD_JOB, DEPLOY_JOB, KUBECONFIG_SECRET_MARKER};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    Unparsed,
    Parsed,
    NameChecked,
    TriggersChecked,
    JobsPresent,
    BuildJobChecked,
    DeployJobChecked,
    Done,
    Failed,
}

impl WorkflowState {
    /// The state reached once the assertion guarding this state passes.
    fn advance(self) -> Self {
        match self {
            WorkflowState::Unparsed => WorkflowState::Parsed,
            WorkflowState::Parsed => WorkflowState::NameChecked,
            WorkflowState::NameChecked => WorkflowState::TriggersChecked,
            WorkflowState::TriggersChecked => WorkflowState::JobsPresent,
            WorkflowState::JobsPresent => WorkflowState::BuildJobChecked,
            WorkflowState::BuildJobChecked => WorkflowState::DeployJobChecked,
            WorkflowState::DeployJobChecked => WorkflowState::Done,
            WorkflowState::Done => WorkflowState::Done,
            WorkflowState::Failed => WorkflowState::Failed,
        }
    }
}

/// Result of validating one workflow document.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowOutcome {
    /// Terminal state: `Done` or `Failed`.
    pub state: WorkflowState,
    /// Last non-failed state reached before terminating.
    pub reached: WorkflowState,
    /// Assertions evaluated, in order. Empty when parsing failed.
    pub report: ValidationReport,
    /// Informational findings; never affect the outcome.
    pub notes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ValidationError>,
}

impl WorkflowOutcome {
    pub fn passed(&self) -> bool {
        self.state == WorkflowState::Done
    }
}

/// Validate raw workflow text.
pub fn validate_workflow(text: &str) -> WorkflowOutcome {
    let notes = scan_notes(text);

    let tree = match Node::from_yaml_str(text) {
        Ok(tree) => tree,
        Err(e) => {
            tracing::debug!(error = %e, "Workflow failed to parse");
            return WorkflowOutcome {
                state: WorkflowState::Failed,
                reached: WorkflowState::Unparsed,
                report: ValidationReport::default(),
                notes,
                error: Some(ValidationError::ParseFailure {
                    reason: e.to_string(),
                }),
            };
        }
    };

    let (report, error) = match HaltOnFirst::run(schema_assertions(&tree)) {
        Ok(report) => (report, None),
        Err(halted) => {
            let error = ValidationError::MissingSchemaKey {
                key: halted.failed.name.clone(),
                assertion: halted.failed.description.clone(),
            };
            (halted.report, Some(error))
        }
    };

    // Every passed assertion moves one state forward from Parsed.
    let passed = report.entries().iter().filter(|e| e.passed).count();
    let reached = (0..passed).fold(WorkflowState::Parsed, |state, _| state.advance());

    let (state, reached) = if error.is_some() {
        (WorkflowState::Failed, reached)
    } else {
        (reached.advance(), reached)
    };

    tracing::debug!(?state, ?reached, "Workflow validation finished");

    WorkflowOutcome {
        state,
        reached,
        report,
        notes,
        error,
    }
}

/// The ordered key assertions.
fn schema_assertions(tree: &Node) -> Vec<CheckItem<'_>> {
    let build_key = format!("jobs.{}", BUILD_JOB);
    let deploy_key = format!("jobs.{}", DEPLOY_JOB);

    vec![
        CheckItem::fatal("name", "top-level `name` is present and non-empty", move || {
            tree.get("name").is_some_and(Node::is_non_empty)
        }),
        CheckItem::fatal("on", "top-level `on` (trigger events) is present", move || {
            tree.has_key("on")
        }),
        CheckItem::fatal("jobs", "top-level `jobs` is present", move || {
            tree.has_key("jobs")
        }),
        CheckItem::fatal(
            build_key,
            format!("`jobs` contains `{}`", BUILD_JOB),
            move || tree.get("jobs").is_some_and(|jobs| jobs.has_key(BUILD_JOB)),
        ),
        CheckItem::fatal(
            deploy_key,
            format!("`jobs` contains `{}`", DEPLOY_JOB),
            move || tree.get("jobs").is_some_and(|jobs| jobs.has_key(DEPLOY_JOB)),
        ),
    ]
}

fn scan_notes(text: &str) -> Vec<String> {
    let mut notes = Vec::new();
    if text.to_lowercase().contains(KUBECONFIG_SECRET_MARKER) {
        notes.push("Workflow references the KUBECONFIG_DATA secret".to_string());
    }
    notes
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
name: "Deploy"
on: push
jobs:
  build-and-push-image:
    runs-on: ubuntu-latest
  deploy-manifest:
    runs-on: ubuntu-latest
"#;

    #[test]
    fn test_valid_workflow_reaches_done() {
        let outcome = validate_workflow(VALID);
        assert!(outcome.passed());
        assert_eq!(outcome.state, WorkflowState::Done);
        assert_eq!(outcome.reached, WorkflowState::DeployJobChecked);
        assert_eq!(outcome.report.len(), 5);
        assert!(outcome.error.is_none());
    }

    #[test]
    fn test_missing_jobs_halts_before_job_checks() {
        let outcome = validate_workflow("name: Deploy\non: push\n");
        assert_eq!(outcome.state, WorkflowState::Failed);
        assert_eq!(outcome.reached, WorkflowState::TriggersChecked);
        assert_eq!(outcome.report.len(), 3);
        assert_eq!(outcome.report.failures(), vec!["jobs"]);
        assert!(matches!(
            outcome.error,
            Some(ValidationError::MissingSchemaKey { ref key, .. }) if key == "jobs"
        ));
    }

    #[test]
    fn test_missing_deploy_job() {
        let outcome = validate_workflow(
            "name: Deploy\non: [push]\njobs:\n  build-and-push-image:\n    runs-on: x\n",
        );
        assert_eq!(outcome.state, WorkflowState::Failed);
        assert_eq!(outcome.reached, WorkflowState::BuildJobChecked);
        assert_eq!(outcome.report.failures(), vec!["jobs.deploy-manifest"]);
    }

    #[test]
    fn test_empty_name_fails_first() {
        let outcome = validate_workflow("name: \"\"\non: push\njobs: {}\n");
        assert_eq!(outcome.reached, WorkflowState::Parsed);
        assert_eq!(outcome.report.len(), 1);
    }

    #[test]
    fn test_parse_failure_runs_no_assertions() {
        let outcome = validate_workflow("name: [Deploy\non: push\n");
        assert_eq!(outcome.state, WorkflowState::Failed);
        assert_eq!(outcome.reached, WorkflowState::Unparsed);
        assert!(outcome.report.is_empty());
        assert!(matches!(
            outcome.error,
            Some(ValidationError::ParseFailure { .. })
        ));
    }

    #[test]
    fn test_non_mapping_document_fails_on_name() {
        let outcome = validate_workflow("- just\n- a list\n");
        assert_eq!(outcome.report.failures(), vec!["name"]);
    }

    #[test]
    fn test_secret_note_is_case_insensitive() {
        let text = format!(
            "{}    env:\n      KUBECONFIG: ${{{{ secrets.KUBECONFIG_DATA }}}}\n",
            VALID
        );
        let outcome = validate_workflow(&text);
        assert!(outcome.passed());
        assert_eq!(outcome.notes.len(), 1);

        assert!(validate_workflow(VALID).notes.is_empty());
    }

    #[test]
    fn test_secret_note_does_not_rescue_failure() {
        let outcome = validate_workflow("name: x\n# secrets.kubeconfig_data\n");
        assert!(!outcome.passed());
        assert_eq!(outcome.notes.len(), 1);
    }

    #[test]
    fn test_terminal_states_do_not_advance() {
        assert_eq!(WorkflowState::Done.advance(), WorkflowState::Done);
        assert_eq!(WorkflowState::Failed.advance(), WorkflowState::Failed);
        assert_eq!(WorkflowState::JobsPresent.advance(), WorkflowState::BuildJobChecked);
    }

    #[test]
    fn test_trailing_document_is_ignored() {
        let text = format!("{}---\nname: other\n", VALID);
        let outcome = validate_workflow(&text);
        assert!(outcome.passed());
        assert!(outcome.error.is_none());
    }

    #[test]
    fn test_trailing_document_cannot_supply_jobs() {
        let text = format!("name: Deploy\non: push\n---\n{}", VALID);
        let outcome = validate_workflow(&text);
        assert_eq!(outcome.state, WorkflowState::Failed);
        assert_eq!(outcome.report.failures(), vec!["jobs"]);
    }
}
