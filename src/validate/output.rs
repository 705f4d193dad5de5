//! Console rendering of a [`RunSummary`].
//!
//! Text output is one line per check, prefixed with a pass (`✓`), fail (`✗`)
//! or note (`ℹ`) marker. JSON output is the serialized summary.

use super::{RunSummary, ValidationError};

pub const PASS: &str = "✓";
pub const FAIL: &str = "✗";
pub const NOTE: &str = "ℹ";

/// Output format for `validate`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub fn render(summary: &RunSummary, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(render_text(summary)),
        OutputFormat::Json => serde_json::to_string_pretty(summary),
    }
}

fn mark(passed: bool) -> &'static str {
    if passed {
        PASS
    } else {
        FAIL
    }
}

pub fn render_text(summary: &RunSummary) -> String {
    let mut lines = vec!["Validating project structure...".to_string()];
    for entry in summary.artifacts.entries() {
        let state = if entry.passed { "exists" } else { "missing" };
        lines.push(format!("{} {} {}", mark(entry.passed), entry.name, state));
    }

    lines.push(String::new());
    if summary.artifacts.passed() {
        lines.push(format!("{} All required files are present", PASS));
        lines.push(format!("{} Application structure is valid", PASS));
        lines.push(format!("{} GitHub Action workflow is configured", PASS));
    } else {
        lines.push(format!(
            "{} Some required files are missing. Please check the project structure.",
            FAIL
        ));
    }

    for error in &summary.errors {
        if let ValidationError::ManifestUnreadable { .. } | ValidationError::ManifestParse { .. } =
            error
        {
            lines.push(String::new());
            lines.push(format!("{} {}", FAIL, error));
        }
    }

    if let Some(scripts) = &summary.scripts {
        lines.push(String::new());
        for entry in scripts.entries() {
            if entry.passed {
                lines.push(format!("{} Script '{}' is present in package.json", PASS, entry.name));
            } else {
                lines.push(format!("{} Script '{}' is missing from package.json", FAIL, entry.name));
            }
        }
        if scripts.passed() {
            lines.push(String::new());
            lines.push(format!("{} All required scripts are present in package.json", PASS));
        }
    }

    for error in &summary.errors {
        if let ValidationError::WorkflowUnreadable { .. } = error {
            lines.push(String::new());
            lines.push(format!("{} {}", FAIL, error));
        }
    }

    if let Some(workflow) = &summary.workflow {
        lines.push(String::new());
        lines.push("Validating workflow definition...".to_string());
        for entry in workflow.report.entries().iter().filter(|e| e.passed) {
            lines.push(format!("{} Workflow: {}", PASS, entry.description));
        }
        for note in &workflow.notes {
            lines.push(format!("{} {}", NOTE, note));
        }
        lines.push(match &workflow.error {
            Some(error) => format!("{} {}", FAIL, error),
            None => format!("{} Workflow definition is valid", PASS),
        });
    }

    lines.push(String::new());
    if summary.passed() {
        lines.push(format!(
            "{} The project is ready for deployment via GitHub Actions.",
            PASS
        ));
    } else {
        lines.push(format!(
            "{} Validation failed with {} error(s).",
            FAIL,
            summary.errors.len()
        ));
    }

    lines.join("\n")
}
