//! Check items, reports and the two runners that evaluate them.
//!
//! [`CollectAll`] evaluates every item so a single run surfaces every problem.
//! [`HaltOnFirst`] stops at the first failing fatal item; later predicates are
//! never invoked. The two are kept separate because the stages that use them
//! have different prerequisites: a missing script says nothing about the other
//! scripts, while a workflow without `jobs` cannot have a `deploy-manifest` job.

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

/// A single named assertion, consumed when evaluated.
pub struct CheckItem<'a> {
    name: String,
    description: String,
    fatal: bool,
    predicate: Box<dyn FnOnce() -> bool + 'a>,
}

impl<'a> CheckItem<'a> {
    /// A check whose failure fails the run.
    pub fn fatal(
        name: impl Into<String>,
        description: impl Into<String>,
        predicate: impl FnOnce() -> bool + 'a,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            fatal: true,
            predicate: Box::new(predicate),
        }
    }

    /// A check that is reported but never affects the outcome.
    pub fn informational(
        name: impl Into<String>,
        description: impl Into<String>,
        predicate: impl FnOnce() -> bool + 'a,
    ) -> Self {
        Self {
            fatal: false,
            ..Self::fatal(name, description, predicate)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(self) -> CheckOutcome {
        let passed = (self.predicate)();
        tracing::debug!(check = %self.name, passed, fatal = self.fatal, "Evaluated check");
        CheckOutcome {
            name: self.name,
            description: self.description,
            passed,
            fatal: self.fatal,
        }
    }
}

impl std::fmt::Debug for CheckItem<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckItem")
            .field("name", &self.name)
            .field("fatal", &self.fatal)
            .finish_non_exhaustive()
    }
}

/// Recorded result of one evaluated [`CheckItem`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    pub name: String,
    pub description: String,
    pub passed: bool,
    pub fatal: bool,
}

/// Ordered outcomes of a check sequence.
///
/// The aggregate is false iff at least one fatal outcome failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    entries: Vec<CheckOutcome>,
}

impl ValidationReport {
    pub fn entries(&self) -> &[CheckOutcome] {
        &self.entries
    }

    pub fn passed(&self) -> bool {
        self.entries.iter().all(|e| e.passed || !e.fatal)
    }

    /// Names of the fatal checks that failed, in evaluation order.
    pub fn failures(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.fatal && !e.passed)
            .map(|e| e.name.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, outcome: CheckOutcome) {
        self.entries.push(outcome);
    }
}

/// Serialized as `{"passed": bool, "entries": [...]}` so JSON consumers get
/// the aggregate without re-deriving it.
impl Serialize for ValidationReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationReport", 2)?;
        state.serialize_field("passed", &self.passed())?;
        state.serialize_field("entries", &self.entries)?;
        state.end()
    }
}

/// Exhaustive runner: every item is evaluated.
pub struct CollectAll;

impl CollectAll {
    pub fn run<'a>(items: impl IntoIterator<Item = CheckItem<'a>>) -> ValidationReport {
        let mut report = ValidationReport::default();
        for item in items {
            report.push(item.evaluate());
        }
        report
    }
}

/// Sequence stopped by a failing fatal check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Halted {
    /// Outcomes evaluated so far; the last entry is the failed check.
    pub report: ValidationReport,
    pub failed: CheckOutcome,
}

/// Short-circuiting runner: stops at the first failing fatal item.
pub struct HaltOnFirst;

impl HaltOnFirst {
    pub fn run<'a>(
        items: impl IntoIterator<Item = CheckItem<'a>>,
    ) -> Result<ValidationReport, Halted> {
        let mut report = ValidationReport::default();
        for item in items {
            let outcome = item.evaluate();
            let halt = outcome.fatal && !outcome.passed;
            report.push(outcome.clone());
            if halt {
                return Err(Halted {
                    report,
                    failed: outcome,
                });
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn item<'a>(name: &str, passed: bool, calls: &'a Cell<u32>) -> CheckItem<'a> {
        CheckItem::fatal(name, name, move || {
            calls.set(calls.get() + 1);
            passed
        })
    }

    #[test]
    fn test_collect_all_evaluates_every_item() {
        let calls = Cell::new(0);
        let report = CollectAll::run(vec![
            item("a", true, &calls),
            item("b", false, &calls),
            item("c", false, &calls),
        ]);
        assert_eq!(calls.get(), 3);
        assert!(!report.passed());
        assert_eq!(report.failures(), vec!["b", "c"]);
    }

    #[test]
    fn test_halt_on_first_skips_remaining() {
        let calls = Cell::new(0);
        let halted = HaltOnFirst::run(vec![
            item("a", true, &calls),
            item("b", false, &calls),
            item("c", true, &calls),
        ])
        .unwrap_err();
        assert_eq!(calls.get(), 2);
        assert_eq!(halted.failed.name, "b");
        assert_eq!(halted.report.len(), 2);
    }

    #[test]
    fn test_halt_on_first_all_pass() {
        let calls = Cell::new(0);
        let report = HaltOnFirst::run(vec![item("a", true, &calls), item("b", true, &calls)]).unwrap();
        assert!(report.passed());
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn test_informational_failure_does_not_fail() {
        let report = CollectAll::run(vec![
            CheckItem::fatal("a", "a", || true),
            CheckItem::informational("note", "note", || false),
        ]);
        assert!(report.passed());
        assert!(report.failures().is_empty());

        let report = HaltOnFirst::run(vec![
            CheckItem::informational("note", "note", || false),
            CheckItem::fatal("a", "a", || true),
        ])
        .unwrap();
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn test_report_json_carries_aggregate() {
        let report = CollectAll::run(vec![
            CheckItem::fatal("a", "a", || true),
            CheckItem::fatal("b", "b", || false),
        ]);
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["passed"], false);
        assert_eq!(value["entries"].as_array().unwrap().len(), 2);
        assert_eq!(value["entries"][1]["name"], "b");

        let value = serde_json::to_value(CollectAll::run(Vec::new())).unwrap();
        assert_eq!(value["passed"], true);
    }

    #[test]
    fn test_empty_report_passes() {
        let report = CollectAll::run(Vec::new());
        assert!(report.is_empty());
        assert!(report.passed());
    }
}
