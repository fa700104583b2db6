use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// Section models for legacy and extended profile documents
pub mod sections;
pub use sections::*;

/// How a single finding affects the check that produced it.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Success => write!(f, "success"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// One observation made by a check.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Finding {
    pub severity: Severity,
    pub message: String,

    /// Dotted path into the profile the finding points at, when it points at one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locator: Option<String>,
}

impl Finding {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            locator: None,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn at(mut self, locator: impl Into<String>) -> Self {
        self.locator = Some(locator.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// The checks a validation run can perform.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    Schema,
    Version,
    EmotionReferences,
    MemoryReferences,
    AssociationReferences,
    CognitiveSystem,
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckKind::Schema => write!(f, "schema"),
            CheckKind::Version => write!(f, "version"),
            CheckKind::EmotionReferences => write!(f, "emotion references"),
            CheckKind::MemoryReferences => write!(f, "memory references"),
            CheckKind::AssociationReferences => write!(f, "association references"),
            CheckKind::CognitiveSystem => write!(f, "cognitive system"),
        }
    }
}

/// Outcome of one check: a pass/fail verdict plus everything it observed.
///
/// `passed` flips to false as soon as an error finding is recorded; warnings
/// never affect it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CheckReport {
    pub check: CheckKind,
    pub passed: bool,
    pub skipped: bool,
    pub findings: Vec<Finding>,
}

impl CheckReport {
    pub fn new(check: CheckKind) -> Self {
        Self {
            check,
            passed: true,
            skipped: false,
            findings: Vec::new(),
        }
    }

    pub fn push(&mut self, finding: Finding) {
        if finding.is_error() {
            self.passed = false;
        }
        self.findings.push(finding);
    }

    pub fn error(&mut self, message: impl Into<String>, locator: impl Into<String>) {
        self.push(Finding::error(message).at(locator));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(Finding::warning(message));
    }

    /// Closes a check that had nothing to look at.
    pub fn skip(mut self, reason: impl Into<String>) -> Self {
        self.skipped = true;
        self.push(Finding::warning(reason));
        self
    }

    /// Closes the check, appending the success marker when nothing failed.
    pub fn finish(mut self) -> Self {
        if self.passed {
            let marker = Finding::success(format!("{} check passed", self.check));
            self.findings.push(marker);
        }
        self
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
    }
}

/// Aggregate of every check run against one profile.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ValidationSummary {
    pub checked_at: DateTime<Utc>,
    pub reports: Vec<CheckReport>,
}

impl ValidationSummary {
    pub fn new(reports: Vec<CheckReport>) -> Self {
        Self {
            checked_at: Utc::now(),
            reports,
        }
    }

    pub fn passed(&self) -> bool {
        self.reports.iter().all(|r| r.passed)
    }

    pub fn error_count(&self) -> usize {
        self.reports.iter().map(|r| r.errors().count()).sum()
    }

    pub fn report(&self, check: CheckKind) -> Option<&CheckReport> {
        self.reports.iter().find(|r| r.check == check)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_fails_only_on_errors() {
        let mut report = CheckReport::new(CheckKind::CognitiveSystem);
        report.warning("general_ability is missing");
        assert!(report.passed);

        report.error("abilities is missing", "cognitive_system.abilities");
        assert!(!report.passed);
        assert_eq!(report.errors().count(), 1);
        assert_eq!(report.warnings().count(), 1);
    }

    #[test]
    fn finish_appends_success_marker_when_passed() {
        let report = CheckReport::new(CheckKind::MemoryReferences).finish();
        assert!(report.passed);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].severity, Severity::Success);

        let mut failing = CheckReport::new(CheckKind::MemoryReferences);
        failing.error("duplicate id", "memory_system.memories");
        let failing = failing.finish();
        assert!(failing
            .findings
            .iter()
            .all(|f| f.severity != Severity::Success));
    }

    #[test]
    fn skipped_report_passes_with_notice() {
        let report = CheckReport::new(CheckKind::AssociationReferences)
            .skip("association_system not found");
        assert!(report.passed);
        assert!(report.skipped);
        assert_eq!(report.warnings().count(), 1);
    }

    #[test]
    fn summary_aggregates_reports() {
        let ok = CheckReport::new(CheckKind::Version).finish();
        let mut bad = CheckReport::new(CheckKind::EmotionReferences);
        bad.error("undeclared emotion 'fear'", "current_emotion_state.fear");

        let summary = ValidationSummary::new(vec![ok, bad]);
        assert!(!summary.passed());
        assert_eq!(summary.error_count(), 1);
        assert!(summary.report(CheckKind::Version).is_some());
        assert!(summary.report(CheckKind::Schema).is_none());
    }

    #[test]
    fn finding_serializes_without_empty_locator() {
        let finding = Finding::warning("general_ability is missing");
        let json = serde_json::to_value(&finding).expect("serialization should succeed");
        assert_eq!(json["severity"], "warning");
        assert!(json.get("locator").is_none());
    }
}
