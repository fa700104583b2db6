//! Reference-integrity and consistency checks.
//!
//! Every check takes the whole profile, never returns early on a data
//! problem, and reports through a [`CheckReport`]. Only sections a check
//! cannot read at all stop that check.

use serde::de::DeserializeOwned;
use tracing::{debug, info};
use upps_types::{CheckKind, CheckReport, Finding, ValidationSummary};

use crate::config::ValidatorConfig;
use crate::document::Profile;
use crate::schema::SchemaValidator;

mod association;
mod cognitive;
mod emotion;
mod memory;
mod version;

pub use association::check_association_references;
pub use cognitive::check_cognitive_system;
pub use emotion::check_emotion_references;
pub use memory::check_memory_references;
pub use version::check_version;

/// Which groups of checks a run performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckSelection {
    SchemaOnly,
    ReferencesOnly,
    #[default]
    All,
}

impl CheckSelection {
    /// Builds the selection from the three command-line switches; none set
    /// means everything.
    pub fn from_flags(schema: bool, reference: bool, all: bool) -> Self {
        match (schema, reference) {
            _ if all => CheckSelection::All,
            (true, false) => CheckSelection::SchemaOnly,
            (false, true) => CheckSelection::ReferencesOnly,
            _ => CheckSelection::All,
        }
    }

    pub fn runs_schema(self) -> bool {
        matches!(self, CheckSelection::SchemaOnly | CheckSelection::All)
    }

    pub fn runs_references(self) -> bool {
        matches!(self, CheckSelection::ReferencesOnly | CheckSelection::All)
    }
}

/// Runs the reference-phase checks in their reporting order.
pub fn run_reference_checks(profile: &Profile, config: &ValidatorConfig) -> Vec<CheckReport> {
    vec![
        check_version(profile, &config.version),
        check_emotion_references(profile),
        check_memory_references(profile),
        check_association_references(profile),
        check_cognitive_system(profile, &config.cognitive),
    ]
}

/// Runs the selected checks and aggregates them into one summary.
///
/// `schema` must be present when the selection includes schema validation;
/// a missing validator is reported as a failed schema check.
pub fn validate_profile(
    profile: &Profile,
    schema: Option<&SchemaValidator>,
    config: &ValidatorConfig,
    selection: CheckSelection,
) -> ValidationSummary {
    let mut reports = Vec::new();

    if selection.runs_schema() {
        let report = match schema {
            Some(validator) => validator.check(profile),
            None => {
                let mut report = CheckReport::new(CheckKind::Schema);
                report.push(Finding::error("no schema available"));
                report
            }
        };
        reports.push(report);
    }

    if selection.runs_references() {
        reports.extend(run_reference_checks(profile, config));
    }

    for report in &reports {
        debug!(
            check = %report.check,
            passed = report.passed,
            findings = report.findings.len(),
            "check finished"
        );
    }

    let summary = ValidationSummary::new(reports);
    info!(
        passed = summary.passed(),
        errors = summary.error_count(),
        "validation finished"
    );
    summary
}

/// Marker for a section that exists but could not be read; the error has
/// already been recorded on the report.
pub(crate) struct Unreadable;

/// Reads a typed section for a check, recording a structural error on the
/// report when the section is present but malformed.
pub(crate) fn read_section<T: DeserializeOwned>(
    profile: &Profile,
    key: &str,
    report: &mut CheckReport,
) -> Result<Option<T>, Unreadable> {
    profile.section(key).map_err(|e| {
        report.error(e.to_string(), key);
        Unreadable
    })
}
