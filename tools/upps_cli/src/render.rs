//! Console rendering of reports. Everything here builds strings; `main`
//! decides where they go.

use std::fmt::Write;
use std::path::Path;

use upps_core::{ConversionReport, ProfileStats, StepOutcome};
use upps_types::{CheckReport, Finding, Severity, ValidationSummary};

const RULE: &str = "==================================================";

fn icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Success => "✅",
        Severity::Warning => "⚠️",
        Severity::Error => "❌",
    }
}

fn finding_line(out: &mut String, finding: &Finding) {
    let _ = match &finding.locator {
        Some(locator) if finding.severity != Severity::Success => writeln!(
            out,
            "  {} {} ({})",
            icon(finding.severity),
            finding.message,
            locator
        ),
        _ => writeln!(out, "  {} {}", icon(finding.severity), finding.message),
    };
}

fn check_block(out: &mut String, report: &CheckReport) {
    let _ = writeln!(out, "\n[{}]", report.check);
    for finding in &report.findings {
        finding_line(out, finding);
    }
}

pub fn summary(summary: &ValidationSummary) -> String {
    let mut out = String::new();
    for report in &summary.reports {
        check_block(&mut out, report);
    }

    let _ = writeln!(out, "\n{}", RULE);
    if summary.passed() {
        let _ = writeln!(out, "✅ All checks passed");
    } else {
        let failed: Vec<String> = summary
            .reports
            .iter()
            .filter(|r| !r.passed)
            .map(|r| r.check.to_string())
            .collect();
        let _ = writeln!(
            out,
            "❌ Validation failed: {} error(s) in {}",
            summary.error_count(),
            failed.join(", ")
        );
    }
    out
}

pub fn stats(stats: &ProfileStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\nProfile statistics");
    if let Some(name) = &stats.name {
        let _ = writeln!(out, "  name: {}", name);
    }
    let e = &stats.emotions;
    let _ = writeln!(
        out,
        "  emotions: {} basic, {} additional, {} compound",
        e.basic, e.additional, e.compound
    );
    let m = &stats.memories;
    let _ = writeln!(
        out,
        "  memories: {} ({} episodic, {} semantic, {} procedural, {} autobiographical)",
        m.total, m.episodic, m.semantic, m.procedural, m.autobiographical
    );
    let a = &stats.associations;
    let _ = writeln!(
        out,
        "  associations: {} ({} memory->emotion, {} emotion->memory, {} external, {} compound)",
        a.total, a.memory_to_emotion, a.emotion_to_memory, a.external, a.compound
    );
    if let Some(cognitive) = &stats.cognitive {
        let levels: Vec<String> = cognitive
            .abilities
            .iter()
            .map(|(kind, level)| format!("{}={}", kind, level))
            .collect();
        let general = cognitive
            .general
            .map(|g| g.to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(out, "  cognitive: {}, general={}", levels.join(", "), general);
    }
    out
}

fn step_lines(out: &mut String, report: &ConversionReport) {
    for (index, record) in report.steps.iter().enumerate() {
        let marker = match record.outcome {
            StepOutcome::Converted { .. } => icon(Severity::Success),
            StepOutcome::Skipped { .. } => icon(Severity::Warning),
        };
        let _ = writeln!(
            out,
            "{}. {}: {} {}",
            index + 1,
            record.step,
            marker,
            record.outcome.message()
        );
    }
}

/// Short notice printed when `validate` converted legacy fields in memory.
pub fn conversion_notice(report: &ConversionReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Legacy fields found; validating the converted profile");
    step_lines(&mut out, report);
    out
}

pub fn conversion(report: &ConversionReport, output: &Path) -> String {
    let mut out = String::new();
    step_lines(&mut out, report);

    let s = &report.summary;
    let _ = writeln!(out, "\n{}", RULE);
    let _ = writeln!(out, "Written to {}", output.display());
    let _ = writeln!(
        out,
        "- emotion_system: {} basic, {} additional emotions",
        s.emotions, s.additional_emotions
    );
    let _ = writeln!(out, "- memory_system: {} memories", s.memories);
    let _ = writeln!(out, "- association_system: {} associations", s.associations);
    if s.has_cognitive_system {
        let _ = writeln!(out, "- cognitive_system: four abilities and a general level");
    }
    out
}
