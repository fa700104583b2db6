use upps_types::{keys, AbilityKind, CheckKind, CheckReport, CognitiveSystem, Finding};

use super::read_section;
use crate::config::CognitiveTolerances;
use crate::document::Profile;

/// Structural completeness of `cognitive_system`, plus advisory findings
/// when `general_ability.level` drifts too far from the individual scores.
pub fn check_cognitive_system(profile: &Profile, tolerances: &CognitiveTolerances) -> CheckReport {
    let mut report = CheckReport::new(CheckKind::CognitiveSystem);

    let Ok(system) =
        read_section::<CognitiveSystem>(profile, keys::COGNITIVE_SYSTEM, &mut report)
    else {
        return report.finish();
    };
    let Some(system) = system else {
        return report.skip("cognitive_system not found; skipping cognitive system checks");
    };

    if system.model.is_none() {
        report.error(
            "cognitive_system.model is missing",
            "cognitive_system.model",
        );
    }

    let Some(abilities) = &system.abilities else {
        report.error(
            "cognitive_system.abilities is missing",
            "cognitive_system.abilities",
        );
        return report.finish();
    };

    for kind in AbilityKind::ALL {
        match abilities.get(kind) {
            None => report.error(
                format!("required ability '{}' is missing", kind),
                format!("cognitive_system.abilities.{}", kind),
            ),
            Some(ability) if ability.level.is_none() => report.error(
                format!("ability '{}' has no level", kind),
                format!("cognitive_system.abilities.{}.level", kind),
            ),
            Some(_) => {}
        }
    }

    let general = match &system.general_ability {
        None => {
            report.push(
                Finding::warning("cognitive_system.general_ability is missing")
                    .at("cognitive_system.general_ability"),
            );
            return report.finish();
        }
        Some(general) => match general.level {
            None => {
                report.error(
                    "general_ability has no level",
                    "cognitive_system.general_ability.level",
                );
                return report.finish();
            }
            Some(level) => level.as_f64(),
        },
    };

    for kind in AbilityKind::ALL {
        let Some(level) = abilities.get(kind).and_then(|a| a.level) else {
            continue;
        };
        let gap = (general - level.as_f64()).abs();
        if gap > tolerances.ability_gap_tolerance {
            report.push(
                Finding::warning(format!(
                    "general_ability level {} differs from {} level {} by {}",
                    general, kind, level, gap
                ))
                .at(format!("cognitive_system.abilities.{}.level", kind)),
            );
        }
    }

    let levels: Vec<f64> = abilities.present_levels().map(|l| l.as_f64()).collect();
    if !levels.is_empty() {
        let mean = levels.iter().sum::<f64>() / levels.len() as f64;
        let gap = (general - mean).abs();
        if gap > tolerances.mean_gap_tolerance {
            report.push(
                Finding::warning(format!(
                    "general_ability level {} differs from the mean ability level {:.1} by {:.1}",
                    general, mean, gap
                ))
                .at("cognitive_system.general_ability.level"),
            );
        }
    }

    report.finish()
}
