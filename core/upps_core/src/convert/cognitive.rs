use serde_json::Value;
use tracing::debug;
use upps_types::{
    keys, Abilities, Ability, AbilityKind, CognitiveProfile, CognitiveSystem, Score,
};

use super::tables::{
    ability_description, classify_score, is_iq_test, ScoreTarget, COGNITIVE_MODEL,
    DEFAULT_ABILITY_LEVEL, MAX_ABILITY_LEVEL,
};
use super::{read_legacy, StepOutcome};
use crate::document::Profile;
use crate::error::UppsResult;

/// `cognitive_profile` -> `cognitive_system`.
pub(super) fn convert_cognitive_profile(profile: Profile) -> UppsResult<(Profile, StepOutcome)> {
    if profile.contains(keys::COGNITIVE_SYSTEM) {
        return Ok((profile, StepOutcome::skipped("cognitive_system already present")));
    }
    let legacy = match read_legacy::<CognitiveProfile>(&profile, keys::COGNITIVE_PROFILE) {
        Ok(legacy) => legacy,
        Err(outcome) => return Ok((profile, outcome)),
    };

    let mut builder = CognitiveBuilder::default();
    let mut applied = 0;
    for test in &legacy.test_results {
        let (Some(name), Some(scores)) = (&test.test_name, &test.scores) else {
            continue;
        };
        if !is_iq_test(name) {
            debug!(test = %name, "not an intelligence test; scores ignored");
            continue;
        }
        for (score_name, value) in scores {
            let Some(target) = classify_score(score_name) else {
                debug!(test = %name, score = %score_name, "score name not recognised");
                continue;
            };
            let Some(level) = score_level(value) else {
                debug!(test = %name, score = %score_name, "score value is not numeric");
                continue;
            };
            builder.set(target, level);
            applied += 1;
        }
    }

    let system = builder.build(legacy.narrative);
    let detail = format!(
        "converted cognitive_profile to cognitive_system ({} scores applied)",
        applied
    );
    let profile = profile.with_section(keys::COGNITIVE_SYSTEM, &system)?;
    Ok((profile, StepOutcome::converted(detail)))
}

/// Integer part of a numeric or numeric-string score, capped at 100.
fn score_level(value: &Value) -> Option<i64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !number.is_finite() {
        return None;
    }
    Some((number.trunc() as i64).min(MAX_ABILITY_LEVEL))
}

struct CognitiveBuilder {
    levels: [i64; 4],
    general: Option<i64>,
}

impl Default for CognitiveBuilder {
    fn default() -> Self {
        Self {
            levels: [DEFAULT_ABILITY_LEVEL; 4],
            general: None,
        }
    }
}

impl CognitiveBuilder {
    fn set(&mut self, target: ScoreTarget, level: i64) {
        match target {
            ScoreTarget::Ability(kind) => {
                if let Some(index) = AbilityKind::ALL.iter().position(|k| *k == kind) {
                    self.levels[index] = level;
                }
            }
            ScoreTarget::General => self.general = Some(level),
        }
    }

    /// An unscored general ability takes the floor of the ability mean.
    fn build(self, narrative: Option<String>) -> CognitiveSystem {
        let mean = self.levels.iter().sum::<i64>().div_euclid(self.levels.len() as i64);
        let mut abilities = Abilities::default();
        for (kind, level) in AbilityKind::ALL.into_iter().zip(self.levels) {
            *abilities.slot_mut(kind) = Some(Ability {
                level: Some(Score::Integer(level)),
                description: Some(Value::String(ability_description(kind).to_string())),
            });
        }
        CognitiveSystem {
            model: Some(COGNITIVE_MODEL.to_string()),
            abilities: Some(abilities),
            general_ability: Some(Ability {
                level: Some(Score::Integer(self.general.unwrap_or(mean))),
                description: narrative.map(Value::String),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn convert(cognitive_profile: Value) -> CognitiveSystem {
        let profile = Profile::from_value(json!({ "cognitive_profile": cognitive_profile }), "test")
            .expect("mapping root");
        let (profile, outcome) = convert_cognitive_profile(profile).expect("converts");
        assert!(outcome.is_converted());
        profile
            .section(keys::COGNITIVE_SYSTEM)
            .expect("readable")
            .expect("present")
    }

    fn level(system: &CognitiveSystem, kind: AbilityKind) -> Option<Score> {
        system.abilities.as_ref()?.get(kind)?.level
    }

    #[test]
    fn defaults_without_test_results() {
        let system = convert(json!({"narrative": "Quick with words."}));
        assert_eq!(system.model.as_deref(), Some("WAIS-IV"));
        for kind in AbilityKind::ALL {
            assert_eq!(level(&system, kind), Some(Score::Integer(50)));
        }
        let general = system.general_ability.expect("general ability");
        assert_eq!(general.level, Some(Score::Integer(50)));
        assert_eq!(general.description, Some(json!("Quick with words.")));
    }

    #[test]
    fn scores_map_onto_abilities() {
        let system = convert(json!({
            "test_results": [
                {"test_name": "WAIS-IV", "scores": {
                    "VCI": 120, "PRI": "88", "WMI": 70.9, "PSI": 64, "notes": "calm"
                }},
                {"test_name": "Big Five", "scores": {"verbal": 10}}
            ]
        }));
        assert_eq!(level(&system, AbilityKind::VerbalComprehension), Some(Score::Integer(100)));
        assert_eq!(level(&system, AbilityKind::PerceptualReasoning), Some(Score::Integer(88)));
        assert_eq!(level(&system, AbilityKind::WorkingMemory), Some(Score::Integer(70)));
        assert_eq!(level(&system, AbilityKind::ProcessingSpeed), Some(Score::Integer(64)));
        // (100 + 88 + 70 + 64) / 4 = 80.5
        assert_eq!(
            system.general_ability.and_then(|g| g.level),
            Some(Score::Integer(80))
        );
    }

    #[test]
    fn explicit_general_score_is_kept_even_at_fifty() {
        let system = convert(json!({
            "test_results": [{"test_name": "iq screening", "scores": {"FSIQ": 50, "VCI": 90}}]
        }));
        assert_eq!(
            system.general_ability.and_then(|g| g.level),
            Some(Score::Integer(50))
        );
    }

    #[test]
    fn every_ability_gets_a_description() {
        let system = convert(json!({}));
        let abilities = system.abilities.expect("abilities");
        for kind in AbilityKind::ALL {
            assert_eq!(
                abilities.get(kind).and_then(|a| a.description.as_ref()),
                Some(&json!(ability_description(kind)))
            );
        }
    }

    #[test]
    fn unusable_scores_are_ignored() {
        assert_eq!(score_level(&json!("n/a")), None);
        assert_eq!(score_level(&json!(null)), None);
        assert_eq!(score_level(&json!(" 97 ")), Some(97));
        assert_eq!(score_level(&json!(140)), Some(100));
    }
}
