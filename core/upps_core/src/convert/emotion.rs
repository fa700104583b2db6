use serde_json::{json, Map, Value};
use tracing::debug;
use upps_types::{keys, EmotionSystem, LegacyState};

use super::tables::{describe_emotion, BASIC_EMOTIONS, EMOTION_MODEL};
use super::{read_legacy, StepOutcome};
use crate::document::Profile;
use crate::error::UppsResult;

/// `state` -> `current_emotion_state`, plus a synthesized `emotion_system`
/// when the profile has none.
pub(super) fn convert_state(profile: Profile) -> UppsResult<(Profile, StepOutcome)> {
    if profile.contains(keys::CURRENT_EMOTION_STATE) {
        return Ok((
            profile,
            StepOutcome::skipped("current_emotion_state already present"),
        ));
    }
    let state = match read_legacy::<LegacyState>(&profile, keys::STATE) {
        Ok(state) => state,
        Err(outcome) => return Ok((profile, outcome)),
    };

    let profile = profile.with_section(keys::CURRENT_EMOTION_STATE, &state)?;
    if profile.contains(keys::EMOTION_SYSTEM) {
        return Ok((
            profile,
            StepOutcome::converted(format!(
                "copied {} emotions to current_emotion_state; kept existing emotion_system",
                state.len()
            )),
        ));
    }

    let system = synthesize_emotion_system(&state);
    let detail = format!(
        "copied {} emotions to current_emotion_state; synthesized emotion_system with {} emotions",
        state.len(),
        system.emotions.len()
    );
    let profile = profile.with_section(keys::EMOTION_SYSTEM, &system)?;
    Ok((profile, StepOutcome::converted(detail)))
}

/// One entry per `state` key, then any of the six basic emotions still
/// missing, their baselines borrowed from a synonym where one exists.
fn synthesize_emotion_system(state: &LegacyState) -> EmotionSystem {
    let mut emotions = Map::new();
    for (name, value) in state {
        emotions.insert(name.clone(), entry(value.clone(), name));
    }

    for basic in BASIC_EMOTIONS {
        if emotions.contains_key(basic.id) {
            continue;
        }
        let inferred = basic
            .synonyms
            .iter()
            .find_map(|synonym| state.get(*synonym).map(|v| (*synonym, v.clone())));
        let baseline = match inferred {
            Some((synonym, value)) => {
                debug!(emotion = basic.id, synonym, "baseline inferred from synonym");
                value
            }
            None => Value::from(basic.default_baseline),
        };
        emotions.insert(basic.id.to_string(), entry(baseline, basic.id));
    }

    EmotionSystem {
        model: Some(EMOTION_MODEL.to_string()),
        emotions,
        ..EmotionSystem::default()
    }
}

fn entry(baseline: Value, name: &str) -> Value {
    json!({
        "baseline": baseline,
        "description": describe_emotion(name),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy(value: Value) -> Profile {
        Profile::from_value(value, "test").expect("mapping root")
    }

    #[test]
    fn basic_emotions_borrow_synonym_baselines() {
        let (profile, outcome) =
            convert_state(legacy(json!({"state": {"happy": 70, "sad": 10}}))).expect("converts");
        assert!(outcome.is_converted());

        let system: EmotionSystem = profile
            .section(keys::EMOTION_SYSTEM)
            .expect("readable")
            .expect("synthesized");
        assert_eq!(system.model.as_deref(), Some("Ekman"));
        let baseline = |id: &str| system.emotions[id]["baseline"].clone();
        assert_eq!(baseline("joy"), json!(70));
        assert_eq!(baseline("sadness"), json!(10));
        for id in ["anger", "fear", "disgust", "surprise"] {
            assert_eq!(baseline(id), json!(30), "{}", id);
        }
        assert_eq!(baseline("happy"), json!(70));
        assert_eq!(system.emotions.len(), 8);
        assert_eq!(
            profile.get(keys::CURRENT_EMOTION_STATE),
            Some(&json!({"happy": 70, "sad": 10}))
        );
    }

    #[test]
    fn defaults_apply_without_synonyms() {
        let (profile, _) =
            convert_state(legacy(json!({"state": {"curious": 80}}))).expect("converts");
        let system: EmotionSystem = profile
            .section(keys::EMOTION_SYSTEM)
            .expect("readable")
            .expect("synthesized");
        assert_eq!(system.emotions["joy"]["baseline"], json!(50));
        assert_eq!(system.emotions["curious"]["description"], json!("好奇心、興味"));
        assert_eq!(system.emotions["joy"]["description"], json!("喜び、幸福感"));
    }

    #[test]
    fn state_named_like_a_basic_emotion_wins() {
        let (profile, _) =
            convert_state(legacy(json!({"state": {"joy": 90, "happy": 10}}))).expect("converts");
        let system: EmotionSystem = profile
            .section(keys::EMOTION_SYSTEM)
            .expect("readable")
            .expect("synthesized");
        assert_eq!(system.emotions["joy"]["baseline"], json!(90));
    }

    #[test]
    fn existing_emotion_system_is_kept() {
        let (profile, outcome) = convert_state(legacy(json!({
            "state": {"joy": 60},
            "emotion_system": {"model": "Plutchik", "emotions": {"trust": {"baseline": 40}}}
        })))
        .expect("converts");
        assert!(outcome.is_converted());
        assert_eq!(profile.pointer("/emotion_system/model"), Some(&json!("Plutchik")));
        assert_eq!(profile.get(keys::CURRENT_EMOTION_STATE), Some(&json!({"joy": 60})));
    }

    #[test]
    fn existing_current_state_skips() {
        let original = legacy(json!({"state": {"joy": 60}, "current_emotion_state": {"joy": 10}}));
        let (profile, outcome) = convert_state(original.clone()).expect("converts");
        assert!(!outcome.is_converted());
        assert_eq!(profile, original);
    }

    #[test]
    fn malformed_state_skips_with_reason() {
        let original = legacy(json!({"state": ["joy"]}));
        let (profile, outcome) = convert_state(original.clone()).expect("converts");
        assert!(!outcome.is_converted());
        assert!(outcome.message().contains("state"));
        assert_eq!(profile, original);
    }
}
