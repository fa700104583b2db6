//! Property tests for reference resolution and conversion.

use proptest::prelude::*;
use serde_json::{json, Map, Value};

use upps_core::checks::{
    check_association_references, check_emotion_references, run_reference_checks,
};
use upps_core::{convert_profile, EmotionRegistry, MemoryIndex, Profile, ValidatorConfig};

fn profile(value: Value) -> Profile {
    Profile::from_value(value, "proptest").expect("mapping root")
}

fn emotion_name() -> impl Strategy<Value = String> {
    "[a-z]{3,8}"
}

/// A legacy profile whose memory emotions are drawn from its own `state`.
fn legacy_profile() -> impl Strategy<Value = Value> {
    prop::collection::btree_map(emotion_name(), 0i64..=100, 1..6).prop_flat_map(|state| {
        let names: Vec<String> = state.keys().cloned().collect();
        let memory = (
            prop::option::of("[A-Za-z0-9 ,.!?]{0,40}"),
            prop::option::of(prop::sample::subsequence(names.clone(), 0..=names.len())),
            prop::option::of(0i64..=100),
        )
            .prop_map(|(event, emotions, importance)| {
                let mut record = Map::new();
                if let Some(event) = event {
                    record.insert("event".into(), json!(event));
                }
                if let Some(emotions) = emotions {
                    record.insert("emotions".into(), json!(emotions));
                }
                if let Some(importance) = importance {
                    record.insert("importance".into(), json!(importance));
                }
                Value::Object(record)
            });
        let scores = prop::collection::btree_map(
            prop::sample::select(vec!["VCI", "PRI", "WMI", "PSI", "FSIQ", "other"]),
            0i64..=160,
            0..5,
        );
        (
            Just(state),
            prop::collection::vec(memory, 0..6),
            prop::option::of(scores),
        )
            .prop_map(|(state, memories, scores)| {
                let mut root = json!({
                    "personal_info": {"name": "generated"},
                    "state": state,
                    "memory_trace": {"memories": memories}
                });
                if let Some(scores) = scores {
                    root["cognitive_profile"] = json!({
                        "test_results": [{"test_name": "WAIS-IV", "scores": scores}]
                    });
                }
                root
            })
    })
}

proptest! {
    #[test]
    fn emotion_check_passes_iff_current_state_is_declared(
        declared in prop::collection::btree_set(emotion_name(), 0..5),
        current in prop::collection::btree_set(emotion_name(), 0..5),
    ) {
        let emotions: Map<String, Value> = declared
            .iter()
            .map(|id| (id.clone(), json!({"baseline": 50})))
            .collect();
        let state: Map<String, Value> = current.iter().map(|id| (id.clone(), json!(10))).collect();
        let p = profile(json!({
            "emotion_system": {"emotions": emotions},
            "current_emotion_state": state
        }));

        let registry = EmotionRegistry::from_profile(&p).expect("readable");
        let covered = current.iter().all(|id| registry.contains(id));
        prop_assert_eq!(check_emotion_references(&p).passed, covered);
    }

    #[test]
    fn association_check_passes_iff_every_id_resolves(
        links in prop::collection::vec(
            (
                prop::sample::select(vec!["memory", "emotion", "external"]),
                "[a-d]",
                prop::sample::select(vec!["memory", "emotion"]),
                "[a-d]",
                any::<bool>(),
            ),
            0..6,
        )
    ) {
        let associations: Vec<Value> = links
            .iter()
            .map(|(trigger_kind, trigger_id, response_kind, response_id, compound)| {
                let simple = json!({"type": trigger_kind, "id": trigger_id});
                let trigger = if *compound {
                    json!({"operator": "OR", "conditions": [simple]})
                } else {
                    simple
                };
                json!({
                    "trigger": trigger,
                    "response": {"type": response_kind, "id": response_id, "association_strength": 50}
                })
            })
            .collect();
        let p = profile(json!({
            "emotion_system": {"emotions": {"a": {}}, "compound_emotions": {"b": {}}},
            "memory_system": {"memories": [{"id": "b"}, {"id": "c"}]},
            "association_system": {"associations": associations}
        }));

        let emotions = EmotionRegistry::from_profile(&p).expect("readable");
        let memories = MemoryIndex::from_profile(&p).expect("readable");
        let resolves = |kind: &str, id: &str| match kind {
            "memory" => memories.contains(id),
            "emotion" => emotions.contains(id),
            _ => true,
        };
        let expected = links.iter().all(|(tk, tid, rk, rid, _)| resolves(tk, tid) && resolves(rk, rid));
        prop_assert_eq!(check_association_references(&p).passed, expected);
    }

    #[test]
    fn conversion_is_idempotent(root in legacy_profile()) {
        let once = convert_profile(&profile(root)).expect("converts");
        let twice = convert_profile(&once.profile).expect("converts");
        prop_assert_eq!(&twice.profile, &once.profile);
        prop_assert!(!twice.report.converted_any());
    }

    #[test]
    fn converted_profiles_have_no_reference_violations(root in legacy_profile()) {
        let conversion = convert_profile(&profile(root)).expect("converts");
        let mut config = ValidatorConfig::default();
        config.version.enforce = false;
        for report in run_reference_checks(&conversion.profile, &config) {
            prop_assert!(report.passed, "{}: {:?}", report.check, report.findings);
        }
    }
}
