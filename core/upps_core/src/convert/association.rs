use serde_json::{json, Value};
use upps_types::{
    keys, Association, AssociationSystem, EmotionSystem, Memory, MemorySystem, NodeKind, Response,
    SimpleTrigger, Trigger,
};

use super::tables::{
    EMOTION_TO_MEMORY_STRENGTH, EMOTION_TRIGGER_THRESHOLD, MEMORY_TO_EMOTION_STRENGTH,
    TOPIC_CATEGORY, TOPIC_MAX_WORDS, TOPIC_MIN_CHARS, TOPIC_STOP_WORDS, TOPIC_TO_MEMORY_STRENGTH,
};
use super::StepOutcome;
use crate::document::Profile;
use crate::error::UppsResult;
use crate::registry::EmotionRegistry;

/// Cross-links memories and emotions into a starter `association_system`.
///
/// Runs last: it reads the sections the other steps may have just written.
pub(super) fn synthesize_associations(profile: Profile) -> UppsResult<(Profile, StepOutcome)> {
    if profile.contains(keys::ASSOCIATION_SYSTEM) {
        return Ok((profile, StepOutcome::skipped("association_system already present")));
    }
    if !profile.contains(keys::MEMORY_SYSTEM) || !profile.contains(keys::EMOTION_SYSTEM) {
        return Ok((
            profile,
            StepOutcome::skipped("memory_system or emotion_system missing"),
        ));
    }

    let memories = match profile.section::<MemorySystem>(keys::MEMORY_SYSTEM) {
        Ok(system) => system.unwrap_or_default().memories,
        Err(e) => return Ok((profile, StepOutcome::skipped(e.to_string()))),
    };
    let emotions = match profile.section::<EmotionSystem>(keys::EMOTION_SYSTEM) {
        Ok(system) => EmotionRegistry::from_system(&system.unwrap_or_default()),
        Err(e) => return Ok((profile, StepOutcome::skipped(e.to_string()))),
    };
    if emotions.is_empty() || !memories.iter().any(|m| m.id_str().is_some()) {
        return Ok((
            profile,
            StepOutcome::skipped("no memory or emotion ids to link"),
        ));
    }

    let associations: Vec<Association> = memories
        .iter()
        .flat_map(|memory| associations_for(memory, &emotions))
        .collect();
    if associations.is_empty() {
        return Ok((profile, StepOutcome::skipped("no associations could be derived")));
    }

    let detail = format!("synthesized {} associations", associations.len());
    let profile = profile.with_section(keys::ASSOCIATION_SYSTEM, &AssociationSystem { associations })?;
    Ok((profile, StepOutcome::converted(detail)))
}

fn associations_for(memory: &Memory, emotions: &EmotionRegistry) -> Vec<Association> {
    let Some(memory_id) = memory.id_str() else {
        return Vec::new();
    };
    let mut links = Vec::new();

    for emotion in memory.associated_emotions.iter().flatten() {
        if !emotions.contains(emotion.as_str()) {
            continue;
        }
        links.push(Association {
            trigger: Some(Trigger::Simple(SimpleTrigger::pointing_at(
                NodeKind::Memory,
                memory_id,
            ))),
            response: Some(response(NodeKind::Emotion, emotion.as_str(), MEMORY_TO_EMOTION_STRENGTH)),
        });
        let mut trigger = SimpleTrigger::pointing_at(NodeKind::Emotion, emotion.as_str());
        trigger.threshold = Some(json!(EMOTION_TRIGGER_THRESHOLD));
        links.push(Association {
            trigger: Some(Trigger::Simple(trigger)),
            response: Some(response(NodeKind::Memory, memory_id, EMOTION_TO_MEMORY_STRENGTH)),
        });
    }

    let topics = memory.content_str().map(topic_words).unwrap_or_default();
    if !topics.is_empty() {
        links.push(Association {
            trigger: Some(Trigger::Simple(SimpleTrigger {
                kind: NodeKind::External,
                id: None,
                threshold: None,
                category: Some(json!(TOPIC_CATEGORY)),
                items: Some(json!(topics)),
            })),
            response: Some(response(NodeKind::Memory, memory_id, TOPIC_TO_MEMORY_STRENGTH)),
        });
    }

    links
}

fn response(kind: NodeKind, id: &str, strength: i64) -> Response {
    Response {
        kind: Some(kind),
        id: Some(id.into()),
        association_strength: Some(Value::from(strength)),
    }
}

/// Up to five lower-cased words of at least four word characters, stop
/// words removed, in order of appearance.
pub fn topic_words(content: &str) -> Vec<String> {
    content
        .to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|word| word.chars().count() >= TOPIC_MIN_CHARS)
        .filter(|word| !TOPIC_STOP_WORDS.contains(word))
        .take(TOPIC_MAX_WORDS)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(value: Value) -> Profile {
        Profile::from_value(value, "test").expect("mapping root")
    }

    #[test]
    fn topic_words_skip_short_and_stop_words() {
        assert_eq!(
            topic_words("When the Rain fell, we would walk with grandma along the riverside path"),
            vec!["rain", "fell", "walk", "grandma", "along"]
        );
        assert!(topic_words("a an the of").is_empty());
    }

    #[test]
    fn links_memories_and_known_emotions_both_ways() {
        let (profile, outcome) = synthesize_associations(profile(json!({
            "emotion_system": {"emotions": {"joy": {"baseline": 50}}},
            "memory_system": {"memories": [
                {"id": "beach", "content": "Summer beach trip", "associated_emotions": ["joy", "awe"]}
            ]}
        })))
        .expect("converts");
        assert!(outcome.is_converted());
        assert_eq!(
            profile.get(keys::ASSOCIATION_SYSTEM),
            Some(&json!({"associations": [
                {
                    "trigger": {"type": "memory", "id": "beach"},
                    "response": {"type": "emotion", "id": "joy", "association_strength": 70}
                },
                {
                    "trigger": {"type": "emotion", "id": "joy", "threshold": 60},
                    "response": {"type": "memory", "id": "beach", "association_strength": 65}
                },
                {
                    "trigger": {"type": "external", "category": "topics", "items": ["summer", "beach", "trip"]},
                    "response": {"type": "memory", "id": "beach", "association_strength": 75}
                }
            ]}))
        );
    }

    #[test]
    fn nothing_to_link_omits_the_section() {
        let original = profile(json!({
            "emotion_system": {"emotions": {"joy": {"baseline": 50}}},
            "memory_system": {"memories": [{"id": "m1", "content": "ok"}]}
        }));
        let (after, outcome) = synthesize_associations(original.clone()).expect("converts");
        assert!(!outcome.is_converted());
        assert!(!after.contains(keys::ASSOCIATION_SYSTEM));
        assert_eq!(after, original);
    }

    #[test]
    fn requires_both_systems_and_no_existing_network() {
        let (_, outcome) = synthesize_associations(profile(json!({
            "memory_system": {"memories": [{"id": "m1", "content": "long content"}]}
        })))
        .expect("converts");
        assert!(!outcome.is_converted());

        let (_, outcome) = synthesize_associations(profile(json!({
            "emotion_system": {"emotions": {"joy": {}}},
            "memory_system": {"memories": [{"id": "m1", "content": "long content"}]},
            "association_system": {"associations": []}
        })))
        .expect("converts");
        assert!(!outcome.is_converted());
    }

    #[test]
    fn compound_emotions_are_linkable() {
        let (profile, _) = synthesize_associations(profile(json!({
            "emotion_system": {"compound_emotions": {"nostalgia": {"baseline": 20}}},
            "memory_system": {"memories": [{"id": "m1", "associated_emotions": ["nostalgia"]}]}
        })))
        .expect("converts");
        let system: AssociationSystem = profile
            .section(keys::ASSOCIATION_SYSTEM)
            .expect("readable")
            .expect("present");
        assert_eq!(system.associations.len(), 2);
    }
}
