use upps_types::{keys, CheckKind, CheckReport, EmotionState, EmotionSystem, MemorySystem};

use super::read_section;
use crate::document::Profile;
use crate::registry::EmotionRegistry;

/// Every emotion used by `current_emotion_state` or by a memory's
/// `associated_emotions` must be declared in the emotion system.
pub fn check_emotion_references(profile: &Profile) -> CheckReport {
    let mut report = CheckReport::new(CheckKind::EmotionReferences);

    let Ok(system) = read_section::<EmotionSystem>(profile, keys::EMOTION_SYSTEM, &mut report) else {
        return report.finish();
    };
    let Some(system) = system else {
        return report.skip("emotion_system not found; skipping emotion reference checks");
    };
    let registry = EmotionRegistry::from_system(&system);

    if let Ok(Some(state)) =
        read_section::<EmotionState>(profile, keys::CURRENT_EMOTION_STATE, &mut report)
    {
        for emotion in state.keys() {
            if !registry.contains(emotion) {
                report.error(
                    format!(
                        "current_emotion_state references emotion '{}' which emotion_system does not declare",
                        emotion
                    ),
                    format!("current_emotion_state.{}", emotion),
                );
            }
        }
    }

    if let Ok(Some(memories)) =
        read_section::<MemorySystem>(profile, keys::MEMORY_SYSTEM, &mut report)
    {
        for (index, memory) in memories.memories.iter().enumerate() {
            let Some(associated) = &memory.associated_emotions else {
                continue;
            };
            let owner = memory
                .id_str()
                .map(str::to_string)
                .unwrap_or_else(|| format!("memory_{}", index));
            for emotion in associated {
                if !registry.contains(emotion.as_str()) {
                    report.error(
                        format!(
                            "memory '{}' is associated with emotion '{}' which emotion_system does not declare",
                            owner, emotion
                        ),
                        format!("memory_system.memories[{}].associated_emotions", index),
                    );
                }
            }
        }
    }

    report.finish()
}
