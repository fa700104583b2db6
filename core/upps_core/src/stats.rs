use serde::Serialize;
use upps_types::{
    keys, AbilityKind, AssociationSystem, CognitiveSystem, EmotionSystem, MemorySystem,
    MemoryType, NodeKind, Score, Trigger,
};

use crate::document::Profile;

/// Counts describing a profile, shown after a validation run.
///
/// Unreadable sections count as empty; the checks already report them.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct ProfileStats {
    pub name: Option<String>,
    pub emotions: EmotionCounts,
    pub memories: MemoryCounts,
    pub associations: AssociationCounts,
    pub cognitive: Option<CognitiveLevels>,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct EmotionCounts {
    pub basic: usize,
    pub additional: usize,
    pub compound: usize,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryCounts {
    pub total: usize,
    pub episodic: usize,
    pub semantic: usize,
    pub procedural: usize,
    pub autobiographical: usize,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct AssociationCounts {
    pub total: usize,
    pub memory_to_emotion: usize,
    pub emotion_to_memory: usize,
    pub external: usize,
    pub compound: usize,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CognitiveLevels {
    pub abilities: [(AbilityKind, Score); 4],
    pub general: Option<Score>,
}

impl ProfileStats {
    pub fn collect(profile: &Profile) -> Self {
        let name = profile
            .pointer("/personal_info/name")
            .and_then(|v| v.as_str())
            .map(str::to_string);

        Self {
            name,
            emotions: section::<EmotionSystem>(profile, keys::EMOTION_SYSTEM)
                .map(|s| EmotionCounts {
                    basic: s.emotions.len(),
                    additional: s.additional_emotions.len(),
                    compound: s.compound_emotions.len(),
                })
                .unwrap_or_default(),
            memories: section::<MemorySystem>(profile, keys::MEMORY_SYSTEM)
                .map(|s| count_memories(&s))
                .unwrap_or_default(),
            associations: section::<AssociationSystem>(profile, keys::ASSOCIATION_SYSTEM)
                .map(|s| count_associations(&s))
                .unwrap_or_default(),
            cognitive: section::<CognitiveSystem>(profile, keys::COGNITIVE_SYSTEM)
                .and_then(|s| cognitive_levels(&s)),
        }
    }
}

fn section<T: serde::de::DeserializeOwned>(profile: &Profile, key: &str) -> Option<T> {
    profile.section(key).ok().flatten()
}

fn count_memories(system: &MemorySystem) -> MemoryCounts {
    let mut counts = MemoryCounts {
        total: system.memories.len(),
        ..MemoryCounts::default()
    };
    for memory in &system.memories {
        match memory.kind {
            Some(MemoryType::Episodic) => counts.episodic += 1,
            Some(MemoryType::Semantic) => counts.semantic += 1,
            Some(MemoryType::Procedural) => counts.procedural += 1,
            Some(MemoryType::Autobiographical) => counts.autobiographical += 1,
            _ => {}
        }
    }
    counts
}

fn count_associations(system: &AssociationSystem) -> AssociationCounts {
    let mut counts = AssociationCounts {
        total: system.associations.len(),
        ..AssociationCounts::default()
    };
    for association in &system.associations {
        let response = association.response.as_ref().and_then(|r| r.kind.as_ref());
        match &association.trigger {
            Some(Trigger::Simple(trigger)) => match (&trigger.kind, response) {
                (NodeKind::Memory, Some(NodeKind::Emotion)) => counts.memory_to_emotion += 1,
                (NodeKind::Emotion, Some(NodeKind::Memory)) => counts.emotion_to_memory += 1,
                (NodeKind::External, _) => counts.external += 1,
                _ => {}
            },
            Some(Trigger::Compound(_)) => counts.compound += 1,
            _ => {}
        }
    }
    counts
}

fn cognitive_levels(system: &CognitiveSystem) -> Option<CognitiveLevels> {
    let levels = system.abilities.as_ref()?.complete_levels()?;
    let mut abilities = [(AbilityKind::VerbalComprehension, Score::Integer(0)); 4];
    for (slot, (kind, level)) in abilities.iter_mut().zip(AbilityKind::ALL.into_iter().zip(levels)) {
        *slot = (kind, level);
    }
    Some(CognitiveLevels {
        abilities,
        general: system.general_ability.as_ref().and_then(|g| g.level),
    })
}
