use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;
use upps_types::{
    keys, EmotionalValence, Ident, LegacyMemory, Memory, MemorySystem, MemoryTrace, MemoryType,
};

use super::tables::{MEMORY_ID_MAX_CHARS, NEGATIVE_EMOTIONS, POSITIVE_EMOTIONS};
use super::{read_legacy, StepOutcome};
use crate::document::Profile;
use crate::error::UppsResult;

/// `memory_trace.memories` -> `memory_system.memories`.
pub(super) fn convert_memory_trace(profile: Profile) -> UppsResult<(Profile, StepOutcome)> {
    if profile.contains(keys::MEMORY_SYSTEM) {
        return Ok((profile, StepOutcome::skipped("memory_system already present")));
    }
    let trace = match read_legacy::<MemoryTrace>(&profile, keys::MEMORY_TRACE) {
        Ok(trace) => trace,
        Err(outcome) => return Ok((profile, outcome)),
    };

    let slugger = Slugger::new()?;
    let mut issued = HashSet::new();
    let memories: Vec<Memory> = trace
        .memories
        .iter()
        .enumerate()
        .map(|(index, legacy)| {
            let id = unique_id(memory_id(&slugger, legacy, index), &mut issued);
            convert_memory(legacy, id)
        })
        .collect();

    let detail = format!("converted {} memories to memory_system", memories.len());
    let profile = profile.with_section(keys::MEMORY_SYSTEM, &MemorySystem { memories })?;
    Ok((profile, StepOutcome::converted(detail)))
}

fn convert_memory(legacy: &LegacyMemory, id: String) -> Memory {
    let emotional_valence = legacy.emotions.as_deref().map(valence);
    Memory {
        id: Some(Ident::new(id)),
        kind: Some(MemoryType::Episodic),
        content: Some(Value::String(legacy.event.clone().unwrap_or_default())),
        period: legacy.period.clone(),
        associated_emotions: legacy
            .emotions
            .as_ref()
            .map(|emotions| emotions.iter().map(|e| Ident::new(e.as_str())).collect()),
        importance: legacy.importance.clone(),
        emotional_valence,
    }
}

fn memory_id(slugger: &Slugger, legacy: &LegacyMemory, index: usize) -> String {
    let slug = legacy
        .event
        .as_deref()
        .map(|event| slugger.slugify(event))
        .unwrap_or_default();
    if slug.is_empty() {
        format!("memory_{}", index + 1)
    } else {
        slug
    }
}

/// Appends `_2`, `_3`, ... until the id has not been handed out before. The
/// base is shortened so the suffixed id still fits `MEMORY_ID_MAX_CHARS`.
fn unique_id(candidate: String, issued: &mut HashSet<String>) -> String {
    if issued.insert(candidate.clone()) {
        return candidate;
    }
    let id = (2..)
        .map(|n| {
            let suffix = format!("_{}", n);
            let keep = MEMORY_ID_MAX_CHARS.saturating_sub(suffix.chars().count());
            let base: String = candidate.chars().take(keep).collect();
            base + &suffix
        })
        .find(|id| !issued.contains(id))
        .unwrap_or_default();
    debug!(base = %candidate, id = %id, "memory id collision resolved");
    issued.insert(id.clone());
    id
}

/// Turns free text into memory identifiers.
pub struct Slugger {
    non_word: Regex,
}

impl Slugger {
    pub fn new() -> UppsResult<Self> {
        Ok(Self {
            non_word: Regex::new(r"[^\w\s]")?,
        })
    }

    /// Word characters only (Unicode `\w`, so combining marks survive),
    /// lower-cased, whitespace runs replaced by `_`, an `id_` prefix when it
    /// would start with a digit, and at most 30 characters.
    pub fn slugify(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let kept = self.non_word.replace_all(&lowered, "");
        let mut slug = kept.split_whitespace().collect::<Vec<_>>().join("_");
        if slug.chars().next().is_some_and(|c| c.is_numeric()) {
            slug.insert_str(0, "id_");
        }
        slug.chars().take(MEMORY_ID_MAX_CHARS).collect()
    }
}

/// Tone of a set of emotions, by counting known positive and negative names.
pub fn valence(emotions: &[String]) -> EmotionalValence {
    let count = |list: &[&str]| {
        emotions
            .iter()
            .filter(|e| list.contains(&e.to_lowercase().as_str()))
            .count()
    };
    let positive = count(POSITIVE_EMOTIONS);
    let negative = count(NEGATIVE_EMOTIONS);

    if positive > negative {
        EmotionalValence::Positive
    } else if negative > positive {
        EmotionalValence::Negative
    } else if positive > 0 {
        EmotionalValence::Mixed
    } else {
        EmotionalValence::Neutral
    }
}
