//! Identifier namespaces of a profile.
//!
//! Emotions are declared across three mappings (`emotions`,
//! `additional_emotions`, `compound_emotions`) but referenced as one
//! namespace. Memories are declared by the `id` of each record in
//! `memory_system.memories`.

use std::collections::BTreeSet;
use upps_types::{keys, EmotionSystem, MemorySystem};

use crate::document::Profile;
use crate::error::UppsResult;

/// Union of every emotion id declared in an emotion system.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmotionRegistry {
    ids: BTreeSet<String>,
}

impl EmotionRegistry {
    pub fn from_system(system: &EmotionSystem) -> Self {
        Self {
            ids: system.ids().map(str::to_string).collect(),
        }
    }

    /// Empty when the profile has no emotion system.
    pub fn from_profile(profile: &Profile) -> UppsResult<Self> {
        Ok(profile
            .section::<EmotionSystem>(keys::EMOTION_SYSTEM)?
            .map(|system| Self::from_system(&system))
            .unwrap_or_default())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

/// Set of memory ids; records without an id are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryIndex {
    ids: BTreeSet<String>,
}

impl MemoryIndex {
    pub fn from_system(system: &MemorySystem) -> Self {
        Self {
            ids: system
                .memories
                .iter()
                .filter_map(|m| m.id_str())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Empty when the profile has no memory system.
    pub fn from_profile(profile: &Profile) -> UppsResult<Self> {
        Ok(profile
            .section::<MemorySystem>(keys::MEMORY_SYSTEM)?
            .map(|system| Self::from_system(&system))
            .unwrap_or_default())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}
