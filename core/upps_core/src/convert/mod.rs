//! Legacy -> extended profile conversion.
//!
//! Each step adds one extended section when its legacy source exists and
//! the target does not. Nothing is removed or overwritten, so converting an
//! already-converted profile changes nothing.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use tracing::{info, warn};
use upps_types::{keys, AssociationSystem, EmotionSystem, MemorySystem};

use crate::document::Profile;
use crate::error::UppsResult;

mod association;
mod cognitive;
mod emotion;
mod memory;
pub mod tables;

pub use association::topic_words;
pub use memory::{valence, Slugger};

/// Legacy keys paired with the extended key that supersedes them.
const LEGACY_FIELDS: [(&str, &str); 3] = [
    (keys::STATE, keys::CURRENT_EMOTION_STATE),
    (keys::MEMORY_TRACE, keys::MEMORY_SYSTEM),
    (keys::COGNITIVE_PROFILE, keys::COGNITIVE_SYSTEM),
];

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConversionStep {
    Emotion,
    Memory,
    Cognitive,
    Association,
}

impl fmt::Display for ConversionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConversionStep::Emotion => "state -> emotion_system",
            ConversionStep::Memory => "memory_trace -> memory_system",
            ConversionStep::Cognitive => "cognitive_profile -> cognitive_system",
            ConversionStep::Association => "association_system synthesis",
        };
        f.write_str(name)
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StepOutcome {
    Converted { detail: String },
    Skipped { reason: String },
}

impl StepOutcome {
    pub fn converted(detail: impl Into<String>) -> Self {
        StepOutcome::Converted {
            detail: detail.into(),
        }
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        StepOutcome::Skipped {
            reason: reason.into(),
        }
    }

    pub fn is_converted(&self) -> bool {
        matches!(self, StepOutcome::Converted { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            StepOutcome::Converted { detail } => detail,
            StepOutcome::Skipped { reason } => reason,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub step: ConversionStep,
    pub outcome: StepOutcome,
}

/// Sizes of the extended sections after conversion.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    pub emotions: usize,
    pub additional_emotions: usize,
    pub compound_emotions: usize,
    pub memories: usize,
    pub associations: usize,
    pub has_cognitive_system: bool,
}

impl ConversionSummary {
    fn of(profile: &Profile) -> Self {
        let emotion = profile
            .section::<EmotionSystem>(keys::EMOTION_SYSTEM)
            .ok()
            .flatten()
            .unwrap_or_default();
        let memories = profile
            .section::<MemorySystem>(keys::MEMORY_SYSTEM)
            .ok()
            .flatten()
            .map_or(0, |s| s.memories.len());
        let associations = profile
            .section::<AssociationSystem>(keys::ASSOCIATION_SYSTEM)
            .ok()
            .flatten()
            .map_or(0, |s| s.associations.len());
        Self {
            emotions: emotion.emotions.len(),
            additional_emotions: emotion.additional_emotions.len(),
            compound_emotions: emotion.compound_emotions.len(),
            memories,
            associations,
            has_cognitive_system: profile.contains(keys::COGNITIVE_SYSTEM),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    pub steps: Vec<StepRecord>,
    pub summary: ConversionSummary,
}

impl ConversionReport {
    pub fn converted_any(&self) -> bool {
        self.steps.iter().any(|s| s.outcome.is_converted())
    }

    pub fn outcome(&self, step: ConversionStep) -> Option<&StepOutcome> {
        self.steps
            .iter()
            .find(|record| record.step == step)
            .map(|record| &record.outcome)
    }
}

#[derive(Debug, Clone)]
pub struct Conversion {
    pub profile: Profile,
    pub report: ConversionReport,
}

/// True when some legacy field is present without its extended equivalent.
pub fn has_pending_legacy(profile: &Profile) -> bool {
    LEGACY_FIELDS
        .iter()
        .any(|(legacy, extended)| profile.contains(legacy) && !profile.contains(extended))
}

/// Runs every conversion step in order and returns the extended profile.
///
/// Errors only when a derived section cannot be encoded; malformed legacy
/// sections are reported as skipped steps.
pub fn convert_profile(profile: &Profile) -> UppsResult<Conversion> {
    type Step = fn(Profile) -> UppsResult<(Profile, StepOutcome)>;
    let pipeline: [(ConversionStep, Step); 4] = [
        (ConversionStep::Emotion, emotion::convert_state),
        (ConversionStep::Memory, memory::convert_memory_trace),
        (ConversionStep::Cognitive, cognitive::convert_cognitive_profile),
        (ConversionStep::Association, association::synthesize_associations),
    ];

    let mut current = profile.clone();
    let mut steps = Vec::with_capacity(pipeline.len());
    for (step, run) in pipeline {
        let (next, outcome) = run(current)?;
        match &outcome {
            StepOutcome::Converted { detail } => info!(step = %step, "{}", detail),
            StepOutcome::Skipped { reason } => warn!(step = %step, "skipped: {}", reason),
        }
        current = next;
        steps.push(StepRecord { step, outcome });
    }

    let summary = ConversionSummary::of(&current);
    Ok(Conversion {
        profile: current,
        report: ConversionReport { steps, summary },
    })
}

/// Reads a legacy section, turning absence or a malformed shape into the
/// step's skip outcome.
fn read_legacy<T: DeserializeOwned>(profile: &Profile, key: &str) -> Result<T, StepOutcome> {
    match profile.section::<T>(key) {
        Ok(Some(section)) => Ok(section),
        Ok(None) => Err(StepOutcome::skipped(format!("{} not found", key))),
        Err(e) => Err(StepOutcome::skipped(e.to_string())),
    }
}
