// === UPPS PROFILE SECTIONS ===
// Typed views of the legacy and extended sections of a persona profile.
// Fields the checks never read stay as raw JSON values so that unusual
// but harmless shapes do not make a whole section unreadable.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Root keys of the sections this crate knows about.
pub mod keys {
    pub const STATE: &str = "state";
    pub const MEMORY_TRACE: &str = "memory_trace";
    pub const COGNITIVE_PROFILE: &str = "cognitive_profile";

    pub const CURRENT_EMOTION_STATE: &str = "current_emotion_state";
    pub const EMOTION_SYSTEM: &str = "emotion_system";
    pub const MEMORY_SYSTEM: &str = "memory_system";
    pub const ASSOCIATION_SYSTEM: &str = "association_system";
    pub const COGNITIVE_SYSTEM: &str = "cognitive_system";

    pub const PERSONAL_INFO: &str = "personal_info";
    pub const NON_DIALOGUE_METADATA: &str = "non_dialogue_metadata";
}

/// Identifier of a memory or emotion.
///
/// Profiles are hand-written YAML, so `id: 42` is accepted alongside
/// `id: "42"`; both name the same entity.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(from = "RawIdent")]
pub struct Ident(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawIdent {
    Text(String),
    Integer(i64),
    Decimal(f64),
    Flag(bool),
}

impl From<RawIdent> for Ident {
    fn from(raw: RawIdent) -> Self {
        match raw {
            RawIdent::Text(s) => Ident(s),
            RawIdent::Integer(n) => Ident(n.to_string()),
            RawIdent::Decimal(n) => Ident(n.to_string()),
            RawIdent::Flag(b) => Ident(b.to_string()),
        }
    }
}

impl Ident {
    pub fn new(id: impl Into<String>) -> Self {
        Ident(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Ident {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Ident {
    fn from(id: &str) -> Self {
        Ident(id.to_string())
    }
}

/// Numeric score as written in the document, kept integral when it was.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(untagged)]
pub enum Score {
    Integer(i64),
    Decimal(f64),
}

impl Score {
    pub fn as_f64(self) -> f64 {
        match self {
            Score::Integer(n) => n as f64,
            Score::Decimal(n) => n,
        }
    }
}

impl From<i64> for Score {
    fn from(n: i64) -> Self {
        Score::Integer(n)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Integer(n) => write!(f, "{}", n),
            Score::Decimal(n) => write!(f, "{}", n),
        }
    }
}

/// Declares a string-backed enum whose unknown spellings are preserved in an
/// `Other` variant instead of failing deserialization.
macro_rules! open_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $text,)+
                    $name::Other(s) => s.as_str(),
                }
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                match s.as_str() {
                    $($text => $name::$variant,)+
                    _ => $name::Other(s),
                }
            }
        }

        impl From<$name> for String {
            fn from(v: $name) -> Self {
                v.as_str().to_string()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

open_enum! {
    /// Namespace a trigger, condition or response points into.
    NodeKind {
        Memory => "memory",
        Emotion => "emotion",
        External => "external",
    }
}

open_enum! {
    MemoryType {
        Episodic => "episodic",
        Semantic => "semantic",
        Procedural => "procedural",
        Autobiographical => "autobiographical",
    }
}

open_enum! {
    /// Overall emotional tone derived from a memory's associated emotions.
    EmotionalValence {
        Positive => "positive",
        Negative => "negative",
        Mixed => "mixed",
        Neutral => "neutral",
    }
}

open_enum! {
    Operator {
        And => "AND",
        Or => "OR",
    }
}

// === EXTENDED SECTIONS ===

/// Emotion id -> current intensity.
pub type EmotionState = Map<String, Value>;

/// The three emotion mappings share one identifier namespace; see
/// `EmotionRegistry` in `upps_core`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct EmotionSystem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub emotions: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub additional_emotions: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub compound_emotions: Map<String, Value>,
}

impl EmotionSystem {
    /// Every declared emotion id, in declaration order, duplicates included.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.emotions
            .keys()
            .chain(self.additional_emotions.keys())
            .chain(self.compound_emotions.keys())
            .map(String::as_str)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct MemorySystem {
    #[serde(default)]
    pub memories: Vec<Memory>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Memory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Ident>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<MemoryType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub associated_emotions: Option<Vec<Ident>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotional_valence: Option<EmotionalValence>,
}

impl Memory {
    /// The memory's id, treating an empty id as no id at all.
    pub fn id_str(&self) -> Option<&str> {
        self.id.as_ref().map(Ident::as_str).filter(|id| !id.is_empty())
    }

    /// `content` when it was written as text.
    pub fn content_str(&self) -> Option<&str> {
        self.content.as_ref().and_then(Value::as_str)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AssociationSystem {
    #[serde(default)]
    pub associations: Vec<Association>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Association {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<Trigger>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Response>,
}

/// A trigger is recognised by its keys: `type` makes it simple, otherwise
/// `operator` makes it compound. Anything else is kept verbatim and ignored
/// by the reference checks.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Trigger {
    Simple(SimpleTrigger),
    Compound(CompoundTrigger),
    Unrecognized(Value),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SimpleTrigger {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Ident>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Value>,
}

impl SimpleTrigger {
    pub fn pointing_at(kind: NodeKind, id: impl Into<Ident>) -> Self {
        Self {
            kind,
            id: Some(id.into()),
            threshold: None,
            category: None,
            items: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CompoundTrigger {
    pub operator: Operator,
    #[serde(default)]
    pub conditions: Vec<Trigger>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Response {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<NodeKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Ident>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub association_strength: Option<Value>,
}

/// The four index scores every cognitive system must carry.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AbilityKind {
    VerbalComprehension,
    PerceptualReasoning,
    WorkingMemory,
    ProcessingSpeed,
}

impl AbilityKind {
    pub const ALL: [AbilityKind; 4] = [
        AbilityKind::VerbalComprehension,
        AbilityKind::PerceptualReasoning,
        AbilityKind::WorkingMemory,
        AbilityKind::ProcessingSpeed,
    ];

    pub fn key(self) -> &'static str {
        match self {
            AbilityKind::VerbalComprehension => "verbal_comprehension",
            AbilityKind::PerceptualReasoning => "perceptual_reasoning",
            AbilityKind::WorkingMemory => "working_memory",
            AbilityKind::ProcessingSpeed => "processing_speed",
        }
    }
}

impl fmt::Display for AbilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CognitiveSystem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abilities: Option<Abilities>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub general_ability: Option<Ability>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Abilities {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbal_comprehension: Option<Ability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perceptual_reasoning: Option<Ability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_memory: Option<Ability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_speed: Option<Ability>,
}

impl Abilities {
    pub fn get(&self, kind: AbilityKind) -> Option<&Ability> {
        match kind {
            AbilityKind::VerbalComprehension => self.verbal_comprehension.as_ref(),
            AbilityKind::PerceptualReasoning => self.perceptual_reasoning.as_ref(),
            AbilityKind::WorkingMemory => self.working_memory.as_ref(),
            AbilityKind::ProcessingSpeed => self.processing_speed.as_ref(),
        }
    }

    pub fn slot_mut(&mut self, kind: AbilityKind) -> &mut Option<Ability> {
        match kind {
            AbilityKind::VerbalComprehension => &mut self.verbal_comprehension,
            AbilityKind::PerceptualReasoning => &mut self.perceptual_reasoning,
            AbilityKind::WorkingMemory => &mut self.working_memory,
            AbilityKind::ProcessingSpeed => &mut self.processing_speed,
        }
    }

    /// Levels of the abilities that carry one, in `AbilityKind::ALL` order.
    pub fn present_levels(&self) -> impl Iterator<Item = Score> + '_ {
        AbilityKind::ALL
            .into_iter()
            .filter_map(|kind| self.get(kind).and_then(|a| a.level))
    }

    /// Levels of the four abilities, or `None` unless every one is present.
    pub fn complete_levels(&self) -> Option<[Score; 4]> {
        let mut levels = [Score::Integer(0); 4];
        for (slot, kind) in levels.iter_mut().zip(AbilityKind::ALL) {
            *slot = self.get(kind)?.level?;
        }
        Some(levels)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Ability {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<Score>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
}

impl Ability {
    pub fn at_level(level: i64) -> Self {
        Self {
            level: Some(Score::Integer(level)),
            description: None,
        }
    }
}

// === LEGACY SECTIONS ===

/// Legacy `state`: emotion name -> intensity.
pub type LegacyState = Map<String, Value>;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct MemoryTrace {
    #[serde(default)]
    pub memories: Vec<LegacyMemory>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct LegacyMemory {
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub period: Option<Value>,
    #[serde(default)]
    pub emotions: Option<Vec<String>>,
    #[serde(default)]
    pub importance: Option<Value>,
    /// Never migrated: the ids it points at are regenerated on conversion.
    #[serde(default)]
    pub related_memories: Option<Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CognitiveProfile {
    #[serde(default)]
    pub narrative: Option<String>,
    #[serde(default)]
    pub test_results: Vec<TestResult>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TestResult {
    #[serde(default)]
    pub test_name: Option<String>,
    #[serde(default)]
    pub scores: Option<Map<String, Value>>,
}
