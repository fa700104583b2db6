//! Fixed lookup tables used when deriving extended sections.

use upps_types::AbilityKind;

/// Known emotion names and their descriptions.
pub const EMOTION_DESCRIPTIONS: &[(&str, &str)] = &[
    ("joy", "喜び、幸福感"),
    ("happiness", "幸福感、満足感"),
    ("happy", "幸福感、満足感"),
    ("sadness", "悲しみ、失望感"),
    ("sad", "悲しみ、失望感"),
    ("anger", "怒り、いらだち"),
    ("angry", "怒り、いらだち"),
    ("fear", "恐れ、不安"),
    ("fearful", "恐れ、不安"),
    ("afraid", "恐れ、不安"),
    ("disgust", "嫌悪、不快感"),
    ("disgusted", "嫌悪、不快感"),
    ("surprise", "驚き、意外性への反応"),
    ("surprised", "驚き、意外性への反応"),
    ("calm", "落ち着き、平静さ"),
    ("excited", "興奮、高揚感"),
    ("anxious", "不安、心配"),
    ("anxiety", "不安、心配"),
    ("tired", "疲労感、倦怠感"),
    ("fatigue", "疲労感、消耗"),
    ("curious", "好奇心、興味"),
    ("curiosity", "好奇心、知的探究心"),
    ("proud", "誇り、達成感"),
    ("pride", "誇り、プライド"),
    ("ashamed", "恥じらい、羞恥心"),
    ("shame", "恥辱感、罪悪感"),
    ("guilty", "罪悪感、自責の念"),
    ("guilt", "罪の意識、後悔"),
    ("jealous", "嫉妬、羨望"),
    ("jealousy", "嫉妬心、羨望"),
    ("love", "愛情、親愛の情"),
    ("hate", "憎しみ、敵意"),
    ("nostalgic", "懐かしさ、郷愁"),
    ("nostalgia", "郷愁、過去への思慕"),
    ("confused", "混乱、当惑"),
    ("confusion", "混乱、理解の欠如"),
    ("grateful", "感謝の気持ち、謝意"),
    ("gratitude", "感謝の念、恩義"),
    ("hopeful", "希望、期待感"),
    ("hope", "希望、期待"),
    ("disappointed", "失望、落胆"),
    ("disappointment", "失望感、期待外れ"),
    ("satisfied", "満足感、充足感"),
    ("satisfaction", "満足、充足"),
    ("frustrated", "欲求不満、いらだち"),
    ("frustration", "欲求不満、挫折感"),
];

/// A basic emotion every synthesized emotion system carries.
#[derive(Debug, Clone, Copy)]
pub struct BasicEmotion {
    pub id: &'static str,
    /// Legacy `state` keys that stand in for this emotion, in preference order.
    pub synonyms: &'static [&'static str],
    pub default_baseline: i64,
}

/// Ekman's six basic emotions.
pub const BASIC_EMOTIONS: [BasicEmotion; 6] = [
    BasicEmotion {
        id: "joy",
        synonyms: &["happy", "happiness"],
        default_baseline: 50,
    },
    BasicEmotion {
        id: "sadness",
        synonyms: &["sad"],
        default_baseline: 30,
    },
    BasicEmotion {
        id: "anger",
        synonyms: &["angry"],
        default_baseline: 30,
    },
    BasicEmotion {
        id: "fear",
        synonyms: &["fearful", "afraid"],
        default_baseline: 30,
    },
    BasicEmotion {
        id: "disgust",
        synonyms: &["disgusted"],
        default_baseline: 30,
    },
    BasicEmotion {
        id: "surprise",
        synonyms: &["surprised"],
        default_baseline: 30,
    },
];

pub const EMOTION_MODEL: &str = "Ekman";

pub const POSITIVE_EMOTIONS: &[&str] = &[
    "joy", "happy", "happiness", "calm", "excited", "curious", "proud", "love", "grateful",
    "hopeful", "satisfied",
];

pub const NEGATIVE_EMOTIONS: &[&str] = &[
    "sadness",
    "sad",
    "anger",
    "angry",
    "fear",
    "fearful",
    "afraid",
    "disgust",
    "disgusted",
    "anxious",
    "tired",
    "ashamed",
    "guilty",
    "jealous",
    "hate",
    "confused",
    "disappointed",
    "frustrated",
];

/// Where a test sub-score lands in the cognitive system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTarget {
    Ability(AbilityKind),
    General,
}

/// Score-name keywords, checked in order; the first row with a keyword
/// contained in the lower-cased score name wins.
pub const SCORE_KEYWORDS: [(&[&str], ScoreTarget); 5] = [
    (
        &["vci", "verbal", "comprehension", "vocabulary"],
        ScoreTarget::Ability(AbilityKind::VerbalComprehension),
    ),
    (
        &["pri", "perceptual", "reasoning", "visual", "spatial"],
        ScoreTarget::Ability(AbilityKind::PerceptualReasoning),
    ),
    (
        &["wmi", "working", "memory"],
        ScoreTarget::Ability(AbilityKind::WorkingMemory),
    ),
    (
        &["psi", "processing", "speed"],
        ScoreTarget::Ability(AbilityKind::ProcessingSpeed),
    ),
    (
        &["fsiq", "full", "global", "general", "iq"],
        ScoreTarget::General,
    ),
];

/// Upper-cased fragments identifying an intelligence test by name.
pub const IQ_TEST_MARKERS: &[&str] = &["WAIS", "WISC", "IQ"];

pub const COGNITIVE_MODEL: &str = "WAIS-IV";
pub const DEFAULT_ABILITY_LEVEL: i64 = 50;
pub const MAX_ABILITY_LEVEL: i64 = 100;

pub fn ability_description(kind: AbilityKind) -> &'static str {
    match kind {
        AbilityKind::VerbalComprehension => "言語的概念の理解と表現能力",
        AbilityKind::PerceptualReasoning => "視覚的・空間的情報の処理と分析能力",
        AbilityKind::WorkingMemory => "情報の短期的保持と操作能力",
        AbilityKind::ProcessingSpeed => "単純な視覚情報の迅速な処理能力",
    }
}

/// Words too common to be useful as topic triggers.
pub const TOPIC_STOP_WORDS: &[&str] = &[
    "this", "that", "these", "those", "when", "where", "which", "while", "with", "would",
    "could", "should",
];

pub const TOPIC_MIN_CHARS: usize = 4;
pub const TOPIC_MAX_WORDS: usize = 5;
pub const TOPIC_CATEGORY: &str = "topics";

pub const MEMORY_TO_EMOTION_STRENGTH: i64 = 70;
pub const EMOTION_TO_MEMORY_STRENGTH: i64 = 65;
pub const EMOTION_TRIGGER_THRESHOLD: i64 = 60;
pub const TOPIC_TO_MEMORY_STRENGTH: i64 = 75;

pub const MEMORY_ID_MAX_CHARS: usize = 30;

/// Description for an emotion name, falling back to a generic phrase.
pub fn describe_emotion(name: &str) -> String {
    let lowered = name.to_lowercase();
    EMOTION_DESCRIPTIONS
        .iter()
        .find(|(known, _)| *known == lowered)
        .map(|(_, description)| description.to_string())
        .unwrap_or_else(|| format!("{}の感情", name))
}

/// Classifies a test sub-score by name.
pub fn classify_score(name: &str) -> Option<ScoreTarget> {
    let lowered = name.to_lowercase();
    SCORE_KEYWORDS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(_, target)| *target)
}

pub fn is_iq_test(test_name: &str) -> bool {
    let upper = test_name.to_uppercase();
    IQ_TEST_MARKERS.iter().any(|marker| upper.contains(marker))
}
