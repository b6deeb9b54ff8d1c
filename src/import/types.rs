//! Core types for prompt dissection.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category tag of a prompt block.
///
/// The six built-in categories are what the classifier can suggest; anything
/// else a user types in is kept verbatim as a custom tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockType {
    /// Who the model should be.
    /// Examples: "You are a senior editor", "Act as a tutor"
    Role,

    /// What the model should do. Also the catch-all for unclassifiable text.
    Task,

    /// Background the model needs to do the task.
    Context,

    /// Shape of the expected answer (format, structure, length).
    Output,

    /// Tone, voice and register.
    Style,

    /// Hard limits: things to always or never do.
    Constraints,

    /// User-defined tag.
    Custom(String),
}

static CATEGORIES: [BlockType; 6] = [
    BlockType::Role,
    BlockType::Task,
    BlockType::Context,
    BlockType::Output,
    BlockType::Style,
    BlockType::Constraints,
];

impl BlockType {
    /// The built-in categories in declaration order.
    ///
    /// This order is also the classifier's tie-break order.
    #[must_use]
    pub fn categories() -> &'static [Self] {
        &CATEGORIES
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Role => "role",
            Self::Task => "task",
            Self::Context => "context",
            Self::Output => "output",
            Self::Style => "style",
            Self::Constraints => "constraints",
            Self::Custom(tag) => tag,
        }
    }

    #[must_use]
    pub const fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for BlockType {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "role" => Self::Role,
            "task" => Self::Task,
            "context" => Self::Context,
            "output" => Self::Output,
            "style" => Self::Style,
            "constraints" | "constraint" => Self::Constraints,
            _ => Self::Custom(value.trim().to_string()),
        }
    }
}

impl From<String> for BlockType {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<BlockType> for String {
    fn from(value: BlockType) -> Self {
        match value {
            BlockType::Custom(tag) => tag,
            other => other.as_str().to_string(),
        }
    }
}

/// Display bucket of a confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
    /// A human chose the type; overrides the numeric bucket.
    Manual,
}

impl ConfidenceLevel {
    /// Bucket a classifier score: >= 80 high, >= 50 medium, otherwise low.
    #[must_use]
    pub const fn from_score(confidence: u8) -> Self {
        if confidence >= 80 {
            Self::High
        } else if confidence >= 50 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Manual => "manual",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Opaque identifier of a dissected block.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    /// Issue a fresh identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("blk_{}", Uuid::new_v4().simple()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Which rule tier produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// Heading or label on the first line ("Role:", "# Task", "R:").
    Marker,
    /// Instructive opening phrase ("You are", "Your task is").
    Phrase,
    /// Category keywords found anywhere in the segment.
    Keyword,
    /// Nothing cleared the threshold; fell back to `Task`.
    Default,
}

impl MatchTier {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Marker => "marker",
            Self::Phrase => "phrase",
            Self::Keyword => "keyword",
            Self::Default => "default",
        }
    }
}

/// Result of classifying one segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub block_type: BlockType,

    /// Classifier certainty, 0-100.
    pub confidence: u8,

    pub tier: MatchTier,

    /// The marker, phrase or keywords that decided the match.
    pub matched: Option<String>,
}

impl Classification {
    #[must_use]
    pub fn new(block_type: BlockType, confidence: u8, tier: MatchTier) -> Self {
        Self {
            block_type,
            confidence: confidence.min(100),
            tier,
            matched: None,
        }
    }

    #[must_use]
    pub fn with_match(mut self, matched: impl Into<String>) -> Self {
        self.matched = Some(matched.into());
        self
    }

    #[must_use]
    pub const fn level(&self) -> ConfidenceLevel {
        ConfidenceLevel::from_score(self.confidence)
    }
}

/// A candidate prompt block under review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DissectedBlock {
    pub id: BlockId,

    /// Never empty.
    pub content: String,

    pub suggested_type: BlockType,

    /// 0-100; forced to 100 on manual retype and add.
    pub confidence: u8,

    pub confidence_level: ConfidenceLevel,

    /// Set once a human touched the type or structure; never cleared.
    pub is_manual: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Char offset into the original text. Not maintained across edits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_position: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_position: Option<usize>,
}

impl DissectedBlock {
    /// Wrap a classified segment.
    #[must_use]
    pub fn classified(
        content: impl Into<String>,
        classification: &Classification,
        start: Option<usize>,
        end: Option<usize>,
    ) -> Self {
        Self {
            id: BlockId::generate(),
            content: content.into(),
            suggested_type: classification.block_type.clone(),
            confidence: classification.confidence,
            confidence_level: classification.level(),
            is_manual: false,
            label: None,
            start_position: start,
            end_position: end,
        }
    }

    /// A block created by hand: full confidence, manual from the start.
    #[must_use]
    pub fn manual(content: impl Into<String>, block_type: BlockType) -> Self {
        Self {
            id: BlockId::generate(),
            content: content.into(),
            suggested_type: block_type,
            confidence: 100,
            confidence_level: ConfidenceLevel::Manual,
            is_manual: true,
            label: None,
            start_position: None,
            end_position: None,
        }
    }

    pub fn mark_manual(&mut self) {
        self.is_manual = true;
        self.confidence_level = ConfidenceLevel::Manual;
    }

    /// Unnamed blocks are committed inline rather than as library items.
    #[must_use]
    pub fn is_named(&self) -> bool {
        self.label.as_deref().is_some_and(|label| !label.trim().is_empty())
    }

    /// Get the first N characters of content as a preview.
    #[must_use]
    pub fn preview(&self, max_chars: usize) -> String {
        let preview: String = self.content.chars().take(max_chars).collect();
        if self.content.chars().count() > max_chars {
            format!("{preview}...")
        } else {
            preview
        }
    }
}

/// Summary of a dissection for display and debugging.
#[derive(Debug, Default, Clone, Serialize)]
pub struct DissectionStats {
    pub total_blocks: usize,
    pub blocks_by_type: BTreeMap<String, usize>,
    pub avg_confidence: f32,
    pub high_confidence_count: usize,
    pub medium_confidence_count: usize,
    pub low_confidence_count: usize,
    pub manual_count: usize,
}

impl DissectionStats {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_blocks(blocks: &[DissectedBlock]) -> Self {
        let mut stats = Self {
            total_blocks: blocks.len(),
            ..Default::default()
        };

        let mut total_confidence = 0u32;
        for block in blocks {
            *stats
                .blocks_by_type
                .entry(block.suggested_type.to_string())
                .or_insert(0) += 1;
            total_confidence += u32::from(block.confidence);

            match block.confidence_level {
                ConfidenceLevel::High => stats.high_confidence_count += 1,
                ConfidenceLevel::Medium => stats.medium_confidence_count += 1,
                ConfidenceLevel::Low => stats.low_confidence_count += 1,
                ConfidenceLevel::Manual => stats.manual_count += 1,
            }
        }

        if !blocks.is_empty() {
            stats.avg_confidence = total_confidence as f32 / blocks.len() as f32;
        }

        stats
    }
}
