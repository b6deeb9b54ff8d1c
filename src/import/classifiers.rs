//! Block classifier for prompt segments.
//!
//! Every category carries three rule tiers, tried in order: an explicit
//! marker on the first line, an instructive phrase at the start of the
//! segment, and keyword density anywhere in the text. The first tier that
//! fires decides that category's score; categories then compete by score.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use super::types::{BlockType, Classification, MatchTier};

/// Score of a first-line marker match.
pub const MARKER_SCORE: u8 = 90;
/// Score of an opening phrase match.
pub const PHRASE_SCORE: u8 = 70;
/// Base score of a keyword match, before the per-keyword bonus.
pub const KEYWORD_BASE_SCORE: u8 = 50;
pub const KEYWORD_BONUS: u8 = 10;
pub const KEYWORD_SCORE_CAP: u8 = 65;
/// Categories scoring below this do not count as a match.
pub const MATCH_THRESHOLD: u8 = 30;
/// Confidence of the `Task` fallback.
pub const DEFAULT_CONFIDENCE: u8 = 20;

// =============================================================================
// CLASSIFIER TRAIT
// =============================================================================

/// Trait for prompt segment classifiers.
pub trait BlockClassifier: Send + Sync {
    /// Classify a segment. Always yields a type; ambiguity is expressed
    /// through a low confidence, never an error.
    fn classify(&self, segment: &str) -> Classification;

    /// Returns the name of this classifier for debugging.
    fn name(&self) -> &'static str;
}

// =============================================================================
// CATEGORY RULES
// =============================================================================

struct CategoryRules {
    block_type: BlockType,
    marker: Regex,
    phrase: Regex,
    keywords: &'static [&'static str],
}

impl CategoryRules {
    fn new(
        block_type: BlockType,
        marker_words: &[&str],
        letter: Option<char>,
        phrases: &[&str],
        keywords: &'static [&'static str],
    ) -> Self {
        Self {
            block_type,
            marker: marker_regex(marker_words, letter),
            phrase: phrase_regex(phrases),
            keywords,
        }
    }

    /// Score this category against a segment, if any tier fires.
    fn score(&self, first_line: &str, opening: &str, lower: &str) -> Option<(u8, MatchTier, String)> {
        if let Some(found) = self.marker.find(first_line) {
            return Some((MARKER_SCORE, MatchTier::Marker, found.as_str().trim().to_string()));
        }

        if let Some(found) = self.phrase.find(opening) {
            return Some((PHRASE_SCORE, MatchTier::Phrase, found.as_str().trim().to_string()));
        }

        let hits: Vec<&str> = self
            .keywords
            .iter()
            .copied()
            .filter(|keyword| lower.contains(keyword))
            .collect();
        if hits.is_empty() {
            return None;
        }
        let count = u8::try_from(hits.len()).unwrap_or(u8::MAX);
        let score = KEYWORD_BASE_SCORE
            .saturating_add(KEYWORD_BONUS.saturating_mul(count))
            .min(KEYWORD_SCORE_CAP);
        Some((score, MatchTier::Keyword, hits.join(", ")))
    }
}

fn marker_regex(words: &[&str], letter: Option<char>) -> Regex {
    let words = words.join("|");
    let mut pattern = format!(
        r"(?i)^[ \t]*(?:#{{1,6}}[ \t]*)?(?:\*\*|__)?[ \t]*(?:{words})[ \t]*(?:\*\*|__)?[ \t]*(?::|$)"
    );
    if let Some(letter) = letter {
        pattern.push_str(&format!(r"|(?i)^[ \t]*{letter}[ \t]*:"));
    }
    Regex::new(&pattern).expect("valid marker regex")
}

fn phrase_regex(phrases: &[&str]) -> Regex {
    let phrases = phrases
        .iter()
        .map(|phrase| phrase.replace(' ', r"\s+"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)^(?:[-*>][ \t]+)?(?:{phrases})\b")).expect("valid phrase regex")
}

static RULES: LazyLock<Vec<CategoryRules>> = LazyLock::new(|| {
    vec![
        CategoryRules::new(
            BlockType::Role,
            &["role", "persona", "identity", "character", "who you are", "system role"],
            Some('R'),
            &[
                "you are",
                "you're",
                "act as",
                "acting as",
                "imagine you are",
                "pretend to be",
                "pretend you are",
                "your role is",
                "you will act as",
                "you will be",
                "take on the role",
                "assume the role",
                "play the role",
            ],
            &[
                "expert",
                "assistant",
                "specialist",
                "persona",
                "role",
                "experienced",
                "consultant",
                "advisor",
                "mentor",
                "years of experience",
            ],
        ),
        CategoryRules::new(
            BlockType::Task,
            &[
                "tasks?",
                "objectives?",
                "goals?",
                "instructions?",
                "mission",
                "request",
                "what to do",
            ],
            Some('T'),
            &[
                "your task",
                "your job",
                "your goal",
                "your objective",
                "your mission",
                "please",
                "i want you to",
                "i need you to",
                "i'd like you to",
                "can you",
                "could you",
                "help me",
                "create",
                "generate",
                "summari[sz]e",
                "analy[sz]e",
                "explain",
                "translate",
                "draft",
                "rewrite",
            ],
            &[
                "task",
                "create",
                "write",
                "generate",
                "summarize",
                "analyze",
                "explain",
                "help",
                "build",
                "design",
                "review",
                "draft",
            ],
        ),
        CategoryRules::new(
            BlockType::Context,
            &[
                "context",
                "background",
                "situation",
                "scenario",
                "information",
                "details",
                "input",
                "setting",
                "about me",
                "about the user",
            ],
            Some('C'),
            &[
                "given",
                "for context",
                "the following",
                "here is",
                "here are",
                "here's",
                "consider",
                "assume",
                "i am",
                "i'm",
                "we are",
                "we're",
                "the user is",
                "currently",
            ],
            &[
                "context",
                "background",
                "information",
                "situation",
                "currently",
                "project",
                "company",
                "audience",
                "based on",
                "scenario",
                "customer",
            ],
        ),
        CategoryRules::new(
            BlockType::Output,
            &[
                "output",
                "output format",
                "format",
                "response format",
                "answer format",
                "expected output",
                "deliverables?",
                "results?",
                "response",
            ],
            Some('O'),
            &[
                "output",
                "the output",
                "your output",
                "return",
                "respond with",
                "respond in",
                "reply with",
                "reply in",
                "answer in",
                "answer with",
                "format your",
                "format the",
                "your response",
                "the response",
                "structure your",
                "use the following format",
            ],
            &[
                "output",
                "format",
                "json",
                "markdown",
                "table",
                "bullet",
                "response",
                "return",
                "structure",
                "sections",
                "headings",
                "list",
            ],
        ),
        CategoryRules::new(
            BlockType::Style,
            &[
                "style",
                "tone",
                "voice",
                "tone of voice",
                "writing style",
                "tone and style",
                "style and tone",
                "language",
                "register",
            ],
            None,
            &[
                "write in",
                r"use an? [\w-]+ (?:tone|voice|style)",
                "be concise",
                "be friendly",
                "be formal",
                "be casual",
                "keep it",
                "keep the tone",
                "keep your tone",
                "the tone",
                "your tone",
                "tone",
                "maintain an?",
                "adopt an?",
                "speak",
                "sound",
                "in the style of",
            ],
            &[
                "tone",
                "style",
                "formal",
                "casual",
                "friendly",
                "concise",
                "voice",
                "humor",
                "engaging",
                "conversational",
                "playful",
                "empathetic",
            ],
        ),
        CategoryRules::new(
            BlockType::Constraints,
            &[
                "constraints?",
                "rules",
                "limitations?",
                "limits",
                "requirements",
                "restrictions?",
                "guidelines",
                "guardrails",
                "boundaries",
                "dos and don'ts",
            ],
            None,
            &[
                "do not",
                "don't",
                "never",
                "always",
                "avoid",
                "you must",
                "must",
                "only",
                "make sure",
                "ensure",
                "limit",
                "under no circumstances",
                "you should not",
                "you shouldn't",
                "refrain from",
                "no more than",
                "at most",
                "at least",
            ],
            &[
                "must",
                "never",
                "don't",
                "do not",
                "avoid",
                "limit",
                "only",
                "maximum",
                "minimum",
                "no more than",
                "at least",
                "should not",
                "constraint",
                "restrict",
                "forbidden",
                "under no circumstances",
            ],
        ),
    ]
});

/// A short capitalized line shaped like a heading: `Heading:`, `**Heading**`
/// or `## Heading`.
static GENERIC_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[ \t]*(?:\*\*[A-Z][^*]{0,58}\*\*[ \t]*:?|__[A-Z][^_]{0,58}__[ \t]*:?|#{1,6}[ \t]+[A-Z].{0,58}|[A-Z][^:]{0,58}:)[ \t]*$",
    )
    .expect("valid heading regex")
});

/// Does this line start a new block during marker-based splitting?
#[must_use]
pub fn is_marker_line(line: &str) -> bool {
    RULES.iter().any(|rules| rules.marker.is_match(line)) || GENERIC_HEADING.is_match(line)
}

// =============================================================================
// HEURISTIC CLASSIFIER
// =============================================================================

/// Default pattern-based classifier.
///
/// Ties between categories go to the one declared first
/// (Role, Task, Context, Output, Style, Constraints). That order is an
/// enumeration artefact, not a semantic preference.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicClassifier;

impl BlockClassifier for HeuristicClassifier {
    fn classify(&self, segment: &str) -> Classification {
        let opening = segment.trim_start();
        let first_line = opening.lines().next().unwrap_or_default();
        let lower = segment.to_lowercase();

        let mut best: Option<(&BlockType, u8, MatchTier, String)> = None;
        for rules in RULES.iter() {
            let Some((score, tier, matched)) = rules.score(first_line, opening, &lower) else {
                continue;
            };
            trace!(target: "dissect", category = %rules.block_type, score, ?tier, "category scored");
            if score < MATCH_THRESHOLD {
                continue;
            }
            if best.as_ref().is_none_or(|(_, top, _, _)| score > *top) {
                best = Some((&rules.block_type, score, tier, matched));
            }
        }

        match best {
            Some((block_type, score, tier, matched)) => {
                Classification::new(block_type.clone(), score, tier).with_match(matched)
            }
            None => Classification::new(BlockType::Task, DEFAULT_CONFIDENCE, MatchTier::Default),
        }
    }

    fn name(&self) -> &'static str {
        "HeuristicClassifier"
    }
}

/// Classify a segment with the default heuristics.
#[must_use]
pub fn classify(segment: &str) -> Classification {
    HeuristicClassifier.classify(segment)
}

// =============================================================================
// TESTS
// =============================================================================
