use dissect::import::{
    BlockClassifier, BlockType, Classification, ConfidenceLevel, Dissector, HeuristicClassifier,
    MatchTier, SegmenterConfig, classify,
};
use dissect::test_utils::{TestCase, run_table_tests};

#[test]
fn classifier_scores_by_tier() -> Result<(), String> {
    let cases = vec![
        TestCase::new("markdown heading", "## Role\nA pirate.", (BlockType::Role, 90)),
        TestCase::new("bold marker", "**Output Format:** JSON please", (BlockType::Output, 90)),
        TestCase::new("letter marker", "T: write a haiku", (BlockType::Task, 90)),
        TestCase::new("role phrase", "You are a helpful bot.", (BlockType::Role, 70)),
        TestCase::new("task phrase", "Please summarize this article.", (BlockType::Task, 70)),
        TestCase::new("context phrase", "Given the data below, think.", (BlockType::Context, 70)),
        TestCase::new("output phrase", "Respond with a haiku.", (BlockType::Output, 70)),
        TestCase::new("constraint phrase", "Never mention prices.", (BlockType::Constraints, 70)),
        TestCase::new("no signal", "lorem ipsum dolor", (BlockType::Task, 20)),
    ];

    run_table_tests(cases, |text| {
        let result = classify(text);
        (result.block_type, result.confidence)
    })
}

#[test]
fn keyword_scores_are_capped() {
    let one = classify("The mood here should feel casual.");
    assert_eq!(one.block_type, BlockType::Style);
    assert_eq!(one.tier, MatchTier::Keyword);
    assert_eq!(one.confidence, 60);

    let many = classify("The mood here should feel casual, playful and engaging.");
    assert_eq!(many.block_type, BlockType::Style);
    assert_eq!(many.confidence, 65);
}

#[test]
fn confidence_levels_follow_scores() {
    assert_eq!(classify("# Task\nDo it.").level(), ConfidenceLevel::High);
    assert_eq!(classify("You are kind.").level(), ConfidenceLevel::Medium);
    assert_eq!(classify("xyzzy").level(), ConfidenceLevel::Low);
}

#[test]
fn classification_always_produces_a_category() {
    for text in ["", "   ", "???", "12345", "日本語のテキスト"] {
        let result = classify(text);
        assert!(BlockType::categories().contains(&result.block_type), "{text:?}");
        assert!(result.confidence <= 100);
    }
}

struct AlwaysStyle;

impl BlockClassifier for AlwaysStyle {
    fn classify(&self, _segment: &str) -> Classification {
        Classification::new(BlockType::Style, 42, MatchTier::Default)
    }

    fn name(&self) -> &'static str {
        "always-style"
    }
}

#[test]
fn dissector_uses_injected_classifier() {
    let dissector = Dissector::with_classifier(Box::new(AlwaysStyle), SegmenterConfig::default());
    assert_eq!(dissector.classifier().name(), "always-style");

    let blocks = dissector.dissect("# Role\nA pirate.\n\n# Task\nSing.");
    assert_eq!(blocks.len(), 2);
    assert!(blocks.iter().all(|block| block.suggested_type == BlockType::Style));
    assert!(blocks.iter().all(|block| block.confidence == 42));
    assert!(blocks.iter().all(|block| block.confidence_level == ConfidenceLevel::Low));
}

#[test]
fn heuristic_classifier_name() {
    assert_eq!(HeuristicClassifier.name(), "HeuristicClassifier");
}
