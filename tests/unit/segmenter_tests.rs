use dissect::import::{BlockType, DissectionStats, Dissector, SegmenterConfig};
use dissect::test_utils::fixtures::{MARKED_PROMPT, PARAGRAPH_PROMPT, UNSTRUCTURED_PROMPT};

fn types(text: &str) -> Vec<BlockType> {
    Dissector::new()
        .dissect(text)
        .into_iter()
        .map(|block| block.suggested_type)
        .collect()
}

#[test]
fn marked_prompt_yields_one_block_per_heading() {
    assert_eq!(types(MARKED_PROMPT), vec![
        BlockType::Role,
        BlockType::Task,
        BlockType::Context,
        BlockType::Output,
        BlockType::Style,
        BlockType::Constraints,
    ]);
    let blocks = Dissector::new().dissect(MARKED_PROMPT);
    assert!(blocks.iter().all(|block| block.confidence == 90));
}

#[test]
fn paragraph_prompt_is_split_on_blank_lines() {
    assert_eq!(types(PARAGRAPH_PROMPT), vec![
        BlockType::Role,
        BlockType::Task,
        BlockType::Output,
        BlockType::Constraints,
    ]);
}

#[test]
fn unstructured_prompt_defaults_to_task() {
    let blocks = Dissector::new().dissect(UNSTRUCTURED_PROMPT);
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].suggested_type, BlockType::Task);
    assert_eq!(blocks[0].confidence, 20);
    assert_eq!(blocks[0].content, UNSTRUCTURED_PROMPT);
}

#[test]
fn positions_index_into_the_original_text() {
    let blocks = Dissector::new().dissect(MARKED_PROMPT);
    let chars: Vec<char> = MARKED_PROMPT.chars().collect();
    for block in &blocks {
        let start = block.start_position.unwrap();
        let end = block.end_position.unwrap();
        let slice: String = chars[start..end].iter().collect();
        assert_eq!(slice, block.content);
    }
    let mut previous_end = 0;
    for block in &blocks {
        assert!(block.start_position.unwrap() >= previous_end);
        previous_end = block.end_position.unwrap();
    }
}

#[test]
fn oversized_single_paragraph_is_packed_by_sentence() {
    let sentence = "This sentence is exactly long enough to matter here. ";
    let text = sentence.repeat(30);
    let config = SegmenterConfig {
        long_segment_chars: 200,
        ..SegmenterConfig::default()
    };

    let segments = Dissector::with_config(config.clone()).segment(&text);
    assert!(segments.len() > 1);
    assert!(segments.iter().all(|s| s.content.chars().count() <= 200));

    let disabled = SegmenterConfig {
        sentence_fallback: false,
        ..config
    };
    assert_eq!(Dissector::with_config(disabled).segment(&text).len(), 1);
}

#[test]
fn stats_summarize_a_dissection() {
    let blocks = Dissector::new().dissect(PARAGRAPH_PROMPT);
    let stats = DissectionStats::from_blocks(&blocks);
    assert_eq!(stats.total_blocks, 4);
    assert_eq!(stats.blocks_by_type.get("role"), Some(&1));
    assert_eq!(stats.medium_confidence_count, 4);
    assert_eq!(stats.manual_count, 0);
    assert!((stats.avg_confidence - 70.0).abs() < f32::EPSILON);
}
