use proptest::prelude::*;

use dissect::import::{BlockType, Dissector, SegmenterConfig, classify};

fn prompt_line() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("# Role".to_string()),
        Just("**Task:**".to_string()),
        Just("Constraints:".to_string()),
        Just("You are a careful reviewer.".to_string()),
        Just("Never reveal the answer.".to_string()),
        Just("Respond with JSON. Keep it short! Why? Because.".to_string()),
        "[a-zA-Z ,.!?]{0,120}",
        "\\PC{0,40}",
    ]
}

fn prompt() -> impl Strategy<Value = String> {
    prop::collection::vec(prompt_line(), 0..24).prop_map(|lines| lines.join("\n"))
}

fn squeeze(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

proptest! {
    #[test]
    fn classification_is_deterministic(text in "\\PC{0,200}") {
        prop_assert_eq!(classify(&text), classify(&text));
    }

    #[test]
    fn classification_is_total(text in "\\PC{0,200}") {
        let result = classify(&text);
        prop_assert!(BlockType::categories().contains(&result.block_type));
        prop_assert!(result.confidence <= 100);
        prop_assert!(result.confidence >= 20);
    }

    #[test]
    fn segments_cover_all_content_in_order(text in prompt(), long in 40usize..600) {
        let config = SegmenterConfig {
            long_segment_chars: long,
            ..SegmenterConfig::default()
        };
        let segments = Dissector::with_config(config).segment(&text);

        let joined: String = segments.iter().map(|s| s.content.as_str()).collect();
        prop_assert_eq!(squeeze(&joined), squeeze(&text));

        let chars: Vec<char> = text.chars().collect();
        let mut previous_end = 0;
        for segment in &segments {
            prop_assert!(!segment.content.trim().is_empty());
            prop_assert_eq!(segment.content.trim(), segment.content.as_str());
            prop_assert!(segment.start >= previous_end);
            let slice: String = chars[segment.start..segment.end].iter().collect();
            prop_assert_eq!(&slice, &segment.content);
            previous_end = segment.end;
        }
    }

    #[test]
    fn dissection_is_deterministic_apart_from_ids(text in prompt()) {
        let dissector = Dissector::new();
        let strip = |text: &str| {
            dissector
                .dissect(text)
                .into_iter()
                .map(|b| (b.content, b.suggested_type, b.confidence, b.start_position))
                .collect::<Vec<_>>()
        };
        prop_assert_eq!(strip(&text), strip(&text));
    }
}
