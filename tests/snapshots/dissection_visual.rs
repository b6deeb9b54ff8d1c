use insta::assert_snapshot;

use dissect::import::{Dissector, classify};
use dissect::session::Session;
use dissect::test_utils::fixtures::{MARKED_PROMPT, PARAGRAPH_PROMPT};

fn summarize(text: &str) -> String {
    Dissector::new()
        .dissect(text)
        .iter()
        .map(|block| {
            format!(
                "{} {} {} | {}",
                block.suggested_type,
                block.confidence,
                block.confidence_level,
                block.content.lines().next().unwrap_or_default()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// =============================================================================
// Dissection Visual Tests
// =============================================================================

#[test]
fn visual_marked_prompt() {
    assert_snapshot!(summarize(MARKED_PROMPT), @r"
    role 90 high | # Role
    task 90 high | # Task
    context 90 high | # Context
    output 90 high | # Output Format
    style 90 high | # Tone
    constraints 90 high | # Constraints
    ");
}

#[test]
fn visual_paragraph_prompt() {
    assert_snapshot!(summarize(PARAGRAPH_PROMPT), @r"
    role 70 medium | You are an expert chef who specializes in quick weeknight dinners.
    task 70 medium | Your task is to create a recipe that uses only pantry staples.
    output 70 medium | Respond with a numbered list of steps.
    constraints 70 medium | Never use more than ten ingredients.
    ");
}

#[test]
fn visual_classification_explanations() {
    let rendered = [
        "## Role\nA pirate.",
        "Please summarize this.",
        "The mood should feel casual.",
        "xyzzy",
    ]
    .iter()
    .map(|text| {
        let result = classify(text);
        format!(
            "{} {} {} [{}]",
            result.block_type,
            result.confidence,
            result.tier.as_str(),
            result.matched.as_deref().unwrap_or("-")
        )
    })
    .collect::<Vec<_>>()
    .join("\n");

    assert_snapshot!(rendered, @r"
    role 90 marker [## Role]
    task 70 phrase [Please]
    style 60 keyword [casual]
    task 20 default [-]
    ");
}

#[test]
fn visual_edited_session() {
    let mut session = Session::from_text(PARAGRAPH_PROMPT, &Dissector::new());
    let ids: Vec<_> = session.blocks().iter().map(|b| b.id.clone()).collect();
    session.merge(&[ids[2].clone(), ids[3].clone()]).unwrap();
    session.split(&ids[0], 27).unwrap();

    let rendered = session
        .blocks()
        .iter()
        .map(|block| {
            format!(
                "{} manual={} | {}",
                block.suggested_type,
                block.is_manual,
                block.content.replace('\n', "\\n")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    assert_snapshot!(rendered, @r"
    role manual=true | You are an expert chef who
    role manual=true | specializes in quick weeknight dinners.
    task manual=false | Your task is to create a recipe that uses only pantry staples.
    output manual=true | Respond with a numbered list of steps.\n\nNever use more than ten ingredients.
    ");
}
