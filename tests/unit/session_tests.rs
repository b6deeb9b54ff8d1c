use dissect::import::{BlockType, ConfidenceLevel, Dissector};
use dissect::library::{BlockLibrary, MemoryLibrary};
use dissect::session::script::{apply_script, parse_script};
use dissect::session::{BlockPatch, EditRejection, Session, SessionConfig, Stage};
use dissect::test_utils::fixtures::{MARKED_PROMPT, PARAGRAPH_PROMPT};

fn session(text: &str) -> Session {
    Session::from_text(text, &Dissector::new())
}

#[test]
fn review_workflow_end_to_end() {
    let mut session = session(PARAGRAPH_PROMPT);
    assert_eq!(session.stage(), Stage::Dissection);
    let ids: Vec<_> = session.blocks().iter().map(|b| b.id.clone()).collect();

    session
        .update(&ids[0], BlockPatch::label("Chef persona"))
        .unwrap();
    session.retype(&ids[2], BlockType::Style).unwrap();
    let merged = session.merge(&[ids[2].clone(), ids[3].clone()]).unwrap();
    assert_eq!(session.blocks().len(), 3);
    assert_eq!(session.block(&merged).unwrap().suggested_type, BlockType::Style);

    assert_eq!(session.advance(), Stage::Review);

    let mut library = MemoryLibrary::new();
    let receipt = session.commit(&mut library).unwrap();
    assert_eq!(receipt.entries.len(), 3);
    assert_eq!(receipt.library_ids.len(), 1);
    assert_eq!(library.items()[0].label, "Chef persona");
    assert_eq!(library.inline_entries().len(), 2);
}

#[test]
fn edits_are_accepted_in_every_stage() {
    let mut session = session(MARKED_PROMPT);
    session.set_stage(Stage::Complete);
    let id = session.blocks()[0].id.clone();
    assert!(session.retype(&id, BlockType::Context).is_ok());
}

#[test]
fn rejected_edits_leave_no_trace() {
    let mut session = session(MARKED_PROMPT);
    let before = session.blocks().to_vec();
    let first = session.blocks()[0].id.clone();

    assert!(matches!(
        session.split(&first, 10_000),
        Err(EditRejection::SplitOutOfRange { .. })
    ));
    assert_eq!(session.merge(&[]), Err(EditRejection::TooFewBlocks(0)));
    assert_eq!(session.undo(), Err(EditRejection::NothingToUndo));

    assert_eq!(session.blocks(), before.as_slice());
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.history().index(), 0);
}

#[test]
fn manual_flag_is_sticky_across_undo_of_later_edits() {
    let mut session = session(PARAGRAPH_PROMPT);
    let id = session.blocks()[1].id.clone();
    session.retype(&id, BlockType::Output).unwrap();
    session.update(&id, BlockPatch::content("Cook something.")).unwrap();
    session.undo().unwrap();

    let block = session.block(&id).unwrap();
    assert!(block.is_manual);
    assert_eq!(block.confidence_level, ConfidenceLevel::Manual);
    assert_eq!(block.confidence, 100);
}

#[test]
fn history_limit_bounds_undo_depth() {
    let config = SessionConfig {
        history_limit: Some(3),
    };
    let mut session = Session::with_config(PARAGRAPH_PROMPT, &config);
    session.dissect(&Dissector::new());
    for n in 0..5 {
        session.add(format!("Extra {n}"), BlockType::Context).unwrap();
    }
    assert_eq!(session.history().len(), 3);

    let mut undone = 0;
    while session.undo().is_ok() {
        undone += 1;
    }
    assert_eq!(undone, 2);
    assert_eq!(session.blocks().len(), 4 + 3);
}

#[test]
fn known_blocks_detects_library_duplicates() {
    let mut first = session(PARAGRAPH_PROMPT);
    let id = first.blocks()[3].id.clone();
    first.update(&id, BlockPatch::label("Ingredient cap")).unwrap();
    let mut library = MemoryLibrary::new();
    first.commit(&mut library).unwrap();

    let second = session(PARAGRAPH_PROMPT);
    let known = second.known_blocks(&library);
    assert_eq!(known.len(), 1);
    assert_eq!(known[0].0, second.blocks()[3].id);
    assert_eq!(known[0].1, "Ingredient cap");
    assert_eq!(library.find_labeled("unknown"), None);
}

#[test]
fn script_replays_against_current_indices() {
    let mut session = session(MARKED_PROMPT);
    let ops = parse_script(
        r#"[
            {"op": "delete", "index": 0},
            {"op": "retype", "index": 0, "type": "Role"},
            {"op": "split", "index": 1, "position": 9},
            {"op": "undo"},
            {"op": "merge", "indices": [0]}
        ]"#,
    )
    .unwrap();

    let outcomes = apply_script(&mut session, &ops);
    let applied: Vec<bool> = outcomes.iter().map(|o| o.applied).collect();
    assert_eq!(applied, vec![true, true, true, true, false]);
    assert_eq!(session.blocks().len(), 5);
    assert_eq!(session.blocks()[0].suggested_type, BlockType::Role);
    assert!(session.can_redo());
}
