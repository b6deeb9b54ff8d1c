use std::collections::HashSet;

use proptest::prelude::*;

use dissect::import::{BlockId, BlockType, Dissector};
use dissect::session::script::{EditOp, apply_script};
use dissect::session::{BlockPatch, Session};
use dissect::test_utils::fixtures::{MARKED_PROMPT, PARAGRAPH_PROMPT};

fn block_type() -> impl Strategy<Value = BlockType> {
    prop::sample::select(BlockType::categories().to_vec())
}

/// Structural edits with indices that may or may not be valid.
fn edit_op() -> impl Strategy<Value = EditOp> {
    prop_oneof![
        (0usize..8, "[a-z ]{0,20}").prop_map(|(index, content)| EditOp::Update {
            index,
            content: Some(content),
            label: None,
            block_type: None,
        }),
        (0usize..8, "[A-Z][a-z]{0,8}").prop_map(|(index, label)| EditOp::Update {
            index,
            content: None,
            label: Some(label),
            block_type: None,
        }),
        (0usize..8, 0usize..80).prop_map(|(index, position)| EditOp::Split { index, position }),
        prop::collection::vec(0usize..8, 0..4).prop_map(|indices| EditOp::Merge { indices }),
        (0usize..8).prop_map(|index| EditOp::Delete { index }),
        ("[a-z ]{0,20}", block_type()).prop_map(|(content, block_type)| EditOp::Add {
            content,
            block_type,
        }),
        (0usize..8, block_type()).prop_map(|(index, block_type)| EditOp::Retype { index, block_type }),
    ]
}

fn edit_or_history_op() -> impl Strategy<Value = EditOp> {
    prop_oneof![
        4 => edit_op(),
        1 => Just(EditOp::Undo),
        1 => Just(EditOp::Redo),
    ]
}

fn session() -> Session {
    Session::from_text(MARKED_PROMPT, &Dissector::new())
}

proptest! {
    #[test]
    fn history_moves_one_step_per_applied_edit(ops in prop::collection::vec(edit_op(), 0..30)) {
        let mut session = session();
        for op in ops {
            let before = session.history().index();
            let outcome = apply_script(&mut session, std::slice::from_ref(&op)).remove(0);
            let expected = if outcome.applied { before + 1 } else { before };
            prop_assert_eq!(session.history().index(), expected);
            prop_assert_eq!(session.history().len(), session.history().index() + 1);
            prop_assert_eq!(session.history().current(), session.blocks());
        }
    }

    #[test]
    fn undo_restores_the_previous_state(ops in prop::collection::vec(edit_or_history_op(), 0..30)) {
        let mut session = session();
        for op in ops {
            let before = session.blocks().to_vec();
            let outcome = apply_script(&mut session, std::slice::from_ref(&op)).remove(0);
            let is_edit = !matches!(op, EditOp::Undo | EditOp::Redo);
            if outcome.applied && is_edit {
                session.undo().unwrap();
                prop_assert_eq!(session.blocks(), before.as_slice());
                session.redo().unwrap();
            } else if !outcome.applied {
                prop_assert_eq!(session.blocks(), before.as_slice());
            }
        }
    }

    #[test]
    fn manual_blocks_stay_manual(ops in prop::collection::vec(edit_op(), 0..30)) {
        let mut session = session();
        let mut manual: HashSet<BlockId> = HashSet::new();
        for op in ops {
            apply_script(&mut session, std::slice::from_ref(&op));
            for block in session.blocks() {
                if manual.contains(&block.id) {
                    prop_assert!(block.is_manual);
                }
                if block.is_manual {
                    manual.insert(block.id.clone());
                }
            }
        }
    }

    #[test]
    fn block_ids_stay_unique(ops in prop::collection::vec(edit_or_history_op(), 0..30)) {
        let mut session = session();
        apply_script(&mut session, &ops);
        let ids: HashSet<&BlockId> = session.blocks().iter().map(|b| &b.id).collect();
        prop_assert_eq!(ids.len(), session.blocks().len());
    }

    #[test]
    fn merge_of_split_rejoins_trimmed_halves(index in 0usize..4, position in 1usize..60) {
        let mut session = Session::from_text(PARAGRAPH_PROMPT, &Dissector::new());
        let block = session.blocks()[index].clone();
        let chars: Vec<char> = block.content.chars().collect();
        prop_assume!(position < chars.len());
        let head: String = chars[..position].iter().collect();
        let tail: String = chars[position..].iter().collect();
        prop_assume!(!head.trim().is_empty() && !tail.trim().is_empty());

        let (first, second) = session.split(&block.id, position).unwrap();
        let merged = session.merge(&[first, second]).unwrap();
        let content = &session.block(&merged).unwrap().content;
        prop_assert_eq!(content, &format!("{}\n\n{}", head.trim(), tail.trim()));
        prop_assert_eq!(session.blocks().len(), 4);
    }

    #[test]
    fn update_with_label_only_never_touches_content(label in "[A-Za-z ]{1,20}") {
        let mut session = session();
        let id = session.blocks()[0].id.clone();
        let content = session.blocks()[0].content.clone();
        session.update(&id, BlockPatch::label(label)).unwrap();
        prop_assert_eq!(&session.block(&id).unwrap().content, &content);
        prop_assert!(!session.block(&id).unwrap().is_manual);
    }
}
