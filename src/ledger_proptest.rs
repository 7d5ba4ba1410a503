//! Property-based tests for ledger parsing.
//!
//! These tests use proptest to generate ledgers of well-formed and
//! malformed blocks and verify that block-level invariants hold.

#[cfg(test)]
mod proptest_tests {
    use crate::ledger::parse;
    use proptest::prelude::*;

    /// Render one block in the layout used by release ledgers.
    fn render_block(cr_id: &str, inline_id: bool, files: &[String]) -> String {
        let mut block = String::from("Patch Type:\n  Customer Request\n");
        if inline_id {
            block.push_str(&format!("CR ID: {}\n", cr_id));
        } else {
            block.push_str(&format!("CR ID:\n\n  {}\n", cr_id));
        }
        block.push_str("Severity:\n  Major\nDescription:\n  Something\nAssociated Files:\n");
        for file in files {
            block.push_str(&format!("  {}\n", file));
        }
        block
    }

    fn block_strategy() -> impl Strategy<Value = (String, bool, Vec<String>)> {
        (
            "ALPS[0-9]{4,8}",
            any::<bool>(),
            prop::collection::vec("[a-z]{1,8}/[a-z]{1,8}\\.c", 0..4),
        )
    }

    proptest! {
        /// Property: N well-formed blocks parse into N records, in order
        #[test]
        fn well_formed_blocks_are_all_parsed(blocks in prop::collection::vec(block_strategy(), 0..12)) {
            let ledger: String = blocks
                .iter()
                .map(|(id, inline, files)| render_block(id, *inline, files))
                .collect();

            let records = parse(&ledger);
            prop_assert_eq!(records.len(), blocks.len());
            for (record, (id, _, files)) in records.iter().zip(&blocks) {
                prop_assert_eq!(&record.cr_id, id);
                prop_assert_eq!(&record.files, files);
            }
        }

        /// Property: a block without a CR ID never disturbs its neighbours
        #[test]
        fn blocks_without_cr_id_are_skipped(
            blocks in prop::collection::vec(block_strategy(), 1..8),
            hole in any::<prop::sample::Index>(),
        ) {
            let hole = hole.index(blocks.len() + 1);
            let mut ledger = String::new();
            for (i, (id, inline, files)) in blocks.iter().enumerate() {
                if i == hole {
                    ledger.push_str("Patch Type:\n  Orphan\nDescription:\n  no id here\n");
                }
                ledger.push_str(&render_block(id, *inline, files));
            }
            if hole == blocks.len() {
                ledger.push_str("Patch Type:\n  Orphan\nSeverity:\n  Low\n");
            }

            let ids: Vec<String> = parse(&ledger).into_iter().map(|r| r.cr_id).collect();
            let expected: Vec<String> = blocks.iter().map(|(id, _, _)| id.clone()).collect();
            prop_assert_eq!(ids, expected);
        }

        /// Property: parsing never panics on arbitrary input
        #[test]
        fn parse_never_panics(input in ".*") {
            let _ = parse(&input);
        }
    }
}
