use proptest::prelude::*;

use msablocks::consensus::CellClass;
use msablocks::gaps::ungapped;
use msablocks::layout::{layout_blocks, Layout};
use msablocks::lookup::lookup_position;
use msablocks::model::{Alignment, SequenceRecord};

/// Equal-length rows over `ACGT-`.
fn rows() -> impl Strategy<Value = Vec<String>> {
    (1usize..6, 1usize..40).prop_flat_map(|(n, len)| {
        prop::collection::vec(
            prop::collection::vec(prop::sample::select(vec!['A', 'C', 'G', 'T', '-']), len)
                .prop_map(|chars| chars.into_iter().collect::<String>()),
            n,
        )
    })
}

fn alignment(rows: &[String]) -> Alignment {
    let records = rows
        .iter()
        .enumerate()
        .map(|(i, seq)| SequenceRecord::new(format!(">r{i}"), format!("r{i}"), seq.clone()))
        .collect();
    Alignment::new(records).unwrap()
}

fn sorted_members(layout: &Layout) -> Vec<Vec<u8>> {
    layout
        .blocks
        .iter()
        .flat_map(|block| &block.consensus)
        .map(|cons| {
            let mut members = cons.members().to_vec();
            members.sort_unstable();
            members
        })
        .collect()
}

proptest! {
    #[test]
    fn ungap_is_idempotent(s in "[ACGT-]{0,50}") {
        let once = ungapped(&s);
        prop_assert_eq!(ungapped(&once), once.clone());
        prop_assert!(!once.contains('-'));
    }

    #[test]
    fn blocks_tile_every_row(rows in rows(), width in 1usize..12) {
        let layout = layout_blocks(&alignment(&rows), width).unwrap();
        let len = rows[0].len();

        let mut next = 0;
        for block in &layout.blocks {
            prop_assert_eq!(block.columns.start, next);
            prop_assert!(block.width() >= 1 && block.width() <= width);
            next = block.columns.end;
        }
        prop_assert_eq!(next, len);

        for (r, seq) in rows.iter().enumerate() {
            let joined: String = layout.blocks.iter().map(|b| b.rows[r].text.as_str()).collect();
            prop_assert_eq!(&joined, seq);
        }
    }

    #[test]
    fn last_span_ends_at_sequence_length(rows in rows(), width in 1usize..12) {
        let layout = layout_blocks(&alignment(&rows), width).unwrap();
        for (r, seq) in rows.iter().enumerate() {
            let total = ungapped(seq).len();
            let last = layout
                .blocks
                .iter()
                .map(|b| b.rows[r].span)
                .filter(|span| !span.is_empty())
                .last();
            match last {
                Some(span) => prop_assert_eq!(span.end, total),
                None => prop_assert_eq!(total, 0),
            }
        }
    }

    #[test]
    fn consensus_ignores_row_order(rows in rows(), width in 1usize..12) {
        let forward = layout_blocks(&alignment(&rows), width).unwrap();
        let mut reversed_rows = rows.clone();
        reversed_rows.reverse();
        let reversed = layout_blocks(&alignment(&reversed_rows), width).unwrap();
        prop_assert_eq!(sorted_members(&forward), sorted_members(&reversed));
    }

    #[test]
    fn leading_gaps_are_end_gaps(rows in rows(), width in 1usize..12) {
        let layout = layout_blocks(&alignment(&rows), width).unwrap();
        for (r, seq) in rows.iter().enumerate() {
            let lead = seq.bytes().take_while(|&b| b == b'-').count();
            for col in 0..lead {
                let (block, offset) = layout.locate_column(col).unwrap();
                prop_assert_eq!(layout.blocks[block].rows[r].cells[offset], CellClass::EndGap);
            }
        }
    }

    #[test]
    fn residue_positions_count_residues(rows in rows(), width in 1usize..12) {
        let layout = layout_blocks(&alignment(&rows), width).unwrap();
        for (r, seq) in rows.iter().enumerate() {
            for (col, c) in seq.bytes().enumerate() {
                let (block, offset) = layout.locate_column(col).unwrap();
                let info = lookup_position(&layout, block, r, offset).unwrap();
                prop_assert_eq!(info.alignment_column, col + 1);
                prop_assert_eq!(info.character as u8, c);
                if c != b'-' {
                    prop_assert_eq!(info.sequence_position, ungapped(&seq[..=col]).len());
                    prop_assert!(info.class != CellClass::EndGap);
                }
            }
        }
    }
}
