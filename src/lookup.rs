//! Position queries against a finished layout.
//!
//! Given a cell addressed as (block, row, in-row offset), reports its
//! alignment column and its 1-based position within the ungapped sequence.
//! Lookups only read the per-block offset snapshots.

use thiserror::Error;

use crate::consensus::CellClass;
use crate::layout::Layout;

/// A lookup addressed a cell that does not exist.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("{what} index {index} out of range (0..{len})")]
    OutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },
}

/// Everything known about one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionInfo {
    /// 1-based alignment column
    pub alignment_column: usize,
    /// 1-based ungapped position; 0 before the first residue, one past
    /// the last residue for trailing gaps
    pub sequence_position: usize,
    pub character: char,
    pub class: CellClass,
}

fn check(what: &'static str, index: usize, len: usize) -> Result<(), LookupError> {
    if index < len {
        Ok(())
    } else {
        Err(LookupError::OutOfRange { what, index, len })
    }
}

/// Looks up the cell at `offset` within row `row` of block `block`.
pub fn lookup_position(
    layout: &Layout,
    block: usize,
    row: usize,
    offset: usize,
) -> Result<PositionInfo, LookupError> {
    check("block", block, layout.block_count())?;
    let blk = &layout.blocks[block];
    check("row", row, blk.rows.len())?;
    let line = &blk.rows[row];
    check("offset", offset, line.text.len())?;

    let before = blk.offsets_before.get(row).unwrap_or(0);
    let total = layout.totals[row];
    let class = line.cells[offset];

    let mut sequence_position = before + crate::gaps::residue_count(&line.text[..=offset]);
    if sequence_position == total && class.is_end_gap() {
        sequence_position += 1;
    }

    Ok(PositionInfo {
        alignment_column: block * layout.width.get() + offset + 1,
        sequence_position,
        character: char::from(line.text.as_bytes()[offset]),
        class,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::layout_blocks;
    use crate::model::{Alignment, SequenceRecord};

    fn layout(seqs: &[&str], width: usize) -> Layout {
        let records = seqs
            .iter()
            .enumerate()
            .map(|(i, seq)| SequenceRecord::new(format!(">s{i}"), format!("s{i}"), *seq))
            .collect();
        layout_blocks(&Alignment::new(records).unwrap(), width).unwrap()
    }

    #[test]
    fn test_residue_positions() {
        let layout = layout(&["AC-GT", "ACGGT"], 3);
        let info = lookup_position(&layout, 0, 0, 1).unwrap();
        assert_eq!(info.alignment_column, 2);
        assert_eq!(info.sequence_position, 2);
        assert_eq!(info.character, 'C');

        // Internal gap shares the position of the residue before it
        let info = lookup_position(&layout, 0, 0, 2).unwrap();
        assert_eq!(info.sequence_position, 2);
        assert_eq!(info.character, '-');

        let info = lookup_position(&layout, 1, 0, 1).unwrap();
        assert_eq!(info.alignment_column, 5);
        assert_eq!(info.sequence_position, 4);
    }

    #[test]
    fn test_trailing_gap_is_one_past_end() {
        let layout = layout(&["ACG--", "ACGTA"], 2);
        let info = lookup_position(&layout, 1, 0, 1).unwrap();
        assert_eq!(info.class, CellClass::EndGap);
        assert_eq!(info.sequence_position, 4);

        let info = lookup_position(&layout, 2, 0, 0).unwrap();
        assert_eq!(info.alignment_column, 5);
        assert_eq!(info.sequence_position, 4);
    }

    #[test]
    fn test_leading_gap_is_zero() {
        let layout = layout(&["--AC", "GGAC"], 4);
        let info = lookup_position(&layout, 0, 0, 1).unwrap();
        assert_eq!(info.class, CellClass::EndGap);
        assert_eq!(info.sequence_position, 0);
    }

    #[test]
    fn test_out_of_range() {
        let layout = layout(&["ACGTA", "ACGTA"], 2);
        assert_eq!(
            lookup_position(&layout, 3, 0, 0),
            Err(LookupError::OutOfRange { what: "block", index: 3, len: 3 })
        );
        assert_eq!(
            lookup_position(&layout, 0, 2, 0),
            Err(LookupError::OutOfRange { what: "row", index: 2, len: 2 })
        );
        // Last block is one column wide
        assert_eq!(
            lookup_position(&layout, 2, 0, 1),
            Err(LookupError::OutOfRange { what: "offset", index: 1, len: 1 })
        );
    }

    #[test]
    fn test_lookup_leaves_snapshots_untouched() {
        let layout = layout(&["A-CGT", "AACGT"], 2);
        let before = layout.blocks[1].offsets_before.clone();
        for offset in 0..2 {
            lookup_position(&layout, 1, 0, offset).unwrap();
        }
        assert_eq!(layout.blocks[1].offsets_before, before);
    }
}
