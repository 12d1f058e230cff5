//! Gap handling.
//!
//! A gap (`-`) is either an *end gap*, lying before the first or after the
//! last residue of its sequence, or an *internal* gap flanked by residues.
//! Only internal gaps take part in consensus computation.

/// The gap character.
pub const GAP: u8 = b'-';

/// Returns `seq` with every gap removed, preserving order.
pub fn ungapped(seq: &str) -> String {
    seq.chars().filter(|&c| c != GAP as char).collect()
}

/// Counts the non-gap characters of `line`.
pub fn residue_count(line: &str) -> usize {
    line.bytes().filter(|&b| b != GAP).count()
}

/// Decides whether the character at `col` of a block row is an end gap.
///
/// `offset_before` is the number of residues of this sequence in all
/// earlier blocks and `total` the residue count of the whole sequence.
/// A column index past the end of `line` is never a gap.
pub fn is_end_gap(line: &str, col: usize, offset_before: usize, total: usize) -> bool {
    let bytes = line.as_bytes();
    if bytes.get(col) != Some(&GAP) {
        return false;
    }

    // Trailing: every residue has already been consumed.
    let consumed = offset_before + residue_count(&line[..col]);
    if consumed >= total {
        return true;
    }

    // Leading: the sequence has not started yet, neither in earlier blocks
    // nor in this row up to `col`.
    if offset_before == 0 {
        return match bytes.iter().position(|&b| b != GAP) {
            None => true,
            Some(first) => first > col,
        };
    }

    false
}

/// Per-row cache answering [`is_end_gap`] in constant time per column.
///
/// Holds prefix residue counts for one block row so the whole row can be
/// classified in a single pass.
#[derive(Debug, Clone)]
pub struct RowGaps<'a> {
    line: &'a [u8],
    /// `prefix[i]` = residues in `line[..i]`
    prefix: Vec<usize>,
    first_residue: Option<usize>,
    offset_before: usize,
    total: usize,
}

impl<'a> RowGaps<'a> {
    pub fn new(line: &'a str, offset_before: usize, total: usize) -> Self {
        let line = line.as_bytes();
        let mut prefix = Vec::with_capacity(line.len() + 1);
        let mut count = 0;
        prefix.push(0);
        for &b in line {
            if b != GAP {
                count += 1;
            }
            prefix.push(count);
        }
        Self {
            line,
            prefix,
            first_residue: line.iter().position(|&b| b != GAP),
            offset_before,
            total,
        }
    }

    /// Residues of this row strictly before `col`.
    pub fn residues_before(&self, col: usize) -> usize {
        self.prefix[col.min(self.line.len())]
    }

    /// Residues of the whole row.
    pub fn residues(&self) -> usize {
        self.residues_before(self.line.len())
    }

    pub fn is_end_gap(&self, col: usize) -> bool {
        if self.line.get(col) != Some(&GAP) {
            return false;
        }
        if self.offset_before + self.residues_before(col) >= self.total {
            return true;
        }
        self.offset_before == 0 && self.first_residue.map_or(true, |first| first > col)
    }
}
