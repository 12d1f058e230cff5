//! Block layout engine.
//!
//! Cuts the alignment into consecutive blocks of `width` columns and, for
//! every block, classifies each cell and reports the ungapped span each
//! sequence covers. Blocks are processed strictly in order: a sequence's
//! running offset after block `i` is the starting point of block `i + 1`.

use std::num::NonZeroUsize;
use std::ops::Range;
use std::str::FromStr;

use log::debug;
use thiserror::Error;

use crate::consensus::{CellClass, Consensus};
use crate::gaps::RowGaps;
use crate::model::Alignment;

/// Invalid layout configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid line width '{0}': not a number")]
    NotANumber(String),

    #[error("Invalid line width {0}: must be positive")]
    NonPositive(i64),
}

/// Number of alignment columns per block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineWidth(NonZeroUsize);

impl LineWidth {
    pub fn new(width: usize) -> Result<Self, ConfigError> {
        NonZeroUsize::new(width)
            .map(Self)
            .ok_or(ConfigError::NonPositive(0))
    }

    /// Parses a user-supplied width such as `"60"`.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let value: i64 = text
            .trim()
            .parse()
            .map_err(|_| ConfigError::NotANumber(text.to_string()))?;
        if value <= 0 {
            return Err(ConfigError::NonPositive(value));
        }
        usize::try_from(value)
            .map_err(|_| ConfigError::NotANumber(text.to_string()))
            .and_then(Self::new)
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl FromStr for LineWidth {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Default for LineWidth {
    fn default() -> Self {
        Self(NonZeroUsize::MIN.saturating_add(79))
    }
}

/// Residues consumed per sequence, indexed like the alignment's records.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OffsetSnapshot {
    ids: Vec<String>,
    offsets: Vec<usize>,
}

impl OffsetSnapshot {
    fn fresh(alignment: &Alignment) -> Self {
        Self {
            ids: alignment.sequences.iter().map(|r| r.id.clone()).collect(),
            offsets: vec![0; alignment.sequence_count()],
        }
    }

    /// Residues of record `row` in all earlier blocks.
    pub fn get(&self, row: usize) -> Option<usize> {
        self.offsets.get(row).copied()
    }

    /// Same as [`get`](Self::get) for the first record called `id`.
    pub fn get_by_id(&self, id: &str) -> Option<usize> {
        let row = self.ids.iter().position(|known| known == id)?;
        self.get(row)
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

/// 1-based ungapped positions covered by one row of a block.
///
/// A row without residues is reported as `0..=0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowSpan {
    pub start: usize,
    pub end: usize,
}

impl RowSpan {
    pub fn is_empty(&self) -> bool {
        self.start == 0
    }
}

/// Composite (row, column) address of a cell within a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub row: usize,
    pub col: usize,
}

/// One sequence's slice of a block.
#[derive(Debug, Clone)]
pub struct BlockRow {
    /// Aligned characters of this block, gaps included
    pub text: String,
    pub span: RowSpan,
    /// One class per character of `text`
    pub cells: Vec<CellClass>,
}

impl BlockRow {
    pub fn char_at(&self, col: usize) -> Option<u8> {
        self.text.as_bytes().get(col).copied()
    }
}

/// A fixed-width column range of the alignment.
#[derive(Debug, Clone)]
pub struct Block {
    pub index: usize,
    /// 0-based alignment columns
    pub columns: Range<usize>,
    pub rows: Vec<BlockRow>,
    /// One consensus per column
    pub consensus: Vec<Consensus>,
    /// Running offsets as they stood before this block
    pub offsets_before: OffsetSnapshot,
}

impl Block {
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// 1-based first alignment column.
    pub fn start_label(&self) -> usize {
        self.columns.start + 1
    }

    /// 1-based last alignment column.
    pub fn end_label(&self) -> usize {
        self.columns.end
    }

    pub fn cell(&self, key: CellKey) -> Option<CellClass> {
        self.rows.get(key.row)?.cells.get(key.col).copied()
    }
}

/// Result of laying out a whole alignment.
#[derive(Debug, Clone)]
pub struct Layout {
    pub width: LineWidth,
    pub blocks: Vec<Block>,
    /// Record ids, in row order
    pub ids: Vec<String>,
    /// Ungapped length of each record
    pub totals: Vec<usize>,
}

impl Layout {
    pub fn block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn row_count(&self) -> usize {
        self.ids.len()
    }

    /// Width of the widest id, for label padding.
    pub fn label_width(&self) -> usize {
        self.ids.iter().map(|id| id.len()).max().unwrap_or(0)
    }

    /// Digits of the longest ungapped length, for position padding.
    pub fn position_width(&self) -> usize {
        self.totals
            .iter()
            .map(|t| t.to_string().len())
            .max()
            .unwrap_or(1)
    }

    /// Block index and in-block offset of a 0-based alignment column.
    pub fn locate_column(&self, column: usize) -> Option<(usize, usize)> {
        let length = self.blocks.last().map_or(0, |b| b.columns.end);
        let width = self.width.get();
        (column < length).then_some((column / width, column % width))
    }
}

/// Lays out `alignment` in blocks of `width` columns.
///
/// Fails with [`ConfigError::NonPositive`] when `width` is zero.
pub fn layout_blocks(alignment: &Alignment, width: usize) -> Result<Layout, ConfigError> {
    let width = LineWidth::new(width)?;
    Ok(layout_with(alignment, width))
}

/// Infallible form of [`layout_blocks`] for an already validated width.
pub fn layout_with(alignment: &Alignment, width: LineWidth) -> Layout {
    let n = width.get();
    let length = alignment.alignment_length();
    let totals: Vec<usize> = alignment.sequences.iter().map(|r| r.ungapped_len()).collect();

    let mut offsets = OffsetSnapshot::fresh(alignment);
    let mut blocks = Vec::with_capacity(length.div_ceil(n));

    for (index, start) in (0..length).step_by(n).enumerate() {
        let columns = start..(start + n).min(length);
        let block = layout_block(alignment, index, columns, &totals, &mut offsets);
        blocks.push(block);
    }

    debug!(
        "Laid out {} sequences x {} columns in {} blocks of width {}",
        alignment.sequence_count(),
        length,
        blocks.len(),
        n
    );

    Layout {
        width,
        blocks,
        ids: offsets.ids,
        totals,
    }
}

/// Builds one block and advances `offsets` past it.
fn layout_block(
    alignment: &Alignment,
    index: usize,
    columns: Range<usize>,
    totals: &[usize],
    offsets: &mut OffsetSnapshot,
) -> Block {
    let offsets_before = offsets.clone();
    let width = columns.len();

    let lines: Vec<&str> = alignment
        .sequences
        .iter()
        .map(|record| &record.seq[columns.clone()])
        .collect();
    let gaps: Vec<RowGaps> = lines
        .iter()
        .enumerate()
        .map(|(row, line)| RowGaps::new(line, offsets_before.offsets[row], totals[row]))
        .collect();

    let mut cells = vec![Vec::with_capacity(width); lines.len()];
    let mut consensus = Vec::with_capacity(width);
    for col in 0..width {
        let column: Vec<(u8, bool)> = lines
            .iter()
            .zip(&gaps)
            .map(|(line, row)| (line.as_bytes()[col], row.is_end_gap(col)))
            .collect();
        let cons = Consensus::from_column(column.iter().copied());
        for (row, &(c, end_gap)) in column.iter().enumerate() {
            cells[row].push(cons.classify(c, end_gap));
        }
        consensus.push(cons);
    }

    let rows = lines
        .iter()
        .zip(gaps)
        .zip(cells)
        .enumerate()
        .map(|(row, ((line, row_gaps), cells))| {
            let residues = row_gaps.residues();
            let span = advance(&mut offsets.offsets[row], residues);
            BlockRow {
                text: line.to_string(),
                span,
                cells,
            }
        })
        .collect();

    Block {
        index,
        columns,
        rows,
        consensus,
        offsets_before,
    }
}

/// Computes a row's span and moves the running offset past its residues.
fn advance(offset: &mut usize, residues: usize) -> RowSpan {
    if residues == 0 {
        return RowSpan::default();
    }
    let start = *offset + 1;
    *offset += residues;
    RowSpan {
        start,
        end: start + residues - 1,
    }
}
