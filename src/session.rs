//! Alignment session.
//!
//! A session is one complete run: the parsed alignment together with its
//! block layout. It is a plain value owned by the caller; changing the line
//! width produces a new layout computed from fresh running offsets.

use log::{info, warn};
use thiserror::Error;

use crate::fasta::{parse_alignment, ParseError};
use crate::layout::{layout_with, ConfigError, Layout, LineWidth};
use crate::lookup::{lookup_position, LookupError, PositionInfo};
use crate::model::Alignment;

/// Bundled demo alignment: five aligned PCR products with long end gaps.
pub const EXAMPLE_FASTA: &str = include_str!("example.fasta");

/// Errors that stop a run before any layout is produced.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Outcome of opening a session.
#[derive(Debug)]
pub enum SessionOutcome {
    /// The input held no sequence records; nothing was laid out.
    NoSequences,
    Ready(AlignmentSession),
}

/// Summary of one record, as shown when its id is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordInfo<'a> {
    pub id: &'a str,
    pub length: usize,
    pub header: &'a str,
}

#[derive(Debug, Clone)]
pub struct AlignmentSession {
    alignment: Alignment,
    layout: Layout,
}

impl AlignmentSession {
    /// Parses `text` and lays it out with a user-supplied `width`.
    ///
    /// The width is checked before the text is parsed.
    pub fn open(text: &str, width: &str) -> Result<SessionOutcome, SessionError> {
        let width = LineWidth::parse(width)?;
        Self::open_with(text, width)
    }

    pub fn open_with(text: &str, width: LineWidth) -> Result<SessionOutcome, SessionError> {
        let alignment = parse_alignment(text)?;
        if alignment.is_empty() {
            warn!("No sequences found in input");
            return Ok(SessionOutcome::NoSequences);
        }
        Ok(SessionOutcome::Ready(Self::from_alignment(alignment, width)))
    }

    /// Lays out an already validated, non-empty alignment.
    pub fn from_alignment(alignment: Alignment, width: LineWidth) -> Self {
        let layout = layout_with(&alignment, width);
        info!(
            "Session ready: {} sequences, {} columns, {} blocks",
            alignment.sequence_count(),
            alignment.alignment_length(),
            layout.block_count()
        );
        Self { alignment, layout }
    }

    /// The same alignment laid out at another width.
    pub fn with_width(&self, width: LineWidth) -> Self {
        Self::from_alignment(self.alignment.clone(), width)
    }

    pub fn alignment(&self) -> &Alignment {
        &self.alignment
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn width(&self) -> LineWidth {
        self.layout.width
    }

    pub fn lookup(
        &self,
        block: usize,
        row: usize,
        offset: usize,
    ) -> Result<PositionInfo, LookupError> {
        lookup_position(&self.layout, block, row, offset)
    }

    pub fn record_info(&self, row: usize) -> Option<RecordInfo<'_>> {
        self.alignment.get(row).map(|record| RecordInfo {
            id: &record.id,
            length: record.ungapped_len(),
            header: &record.header,
        })
    }
}
