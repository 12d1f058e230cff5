//! Data model for the alignment viewer.
//!
//! This module contains all data structures for representing:
//! - Sequence records and validated alignments
//! - The interactive viewer's cursor, viewport and mode

use thiserror::Error;

use crate::gaps::ungapped;
use crate::layout::{Block, LineWidth};
use crate::lookup::PositionInfo;
use crate::session::{AlignmentSession, RecordInfo};

/// One FASTA record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    /// Raw header line, including the leading '>'
    pub header: String,
    /// First whitespace-delimited token of the header
    pub id: String,
    /// Aligned sequence, gaps included
    pub seq: String,
    /// `seq` without gaps
    pub ungapped: String,
}

impl SequenceRecord {
    /// Creates a record; the ungapped form is derived from `seq`.
    pub fn new(
        header: impl Into<String>,
        id: impl Into<String>,
        seq: impl Into<String>,
    ) -> Self {
        let seq = seq.into();
        Self {
            header: header.into(),
            id: id.into(),
            ungapped: ungapped(&seq),
            seq,
        }
    }

    /// Aligned length, gaps included.
    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    /// Number of residues.
    pub fn ungapped_len(&self) -> usize {
        self.ungapped.len()
    }
}

/// Alignment construction errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlignmentError {
    #[error("Sequence '{id}' has length {found}, expected {expected}: input is not aligned")]
    LengthMismatch {
        id: String,
        expected: usize,
        found: usize,
    },
    #[error("Sequence '{id}' contains non-ASCII characters")]
    NonAscii { id: String },
}

/// An ordered set of records sharing one aligned length.
#[derive(Debug, Clone, Default)]
pub struct Alignment {
    pub sequences: Vec<SequenceRecord>,
    length: usize,
}

impl Alignment {
    /// Builds an alignment, rejecting records of unequal length.
    ///
    /// Columns are byte offsets, so sequences must be ASCII.
    pub fn new(sequences: Vec<SequenceRecord>) -> Result<Self, AlignmentError> {
        if let Some(bad) = sequences.iter().find(|s| !s.seq.is_ascii()) {
            return Err(AlignmentError::NonAscii { id: bad.id.clone() });
        }
        let length = sequences.first().map_or(0, SequenceRecord::len);
        if let Some(bad) = sequences.iter().find(|s| s.len() != length) {
            return Err(AlignmentError::LengthMismatch {
                id: bad.id.clone(),
                expected: length,
                found: bad.len(),
            });
        }
        Ok(Self { sequences, length })
    }

    /// Returns the number of sequences.
    pub fn sequence_count(&self) -> usize {
        self.sequences.len()
    }

    /// Number of alignment columns.
    pub fn alignment_length(&self) -> usize {
        self.length
    }

    /// Gets a sequence by index.
    pub fn get(&self, index: usize) -> Option<&SequenceRecord> {
        self.sequences.get(index)
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

/// The cursor, addressed the way lookups are: block, row, offset in row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub block: usize,
    pub row: usize,
    pub offset: usize,
}

impl Cursor {
    pub fn at(block: usize, row: usize, offset: usize) -> Self {
        Self { block, row, offset }
    }
}

/// Application mode for handling different input states.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Command input mode (after pressing ':')
    Command(String),
}

/// The complete viewer state.
#[derive(Debug)]
pub struct AppState {
    pub session: AlignmentSession,
    pub cursor: Cursor,
    /// First screen line of the block view that is visible
    pub first_line: usize,
    pub visible_lines: usize,
    pub mode: AppMode,
    pub should_quit: bool,
    pub status_message: Option<String>,
    /// Name shown in the title bar
    pub source_name: String,
}

impl AppState {
    pub fn new(session: AlignmentSession, source_name: String) -> Self {
        Self {
            session,
            cursor: Cursor::default(),
            first_line: 0,
            visible_lines: 0,
            mode: AppMode::Normal,
            should_quit: false,
            status_message: None,
            source_name,
        }
    }

    fn blocks(&self) -> &[Block] {
        &self.session.layout().blocks
    }

    fn block_width(&self, block: usize) -> usize {
        self.blocks().get(block).map_or(0, Block::width)
    }

    fn row_count(&self) -> usize {
        self.session.alignment().sequence_count()
    }

    /// Screen lines taken by one block: ruler, rows, separator.
    pub fn lines_per_block(&self) -> usize {
        self.row_count() + 2
    }

    /// Screen line of the cursor within the block view.
    pub fn cursor_line(&self) -> usize {
        self.cursor.block * self.lines_per_block() + 1 + self.cursor.row
    }

    pub fn total_lines(&self) -> usize {
        self.blocks().len() * self.lines_per_block()
    }

    /// Details of the cell under the cursor.
    pub fn current_position(&self) -> Option<PositionInfo> {
        self.session
            .lookup(self.cursor.block, self.cursor.row, self.cursor.offset)
            .ok()
    }

    pub fn current_record(&self) -> Option<RecordInfo<'_>> {
        self.session.record_info(self.cursor.row)
    }

    /// Updates the number of block-view lines that fit on screen.
    pub fn update_viewport_size(&mut self, visible_lines: usize) {
        self.visible_lines = visible_lines;
        self.ensure_cursor_visible();
    }

    pub fn move_up(&mut self) {
        if self.cursor.row > 0 {
            self.cursor.row -= 1;
        } else if self.cursor.block > 0 {
            self.cursor.block -= 1;
            self.cursor.row = self.row_count().saturating_sub(1);
        }
        self.ensure_cursor_visible();
    }

    pub fn move_down(&mut self) {
        if self.cursor.row + 1 < self.row_count() {
            self.cursor.row += 1;
        } else if self.cursor.block + 1 < self.blocks().len() {
            self.cursor.block += 1;
            self.cursor.row = 0;
        }
        self.ensure_cursor_visible();
    }

    /// Moves one alignment column left, continuing into the previous block.
    pub fn move_left(&mut self) {
        if self.cursor.offset > 0 {
            self.cursor.offset -= 1;
        } else if self.cursor.block > 0 {
            self.cursor.block -= 1;
            self.cursor.offset = self.block_width(self.cursor.block).saturating_sub(1);
        }
        self.ensure_cursor_visible();
    }

    /// Moves one alignment column right, continuing into the next block.
    pub fn move_right(&mut self) {
        if self.cursor.offset + 1 < self.block_width(self.cursor.block) {
            self.cursor.offset += 1;
        } else if self.cursor.block + 1 < self.blocks().len() {
            self.cursor.block += 1;
            self.cursor.offset = 0;
        }
        self.ensure_cursor_visible();
    }

    pub fn goto_block_start(&mut self) {
        self.cursor.offset = 0;
    }

    pub fn goto_block_end(&mut self) {
        self.cursor.offset = self.block_width(self.cursor.block).saturating_sub(1);
    }

    pub fn previous_block(&mut self) {
        if self.cursor.block > 0 {
            self.cursor.block -= 1;
        }
        self.ensure_cursor_visible();
    }

    pub fn next_block(&mut self) {
        if self.cursor.block + 1 < self.blocks().len() {
            self.cursor.block += 1;
        }
        self.ensure_cursor_visible();
    }

    /// Jumps to a 1-based alignment column.
    pub fn goto_column(&mut self, column: usize) {
        let located = column
            .checked_sub(1)
            .and_then(|col| self.session.layout().locate_column(col));
        match located {
            Some((block, offset)) => {
                self.cursor.block = block;
                self.cursor.offset = offset;
                self.ensure_cursor_visible();
            }
            None => {
                self.status_message = Some(format!("Invalid column: {}", column));
            }
        }
    }

    /// Lays the alignment out again at a new width, keeping the cursor on
    /// the same alignment column.
    pub fn set_width(&mut self, width: LineWidth) {
        let column = self.cursor.block * self.session.width().get() + self.cursor.offset;
        self.session = self.session.with_width(width);
        if let Some((block, offset)) = self.session.layout().locate_column(column) {
            self.cursor.block = block;
            self.cursor.offset = offset;
        }
        self.first_line = 0;
        self.status_message = Some(format!("Line width set to {}", width.get()));
        self.ensure_cursor_visible();
    }

    /// Keeps the cursor line on screen, together with its block ruler.
    fn ensure_cursor_visible(&mut self) {
        // Clamp the cursor to the current layout
        let blocks = self.blocks().len();
        self.cursor.block = self.cursor.block.min(blocks.saturating_sub(1));
        self.cursor.row = self.cursor.row.min(self.row_count().saturating_sub(1));
        self.cursor.offset = self
            .cursor
            .offset
            .min(self.block_width(self.cursor.block).saturating_sub(1));

        if self.visible_lines == 0 {
            return;
        }
        let line = self.cursor_line();
        let ruler = line - 1 - self.cursor.row;
        if ruler < self.first_line {
            self.first_line = ruler;
        } else if line >= self.first_line + self.visible_lines {
            self.first_line = line + 1 - self.visible_lines;
        }

        let max_first = self.total_lines().saturating_sub(self.visible_lines);
        self.first_line = self.first_line.min(max_first);
    }

    /// Enters command mode.
    pub fn enter_command_mode(&mut self) {
        self.mode = AppMode::Command(String::new());
    }

    /// Handles a character input in command mode.
    pub fn command_input(&mut self, c: char) {
        if let AppMode::Command(ref mut cmd) = self.mode {
            cmd.push(c);
        }
    }

    /// Handles backspace in command mode.
    pub fn command_backspace(&mut self) {
        if let AppMode::Command(ref mut cmd) = self.mode {
            cmd.pop();
            if cmd.is_empty() {
                self.mode = AppMode::Normal;
            }
        }
    }

    /// Executes the current command.
    pub fn execute_command(&mut self) {
        if let AppMode::Command(cmd) = std::mem::take(&mut self.mode) {
            let cmd = cmd.trim();
            let mut words = cmd.split_whitespace();
            match (words.next(), words.next()) {
                (Some("q" | "quit"), None) => self.should_quit = true,
                (Some("w" | "width"), Some(arg)) => match LineWidth::parse(arg) {
                    Ok(width) => self.set_width(width),
                    Err(e) => self.status_message = Some(e.to_string()),
                },
                _ => {
                    if let Ok(col) = cmd.parse::<usize>() {
                        self.goto_column(col);
                    } else {
                        self.status_message = Some(format!("Unknown command: {}", cmd));
                    }
                }
            }
        }
        self.mode = AppMode::Normal;
    }

    /// Cancels command mode and returns to normal mode.
    pub fn cancel_command(&mut self) {
        self.mode = AppMode::Normal;
    }
}
