//! FASTA parser.
//!
//! Turns FASTA text into sequence records. Sequences may span several
//! lines; their lines are concatenated.
//!
//! ## FASTA Format
//!
//! ```text
//! >sequence_identifier optional description
//! ACGT-ACGTACGT...
//! >another_sequence
//! TGCA-TGCATGCA...
//! ```

use log::{debug, warn};
use thiserror::Error;

use crate::model::{Alignment, AlignmentError, SequenceRecord};

/// Errors that can occur during FASTA parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Header without sequence identifier at line {line}")]
    MissingId { line: usize },

    #[error("Sequence without header at line {0}")]
    SequenceWithoutHeader(usize),

    #[error("Non-ASCII character in sequence at line {line}")]
    NonAscii { line: usize },

    #[error(transparent)]
    Alignment(#[from] AlignmentError),
}

/// Result type for FASTA operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Header and sequence collected so far.
struct Pending {
    header: String,
    id: String,
    seq: String,
}

impl Pending {
    /// Emits the record unless it has no sequence.
    fn finish(self, records: &mut Vec<SequenceRecord>) {
        if self.seq.is_empty() {
            warn!("Dropping record '{}': empty sequence", self.id);
            return;
        }
        records.push(SequenceRecord::new(self.header, self.id, self.seq));
    }
}

/// Extracts the id: the first token after '>', leading spaces allowed.
fn parse_id(header: &str) -> Option<&str> {
    header.strip_prefix('>')?.split_whitespace().next()
}

/// Parses FASTA text into records, in input order.
///
/// Blank input yields no records. Records whose sequence is empty are
/// dropped.
pub fn parse_records(text: &str) -> ParseResult<Vec<SequenceRecord>> {
    let mut records = Vec::new();
    let mut current: Option<Pending> = None;

    for (idx, line) in text.lines().enumerate() {
        let line_number = idx + 1;
        let line = line.trim();

        // Skip empty lines
        if line.is_empty() {
            continue;
        }

        if line.starts_with('>') {
            if let Some(done) = current.take() {
                done.finish(&mut records);
            }
            let id = parse_id(line).ok_or(ParseError::MissingId { line: line_number })?;
            current = Some(Pending {
                header: line.to_string(),
                id: id.to_string(),
                seq: String::new(),
            });
        } else {
            let Some(pending) = current.as_mut() else {
                return Err(ParseError::SequenceWithoutHeader(line_number));
            };
            if !line.is_ascii() {
                return Err(ParseError::NonAscii { line: line_number });
            }
            pending
                .seq
                .extend(line.chars().filter(|c| !c.is_whitespace()));
        }
    }

    // Don't forget the last record
    if let Some(done) = current {
        done.finish(&mut records);
    }

    debug!("Parsed {} FASTA records", records.len());
    Ok(records)
}

/// Parses FASTA text into a validated alignment.
///
/// An input without records gives an empty alignment rather than an error.
pub fn parse_alignment(text: &str) -> ParseResult<Alignment> {
    Ok(Alignment::new(parse_records(text)?)?)
}
