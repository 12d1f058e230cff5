//! Plain-text rendering of a block layout.
//!
//! Each block starts with a ruler giving its first and last alignment
//! column, followed by one line per sequence:
//!
//! ```text
//!            1       10
//!   seq1 [1] ACGT-ACGTA [9] seq1
//! seq_02 [1] ---TTACGTA [7] seq_02
//! ```
//!
//! With colour enabled, cells are styled by class using ANSI escapes.

use std::io::{self, Write};

use crossterm::style::{Color, Stylize};

use crate::consensus::CellClass;
use crate::layout::{Block, Layout};

/// Rendering switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Style characters by classification
    pub color: bool,
}

/// Terminal colour used for a class, if any.
pub fn class_color(class: CellClass) -> Option<Color> {
    match class {
        CellClass::Aligned => None,
        CellClass::Mismatch => Some(Color::Red),
        CellClass::TieMatch => Some(Color::Yellow),
        CellClass::EndGap => Some(Color::DarkGrey),
    }
}

/// The ruler line above a block's rows.
pub fn ruler_line(layout: &Layout, block: &Block) -> String {
    let start = block.start_label().to_string();
    let end = block.end_label().to_string();
    let indent = layout.label_width() + layout.position_width() + 3;
    if start.len() + end.len() + 1 > block.width() {
        // Too narrow for both labels
        return format!("{} {}", " ".repeat(indent), start);
    }
    let pad = block.width() - (start.len() + end.len() + 1);
    format!("{} {} {}{}", " ".repeat(indent), start, " ".repeat(pad), end)
}

/// Writes one block.
pub fn render_block<W: Write>(
    layout: &Layout,
    block: &Block,
    options: &RenderOptions,
    out: &mut W,
) -> io::Result<()> {
    let label = layout.label_width();
    let pos = layout.position_width();

    writeln!(out, "{}", ruler_line(layout, block))?;
    for (id, row) in layout.ids.iter().zip(&block.rows) {
        write!(out, "{:>label$} [{:>pos$}] ", id, row.span.start)?;
        if options.color {
            for (c, &class) in row.text.chars().zip(&row.cells) {
                match class_color(class) {
                    Some(color) if class == CellClass::EndGap => write!(out, "{}", c.with(color))?,
                    Some(color) => write!(out, "{}", c.black().on(color))?,
                    None => write!(out, "{}", c)?,
                }
            }
        } else {
            write!(out, "{}", row.text)?;
        }
        writeln!(out, " [{:>pos$}] {}", row.span.end, id)?;
    }
    Ok(())
}

/// Writes the whole layout, blocks separated by blank lines.
pub fn render_text<W: Write>(layout: &Layout, options: &RenderOptions, out: &mut W) -> io::Result<()> {
    for (i, block) in layout.blocks.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        render_block(layout, block, options, out)?;
    }
    Ok(())
}
