//! TUI rendering module.
//!
//! This module handles all visual rendering using ratatui:
//! - The block view: a column ruler per block, then one labelled line per
//!   sequence with its start and end ungapped positions
//! - Cells coloured by classification (mismatch, tie, end gap)
//! - An info panel describing the cell under the cursor
//! - Status bar with position and mode info

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::consensus::CellClass;
use crate::model::{AppMode, AppState};
use crate::render::ruler_line;

/// Minimum number of text lines in the info panel.
const INFO_PANEL_LINES: usize = 6;
/// Height of the status bar.
const STATUS_BAR_HEIGHT: u16 = 1;

/// Style of a cell by classification.
pub fn class_style(class: CellClass) -> Style {
    match class {
        CellClass::Aligned => Style::default(),
        CellClass::Mismatch => Style::default().fg(Color::Black).bg(Color::Red),
        CellClass::TieMatch => Style::default().fg(Color::Black).bg(Color::Yellow),
        CellClass::EndGap => Style::default().fg(Color::DarkGray),
    }
}

/// Renders the complete UI.
pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    let info_height = info_panel_height(state, area.width);

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(info_height),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .split(area);

    render_blocks_panel(frame, state, main_layout[0]);
    render_info_panel(frame, state, main_layout[1]);
    render_status_bar(frame, state, main_layout[2]);
}

/// Builds one screen line of the block view.
fn block_view_line(state: &AppState, line: usize) -> Line<'static> {
    let layout = state.session.layout();
    let per_block = state.lines_per_block();
    let (block_idx, within) = (line / per_block, line % per_block);
    let Some(block) = layout.block(block_idx) else {
        return Line::default();
    };

    if within == 0 {
        return Line::from(Span::styled(
            ruler_line(layout, block),
            Style::default().fg(Color::Cyan),
        ));
    }
    let row_idx = within - 1;
    let Some(row) = block.rows.get(row_idx) else {
        // Separator between blocks
        return Line::default();
    };

    let id = &layout.ids[row_idx];
    let label = layout.label_width();
    let pos = layout.position_width();
    let is_current_row = block_idx == state.cursor.block && row_idx == state.cursor.row;
    let id_style = if is_current_row {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let mut spans = vec![
        Span::styled(format!("{:>label$}", id), id_style),
        Span::raw(format!(" [{:>pos$}] ", row.span.start)),
    ];
    for (offset, (c, &class)) in row.text.chars().zip(&row.cells).enumerate() {
        let style = if is_current_row && offset == state.cursor.offset {
            class_style(class).add_modifier(Modifier::REVERSED | Modifier::BOLD)
        } else {
            class_style(class)
        };
        spans.push(Span::styled(c.to_string(), style));
    }
    spans.push(Span::raw(format!(" [{:>pos$}] ", row.span.end)));
    spans.push(Span::styled(id.clone(), id_style));
    Line::from(spans)
}

/// Renders the scrolling block view.
fn render_blocks_panel(frame: &mut Frame, state: &AppState, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    let end = (state.first_line + visible).min(state.total_lines());
    let lines: Vec<Line> = (state.first_line..end)
        .map(|line| block_view_line(state, line))
        .collect();

    let layout = state.session.layout();
    let title = format!(
        "{} [{} sequences | {} columns | width {}]",
        state.source_name,
        layout.row_count(),
        state.session.alignment().alignment_length(),
        layout.width.get()
    );
    let block = Block::default().borders(Borders::ALL).title(title);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Text of the info panel for the cell under the cursor.
pub fn info_lines(state: &AppState, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(info) = state.current_position() {
        lines.push(format!("Alignment pos.: {}", info.alignment_column));
        lines.push(format!("Seq. pos.:      {}", info.sequence_position));
        lines.push(format!("Character:      {} ({})", info.character, info.class));
    }
    if let Some(record) = state.current_record() {
        lines.push(format!("Seq. ID:        {}", record.id));
        lines.push(format!("Seq. length:    {}", record.length));
        let header = format!("File header:    {}", record.header);
        lines.extend(
            textwrap::wrap(&header, width.max(16))
                .into_iter()
                .map(|part| part.into_owned()),
        );
    }
    lines
}

/// Height of the info panel, borders included, for a terminal `width`
/// columns wide. Grows with the wrapped header so nothing is clipped.
pub fn info_panel_height(state: &AppState, width: u16) -> u16 {
    let inner = width.saturating_sub(2) as usize;
    let lines = info_lines(state, inner).len().max(INFO_PANEL_LINES);
    u16::try_from(lines + 2).unwrap_or(u16::MAX)
}

fn render_info_panel(frame: &mut Frame, state: &AppState, area: Rect) {
    let width = area.width.saturating_sub(2) as usize;
    let lines: Vec<Line> = info_lines(state, width).into_iter().map(Line::from).collect();
    let block = Block::default().borders(Borders::ALL).title("Info");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Renders the status bar at the bottom.
fn render_status_bar(frame: &mut Frame, state: &AppState, area: Rect) {
    let (mode_str, command_str) = match &state.mode {
        AppMode::Normal => ("NORMAL", String::new()),
        AppMode::Command(cmd) => ("COMMAND", format!(":{}", cmd)),
    };

    let column = state
        .current_position()
        .map_or(0, |info| info.alignment_column);
    let position_info = format!(
        "Block {}/{} | Seq {}/{} | Col {}/{} ",
        state.cursor.block + 1,
        state.session.layout().block_count(),
        state.cursor.row + 1,
        state.session.alignment().sequence_count(),
        column,
        state.session.alignment().alignment_length()
    );

    // Show status message if present
    let message = state.status_message.as_deref().unwrap_or("");

    let left_content = if command_str.is_empty() {
        format!(" {} | {} ", mode_str, message)
    } else {
        format!(" {} | {} ", mode_str, command_str)
    };

    let left_len = left_content.len();
    let status_line = Line::from(vec![
        Span::styled(
            left_content,
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ),
        Span::styled(
            " ".repeat((area.width as usize).saturating_sub(left_len + position_info.len())),
            Style::default().bg(Color::Cyan),
        ),
        Span::styled(
            position_info,
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
    ]);

    frame.render_widget(Paragraph::new(status_line), area);
}

/// Renders the placeholder shown while input is being read.
pub fn render_loading(frame: &mut Frame, source_name: &str, ticks: usize) {
    let dots = ".".repeat(ticks % 4);
    let text = format!("Loading {}{}", source_name, dots);
    let block = Block::default().borders(Borders::ALL).title("msablocks");
    frame.render_widget(Paragraph::new(text).block(block), frame.area());
}

/// Calculates how many block-view lines fit on screen.
pub fn calculate_visible_lines(terminal_height: u16, info_height: u16) -> usize {
    // Account for borders, info panel and status bar
    terminal_height.saturating_sub(info_height + STATUS_BAR_HEIGHT + 2) as usize
}
