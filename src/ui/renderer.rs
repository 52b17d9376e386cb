use crate::picker::{Cell, CellRole, Frame, ViewMode};
use crate::ui::span::{Span, SpanLine};
use crate::ui::style::{Color, Style};

pub const CELL_WIDTH: usize = 4;

#[derive(Debug, Default, Clone)]
pub struct RenderFrame {
    pub lines: Vec<SpanLine>,
}

pub struct Renderer;

impl Renderer {
    /// Cells per row for each view.
    pub fn columns(mode: ViewMode) -> usize {
        match mode {
            ViewMode::DateGrid => 8,
            ViewMode::YearGrid | ViewMode::MonthGrid => 4,
        }
    }

    pub fn render_input(label: &str, value: &str, open: bool) -> SpanLine {
        let marker = if open { ">" } else { " " };
        let value_span = if value.is_empty() {
            Span::styled("YYYY-MM-DD", Style::new().color(Color::DarkGrey))
        } else {
            Span::new(value)
        };
        vec![Span::new(format!("{marker} {label}: ")), value_span]
    }

    pub fn render_popup(frame: &Frame, highlight: Option<usize>) -> RenderFrame {
        let mut out = RenderFrame::default();
        let dim = Style::new().color(Color::DarkGrey);

        out.lines.push(vec![
            Span::styled("  « ", dim),
            Span::styled(frame.header.label(), Style::new().bold()),
            Span::styled(" »", dim),
        ]);
        out.lines.push(vec![Span::new("")]);

        let columns = Self::columns(frame.mode);
        for (row, cells) in frame.cells.chunks(columns).enumerate() {
            let mut line: SpanLine = vec![Span::new("  ")];
            for (col, cell) in cells.iter().enumerate() {
                let index = row * columns + col;
                let mut style = Self::cell_style(cell);
                if highlight == Some(index) {
                    style = style.reverse();
                }
                line.push(Span::padded(&cell.label, CELL_WIDTH, style));
            }
            out.lines.push(line);
        }
        out
    }

    fn cell_style(cell: &Cell) -> Style {
        let flags = cell.flags;
        if flags.is_selected {
            return Style::new().color(Color::Cyan).bold();
        }
        match cell.role {
            CellRole::WeekNumber | CellRole::Blank => Style::new().color(Color::DarkGrey),
            _ if flags.is_outside_cursor_month => Style::new().color(Color::DarkGrey),
            _ if flags.is_sunday => Style::new().color(Color::Red),
            _ if flags.is_saturday => Style::new().color(Color::Blue),
            _ => Style::default(),
        }
    }
}

// ── Keyboard highlight ────────────────────────────────────────────────────────

/// Where the highlight lands when a frame is first shown: the selected cell,
/// otherwise the first pickable one.
pub fn initial_highlight(frame: &Frame) -> Option<usize> {
    frame
        .cells
        .iter()
        .position(|c| c.is_pickable() && c.flags.is_selected)
        .or_else(|| frame.cells.iter().position(Cell::is_pickable))
}

/// Moves the highlight by `dx` columns and `dy` rows, skipping over cells
/// that cannot be picked. Stays put when the move would leave the grid.
pub fn move_highlight(frame: &Frame, from: usize, dx: isize, dy: isize) -> usize {
    let step = dx + dy * Renderer::columns(frame.mode) as isize;
    if step == 0 {
        return from;
    }
    let mut index = from as isize;
    loop {
        index += step;
        let Some(cell) = usize::try_from(index).ok().and_then(|i| frame.cells.get(i)) else {
            return from;
        };
        if cell.is_pickable() {
            return index as usize;
        }
    }
}
