use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};
use crate::ui::span::SpanLine;
use crate::ui::style::Color;
use crossterm::event::{Event, KeyEventKind, poll, read};
use crossterm::style::{Attribute, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::{cursor, execute, queue, terminal};
use std::io::{self, Stdout, Write};
use std::time::Duration;

/// Inline terminal drawing area anchored at the row the program started on.
pub struct Terminal {
    stdout: Stdout,
    origin_row: u16,
    reserved: u16,
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        let (_, row) = cursor::position()?;
        Ok(Self {
            stdout: io::stdout(),
            origin_row: row,
            reserved: 0,
        })
    }

    pub fn enter_raw_mode(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()
    }

    pub fn exit_raw_mode(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()
    }

    pub fn hide_cursor(&mut self) -> io::Result<()> {
        execute!(self.stdout, cursor::Hide)
    }

    pub fn show_cursor(&mut self) -> io::Result<()> {
        execute!(self.stdout, cursor::Show)
    }

    pub fn poll(&self, timeout: Duration) -> io::Result<bool> {
        poll(timeout)
    }

    /// Blocks until the next key press; other events are skipped.
    pub fn read_key(&mut self) -> io::Result<KeyEvent> {
        loop {
            if let Event::Key(key) = read()?
                && key.kind == KeyEventKind::Press
            {
                return Ok(map_key_event(key));
            }
        }
    }

    /// Makes sure `rows` lines below the origin exist, scrolling the
    /// terminal up when the origin sits near the bottom.
    fn reserve(&mut self, rows: u16) -> io::Result<()> {
        if rows <= self.reserved {
            return Ok(());
        }
        let (_, height) = terminal::size()?;
        queue!(self.stdout, cursor::MoveTo(0, self.origin_row))?;
        for _ in 0..rows {
            write!(self.stdout, "\r\n")?;
        }
        let bottom = self.origin_row.saturating_add(rows);
        if bottom >= height {
            self.origin_row = height.saturating_sub(rows).saturating_sub(1);
        }
        self.reserved = rows;
        Ok(())
    }

    pub fn render_lines(&mut self, lines: &[SpanLine]) -> io::Result<()> {
        self.reserve(lines.len() as u16)?;
        queue!(
            self.stdout,
            cursor::MoveTo(0, self.origin_row),
            terminal::Clear(terminal::ClearType::FromCursorDown)
        )?;
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                write!(self.stdout, "\r\n")?;
            }
            self.render_line(line)?;
        }
        self.stdout.flush()
    }

    fn render_line(&mut self, line: &SpanLine) -> io::Result<()> {
        for span in line {
            let style = span.style;
            if let Some(fg) = style.color {
                queue!(self.stdout, SetForegroundColor(map_color(fg)))?;
            }
            if style.bold {
                queue!(self.stdout, SetAttribute(Attribute::Bold))?;
            }
            if style.reverse {
                queue!(self.stdout, SetAttribute(Attribute::Reverse))?;
            }

            write!(self.stdout, "{}", span.text)?;

            if !style.is_plain() {
                queue!(self.stdout, SetAttribute(Attribute::Reset), ResetColor)?;
            }
        }
        Ok(())
    }

    pub fn finish(&mut self, rows: u16) -> io::Result<()> {
        execute!(
            self.stdout,
            cursor::MoveTo(0, self.origin_row.saturating_add(rows))
        )?;
        write!(self.stdout, "\r\n")?;
        self.stdout.flush()
    }
}

fn map_color(color: Color) -> crossterm::style::Color {
    match color {
        Color::DarkGrey => crossterm::style::Color::DarkGrey,
        Color::Red => crossterm::style::Color::Red,
        Color::Blue => crossterm::style::Color::Blue,
        Color::Cyan => crossterm::style::Color::Cyan,
    }
}

fn map_key_event(event: crossterm::event::KeyEvent) -> KeyEvent {
    KeyEvent {
        code: map_key_code(event.code),
        modifiers: map_key_modifiers(event.modifiers),
    }
}

fn map_key_code(code: crossterm::event::KeyCode) -> KeyCode {
    match code {
        crossterm::event::KeyCode::Char(ch) => KeyCode::Char(ch),
        crossterm::event::KeyCode::Enter => KeyCode::Enter,
        crossterm::event::KeyCode::Esc => KeyCode::Esc,
        crossterm::event::KeyCode::Left => KeyCode::Left,
        crossterm::event::KeyCode::Right => KeyCode::Right,
        crossterm::event::KeyCode::Up => KeyCode::Up,
        crossterm::event::KeyCode::Down => KeyCode::Down,
        crossterm::event::KeyCode::PageUp => KeyCode::PageUp,
        crossterm::event::KeyCode::PageDown => KeyCode::PageDown,
        _ => KeyCode::Unknown,
    }
}

fn map_key_modifiers(modifiers: crossterm::event::KeyModifiers) -> KeyModifiers {
    if modifiers.contains(crossterm::event::KeyModifiers::CONTROL) {
        KeyModifiers::CONTROL
    } else {
        KeyModifiers::NONE
    }
}
