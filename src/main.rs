use std::error::Error;
use std::time::Duration;

use clap::{Arg, ArgAction, Command};
use steply_calendar::picker::{CellValue, DatePicker, Frame, RenderSurface};
use steply_calendar::terminal::{KeyCode, KeyEvent, KeyModifiers, Terminal};
use steply_calendar::ui::frame_json;
use steply_calendar::ui::renderer::{self, Renderer};
use steply_calendar::ui::span::{Span, SpanLine};
use steply_calendar::{CalendarDate, PickerConfig};

/// Most blank rows drawn between the input and the popup.
const MAX_POPUP_GAP: u16 = 3;

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn cli() -> Command {
    Command::new("steply-calendar")
        .about("Pick a date from a popup calendar")
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("YAML picker configuration"),
        )
        .arg(
            Arg::new("date")
                .long("date")
                .value_name("YYYY-MM-DD")
                .help("Initially selected date"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print the initial grid as JSON and exit"),
        )
}

fn run() -> Result<(), Box<dyn Error>> {
    let matches = cli().get_matches();

    let mut config = match matches.get_one::<String>("config") {
        Some(path) => PickerConfig::from_path(path)?,
        None => PickerConfig::default(),
    };
    if let Some(text) = matches.get_one::<String>("date") {
        config = config.with_initial_date(CalendarDate::parse(text)?);
    }

    let surface = TerminalSurface::new(config.popup_offset.min(MAX_POPUP_GAP));
    let mut picker = DatePicker::new(surface, &config)?;

    if matches.get_flag("json") {
        let json = frame_json::frame_to_json(&picker.frame()?)?;
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    let mut terminal = Terminal::new()?;
    terminal.enter_raw_mode()?;
    terminal.hide_cursor()?;

    let result = event_loop(&mut terminal, &mut picker);

    let rows = picker.surface().lines().len() as u16;
    terminal.show_cursor()?;
    terminal.exit_raw_mode()?;
    terminal.finish(rows)?;

    result?;
    println!("{}", picker.get_date());
    Ok(())
}

fn event_loop(
    terminal: &mut Terminal,
    picker: &mut DatePicker<TerminalSurface>,
) -> Result<(), Box<dyn Error>> {
    terminal.render_lines(&picker.surface().lines())?;

    loop {
        if !terminal.poll(Duration::from_millis(100))? {
            continue;
        }
        let key = terminal.read_key()?;
        if is_quit(key) {
            break;
        }
        if let Err(err) = handle_key(picker, key) {
            log::warn!("{err}");
        }
        terminal.render_lines(&picker.surface().lines())?;
    }
    Ok(())
}

fn is_quit(key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

fn handle_key(
    picker: &mut DatePicker<TerminalSurface>,
    key: KeyEvent,
) -> steply_calendar::Result<()> {
    if !picker.is_open() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
            picker.on_input_clicked()?;
        }
        return Ok(());
    }

    // Keys typed while open act inside the popup; only Esc counts as a
    // click elsewhere.
    match key.code {
        KeyCode::Esc => picker.on_document_clicked(&OutsideClick),
        KeyCode::Left => picker.surface_mut().move_highlight(-1, 0),
        KeyCode::Right => picker.surface_mut().move_highlight(1, 0),
        KeyCode::Up => picker.surface_mut().move_highlight(0, -1),
        KeyCode::Down => picker.surface_mut().move_highlight(0, 1),
        KeyCode::Char('n') | KeyCode::PageDown => {
            picker.pager_next()?;
        }
        KeyCode::Char('p') | KeyCode::PageUp => {
            picker.pager_prev()?;
        }
        KeyCode::Char('y') => {
            picker.header_year_clicked()?;
        }
        KeyCode::Char('m') => {
            picker.header_month_clicked()?;
        }
        KeyCode::Enter | KeyCode::Char(' ') => match picker.surface().highlighted_value() {
            Some(CellValue::Date(date)) => {
                picker.pick_day(date)?;
            }
            Some(CellValue::Year(year)) => {
                picker.pick_year(year)?;
            }
            Some(CellValue::Month(month)) => {
                picker.pick_month(month)?;
            }
            Some(CellValue::Week(_)) | None => {}
        },
        _ => {}
    }
    Ok(())
}

// ── Terminal surface ──────────────────────────────────────────────────────────

/// The keyboard never clicks the input or the popup itself; the only
/// document click it produces is Esc, which lands outside both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OutsideClick;

struct TerminalSurface {
    label: String,
    input: String,
    visible: bool,
    gap: u16,
    frame: Option<Frame>,
    highlight: Option<usize>,
}

impl TerminalSurface {
    fn new(gap: u16) -> Self {
        Self {
            label: String::new(),
            input: String::new(),
            visible: false,
            gap,
            frame: None,
            highlight: None,
        }
    }

    fn move_highlight(&mut self, dx: isize, dy: isize) {
        if let (Some(frame), Some(from)) = (&self.frame, self.highlight) {
            self.highlight = Some(renderer::move_highlight(frame, from, dx, dy));
        }
    }

    fn highlighted_value(&self) -> Option<CellValue> {
        let frame = self.frame.as_ref()?;
        frame.cells.get(self.highlight?)?.value
    }

    fn lines(&self) -> Vec<SpanLine> {
        let mut lines = vec![Renderer::render_input(&self.label, &self.input, self.visible)];
        if !self.visible {
            return lines;
        }
        for _ in 0..self.gap {
            lines.push(vec![Span::new("")]);
        }
        if let Some(frame) = &self.frame {
            lines.extend(Renderer::render_popup(frame, self.highlight).lines);
            lines.push(vec![Span::new("")]);
            lines.push(vec![Span::new(
                "  ←↑↓→ move  enter pick  n/p page  y year  m month  esc close  q quit",
            )]);
        }
        lines
    }
}

impl RenderSurface for TerminalSurface {
    type Target = OutsideClick;

    fn attach_input(&mut self, selector: &str) -> bool {
        let name = selector.trim().trim_start_matches('#');
        if name.is_empty() {
            return false;
        }
        self.label = name.to_string();
        true
    }

    fn is_input(&self, _target: &OutsideClick) -> bool {
        false
    }

    fn is_descendant_of_container(&self, _target: &OutsideClick) -> bool {
        false
    }

    fn write_input(&mut self, text: &str) {
        self.input = text.to_string();
    }

    fn set_popup_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn redraw(&mut self, frame: &Frame) {
        self.highlight = renderer::initial_highlight(frame);
        self.frame = Some(frame.clone());
    }
}
