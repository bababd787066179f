use accvm::{codec::RECORD_SIZE, disasm::annotate, Result, Session};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io;
use tui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};

struct App<'a> {
    flags_state: TableState,
    code_state: TableState,
    memory_state: TableState,
    steps: usize,
    last_error: Option<String>,
    session: &'a mut Session,
}

impl<'a> App<'a> {
    fn new(session: &'a mut Session) -> App<'a> {
        App {
            flags_state: TableState::default(),
            code_state: TableState::default(),
            memory_state: TableState::default(),
            steps: 0,
            last_error: None,
            session,
        }
    }

    fn flags(&self) -> Vec<(&'static str, String)> {
        let machine = &self.session.machine;
        vec![
            ("P", machine.get_p().to_string()),
            ("ACC", machine.get_acc().to_string()),
            ("Halted", machine.is_halted().to_string()),
            ("Steps", self.steps.to_string()),
            ("Cells", machine.memory_size().to_string()),
            (
                "Error",
                self.last_error.clone().unwrap_or_else(|| "-".to_string()),
            ),
        ]
    }

    fn code(&self) -> Vec<(String, String)> {
        match annotate(self.session.machine.code()) {
            Ok(records) => records
                .into_iter()
                .map(|(ptr, instr)| (format!("{:04}", ptr.0), instr.to_string()))
                .collect(),
            Err(err) => vec![("!".to_string(), err.to_string())],
        }
    }

    fn memory(&self) -> Vec<(String, String)> {
        self.session
            .machine
            .iter_mem()
            .filter(|(_, value)| **value != 0)
            .map(|(ptr, value)| (ptr.to_string(), value.to_string()))
            .collect()
    }

    fn next_instruction(&mut self) {
        match self.session.machine.step() {
            Ok(_) => self.steps += 1,
            Err(err) => self.last_error = Some(err.to_string()),
        }
    }

    fn run_to_end(&mut self) {
        while !self.session.machine.is_halted() && self.last_error.is_none() {
            self.next_instruction();
        }
    }
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, &mut app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Char(' ') => app.next_instruction(),
                KeyCode::Char('r') => app.run_to_end(),
                _ => {}
            }
        }
    }
}

struct Windows {
    flags: Rect,
    code: Rect,
    memory: Rect,
    footer: Rect,
}

fn calculate_layout<B: Backend>(f: &mut Frame<B>) -> Windows {
    let rows = Layout::default()
        .constraints(
            [
                Constraint::Length(8),
                Constraint::Min(0),
                Constraint::Length(6),
            ]
            .as_ref(),
        )
        .margin(1)
        .split(f.size());

    let &[flags, main, footer] = rows.as_slice() else { panic!("could not find the layout") };

    let main_rows = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(main);

    let &[code, memory] = main_rows.as_slice() else { panic!("could not find the layout") };

    Windows {
        flags,
        code,
        memory,
        footer,
    }
}

fn render_flags<'a>(app: &App) -> Table<'a> {
    let name_style = Style::default().fg(Color::White);
    let rows = app.flags().into_iter().map(|(name, value)| {
        let cells = vec![Cell::from(name).style(name_style), Cell::from(value)];
        Row::new(cells).height(1)
    });
    Table::new(rows)
        .block(Block::default().borders(Borders::ALL).title("Flags"))
        .widths(&[Constraint::Length(8), Constraint::Min(10)])
}

fn render_code<'a>(app: &App) -> Table<'a> {
    let selected_style = Style::default().add_modifier(Modifier::REVERSED);
    let name_style = Style::default().fg(Color::White);
    let rows = app.code().into_iter().map(|(offset, instr)| {
        let cells = vec![Cell::from(offset).style(name_style), Cell::from(instr)];
        Row::new(cells).height(1)
    });
    Table::new(rows)
        .highlight_style(selected_style)
        .highlight_symbol("*")
        .block(Block::default().borders(Borders::ALL).title("Code"))
        .widths(&[Constraint::Length(4), Constraint::Percentage(100)])
}

fn render_memory<'a>(app: &App) -> Table<'a> {
    let name_style = Style::default().fg(Color::White);
    let rows = app.memory().into_iter().map(|(ptr, value)| {
        let cells = vec![Cell::from(ptr).style(name_style), Cell::from(value)];
        Row::new(cells).height(1)
    });
    Table::new(rows)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Memory (non-zero)"),
        )
        .widths(&[Constraint::Length(10), Constraint::Percentage(100)])
}

fn render_help<'a>() -> Paragraph<'a> {
    const TEXT: &str = r#"
 q      quit
 SPACE  execute instruction
 r      run to the end"#;
    Paragraph::new(TEXT).block(Block::default().borders(Borders::ALL).title("Help"))
}

fn ui<B: Backend>(f: &mut Frame<B>, app: &mut App) {
    let layout = calculate_layout(f);

    let machine = &app.session.machine;
    let current = (!machine.is_halted()).then(|| machine.get_p().0 / RECORD_SIZE);
    app.code_state.select(current);

    f.render_stateful_widget(render_flags(app), layout.flags, &mut app.flags_state);
    f.render_stateful_widget(render_code(app), layout.code, &mut app.code_state);
    f.render_stateful_widget(render_memory(app), layout.memory, &mut app.memory_state);
    f.render_widget(render_help(), layout.footer);
}

pub fn start_debugmode(session: &mut Session) -> Result<()> {
    // setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = App::new(session);
    let res = run_app(&mut terminal, app);

    // restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(res?)
}
