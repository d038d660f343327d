use std::io;
use std::process;

use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};

use tblview::commands::{Aborted, CmdOutcome, CommandTable};
use tblview::config::{Args, ViewConfig};
use tblview::handlers::{translate_event, InputEvent, Prompt, PromptAction};
use tblview::keymap::{default_keymap, ComboReader, KeyResult};
use tblview::render::{self, RenderCell};
use tblview::state::{App, StatusLine};
use tblview::view::Status;
use tblview::{io as table_io, logging};

type Term = Terminal<CrosstermBackend<io::Stdout>>;

/// Screen rows below the table: status bar and message line.
const CHROME_ROWS: usize = 2;

/// Initialize the terminal for TUI rendering.
/// Enables raw mode, enters alternate screen, and creates a Terminal instance.
fn init_terminal() -> io::Result<Term> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Restore the terminal to its original state.
fn restore_terminal(terminal: &mut Term) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Snapshot of everything drawn except the message line.
struct Screen {
    cells: Vec<RenderCell>,
    status: Status,
}

impl Screen {
    fn capture(app: &App) -> Self {
        Self {
            cells: render::project(&app.view, &app.table),
            status: app.view.status(&app.table).unwrap_or_default(),
        }
    }

    fn draw(&self, terminal: &mut Term, line: &StatusLine, prompt: Option<&str>) -> io::Result<()> {
        terminal.draw(|frame| render::paint(frame, &self.cells, &self.status, line, prompt))?;
        Ok(())
    }
}

/// Reads one line of input on the message line. I/O errors count as a
/// cancelled prompt.
fn read_line(terminal: &mut Term, screen: &Screen, line: &StatusLine, label: &str) -> Result<String, Aborted> {
    let mut prompt = Prompt::new(label);
    loop {
        screen
            .draw(terminal, line, Some(&prompt.line()))
            .map_err(|_| Aborted)?;
        if let Event::Key(key) = event::read().map_err(|_| Aborted)? {
            match prompt.handle_key(&key) {
                PromptAction::Continue => {}
                PromptAction::Submit(text) => return Ok(text),
                PromptAction::Abort => return Err(Aborted),
            }
        }
    }
}

fn resize(app: &mut App, width: usize, height: usize) {
    app.view
        .resize_viewport(width, height.saturating_sub(CHROME_ROWS));
}

fn run(terminal: &mut Term, app: &mut App) -> io::Result<()> {
    let commands = CommandTable::with_defaults();
    let keymap = default_keymap();
    if let Err(err) = keymap.validate(&commands) {
        error!(error = %err, "invalid key map");
        app.status.set_error(format!("error: {}", err));
    }
    let mut combo = ComboReader::new();

    let size = terminal.size()?;
    resize(app, size.width as usize, size.height as usize);

    while !app.session.quit {
        let screen = Screen::capture(app);
        screen.draw(terminal, &app.status, None)?;

        match translate_event(&event::read()?) {
            InputEvent::Resize { width, height } => resize(app, width, height),
            // Clicks on the status bar or message line do nothing.
            InputEvent::Click { x, y } if y < app.view.size().y => {
                app.view.move_cursor_to_screen_coordinate(x, y);
            }
            InputEvent::Click { .. } => {}
            InputEvent::Key(key) => {
                let name = match combo.feed(&keymap, &key) {
                    KeyResult::Command(name) => name,
                    KeyResult::Pending(keys) => {
                        app.status.set_output(keys);
                        continue;
                    }
                    KeyResult::Unbound(keys) => {
                        app.status.set_error(format!("unknown key: {}", keys));
                        continue;
                    }
                };
                app.status.clear();
                let line = app.status.clone();
                let mut input = |label: &str| read_line(terminal, &screen, &line, label);
                match commands.execute(name, app, &mut input) {
                    CmdOutcome::Done(result) => {
                        if let Some(msg) = result.msg {
                            app.status.set_output(msg);
                        }
                    }
                    CmdOutcome::Failed(err) => app.status.set_error(format!("error: {}", err)),
                    CmdOutcome::Aborted => app.status.set_output("aborted"),
                }
            }
            InputEvent::Ignored => {}
        }
    }
    Ok(())
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    if let Err(err) = logging::init(args.log_file.as_deref()) {
        eprintln!("Error: cannot open log file: {}", err);
        process::exit(1);
    }

    let config = match ViewConfig::from_args(&args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {}", err);
            process::exit(1);
        }
    };

    let mut table = match table_io::load_csv(&args.file) {
        Ok(table) => table,
        Err(err) => {
            eprintln!("Error: {}: {}", args.file.display(), err);
            process::exit(1);
        }
    };
    table.set_last_row_policy(config.last_row);

    let view = match config.build_view(&table) {
        Ok(view) => view,
        Err(err) => {
            eprintln!("Error: {}", err);
            process::exit(1);
        }
    };
    let mut app = App::new(table, view, Some(args.file.clone()));

    // Set up panic hook to restore terminal on crash
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let mut terminal = init_terminal()?;
    info!(file = %args.file.display(), "session start");
    let result = run(&mut terminal, &mut app);

    terminal.clear()?;
    restore_terminal(&mut terminal)?;
    if let Err(err) = &result {
        error!(error = %err, "terminal error");
    }
    info!(dirty = app.session.dirty, "session end");
    result
}
