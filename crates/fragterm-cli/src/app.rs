use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use fragterm_core::{InputEvent, Outcome, Session, Settings};
use fragterm_cli::{translate, view::draw_ui, CodeHighlighter, Theme};
use ratatui::{backend::CrosstermBackend, Terminal};

/// Rows taken by the status bar below the fragments.
const STATUS_ROWS: u16 = 1;

pub async fn run_tui(settings: Settings, file: Option<PathBuf>) -> Result<()> {
    let mut session = Session::with_settings(&settings);
    if let Some(ref path) = file {
        if let Err(e) = session.load_file(path) {
            tracing::warn!("could not open {}: {e}", path.display());
            session.set_status(e.to_string());
        }
    }
    let theme = Theme::by_name(&settings.editor.theme);
    let highlighter = CodeHighlighter::new(&settings.highlight.syntax, &settings.highlight.theme);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut session, &theme, &highlighter).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    session: &mut Session,
    theme: &Theme,
    highlighter: &CodeHighlighter,
) -> Result<()> {
    let size = terminal.size()?;
    resize(session, size.width, size.height);

    loop {
        let model = session.render();
        terminal.draw(|f| draw_ui(f, &model, theme, highlighter))?;

        if !event::poll(Duration::from_millis(33))? {
            continue;
        }
        let Some(input) = translate(event::read()?) else {
            continue;
        };
        let input = match input {
            InputEvent::Resize { width, height } => InputEvent::Resize {
                width,
                height: height.saturating_sub(STATUS_ROWS),
            },
            other => other,
        };
        if session.handle_event(input).await == Outcome::Quit {
            break;
        }
    }
    Ok(())
}

fn resize(session: &mut Session, width: u16, height: u16) {
    session.resize(width as usize, height.saturating_sub(STATUS_ROWS) as usize);
}
