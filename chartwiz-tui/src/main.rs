//! ChartWiz TUI entry point.

use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use chartwiz_tui::{input, persistence, ui, AppState};
use chartwiz_wizard::{logging, Collaborators, SessionOptions, Settings, WizardSession};

#[derive(Parser)]
#[command(name = "chartwiz-tui", about = "Build charts from economic indicators")]
struct Args {
    /// Settings file (TOML). Environment variables override it.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Read indicators from a local JSON fixture instead of the API.
    #[arg(long)]
    fixture: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Restore the terminal before printing a panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chartwiz");
    let state_path = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chartwiz")
        .join("tui-state.json");
    logging::init_file(&data_dir.join("chartwiz-tui.log"), "info")?;

    let mut settings = Settings::load(args.settings.as_deref())?;
    if args.fixture.is_some() {
        settings.api.fixture = args.fixture;
    }
    let mut options = SessionOptions::from(&settings);
    if options.chart_log.is_none() {
        options.chart_log = Some(data_dir.join("charts.jsonl"));
    }
    let collaborators = Collaborators::from_settings(&settings)?;
    let session = WizardSession::new(collaborators, options)?;
    tracing::info!(state = %state_path.display(), "starting terminal UI");

    let mut app = AppState::new(session, state_path.clone());
    persistence::apply(&mut app, persistence::load(&state_path));

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    if let Err(e) = persistence::save(&state_path, &persistence::extract(&app)) {
        tracing::warn!(error = %e, "could not save UI state");
    }
    app.session.close();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        // Drains catalog replies and fires a due debounced search.
        app.tick(Instant::now());

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        if !app.running {
            break;
        }
    }
    Ok(())
}
