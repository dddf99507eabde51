mod app;
mod commands;
mod domain;
mod input;
mod logging;
mod persistence;
mod store;
mod ticker;
mod ui;

use anyhow::Result;
use app::{AppState, CELL_HEIGHT_UNITS, CELL_WIDTH_UNITS};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use domain::{Background, Filter};
use logging::{init_tracing, LogTarget};
use persistence::{
    ensure_data_dir, init_local_data_dir, load_settings, resolve_data_dir, save_settings,
    settings_file, storage_file, AppSettings, FileStorage, KeyValueStorage,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "taskpad")]
#[command(about = "A small terminal task list with filters, inline editing and a drifting background", long_about = None)]
struct Cli {
    /// Data directory. Defaults to the nearest .taskpad, then ~/.taskpad
    #[arg(long, global = true, env = "TASKPAD_DIR")]
    data_dir: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .taskpad directory in the current directory
    Init,
    #[command(flatten)]
    Task(TaskCommand),
}

/// Subcommands that read or change the stored tasks
#[derive(Subcommand)]
enum TaskCommand {
    /// Add a task
    Add {
        /// Task text
        text: String,
    },
    /// List tasks
    List {
        /// all, completed or pending. Defaults to the remembered filter.
        #[arg(short, long)]
        filter: Option<Filter>,
    },
    /// Remember a filter for the list view
    Filter {
        /// all, completed or pending
        filter: Filter,
    },
    /// Flip a task between pending and completed
    Toggle { id: u64 },
    /// Replace the text of a task
    Edit { id: u64, text: String },
    /// Delete a task
    Delete { id: u64 },
    /// Delete every completed task
    ClearCompleted,
    /// Delete every task
    ClearAll {
        /// Skip the confirmation
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let command = match cli.command {
        Some(command) => command,
        None => return run_tui(cli.data_dir.as_deref(), cli.verbose),
    };

    let _guard = init_tracing(cli.verbose, LogTarget::Stderr)?;

    match command {
        Commands::Init => {
            let dir = init_local_data_dir(&std::env::current_dir()?)?;
            save_settings(settings_file(&dir), &AppSettings::default())?;
            println!("Initialized taskpad directory: {}", dir.display());
            println!();
            println!("Taskpad will now use this local directory for task storage.");
            println!("Run 'taskpad' to open the list.");
            Ok(())
        }
        Commands::Task(command) => {
            let data_dir = ensure_data_dir(&resolve_data_dir(cli.data_dir.as_deref())?)?;
            info!(data_dir = %data_dir.display(), "using data directory");
            let storage = FileStorage::new(storage_file(&data_dir));
            run_command(storage, command, &mut io::stdout())
        }
    }
}

fn run_command<S: KeyValueStorage, W: io::Write>(storage: S, command: TaskCommand, out: &mut W) -> Result<()> {
    match command {
        TaskCommand::Add { text } => commands::add(storage, &text, out),
        TaskCommand::List { filter } => commands::list(storage, filter, out),
        TaskCommand::Filter { filter } => commands::set_filter(storage, filter, out),
        TaskCommand::Toggle { id } => commands::toggle(storage, id, out),
        TaskCommand::Edit { id, text } => commands::edit(storage, id, &text, out),
        TaskCommand::Delete { id } => commands::delete(storage, id, out),
        TaskCommand::ClearCompleted => commands::clear_completed(storage, out),
        TaskCommand::ClearAll { yes } => commands::clear_all(storage, yes, out),
    }
}

fn run_tui(explicit_dir: Option<&Path>, verbose: u8) -> Result<()> {
    let data_dir = ensure_data_dir(&resolve_data_dir(explicit_dir)?)?;
    let _guard = init_tracing(verbose, LogTarget::File(&data_dir))?;
    info!(data_dir = %data_dir.display(), "starting taskpad");

    let settings = load_settings(settings_file(&data_dir))?;

    let (cols, rows) = crossterm::terminal::size()?;
    let background = settings.show_background.then(|| {
        Background::new(
            &mut rand::thread_rng(),
            settings.blob_count,
            cols as f64 * CELL_WIDTH_UNITS,
            rows as f64 * CELL_HEIGHT_UNITS,
        )
    });

    let storage = FileStorage::new(storage_file(&data_dir));
    info!(path = %storage.path().display(), "opening task storage");
    let mut app = AppState::new(storage, settings, background)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    // Rows still fading out are deleted for good
    if let Err(e) = app.flush_removals() {
        error!(error = %e, "failed to commit pending removals");
        eprintln!("Error saving tasks: {}", e);
    }

    if let Err(err) = result {
        error!(error = %err, "taskpad exited with an error");
        eprintln!("Error: {}", err);
    }

    Ok(())
}

fn run_app<S: KeyValueStorage>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState<S>,
) -> Result<()> {
    let frame = ticker::frame_duration();

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(frame)? {
            let now = Instant::now();
            let handled = match event::read()? {
                // Only process key press events (ignore key release)
                Event::Key(key) if key.kind == KeyEventKind::Press => input::handle_key(app, key, now),
                Event::Mouse(mouse) => input::handle_mouse(app, mouse, now).map(|_| false),
                Event::Resize(cols, rows) => {
                    app.resize(cols, rows);
                    Ok(false)
                }
                _ => Ok(false),
            };

            match handled {
                Ok(true) => return Ok(()),
                Ok(false) => {}
                Err(e) => {
                    error!(error = %e, "event handling failed");
                    app.report_error(&e);
                }
            }
        }

        if let Err(e) = app.tick(Instant::now()) {
            error!(error = %e, "frame update failed");
            app.report_error(&e);
        }
    }
}
