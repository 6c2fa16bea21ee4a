use brickmath::{
    api::{ApiClient, HttpApi},
    app::App,
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore, GameMode},
    effects::{Effects, Flow},
    runtime::{CrosstermEventSource, FixedTicker, Runner},
    sound::{self, Muted, SoundSink, TerminalBell},
};
use clap::{error::ErrorKind, Args, CommandFactory, Parser, Subcommand};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use tracing_subscriber::EnvFilter;

const TICK_RATE_MS: u64 = 50;

/// brick-themed arithmetic practice for kids
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "Timed arithmetic sessions for kids aged 3 to 12, answered by multiple choice or drag and drop, with stars and confetti. Exercises and progress live on the backend.",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    play: PlayArgs,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// launch the game (default)
    Play(PlayArgs),
    /// render every sound cue to a WAV file
    Sounds {
        /// directory to write the files into
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },
}

#[derive(Args, Debug, Clone, Default)]
struct PlayArgs {
    /// backend base URL
    #[arg(long, env = "BRICKMATH_BACKEND_URL")]
    backend_url: Option<String>,

    /// how answers are given
    #[arg(short, long, value_enum)]
    mode: Option<GameMode>,

    /// session length in seconds
    #[arg(short, long)]
    seconds: Option<u32>,

    /// exercises requested per session
    #[arg(short, long)]
    count: Option<usize>,

    /// do not ring the terminal bell
    #[arg(long)]
    mute: bool,
}

impl PlayArgs {
    /// Flags override the stored preferences
    fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.backend_url {
            config.backend_url = url.clone();
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(seconds) = self.seconds {
            config.session_secs = seconds;
        }
        if let Some(count) = self.count {
            config.exercise_count = count;
        }
        if self.mute {
            config.sound = false;
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Sounds { out }) => export_sounds(&out),
        Some(Commands::Play(args)) => play(&args),
        None => play(&cli.play),
    }
}

fn export_sounds(out: &Path) -> Result<(), Box<dyn Error>> {
    for path in sound::export_all(out)? {
        println!("{}", path.display());
    }
    Ok(())
}

/// Log to a file; the terminal belongs to the TUI
fn init_tracing() {
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(dir) = path.parent() {
        if fs::create_dir_all(dir).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
}

fn play(args: &PlayArgs) -> Result<(), Box<dyn Error>> {
    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_tracing();

    let store = FileConfigStore::new();
    let mut config = store.load();
    args.apply(&mut config);
    if let Err(e) = store.save(&config) {
        tracing::warn!(path = %store.path().display(), error = %e, "config not saved");
    }
    let api: Arc<dyn ApiClient> = Arc::new(HttpApi::new(&config.backend_url)?);
    tracing::info!(backend = %config.backend_url, mode = %config.mode, "starting");

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, config, api);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    config: Config,
    api: Arc<dyn ApiClient>,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    let sink: Box<dyn SoundSink> = if config.sound {
        Box::new(TerminalBell::new(io::stderr()))
    } else {
        Box::new(Muted)
    };
    let mut effects = Effects::new(api, runner.sender(), sink);

    let size = terminal.size()?;
    let mut app = App::new(config, Rect::new(0, 0, size.width, size.height));
    let mut last = Instant::now();

    loop {
        terminal.draw(|f| f.render_widget(&app, f.area()))?;

        let event = runner.step();
        let now = Instant::now();
        let mut commands = app.advance(now - last);
        last = now;

        commands.extend(app.handle_event(event));
        if effects.run(commands) == Flow::Quit {
            tracing::info!("quit");
            return Ok(());
        }
    }
}
