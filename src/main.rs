use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    sync::Arc,
    time::Duration,
};

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::{info, warn};

use swiftscribe::{
    app::{App, Control, COUNTDOWN_INTERVAL},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    difficulty::Difficulty,
    logging,
    quote::{HttpQuoteProvider, QuoteProvider, StaticQuoteProvider},
    runtime::{AppEventSource, CrosstermEventSource, FixedTicker, Runner, Ticker},
};

/// typing speed trainer with difficulty-tuned pass/fail results
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type a random quote against the clock. Each difficulty sets the time limit and the words-per-minute you need to pass; accuracy must stay at 90% or above."
)]
pub struct Cli {
    /// difficulty to start with (defaults to the last one used)
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// endpoint returning a JSON object with a `quote` field
    #[clap(long)]
    quote_url: Option<String>,

    /// fixed text to type instead of fetching a quote
    #[clap(short = 'p', long)]
    prompt: Option<String>,

    /// quote request timeout in seconds
    #[clap(long)]
    timeout_secs: Option<u64>,

    /// where to write the log file
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Layer command line overrides on top of the stored config
    fn apply(&self, mut config: Config) -> Config {
        if let Some(difficulty) = self.difficulty {
            config.difficulty = difficulty;
        }
        if let Some(url) = &self.quote_url {
            config.quote_url = url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.request_timeout_secs = secs;
        }
        config
    }

    fn quote_provider(&self, config: &Config) -> Result<Arc<dyn QuoteProvider>, Box<dyn Error>> {
        let provider: Arc<dyn QuoteProvider> = match &self.prompt {
            Some(prompt) => Arc::new(StaticQuoteProvider::new(prompt.clone())),
            None => Arc::new(HttpQuoteProvider::new(
                config.quote_url.clone(),
                Duration::from_secs(config.request_timeout_secs),
            )?),
        };
        Ok(provider)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(log_path) = cli.log_file.clone().or_else(AppDirs::log_path) {
        if let Err(err) = logging::init(&log_path) {
            eprintln!("logging disabled: {err}");
        }
    }

    let store = FileConfigStore::new();
    let mut config = cli.apply(store.load());
    let provider = cli.quote_provider(&config)?;
    info!(difficulty = %config.difficulty, "starting");

    let source = CrosstermEventSource::new();
    let mut app = App::new(
        config.difficulty,
        provider,
        source.sender(),
        COUNTDOWN_INTERVAL,
    );
    let runner = Runner::new(
        source,
        FixedTicker::new(Duration::from_millis(config.tick_interval_ms)),
    );

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &runner, &store, &mut config);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: Backend, E: AppEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
    store: &impl ConfigStore,
    config: &mut Config,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| f.render_widget(app.view(), f.area()))?;

        if app.handle(runner.step()) == Control::Quit {
            break;
        }

        if app.difficulty() != config.difficulty {
            config.difficulty = app.difficulty();
            if let Err(err) = store.save(config) {
                warn!(error = %err, "could not save config");
            }
        }
    }

    info!("exiting");
    Ok(())
}
