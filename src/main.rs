// src/main.rs
mod app;
mod config;
mod input;
mod models;
mod network;
mod panel;
mod scroll;
mod theme;
mod ui;

use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::config::Settings;
use crate::models::Tab;
use crate::network::{FixtureApi, FollowApi, HttpFollowApi};
use crate::panel::Panel;
use crate::theme::Theme;

/// Browse followers and following in the terminal.
#[derive(Parser, Debug)]
#[command(name = "followpanel", version, about = "Tabbed follow list with infinite scrolling")]
struct Args {
    /// Serve pages from built-in fixture data instead of the backend.
    #[arg(long)]
    demo: bool,

    /// Config file to use instead of ~/.config/followpanel/followpanel.toml.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Backend base URL, e.g. http://localhost:8080/api.
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Tab shown on start.
    #[arg(long, default_value = "followers")]
    tab: Tab,

    /// Users per page.
    #[arg(long, value_name = "N")]
    page_size: Option<u32>,

    /// Store --base-url in the config file for later runs.
    #[arg(long, requires = "base_url")]
    remember: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = Settings::new(args.config.as_deref())?;
    apply_overrides(&mut settings, &args)?;
    init_logging(&settings)?;

    if args.remember {
        let path = match &args.config {
            Some(path) => path.clone(),
            None => config::get_user_config_path()?,
        };
        config::save_setting(&path, "api_base_url", toml::Value::String(settings.api_base_url.clone()))?;
        info!(path = %path.display(), "saved base url");
    }

    let rt = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
    // The demo fails page 2 of Following once so the retry path can be seen.
    let fixture = args.demo.then(|| {
        Arc::new(
            FixtureApi::new(137, 42)
                .with_latency(Duration::from_millis(400))
                .fail_once(Tab::Following, 2),
        )
    });
    let api: Arc<dyn FollowApi> = match &fixture {
        Some(fixture) => Arc::clone(fixture) as Arc<dyn FollowApi>,
        None => Arc::new(HttpFollowApi::new(&settings.api_base_url, settings.request_timeout())?),
    };
    info!(demo = args.demo, base_url = %settings.api_base_url, page_size = settings.page_size, "starting");

    let panel = Panel::new(settings.panel_config(), args.tab);
    let mut app = App::new(panel, api, rt.handle().clone(), settings.sentinel_threshold);

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app, settings.tick_rate());

    app.shutdown();
    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    if let Some(fixture) = fixture {
        info!(requests = fixture.calls(), "demo session finished");
    }
    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tick_rate: Duration,
) -> Result<()> {
    let theme = Theme::default();
    app.start();

    loop {
        terminal.draw(|f| ui::render(f, app, &theme))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                    break;
                }
                if !input::handle_key(app, key.code) {
                    break;
                }
            }
        }
        app.pump();
    }
    Ok(())
}

fn apply_overrides(settings: &mut Settings, args: &Args) -> Result<()> {
    if let Some(url) = &args.base_url {
        settings.api_base_url = url.clone();
    }
    if let Some(size) = args.page_size {
        settings.page_size = size;
    }
    settings.validate()
}

fn init_logging(settings: &Settings) -> Result<()> {
    let path = settings.log_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    // RUST_LOG wins over the configured level.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("followpanel={}", settings.log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialise logging: {}", e))
}
