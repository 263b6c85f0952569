// Native binary for pokeview - Terminal UI mode

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    fs::OpenOptions,
    io,
    path::Path,
    sync::Arc,
    time::Instant,
};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

use pokeview::{
    api::{CatalogApi, HttpCatalog},
    app::App,
    config::load,
    input::{frame_budget, handle_key, poll_wait},
    router::{self, Route},
    types::{AppEvent, FetchCommand},
    ui,
    worker::run_fetch_worker,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (safe to ignore if not found)
    let _ = dotenvy::dotenv();

    let cfg = load().context("Failed to load configuration")?;
    if let Some(path) = &cfg.log_file {
        init_logging(path)?;
    }
    cfg.log_summary();

    // fetch worker
    let (fetch_tx, fetch_rx) = unbounded_channel::<FetchCommand>();
    let (tx, rx) = unbounded_channel::<AppEvent>();
    let api: Arc<dyn CatalogApi> = Arc::new(HttpCatalog::new(cfg.endpoints(), cfg.timeout_ms));
    let worker = tokio::spawn(run_fetch_worker(api, fetch_rx, tx));

    // Deep link from the positional argument, e.g. `pokeview pokeview://pokemon/25`
    let start = cfg.start_route.as_deref().map(router::parse).unwrap_or(Route::List);
    if let Some(raw) = &cfg.start_route {
        log::info!("Applied start route from CLI: {raw} -> {start}");
    }

    let mut app = App::new(
        cfg.endpoints(),
        cfg.page_size,
        cfg.render_fps,
        cfg.theme,
        Some(fetch_tx),
        start,
    );

    // terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_loop(&mut app, &mut terminal, rx).await;

    // Dropping the app closes the command channel; the worker aborts what is left.
    drop(app);
    if let Err(e) = worker.await {
        log::warn!("fetch worker ended abnormally: {e}");
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

/// The terminal belongs to the UI, so logs go to a file
fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

async fn run_loop(
    app: &mut App,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut rx: UnboundedReceiver<AppEvent>,
) -> Result<()> {
    let mut last_frame = Instant::now();
    let mut dirty = true;

    loop {
        let budget = frame_budget(app.fps());
        let wait = poll_wait(budget, last_frame.elapsed(), dirty || busy(app));

        if event::poll(wait)? {
            match event::read()? {
                Event::Key(k) if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat => {
                    handle_key(app, k);
                    dirty = true;
                }
                Event::Resize(_, _) => dirty = true,
                _ => {}
            }
        }
        while let Ok(ev) = rx.try_recv() {
            app.on_event(ev);
            dirty = true;
        }

        if (dirty || busy(app)) && last_frame.elapsed() >= budget {
            terminal.draw(|f| ui::draw(f, app))?;
            last_frame = Instant::now();
            dirty = false;
        }
        if app.quit_flag() {
            break;
        }
    }
    Ok(())
}

/// Something on screen animates (spinner) or may expire (toast)
fn busy(app: &App) -> bool {
    app.paged().is_some_and(|f| f.is_loading())
        || app.incremental().is_some_and(|f| f.is_loading())
        || app.detail().is_some_and(|f| f.is_loading())
        || app.toast_message().is_some()
}
