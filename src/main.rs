// src/main.rs

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info};
use vanguard_score::core::models::ScoreReport;
use vanguard_score::core::server_catalog::ServerCatalog;
use vanguard_score::{logging, ScoreConfig, ScoreEngine};

mod app;
mod cli;
mod ui;

use app::{App, AppState};
use cli::Cli;

type ScanOutcome = Result<ScoreReport, String>;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let log_path = logging::initialize_logging()?;
    info!(log = %log_path.display(), "Logging initialized.");

    let config = ScoreConfig::load(cli.config.as_deref()).wrap_err("failed to load configuration")?;
    let catalog = ServerCatalog::load(config.server_catalog_path.as_deref())
        .wrap_err("failed to load the web server catalog")?;
    let engine = Arc::new(ScoreEngine::from_config(&config, Arc::new(catalog))?);

    match cli.url {
        Some(url) => score_once(&engine, &cli::with_default_scheme(&url), cli.json).await,
        None => run_tui(engine).await,
    }
}

async fn score_once(engine: &ScoreEngine, url: &str, json: bool) -> Result<()> {
    let report = engine.compute_score(url).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &ScoreReport) {
    let score = &report.score;
    println!("{}", report.url);
    println!(
        "Score: {:.2} ({}/{})",
        score.normalized, score.achieved_total, score.max_total
    );
    if !report.badges.is_empty() {
        println!("\nBadges:");
        for badge in &report.badges {
            println!("  [{}] {}", badge.code, badge.title);
        }
    }
    if !score.messages.is_empty() {
        println!("\nWeaknesses:");
        for message in &score.messages {
            println!("  - {message}");
        }
    }
    let cert = &report.certificate;
    println!("\nCertificate:");
    match &cert.error {
        Some(e) => println!("  unavailable: {e}"),
        None => {
            if let Some(issuer) = &cert.issuer_common_name {
                println!("  issuer:  {issuer}");
            }
            if let Some(subject) = &cert.subject_common_name {
                println!("  subject: {subject}");
            }
            if let (Some(from), Some(until)) = (cert.not_before, cert.not_after) {
                println!("  valid:   {} to {}", from.date_naive(), until.date_naive());
            }
        }
    }
    if let Some(server) = &report.server {
        println!("\nServer: {} ({})", server.name, server.vendor);
    }
}

async fn run_tui(engine: Arc<ScoreEngine>) -> Result<()> {
    // --- Setup ---
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    enable_raw_mode()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;

    let mut app = App::new();
    let (tx, mut rx) = mpsc::channel::<ScanOutcome>(1);
    let outcome = event_loop(&mut terminal, &mut app, &engine, &tx, &mut rx).await;

    // --- Restore Terminal ---
    stdout().execute(LeaveAlternateScreen)?;
    stdout().execute(DisableMouseCapture)?;
    disable_raw_mode()?;
    outcome
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    engine: &Arc<ScoreEngine>,
    tx: &mpsc::Sender<ScanOutcome>,
    rx: &mut mpsc::Receiver<ScanOutcome>,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        if event::poll(Duration::from_millis(100))? {
            handle_events(app, engine, tx)?;
        }

        if let Ok(outcome) = rx.try_recv() {
            app.finish(outcome);
        }
        app.on_tick();
    }
    Ok(())
}

fn handle_events(app: &mut App, engine: &Arc<ScoreEngine>, tx: &mpsc::Sender<ScanOutcome>) -> Result<()> {
    if let Event::Key(key) = event::read()? {
        if key.kind == KeyEventKind::Press {
            match app.state {
                AppState::Idle => handle_idle_input(app, key.code, engine, tx),
                AppState::Finished => handle_finished_input(app, key.code),
                AppState::Scanning => {
                    if key.code == KeyCode::Char('q') {
                        app.quit();
                    }
                }
            }
        }
    }
    Ok(())
}

fn handle_idle_input(
    app: &mut App,
    key_code: KeyCode,
    engine: &Arc<ScoreEngine>,
    tx: &mpsc::Sender<ScanOutcome>,
) {
    match key_code {
        KeyCode::Esc => app.quit(),
        KeyCode::Char(c) => app.input.push(c),
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Enter => {
            if app.input.trim().is_empty() {
                return;
            }
            app.start_scan();
            let url = cli::with_default_scheme(&app.input);
            let engine = Arc::clone(engine);
            let tx = tx.clone();
            tokio::spawn(async move {
                let outcome = engine.compute_score(&url).await.map_err(|e| {
                    error!(url = %url, error = %e, "Score computation failed.");
                    e.to_string()
                });
                let _ = tx.send(outcome).await;
            });
        }
        _ => {}
    }
}

fn handle_finished_input(app: &mut App, key_code: KeyCode) {
    match key_code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('n') => app.reset(),
        KeyCode::Up => app.scroll_up(),
        KeyCode::Down => app.scroll_down(),
        _ => {}
    }
}
