use std::fs::File;
use std::sync::{Arc, Mutex};

use tokenchart::api::ApiClient;
use tokenchart::config::fetch_config;
use tokenchart::refresh::spawn_refresh;
use tokenchart::tui::event::{spawn_event_reader, spawn_tick_timer, update};
use tokenchart::tui::{Action, App, render, restore_terminal, setup_terminal};
use tokenchart::{Result, TokenChartError};
use tracing::{error, info};

/// UI tick cadence, used to expire status messages.
const TICK_MS: u64 = 250;

#[tokio::main]
async fn main() -> Result<()> {
    let app_config = fetch_config()?;

    // The terminal belongs to the UI, so tracing output goes to a file.
    let log_file = File::create(&app_config.log_file).map_err(|e| {
        TokenChartError::Io(format!(
            "failed to create log file {}: {e}",
            app_config.log_file.display()
        ))
    })?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    info!(
        api = %app_config.api.base_url,
        contract = %app_config.api.contract,
        "Starting"
    );

    let client = Arc::new(ApiClient::new(&app_config.api)?);
    let mut app = App::new(client.contract());

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let mut terminal = setup_terminal()?;

    spawn_event_reader(tx.clone());
    spawn_tick_timer(tx.clone(), TICK_MS);
    let refresh = spawn_refresh(client, app_config.refresh_interval, tx);

    let outcome = run(&mut terminal, &mut app, &mut rx, &refresh).await;

    drop(refresh);
    restore_terminal(&mut terminal)?;
    if let Err(ref e) = outcome {
        error!(error = %e, "Exited with error");
    }
    info!("Stopped");
    outcome
}

async fn run(
    terminal: &mut tokenchart::tui::Tui,
    app: &mut App,
    rx: &mut tokio::sync::mpsc::UnboundedReceiver<tokenchart::tui::Message>,
    refresh: &tokenchart::refresh::RefreshHandle,
) -> Result<()> {
    while !app.should_quit {
        terminal
            .draw(|frame| render(frame, app))
            .map_err(|e| TokenChartError::Io(e.to_string()))?;

        let Some(message) = rx.recv().await else {
            break;
        };
        if let Some(Action::RefreshNow) = update(app, message) {
            refresh.refresh_now();
        }
    }
    Ok(())
}
