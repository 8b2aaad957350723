mod auth;
mod config;
mod controller;
mod logging;
mod model;
mod player;
mod view;

use std::io;
use std::sync::Arc;
use std::time::Duration;
use anyhow::{Context, Result};
use tokio::sync::Mutex;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use view::AppView;
use config::Config;
use controller::AppController;
use model::{AppModel, MelodyClient};
use player::{PlaybackController, PlaybackError, RodioDevice};

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== melody-rs starting ===");

    let config = Config::from_env();
    tracing::info!(api_url = %config.api_url, page_size = config.page_size, "Configuration loaded");

    let client = MelodyClient::new(&config.api_url, config.http_timeout)?;

    // Log in before the TUI takes over the terminal
    let session = auth::establish_session(&client, &config).await?;

    let (device, device_events) = RodioDevice::spawn(config.http_timeout)
        .map_err(|e| PlaybackError::Output(format!("{e:#}")))
        .context("Cannot start audio playback")?;
    let player = Arc::new(Mutex::new(PlaybackController::new(device, client.stream_urls().await)));

    let mut app_model = AppModel::new();
    app_model.set_client(client);
    app_model.set_username(session.user.username.clone()).await;

    let model = Arc::new(Mutex::new(app_model));
    let controller = AppController::new(model.clone(), player, config.page_size, config.session_file());
    controller.start_player_event_listener(device_events);

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let controller_for_init = controller.clone();
    tokio::spawn(async move {
        controller_for_init.load_user_playlists().await;
        controller_for_init.load_songs(1, None).await;
    });

    let res = run_app(&mut terminal, model.clone(), controller).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("melody-rs shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<Mutex<AppModel>>,
    controller: AppController,
) -> io::Result<()> {
    loop {
        let snapshot = controller.player_snapshot().await;

        let (ui_state, content_state, should_quit) = {
            let model_guard = model.lock().await;

            model_guard.auto_clear_old_messages().await;
            model_guard.update_queue_if_visible(&snapshot.queue).await;

            (
                model_guard.get_ui_state().await,
                model_guard.get_content_state().await,
                model_guard.should_quit().await,
            )
        };

        terminal.draw(|f| {
            AppView::render(f, &snapshot, &ui_state, &content_state);
        })?;

        if should_quit {
            break;
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Err(e) = controller.handle_key_event(key).await {
                    tracing::warn!(error = %e, "Key handling failed");
                }
            }
        }
    }

    Ok(())
}
