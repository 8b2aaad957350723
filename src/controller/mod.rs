//! Controller module - Application logic and event handling
//!
//! This module contains the application controller that handles user input,
//! coordinates between the model, the catalog client and the player.
//! It is organized into submodules by responsibility:
//!
//! - `input`: Key event handling
//! - `playback`: Playback and queue control methods
//! - `navigation`: Library/playlist/search navigation
//! - `editing`: Uploads, song edits and playlist management
//! - `player_events`: Audio device event listener

mod input;
mod playback;
mod navigation;
mod editing;
mod player_events;

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::model::{ApiError, AppModel, MelodyClient};
use crate::player::{PlaybackController, PlayerSnapshot, RodioDevice};

pub type SharedPlayer = Arc<Mutex<PlaybackController<RodioDevice>>>;

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<Mutex<AppModel>>,
    pub(crate) player: SharedPlayer,
    page_size: u32,
    session_file: PathBuf,
}

impl AppController {
    pub fn new(model: Arc<Mutex<AppModel>>, player: SharedPlayer, page_size: u32, session_file: PathBuf) -> Self {
        Self {
            model,
            player,
            page_size,
            session_file,
        }
    }

    pub async fn player_snapshot(&self) -> PlayerSnapshot {
        self.player.lock().await.snapshot()
    }

    pub(crate) async fn client(&self) -> Option<MelodyClient> {
        self.model.lock().await.get_client().await
    }

    pub(crate) async fn show_api_error(&self, error: &ApiError) {
        let model = self.model.lock().await;
        model.set_error(Self::format_error(error)).await;
    }

    pub(crate) async fn show_status(&self, message: impl Into<String>) {
        let model = self.model.lock().await;
        model.set_status(message.into()).await;
    }

    pub(crate) fn format_error(error: &ApiError) -> String {
        match error {
            ApiError::Unauthorized => "Session expired. Press O to log out and sign in again.".to_string(),
            ApiError::Network(_) => "Cannot reach the music server. Check your connection.".to_string(),
            other => format!("Error: {other}"),
        }
    }
}
