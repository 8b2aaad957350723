//! Playback control methods

use crate::model::{ActiveSection, AppModel, ContentView};
use super::AppController;

const VOLUME_STEP: i32 = 5;
const SEEK_STEP_PERCENT: f64 = 5.0;

impl AppController {
    pub async fn toggle_playback(&self) {
        let mut player = self.player.lock().await;
        player.toggle_play();
        tracing::debug!(state = ?player.state(), "Playback toggled");
    }

    pub async fn stop_playback(&self) {
        self.player.lock().await.stop();
        tracing::info!("Playback stopped");
    }

    pub async fn next_track(&self) {
        let mut player = self.player.lock().await;
        player.next_song();
        tracing::debug!(position = ?player.position(), "Next track");
    }

    pub async fn previous_track(&self) {
        let mut player = self.player.lock().await;
        player.previous_song();
        tracing::debug!(position = ?player.position(), "Previous track");
    }

    pub async fn cycle_play_mode(&self) {
        let mode = {
            let mut player = self.player.lock().await;
            player.toggle_play_mode();
            player.mode()
        };
        self.show_status(format!("Play mode: {}", mode.label())).await;
    }

    pub async fn toggle_mute(&self) {
        self.player.lock().await.toggle_mute();
    }

    pub async fn volume_up(&self) {
        let mut player = self.player.lock().await;
        let volume = player.volume() as i32 + VOLUME_STEP;
        player.set_volume(volume);
    }

    pub async fn volume_down(&self) {
        let mut player = self.player.lock().await;
        let volume = player.volume() as i32 - VOLUME_STEP;
        player.set_volume(volume);
    }

    pub async fn seek_forward(&self) {
        self.player.lock().await.seek_by(SEEK_STEP_PERCENT);
    }

    pub async fn seek_backward(&self) {
        self.player.lock().await.seek_by(-SEEK_STEP_PERCENT);
    }

    /// Play the highlighted row. Library and playlist rows make the whole
    /// listing the queue; queue rows jump within the existing queue.
    pub async fn play_selected(&self) {
        let model = self.model.lock().await;
        let Some(song) = model.get_selected_song().await else {
            return;
        };

        if let Some(index) = self.queue_view_index(&model).await {
            drop(model);
            self.player.lock().await.play_by_index(index);
            return;
        }

        let listing = model.get_visible_songs().await;
        drop(model);

        tracing::info!(song_id = song.id, queue_len = listing.len(), "Playing from listing");
        self.player.lock().await.play_with_queue(&song, &listing);
    }

    pub async fn add_selected_to_queue(&self) {
        let Some(song) = self.model.lock().await.get_selected_song().await else {
            return;
        };

        self.player.lock().await.add_to_queue(&song);
        self.show_status(format!("Added \"{}\" to the queue", song.title)).await;
    }

    pub async fn remove_selected_from_queue(&self) {
        let Some(song) = self.model.lock().await.get_selected_song().await else {
            return;
        };

        let queue = {
            let mut player = self.player.lock().await;
            player.remove_from_queue(song.id);
            player.queue().to_vec()
        };
        self.model.lock().await.update_queue_if_visible(&queue).await;
    }

    pub async fn clear_queue(&self) {
        self.player.lock().await.clear_queue();
        self.model.lock().await.update_queue_if_visible(&[]).await;
        self.show_status("Queue cleared").await;
    }

    pub async fn show_queue(&self) {
        let (queue, position) = {
            let player = self.player.lock().await;
            (player.queue().to_vec(), player.position())
        };

        let model = self.model.lock().await;
        model.show_queue(queue, position.unwrap_or(0)).await;
        model.set_active_section(ActiveSection::MainContent).await;
    }

    async fn queue_view_index(&self, model: &AppModel) -> Option<usize> {
        match model.current_view().await {
            ContentView::Queue { selected_index, .. } => Some(selected_index),
            _ => None,
        }
    }
}
