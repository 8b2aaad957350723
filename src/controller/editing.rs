//! Uploads, song edits and playlist management

use crate::auth;
use crate::model::{
    is_valid_audio_file, ContentView, InputPrompt, PlaylistSongOrder, PlaylistUpdate, PromptKind,
    SongDraft, SongField, UploadMetadata,
};
use super::AppController;

impl AppController {
    // ========================================================================
    // Prompts
    // ========================================================================

    pub async fn begin_upload(&self) {
        let model = self.model.lock().await;
        model.open_prompt(InputPrompt::new(PromptKind::UploadPath, "")).await;
    }

    pub async fn begin_new_playlist(&self) {
        let model = self.model.lock().await;
        model.open_prompt(InputPrompt::new(PromptKind::NewPlaylist, "")).await;
    }

    pub async fn begin_rename_playlist(&self) {
        let model = self.model.lock().await;
        if let Some(playlist) = model.get_selected_playlist().await {
            let kind = PromptKind::RenamePlaylist { playlist_id: playlist.id };
            model.open_prompt(InputPrompt::new(kind, playlist.name)).await;
        }
    }

    pub async fn begin_edit_song(&self) {
        let model = self.model.lock().await;
        if let Some(song) = model.get_selected_song().await {
            let draft = SongDraft::from_song(&song);
            let initial = draft.get(SongField::Title).to_string();
            let kind = PromptKind::EditSong { song_id: song.id, field: SongField::Title, draft };
            model.open_prompt(InputPrompt::new(kind, initial)).await;
        }
    }

    /// Act on the text typed into the open prompt
    pub async fn submit_prompt(&self) {
        let Some(prompt) = self.model.lock().await.take_prompt().await else {
            return;
        };
        let value = prompt.buffer.trim().to_string();

        match prompt.kind {
            PromptKind::UploadPath => self.upload_file(&value).await,
            PromptKind::NewPlaylist => self.create_playlist(&value).await,
            PromptKind::RenamePlaylist { playlist_id } => self.rename_playlist(playlist_id, &value).await,
            PromptKind::EditSong { song_id, field, mut draft } => {
                draft.set(field, value);
                match field.next() {
                    Some(next) => {
                        let initial = draft.get(next).to_string();
                        let kind = PromptKind::EditSong { song_id, field: next, draft };
                        self.model.lock().await.open_prompt(InputPrompt::new(kind, initial)).await;
                    }
                    None => self.save_song_edit(song_id, draft).await,
                }
            }
        }
    }

    // ========================================================================
    // Songs
    // ========================================================================

    async fn upload_file(&self, path: &str) {
        if path.is_empty() {
            return;
        }
        if !is_valid_audio_file(path) {
            self.model
                .lock()
                .await
                .set_error("Only mp3, flac and wav files can be uploaded".to_string())
                .await;
            return;
        }
        let Some(client) = self.client().await else {
            return;
        };

        self.show_status("Uploading...").await;
        match client.upload_song(path, &UploadMetadata::default()).await {
            Ok(song) => {
                tracing::info!(song_id = song.id, path, "Uploaded song");
                self.show_status(format!("Uploaded \"{}\"", song.title)).await;
                if let Some((page, query)) = self.model.lock().await.songs_page().await {
                    self.load_songs(page, query).await;
                }
            }
            Err(e) => self.show_api_error(&e).await,
        }
    }

    async fn save_song_edit(&self, song_id: i64, draft: SongDraft) {
        let Some(update) = draft.into_update() else {
            self.model
                .lock()
                .await
                .set_error("Title and artist cannot be empty".to_string())
                .await;
            return;
        };
        let Some(client) = self.client().await else {
            return;
        };

        match client.update_song(song_id, &update).await {
            Ok(song) => {
                tracing::info!(song_id, "Updated song");
                self.model.lock().await.replace_song_in_view(&song).await;
                self.show_status("Song updated").await;
            }
            Err(e) => self.show_api_error(&e).await,
        }
    }

    pub async fn delete_selected_song(&self) {
        let Some(song) = self.model.lock().await.get_selected_song().await else {
            return;
        };
        let Some(client) = self.client().await else {
            return;
        };

        match client.delete_song(song.id).await {
            Ok(()) => {
                tracing::info!(song_id = song.id, "Deleted song");
                self.player.lock().await.remove_from_queue(song.id);
                let model = self.model.lock().await;
                model.remove_song_from_view(song.id).await;
                model.set_status(format!("Deleted \"{}\"", song.title)).await;
            }
            Err(e) => self.show_api_error(&e).await,
        }
    }

    pub async fn refresh_selected_cover(&self) {
        let Some(song) = self.model.lock().await.get_selected_song().await else {
            return;
        };
        let Some(client) = self.client().await else {
            return;
        };

        match client.refresh_cover(song.id).await {
            Ok(updated) => {
                let found = updated.cover_url.is_some();
                self.model.lock().await.replace_song_in_view(&updated).await;
                self.show_status(if found { "Cover updated" } else { "No cover found" }).await;
            }
            Err(e) => self.show_api_error(&e).await,
        }
    }

    // ========================================================================
    // Playlists
    // ========================================================================

    async fn create_playlist(&self, name: &str) {
        if name.is_empty() {
            return;
        }
        let Some(client) = self.client().await else {
            return;
        };

        match client.create_playlist(name, None).await {
            Ok(playlist) => {
                tracing::info!(playlist_id = playlist.id, "Created playlist");
                self.show_status(format!("Created playlist \"{}\"", playlist.name)).await;
                self.load_user_playlists().await;
            }
            Err(e) => self.show_api_error(&e).await,
        }
    }

    async fn rename_playlist(&self, playlist_id: i64, name: &str) {
        if name.is_empty() {
            return;
        }
        let Some(client) = self.client().await else {
            return;
        };

        let update = PlaylistUpdate { name: Some(name.to_string()), description: None };
        match client.update_playlist(playlist_id, &update).await {
            Ok(playlist) => {
                self.model.lock().await.rename_playlist_if_visible(&playlist).await;
                self.load_user_playlists().await;
            }
            Err(e) => self.show_api_error(&e).await,
        }
    }

    pub async fn delete_selected_playlist(&self) {
        let Some(playlist) = self.model.lock().await.get_selected_playlist().await else {
            return;
        };
        let Some(client) = self.client().await else {
            return;
        };

        match client.delete_playlist(playlist.id).await {
            Ok(()) => {
                tracing::info!(playlist_id = playlist.id, "Deleted playlist");
                let showing = self.model.lock().await.open_playlist_id().await == Some(playlist.id);
                if showing {
                    self.load_songs(1, None).await;
                }
                self.show_status(format!("Deleted playlist \"{}\"", playlist.name)).await;
                self.load_user_playlists().await;
            }
            Err(e) => self.show_api_error(&e).await,
        }
    }

    /// Add the highlighted song to the playlist selected in the sidebar
    pub async fn add_selected_to_playlist(&self) {
        let (song, playlist) = {
            let model = self.model.lock().await;
            (model.get_selected_song().await, model.get_selected_playlist().await)
        };
        let (Some(song), Some(playlist)) = (song, playlist) else {
            self.model
                .lock()
                .await
                .set_error("Select a song and a playlist first".to_string())
                .await;
            return;
        };
        let Some(client) = self.client().await else {
            return;
        };

        match client.add_song_to_playlist(playlist.id, song.id).await {
            Ok(()) => {
                self.show_status(format!("Added \"{}\" to {}", song.title, playlist.name)).await;
                self.refresh_open_playlist(&playlist).await;
            }
            Err(e) => self.show_api_error(&e).await,
        }
    }

    pub async fn remove_selected_from_playlist(&self) {
        let view = self.model.lock().await.current_view().await;
        let ContentView::PlaylistDetail { playlist, .. } = &view else {
            return;
        };
        let Some(song) = view.selected_song().cloned() else {
            return;
        };
        let Some(client) = self.client().await else {
            return;
        };

        match client.remove_song_from_playlist(playlist.id, song.id).await {
            Ok(()) => {
                self.model.lock().await.remove_song_from_view(song.id).await;
            }
            Err(e) => self.show_api_error(&e).await,
        }
    }

    /// Move the highlighted playlist song one row and send the new order
    pub async fn move_selected_in_playlist(&self, up: bool) {
        let Some((playlist_id, songs)) = self.model.lock().await.move_playlist_song(up).await else {
            return;
        };
        let Some(client) = self.client().await else {
            return;
        };

        let order = PlaylistSongOrder::from_songs(&songs);
        if let Err(e) = client.reorder_playlist(playlist_id, &order).await {
            tracing::error!(playlist_id, error = %e, "Reordering playlist failed");
            self.show_api_error(&e).await;
            // put the server's order back on screen
            self.open_playlist(playlist_id).await;
        }
    }

    // ========================================================================
    // Session
    // ========================================================================

    pub async fn logout(&self) {
        self.player.lock().await.stop();
        if let Some(client) = self.client().await {
            client.set_token(None).await;
        }
        if let Err(e) = auth::clear_session(&self.session_file) {
            tracing::warn!(error = %e, "Could not remove stored session");
        }
        tracing::info!("Logged out");
        self.model.lock().await.set_should_quit(true).await;
    }
}
