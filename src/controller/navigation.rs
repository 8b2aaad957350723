//! Navigation-related controller methods (library, playlists, search)

use crate::model::{ActiveSection, LibraryItem, Playlist};
use super::AppController;

impl AppController {
    /// Fetch a page of the library and show it in the content area
    pub async fn load_songs(&self, page: u32, query: Option<String>) {
        let Some(client) = self.client().await else {
            return;
        };
        self.model.lock().await.set_content_loading(true).await;

        match client.list_songs(page, self.page_size, query.as_deref()).await {
            Ok(songs) => {
                tracing::info!(page, count = songs.len(), query = ?query, "Loaded songs");
                let model = self.model.lock().await;
                if songs.is_empty() && page > 1 {
                    model.set_content_loading(false).await;
                    model.set_status("No more songs".to_string()).await;
                    return;
                }
                model.set_songs(songs, page, query).await;
            }
            Err(e) => {
                tracing::error!(page, error = %e, "Loading songs failed");
                self.model.lock().await.set_content_loading(false).await;
                self.show_api_error(&e).await;
            }
        }
    }

    pub async fn perform_search(&self, query: &str) {
        tracing::debug!(query, "Performing search");
        let query = query.trim();
        let query = (!query.is_empty()).then(|| query.to_string());

        self.load_songs(1, query).await;
        self.model.lock().await.set_active_section(ActiveSection::MainContent).await;
    }

    pub async fn next_page(&self) {
        let Some((page, query)) = self.model.lock().await.songs_page().await else {
            return;
        };
        self.load_songs(page + 1, query).await;
    }

    pub async fn previous_page(&self) {
        let Some((page, query)) = self.model.lock().await.songs_page().await else {
            return;
        };
        if page > 1 {
            self.load_songs(page - 1, query).await;
        }
    }

    pub async fn load_user_playlists(&self) {
        let Some(client) = self.client().await else {
            return;
        };

        match client.list_playlists().await {
            Ok(playlists) => {
                self.model.lock().await.set_playlists(playlists).await;
            }
            Err(e) => self.show_api_error(&e).await,
        }
    }

    pub async fn open_playlist(&self, playlist_id: i64) {
        let Some(client) = self.client().await else {
            return;
        };
        self.model.lock().await.set_content_loading(true).await;

        let result = futures::try_join!(client.get_playlist(playlist_id), client.playlist_songs(playlist_id));
        match result {
            Ok((playlist, entries)) => {
                tracing::info!(playlist_id, songs = entries.len(), "Opened playlist");
                let songs = entries.into_iter().map(|entry| entry.song).collect();
                let model = self.model.lock().await;
                model.set_playlist_detail(playlist, songs).await;
                model.set_active_section(ActiveSection::MainContent).await;
            }
            Err(e) => {
                tracing::error!(playlist_id, error = %e, "Opening playlist failed");
                self.model.lock().await.set_content_loading(false).await;
                self.show_api_error(&e).await;
            }
        }
    }

    /// Re-read a playlist's songs after a change, if it is on screen
    pub(crate) async fn refresh_open_playlist(&self, playlist: &Playlist) {
        let Some(client) = self.client().await else {
            return;
        };

        match client.playlist_songs(playlist.id).await {
            Ok(entries) => {
                let songs = entries.into_iter().map(|entry| entry.song).collect();
                self.model.lock().await.update_playlist_detail_if_visible(playlist.id, songs).await;
            }
            Err(e) => self.show_api_error(&e).await,
        }
    }

    pub async fn open_library_item(&self, item: LibraryItem) {
        match item {
            LibraryItem::Songs => {
                let query = self.model.lock().await.get_search_query().await;
                self.perform_search(&query).await;
            }
            LibraryItem::Queue => self.show_queue().await,
        }
    }

    /// Fetch the selected song's full record and show it in a popup
    pub async fn show_selected_song_info(&self) {
        let Some(song) = self.model.lock().await.get_selected_song().await else {
            return;
        };
        let Some(client) = self.client().await else {
            return;
        };

        match client.get_song(song.id).await {
            Ok(fresh) => self.model.lock().await.show_song_info(fresh).await,
            Err(e) => self.show_api_error(&e).await,
        }
    }
}
