//! Main application model with state management

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

use super::content::{ContentState, ContentView};
use super::library::{Playlist, Song};
use super::melody_client::MelodyClient;
use super::types::{ActiveSection, InputPrompt, LibraryItem, UiState};

const ERROR_DISPLAY_SECS: u64 = 5;
const STATUS_DISPLAY_SECS: u64 = 3;

/// Main application model containing all UI state
pub struct AppModel {
    pub client: Option<MelodyClient>,
    pub ui_state: Arc<Mutex<UiState>>,
    pub content_state: Arc<Mutex<ContentState>>,
    pub should_quit: Arc<Mutex<bool>>,
}

impl AppModel {
    pub fn new() -> Self {
        Self {
            client: None,
            ui_state: Arc::new(Mutex::new(UiState::default())),
            content_state: Arc::new(Mutex::new(ContentState::default())),
            should_quit: Arc::new(Mutex::new(false)),
        }
    }

    pub fn set_client(&mut self, client: MelodyClient) {
        self.client = Some(client);
    }

    pub async fn get_client(&self) -> Option<MelodyClient> {
        self.client.clone()
    }

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
    }

    // ========================================================================
    // Sidebar & Sections
    // ========================================================================

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    pub async fn set_username(&self, username: String) {
        self.ui_state.lock().await.username = Some(username);
    }

    pub async fn cycle_section_forward(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_section = state.active_section.next();
    }

    pub async fn cycle_section_backward(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_section = state.active_section.prev();
    }

    pub async fn set_active_section(&self, section: ActiveSection) {
        self.ui_state.lock().await.active_section = section;
    }

    pub async fn move_selection_up(&self) {
        let mut state = self.ui_state.lock().await;
        match state.active_section {
            ActiveSection::Library => {
                state.library_selected = state.library_selected.saturating_sub(1);
            }
            ActiveSection::Playlists => {
                state.playlist_selected = state.playlist_selected.saturating_sub(1);
            }
            _ => {}
        }
    }

    pub async fn move_selection_down(&self) {
        let mut state = self.ui_state.lock().await;
        match state.active_section {
            ActiveSection::Library => {
                if state.library_selected < LibraryItem::ALL.len() - 1 {
                    state.library_selected += 1;
                }
            }
            ActiveSection::Playlists => {
                if state.playlist_selected < state.playlists.len().saturating_sub(1) {
                    state.playlist_selected += 1;
                }
            }
            _ => {}
        }
    }

    pub async fn get_selected_library_item(&self) -> LibraryItem {
        let state = self.ui_state.lock().await;
        LibraryItem::ALL
            .get(state.library_selected)
            .copied()
            .unwrap_or(LibraryItem::Songs)
    }

    pub async fn append_to_search(&self, c: char) {
        self.ui_state.lock().await.search_query.push(c);
    }

    pub async fn backspace_search(&self) {
        self.ui_state.lock().await.search_query.pop();
    }

    pub async fn clear_search(&self) {
        self.ui_state.lock().await.search_query.clear();
    }

    pub async fn get_search_query(&self) -> String {
        self.ui_state.lock().await.search_query.clone()
    }

    /// Replace the sidebar playlists, keeping the selection on the same
    /// playlist when it still exists
    pub async fn set_playlists(&self, playlists: Vec<Playlist>) {
        let mut state = self.ui_state.lock().await;
        let selected_id = state.playlists.get(state.playlist_selected).map(|p| p.id);
        state.playlist_selected = selected_id
            .and_then(|id| playlists.iter().position(|p| p.id == id))
            .unwrap_or(0)
            .min(playlists.len().saturating_sub(1));
        state.playlists = playlists;
    }

    pub async fn get_selected_playlist(&self) -> Option<Playlist> {
        let state = self.ui_state.lock().await;
        state.playlists.get(state.playlist_selected).cloned()
    }

    // ========================================================================
    // Messages & Overlays
    // ========================================================================

    pub async fn set_error(&self, message: String) {
        let mut state = self.ui_state.lock().await;
        state.error_message = Some(message);
        state.error_timestamp = Some(Instant::now());
    }

    pub async fn clear_error(&self) {
        let mut state = self.ui_state.lock().await;
        state.error_message = None;
        state.error_timestamp = None;
    }

    pub async fn has_error(&self) -> bool {
        self.ui_state.lock().await.error_message.is_some()
    }

    pub async fn set_status(&self, message: String) {
        let mut state = self.ui_state.lock().await;
        state.status_message = Some(message);
        state.status_timestamp = Some(Instant::now());
    }

    pub async fn auto_clear_old_messages(&self) {
        let mut state = self.ui_state.lock().await;
        if let Some(timestamp) = state.error_timestamp {
            if timestamp.elapsed().as_secs() >= ERROR_DISPLAY_SECS {
                state.error_message = None;
                state.error_timestamp = None;
            }
        }
        if let Some(timestamp) = state.status_timestamp {
            if timestamp.elapsed().as_secs() >= STATUS_DISPLAY_SECS {
                state.status_message = None;
                state.status_timestamp = None;
            }
        }
    }

    pub async fn show_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = true;
    }

    pub async fn hide_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = false;
    }

    pub async fn is_help_popup_open(&self) -> bool {
        self.ui_state.lock().await.show_help_popup
    }

    pub async fn show_song_info(&self, song: Song) {
        self.ui_state.lock().await.song_info = Some(song);
    }

    pub async fn hide_song_info(&self) {
        self.ui_state.lock().await.song_info = None;
    }

    pub async fn is_song_info_open(&self) -> bool {
        self.ui_state.lock().await.song_info.is_some()
    }

    pub async fn open_prompt(&self, prompt: InputPrompt) {
        self.ui_state.lock().await.prompt = Some(prompt);
    }

    pub async fn take_prompt(&self) -> Option<InputPrompt> {
        self.ui_state.lock().await.prompt.take()
    }

    pub async fn is_prompt_open(&self) -> bool {
        self.ui_state.lock().await.prompt.is_some()
    }

    pub async fn prompt_push(&self, c: char) {
        if let Some(prompt) = self.ui_state.lock().await.prompt.as_mut() {
            prompt.buffer.push(c);
        }
    }

    pub async fn prompt_pop(&self) {
        if let Some(prompt) = self.ui_state.lock().await.prompt.as_mut() {
            prompt.buffer.pop();
        }
    }

    // ========================================================================
    // Content Area
    // ========================================================================

    pub async fn get_content_state(&self) -> ContentState {
        self.content_state.lock().await.clone()
    }

    pub async fn set_content_loading(&self, loading: bool) {
        self.content_state.lock().await.is_loading = loading;
    }

    pub async fn set_songs(&self, songs: Vec<Song>, page: u32, query: Option<String>) {
        let mut state = self.content_state.lock().await;
        state.view = ContentView::Songs { songs, selected_index: 0, page, query };
        state.is_loading = false;
    }

    pub async fn set_playlist_detail(&self, playlist: Playlist, songs: Vec<Song>) {
        let mut state = self.content_state.lock().await;
        state.view = ContentView::PlaylistDetail { playlist, songs, selected_index: 0 };
        state.is_loading = false;
    }

    /// Refresh the open playlist without moving the selection
    pub async fn update_playlist_detail_if_visible(&self, playlist_id: i64, new_songs: Vec<Song>) {
        let mut state = self.content_state.lock().await;
        if let ContentView::PlaylistDetail { playlist, songs, .. } = &mut state.view {
            if playlist.id == playlist_id {
                *songs = new_songs;
                state.view.clamp_selection();
            }
        }
    }

    pub async fn rename_playlist_if_visible(&self, updated: &Playlist) {
        let mut state = self.content_state.lock().await;
        if let ContentView::PlaylistDetail { playlist, .. } = &mut state.view {
            if playlist.id == updated.id {
                *playlist = updated.clone();
            }
        }
    }

    pub async fn show_queue(&self, songs: Vec<Song>, selected_index: usize) {
        let mut state = self.content_state.lock().await;
        state.view = ContentView::Queue { songs, selected_index };
        state.view.clamp_selection();
        state.is_loading = false;
    }

    pub async fn update_queue_if_visible(&self, queue: &[Song]) {
        let mut state = self.content_state.lock().await;
        if let ContentView::Queue { songs, .. } = &mut state.view {
            if songs.as_slice() != queue {
                *songs = queue.to_vec();
                state.view.clamp_selection();
            }
        }
    }

    pub async fn content_move_up(&self) {
        self.content_state.lock().await.view.move_up();
    }

    pub async fn content_move_down(&self) {
        self.content_state.lock().await.view.move_down();
    }

    pub async fn get_selected_song(&self) -> Option<Song> {
        self.content_state.lock().await.view.selected_song().cloned()
    }

    pub async fn get_selected_index(&self) -> Option<usize> {
        self.content_state.lock().await.view.selected_index()
    }

    /// The songs currently listed, used as the play queue
    pub async fn get_visible_songs(&self) -> Vec<Song> {
        self.content_state.lock().await.view.songs().to_vec()
    }

    pub async fn current_view(&self) -> ContentView {
        self.content_state.lock().await.view.clone()
    }

    pub async fn remove_song_from_view(&self, song_id: i64) {
        self.content_state.lock().await.view.remove_song(song_id);
    }

    pub async fn replace_song_in_view(&self, song: &Song) {
        self.content_state.lock().await.view.replace_song(song);
        let mut ui = self.ui_state.lock().await;
        if let Some(info) = ui.song_info.as_mut().filter(|s| s.id == song.id) {
            *info = song.clone();
        }
    }

    pub async fn move_playlist_song(&self, up: bool) -> Option<(i64, Vec<Song>)> {
        self.content_state.lock().await.view.move_playlist_song(up)
    }

    /// Page and query of the songs view, if it is showing
    pub async fn songs_page(&self) -> Option<(u32, Option<String>)> {
        match &self.content_state.lock().await.view {
            ContentView::Songs { page, query, .. } => Some((*page, query.clone())),
            _ => None,
        }
    }

    pub async fn open_playlist_id(&self) -> Option<i64> {
        match &self.content_state.lock().await.view {
            ContentView::PlaylistDetail { playlist, .. } => Some(playlist.id),
            _ => None,
        }
    }
}

impl Default for AppModel {
    fn default() -> Self {
        Self::new()
    }
}
