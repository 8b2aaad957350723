//! Main content area views

use super::library::{Playlist, Song};

/// Represents the current view in the main content area
#[derive(Clone, Debug, Default)]
pub enum ContentView {
    #[default]
    Empty,
    /// A page of the song library, optionally filtered by a search query
    Songs {
        songs: Vec<Song>,
        selected_index: usize,
        page: u32,
        query: Option<String>,
    },
    PlaylistDetail {
        playlist: Playlist,
        songs: Vec<Song>,
        selected_index: usize,
    },
    /// Mirror of the player's queue, refreshed every frame
    Queue {
        songs: Vec<Song>,
        selected_index: usize,
    },
}

impl ContentView {
    pub fn songs(&self) -> &[Song] {
        match self {
            ContentView::Songs { songs, .. }
            | ContentView::PlaylistDetail { songs, .. }
            | ContentView::Queue { songs, .. } => songs,
            ContentView::Empty => &[],
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        match self {
            ContentView::Songs { selected_index, .. }
            | ContentView::PlaylistDetail { selected_index, .. }
            | ContentView::Queue { selected_index, .. } => Some(*selected_index),
            ContentView::Empty => None,
        }
    }

    fn selected_index_mut(&mut self) -> Option<&mut usize> {
        match self {
            ContentView::Songs { selected_index, .. }
            | ContentView::PlaylistDetail { selected_index, .. }
            | ContentView::Queue { selected_index, .. } => Some(selected_index),
            ContentView::Empty => None,
        }
    }

    pub fn selected_song(&self) -> Option<&Song> {
        self.selected_index().and_then(|i| self.songs().get(i))
    }

    pub fn move_up(&mut self) {
        if let Some(idx) = self.selected_index_mut() {
            *idx = idx.saturating_sub(1);
        }
    }

    pub fn move_down(&mut self) {
        let len = self.songs().len();
        if let Some(idx) = self.selected_index_mut() {
            if *idx < len.saturating_sub(1) {
                *idx += 1;
            }
        }
    }

    /// Keep the selection inside the list after it shrank
    pub fn clamp_selection(&mut self) {
        let len = self.songs().len();
        if let Some(idx) = self.selected_index_mut() {
            *idx = (*idx).min(len.saturating_sub(1));
        }
    }

    pub fn remove_song(&mut self, song_id: i64) {
        match self {
            ContentView::Songs { songs, .. }
            | ContentView::PlaylistDetail { songs, .. }
            | ContentView::Queue { songs, .. } => songs.retain(|s| s.id != song_id),
            ContentView::Empty => return,
        }
        self.clamp_selection();
    }

    pub fn replace_song(&mut self, song: &Song) {
        let songs = match self {
            ContentView::Songs { songs, .. }
            | ContentView::PlaylistDetail { songs, .. }
            | ContentView::Queue { songs, .. } => songs,
            ContentView::Empty => return,
        };
        for existing in songs.iter_mut().filter(|s| s.id == song.id) {
            *existing = song.clone();
        }
    }

    /// Swap the selected playlist song with its neighbour. Returns the new
    /// order when something moved.
    pub fn move_playlist_song(&mut self, up: bool) -> Option<(i64, Vec<Song>)> {
        let ContentView::PlaylistDetail { playlist, songs, selected_index } = self else {
            return None;
        };
        let from = *selected_index;
        let to = if up { from.checked_sub(1)? } else { from + 1 };
        if to >= songs.len() {
            return None;
        }
        songs.swap(from, to);
        *selected_index = to;
        Some((playlist.id, songs.clone()))
    }
}

/// State for the main content area
#[derive(Clone, Debug, Default)]
pub struct ContentState {
    pub view: ContentView,
    pub is_loading: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(id: i64) -> Song {
        serde_json::from_value(serde_json::json!({"id": id, "title": format!("Song {id}"), "artist": "a"})).unwrap()
    }

    fn playlist_view(ids: &[i64], selected_index: usize) -> ContentView {
        ContentView::PlaylistDetail {
            playlist: Playlist { id: 3, name: "Mix".into(), description: None, created_at: String::new() },
            songs: ids.iter().map(|&id| song(id)).collect(),
            selected_index,
        }
    }

    #[test]
    fn selection_stays_in_bounds() {
        let mut view = ContentView::Songs { songs: vec![song(1), song(2)], selected_index: 0, page: 1, query: None };
        view.move_up();
        assert_eq!(view.selected_index(), Some(0));
        view.move_down();
        view.move_down();
        assert_eq!(view.selected_index(), Some(1));
        assert_eq!(view.selected_song().map(|s| s.id), Some(2));
    }

    #[test]
    fn removing_last_row_moves_selection_back() {
        let mut view = playlist_view(&[1, 2, 3], 2);
        view.remove_song(3);
        assert_eq!(view.selected_index(), Some(1));
        view.remove_song(1);
        view.remove_song(2);
        assert_eq!(view.selected_index(), Some(0));
        assert!(view.selected_song().is_none());
    }

    #[test]
    fn moving_playlist_song_reports_new_order() {
        let mut view = playlist_view(&[1, 2, 3], 1);
        let (playlist_id, songs) = view.move_playlist_song(false).unwrap();
        assert_eq!(playlist_id, 3);
        assert_eq!(songs.iter().map(|s| s.id).collect::<Vec<_>>(), vec![1, 3, 2]);
        assert_eq!(view.selected_index(), Some(2));

        assert!(view.move_playlist_song(false).is_none());
        let mut top = playlist_view(&[1, 2], 0);
        assert!(top.move_playlist_song(true).is_none());
    }

    #[test]
    fn reordering_only_applies_to_playlists() {
        let mut view = ContentView::Songs { songs: vec![song(1), song(2)], selected_index: 0, page: 1, query: None };
        assert!(view.move_playlist_song(false).is_none());
    }

    #[test]
    fn replace_song_updates_matching_rows() {
        let mut view = playlist_view(&[1, 2], 0);
        let mut renamed = song(2);
        renamed.title = "Renamed".into();
        view.replace_song(&renamed);
        assert_eq!(view.songs()[1].title, "Renamed");
    }
}
