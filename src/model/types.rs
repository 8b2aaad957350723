//! Core type definitions for the application

use std::time::Instant;

use super::library::{Playlist, Song, SongUpdate};

/// Which section of the UI is currently active/focused
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveSection {
    Search,
    Library,
    Playlists,
    MainContent,
}

impl ActiveSection {
    pub fn next(self) -> Self {
        match self {
            ActiveSection::Search => ActiveSection::Library,
            ActiveSection::Library => ActiveSection::Playlists,
            ActiveSection::Playlists => ActiveSection::MainContent,
            ActiveSection::MainContent => ActiveSection::Search,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ActiveSection::Search => ActiveSection::MainContent,
            ActiveSection::Library => ActiveSection::Search,
            ActiveSection::Playlists => ActiveSection::Library,
            ActiveSection::MainContent => ActiveSection::Playlists,
        }
    }
}

/// Entries of the Library section
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LibraryItem {
    Songs,
    Queue,
}

impl LibraryItem {
    pub const ALL: [LibraryItem; 2] = [LibraryItem::Songs, LibraryItem::Queue];

    pub fn label(self) -> &'static str {
        match self {
            LibraryItem::Songs => "All songs",
            LibraryItem::Queue => "Play queue",
        }
    }
}

/// Song fields editable through the prompt, asked in this order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SongField {
    Title,
    Artist,
    Album,
}

impl SongField {
    pub fn label(self) -> &'static str {
        match self {
            SongField::Title => "Title",
            SongField::Artist => "Artist",
            SongField::Album => "Album",
        }
    }

    pub fn next(self) -> Option<Self> {
        match self {
            SongField::Title => Some(SongField::Artist),
            SongField::Artist => Some(SongField::Album),
            SongField::Album => None,
        }
    }
}

/// What the text prompt is collecting
#[derive(Clone, Debug, PartialEq)]
pub enum PromptKind {
    UploadPath,
    NewPlaylist,
    RenamePlaylist { playlist_id: i64 },
    EditSong { song_id: i64, field: SongField, draft: SongDraft },
}

/// Accumulated values while stepping through the song edit prompts
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SongDraft {
    pub title: String,
    pub artist: String,
    pub album: String,
}

impl SongDraft {
    pub fn from_song(song: &Song) -> Self {
        Self {
            title: song.title.clone(),
            artist: song.artist.clone(),
            album: song.album.clone().unwrap_or_default(),
        }
    }

    pub fn get(&self, field: SongField) -> &str {
        match field {
            SongField::Title => &self.title,
            SongField::Artist => &self.artist,
            SongField::Album => &self.album,
        }
    }

    pub fn set(&mut self, field: SongField, value: String) {
        match field {
            SongField::Title => self.title = value,
            SongField::Artist => self.artist = value,
            SongField::Album => self.album = value,
        }
    }

    /// Title and artist are required; an empty album clears it
    pub fn into_update(self) -> Option<SongUpdate> {
        if self.title.trim().is_empty() || self.artist.trim().is_empty() {
            return None;
        }
        Some(SongUpdate {
            title: Some(self.title.trim().to_string()),
            artist: Some(self.artist.trim().to_string()),
            album: Some(self.album.trim().to_string()),
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct InputPrompt {
    pub kind: PromptKind,
    pub buffer: String,
}

impl InputPrompt {
    pub fn new(kind: PromptKind, initial: impl Into<String>) -> Self {
        Self { kind, buffer: initial.into() }
    }

    pub fn title(&self) -> String {
        match &self.kind {
            PromptKind::UploadPath => "Upload file (mp3, flac, wav)".to_string(),
            PromptKind::NewPlaylist => "New playlist name".to_string(),
            PromptKind::RenamePlaylist { .. } => "Rename playlist".to_string(),
            PromptKind::EditSong { field, .. } => format!("Edit song: {}", field.label()),
        }
    }
}

/// UI state for the application
#[derive(Clone)]
pub struct UiState {
    pub active_section: ActiveSection,
    pub search_query: String,
    pub library_selected: usize,
    pub playlists: Vec<Playlist>,
    pub playlist_selected: usize,
    pub username: Option<String>,
    pub error_message: Option<String>,
    pub error_timestamp: Option<Instant>,
    pub status_message: Option<String>,
    pub status_timestamp: Option<Instant>,
    pub show_help_popup: bool,
    pub song_info: Option<Song>,
    pub prompt: Option<InputPrompt>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            active_section: ActiveSection::Library,
            search_query: String::new(),
            library_selected: 0,
            playlists: vec![],
            playlist_selected: 0,
            username: None,
            error_message: None,
            error_timestamp: None,
            status_message: None,
            status_timestamp: None,
            show_help_popup: false,
            song_info: None,
            prompt: None,
        }
    }
}
