//! Model module - Application state, catalog types and the catalog client
//!
//! - `types`: UI enums and state (sections, prompts, messages)
//! - `library`: songs, playlists and users as the server sends them
//! - `content`: views of the main content area
//! - `error`: catalog API errors
//! - `melody_client`: REST client for the music-library server
//! - `app_model`: Main application model with state management methods

mod types;
mod library;
mod content;
mod error;
mod melody_client;
mod app_model;

pub use types::{
    ActiveSection, InputPrompt, LibraryItem, PromptKind, SongDraft, SongField, UiState,
};

pub use library::{
    Credentials, Playlist, PlaylistSongOrder, PlaylistUpdate, Song, UploadMetadata, User,
};

pub use content::{ContentState, ContentView};

pub use error::ApiError;

pub use melody_client::{is_valid_audio_file, MelodyClient, StreamUrls};

pub use app_model::AppModel;
