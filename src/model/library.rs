//! Catalog types exchanged with the music-library server

use std::time::Duration;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
}

/// A track in the user's library
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub id: i64,
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub album: Option<String>,
    /// Catalog duration in whole seconds
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl Song {
    pub fn catalog_duration(&self) -> Option<Duration> {
        (self.duration > 0).then(|| Duration::from_secs(self.duration))
    }

    pub fn album_or_default(&self) -> &str {
        self.album.as_deref().unwrap_or("Unknown album")
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct SongUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
}

/// Optional metadata sent alongside an upload
#[derive(Clone, Debug, Default)]
pub struct UploadMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct PlaylistCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct PlaylistUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SongInPlaylist {
    pub song: Song,
    pub order_index: i64,
    #[serde(default)]
    pub added_at: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SongOrder {
    pub song_id: i64,
    pub order_index: i64,
}

#[derive(Clone, Debug, Serialize)]
pub struct PlaylistSongOrder {
    pub song_orders: Vec<SongOrder>,
}

impl PlaylistSongOrder {
    /// Orders numbered from the position of each song in `songs`
    pub fn from_songs(songs: &[Song]) -> Self {
        Self {
            song_orders: songs
                .iter()
                .enumerate()
                .map(|(i, song)| SongOrder { song_id: song.id, order_index: i as i64 })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn song_deserializes_with_missing_optionals() {
        let song: Song = serde_json::from_str(
            r#"{"id": 7, "title": "Blue", "artist": "Joni", "duration": 183,
                "file_path": "uploads/blue.mp3", "created_at": "2024-05-01T10:00:00"}"#,
        )
        .unwrap();

        assert_eq!(song.id, 7);
        assert_eq!(song.album, None);
        assert_eq!(song.file_size, None);
        assert_eq!(song.catalog_duration(), Some(Duration::from_secs(183)));
        assert_eq!(song.album_or_default(), "Unknown album");
    }

    #[test]
    fn zero_duration_is_unknown() {
        let song: Song = serde_json::from_str(r#"{"id": 1, "title": "t", "artist": "a", "duration": 0}"#).unwrap();
        assert_eq!(song.catalog_duration(), None);
    }

    #[test]
    fn song_update_skips_unset_fields() {
        let update = SongUpdate { title: Some("New".into()), ..Default::default() };
        assert_eq!(serde_json::to_string(&update).unwrap(), r#"{"title":"New"}"#);
    }

    #[test]
    fn song_order_follows_list_position() {
        let songs: Vec<Song> = [4, 2, 9]
            .iter()
            .map(|&id| serde_json::from_value(serde_json::json!({"id": id, "title": "t", "artist": "a"})).unwrap())
            .collect();

        let order = PlaylistSongOrder::from_songs(&songs);
        assert_eq!(
            order.song_orders,
            vec![
                SongOrder { song_id: 4, order_index: 0 },
                SongOrder { song_id: 2, order_index: 1 },
                SongOrder { song_id: 9, order_index: 2 },
            ]
        );
    }
}
