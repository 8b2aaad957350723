//! REST client for the music-library server

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use super::error::ApiError;
use super::library::{
    Credentials, Playlist, PlaylistCreate, PlaylistSongOrder, PlaylistUpdate, Song,
    SongInPlaylist, SongUpdate, Token, UploadMetadata, User,
};

const AUDIO_EXTENSIONS: [&str; 3] = ["mp3", "flac", "wav"];

pub fn is_valid_audio_file(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| AUDIO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// Builds stream addresses for songs.
///
/// The audio device fetches streams with a plain GET and cannot attach an
/// `Authorization` header, so the token rides along as a query parameter.
#[derive(Clone, Debug)]
pub struct StreamUrls {
    base: Url,
    token: Option<String>,
}

impl StreamUrls {
    pub fn new(base: &str) -> Result<Self, ApiError> {
        let base = Url::parse(base).map_err(|e| ApiError::InvalidUrl(format!("{base}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base.to_string()));
        }
        Ok(Self { base, token: None })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn stream_url(&self, song_id: i64) -> String {
        let mut url = self.endpoint(&format!("/songs/{song_id}/stream"));
        if let Some(token) = &self.token {
            url.query_pairs_mut().append_pair("token", token);
        }
        url.to_string()
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base.clone();
        let prefix = self.base.path().trim_end_matches('/');
        url.set_path(&format!("{prefix}{path}"));
        url
    }
}

/// Music-library API client with bearer-token auth
#[derive(Clone)]
pub struct MelodyClient {
    http: reqwest::Client,
    urls: StreamUrls,
    token: Arc<RwLock<Option<String>>>,
}

impl MelodyClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::from)?;

        Ok(Self {
            http,
            urls: StreamUrls::new(base_url)?,
            token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &str {
        self.urls.base.as_str()
    }

    pub async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    /// Stream address builder carrying the current token
    pub async fn stream_urls(&self) -> StreamUrls {
        self.urls.clone().with_token(self.token().await)
    }

    // ========================================================================
    // Auth
    // ========================================================================

    pub async fn login(&self, credentials: &Credentials) -> Result<Token, ApiError> {
        crate::log_api_request!("login", username = %credentials.username);
        let req = self.request(Method::POST, "/auth/login").await.json(credentials);
        let result = self.send_json::<Token>(req).await;
        crate::log_api_result!("login", result);
        result
    }

    pub async fn register(&self, credentials: &Credentials) -> Result<User, ApiError> {
        let req = self.request(Method::POST, "/auth/register").await.json(credentials);
        self.send_json(req).await
    }

    pub async fn current_user(&self) -> Result<User, ApiError> {
        let req = self.request(Method::GET, "/auth/me").await;
        self.send_json(req).await
    }

    // ========================================================================
    // Songs
    //
    // Collection routes live at `/songs/`; the server redirects the slashless
    // form with a 307, which a multipart body cannot follow.
    // ========================================================================

    pub async fn list_songs(&self, page: u32, limit: u32, search: Option<&str>) -> Result<Vec<Song>, ApiError> {
        crate::log_api_request!("list_songs", page, limit, search = ?search);
        let mut query: Vec<(&str, String)> = vec![("page", page.max(1).to_string()), ("limit", limit.to_string())];
        if let Some(search) = search.filter(|s| !s.trim().is_empty()) {
            query.push(("search", search.trim().to_string()));
        }

        let req = self.request(Method::GET, "/songs/").await.query(&query);
        let result = self.send_json(req).await;
        crate::log_api_result!("list_songs", result);
        result
    }

    pub async fn get_song(&self, id: i64) -> Result<Song, ApiError> {
        let req = self.request(Method::GET, &format!("/songs/{id}")).await;
        self.send_json(req).await
    }

    pub async fn upload_song(&self, path: &str, metadata: &UploadMetadata) -> Result<Song, ApiError> {
        if !is_valid_audio_file(path) {
            return Err(ApiError::InvalidFile(path.to_string()));
        }

        let data = tokio::fs::read(path)
            .await
            .map_err(|e| ApiError::InvalidFile(format!("{path}: {e}")))?;
        let file_name = Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        tracing::info!(file = %file_name, bytes = data.len(), "Uploading song");

        let form = reqwest::multipart::Form::new()
            .part("file", reqwest::multipart::Part::bytes(data).file_name(file_name));

        let query: Vec<(&str, &str)> = [
            ("title", metadata.title.as_deref()),
            ("artist", metadata.artist.as_deref()),
            ("album", metadata.album.as_deref()),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.filter(|v| !v.is_empty()).map(|v| (key, v)))
        .collect();

        let req = self.request(Method::POST, "/songs/").await.query(&query).multipart(form);
        let result = self.send_json(req).await;
        crate::log_api_result!("upload_song", result);
        result
    }

    pub async fn update_song(&self, id: i64, update: &SongUpdate) -> Result<Song, ApiError> {
        let req = self.request(Method::PUT, &format!("/songs/{id}")).await.json(update);
        self.send_json(req).await
    }

    pub async fn delete_song(&self, id: i64) -> Result<(), ApiError> {
        let req = self.request(Method::DELETE, &format!("/songs/{id}")).await;
        let result = self.send_empty(req).await;
        crate::log_api_result!("delete_song", result);
        result
    }

    pub async fn refresh_cover(&self, id: i64) -> Result<Song, ApiError> {
        let req = self.request(Method::POST, &format!("/songs/{id}/cover/refresh")).await;
        self.send_json(req).await
    }

    // ========================================================================
    // Playlists
    // ========================================================================

    pub async fn list_playlists(&self) -> Result<Vec<Playlist>, ApiError> {
        let req = self.request(Method::GET, "/playlists/").await;
        let result = self.send_json(req).await;
        crate::log_api_result!("list_playlists", result);
        result
    }

    pub async fn get_playlist(&self, id: i64) -> Result<Playlist, ApiError> {
        let req = self.request(Method::GET, &format!("/playlists/{id}")).await;
        self.send_json(req).await
    }

    pub async fn create_playlist(&self, name: &str, description: Option<&str>) -> Result<Playlist, ApiError> {
        let body = PlaylistCreate {
            name: name.to_string(),
            description: description.map(str::to_string),
        };
        let req = self.request(Method::POST, "/playlists/").await.json(&body);
        self.send_json(req).await
    }

    pub async fn update_playlist(&self, id: i64, update: &PlaylistUpdate) -> Result<Playlist, ApiError> {
        let req = self.request(Method::PUT, &format!("/playlists/{id}")).await.json(update);
        self.send_json(req).await
    }

    pub async fn delete_playlist(&self, id: i64) -> Result<(), ApiError> {
        let req = self.request(Method::DELETE, &format!("/playlists/{id}")).await;
        self.send_empty(req).await
    }

    /// Songs of a playlist in playlist order
    pub async fn playlist_songs(&self, id: i64) -> Result<Vec<SongInPlaylist>, ApiError> {
        let req = self.request(Method::GET, &format!("/playlists/{id}/songs")).await;
        let mut entries: Vec<SongInPlaylist> = self.send_json(req).await?;
        entries.sort_by_key(|entry| entry.order_index);
        Ok(entries)
    }

    pub async fn add_song_to_playlist(&self, playlist_id: i64, song_id: i64) -> Result<(), ApiError> {
        let req = self
            .request(Method::POST, &format!("/playlists/{playlist_id}/songs/{song_id}"))
            .await;
        self.send_empty(req).await
    }

    pub async fn remove_song_from_playlist(&self, playlist_id: i64, song_id: i64) -> Result<(), ApiError> {
        let req = self
            .request(Method::DELETE, &format!("/playlists/{playlist_id}/songs/{song_id}"))
            .await;
        self.send_empty(req).await
    }

    pub async fn reorder_playlist(&self, playlist_id: i64, order: &PlaylistSongOrder) -> Result<(), ApiError> {
        let req = self
            .request(Method::PUT, &format!("/playlists/{playlist_id}/songs/order"))
            .await
            .json(order);
        self.send_empty(req).await
    }

    // ========================================================================
    // Transport
    // ========================================================================

    async fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.urls.endpoint(path));
        match self.token.read().await.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let response = self.checked(req).await?;
        Ok(response.json::<T>().await?)
    }

    async fn send_empty(&self, req: RequestBuilder) -> Result<(), ApiError> {
        self.checked(req).await.map(|_| ())
    }

    async fn checked(&self, req: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = req.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = ApiError::from_response(status, &body);
        if error.is_unauthorized() {
            tracing::warn!("Server rejected token, dropping it");
            self.set_token(None).await;
        }
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    /// Reads one HTTP/1.1 request and returns its request line
    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        let header_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break buf.len();
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
        let content_length = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        let chunked = head.contains("transfer-encoding: chunked");

        loop {
            let body = &buf[header_end..];
            let complete = if chunked { body.ends_with(b"0\r\n\r\n") } else { body.len() >= content_length };
            if complete {
                break;
            }
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        String::from_utf8_lossy(&buf[..header_end])
            .lines()
            .next()
            .unwrap_or_default()
            .to_string()
    }

    /// Local server that redirects `/songs` to `/songs/` like the backend
    /// router does, and records each request line it sees.
    async fn spawn_library_server() -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let log = log.clone();
                tokio::spawn(async move {
                    let request_line = read_request(&mut socket).await;
                    let target = request_line.split_whitespace().nth(1).unwrap_or_default().to_string();
                    log.lock().unwrap().push(request_line);

                    let response = if target == "/songs" || target.starts_with("/songs?") {
                        "HTTP/1.1 307 Temporary Redirect\r\nlocation: /songs/\r\ncontent-length: 0\r\nconnection: close\r\n\r\n"
                            .to_string()
                    } else {
                        let body = r#"{"id": 7, "title": "Uploaded", "artist": "Someone"}"#;
                        format!(
                            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                            body.len()
                        )
                    };
                    socket.write_all(response.as_bytes()).await.unwrap();
                    let _ = socket.shutdown().await;
                });
            }
        });

        (format!("http://{addr}"), seen)
    }

    #[test]
    fn stream_url_without_token() {
        let urls = StreamUrls::new("http://localhost:8000").unwrap();
        assert_eq!(urls.stream_url(12), "http://localhost:8000/songs/12/stream");
    }

    #[test]
    fn stream_url_encodes_token() {
        let urls = StreamUrls::new("http://localhost:8000/").unwrap().with_token(Some("abc/def=".into()));
        assert_eq!(urls.stream_url(3), "http://localhost:8000/songs/3/stream?token=abc%2Fdef%3D");
    }

    #[test]
    fn stream_url_keeps_base_path() {
        let urls = StreamUrls::new("https://music.example.com/api/").unwrap();
        assert_eq!(urls.stream_url(1), "https://music.example.com/api/songs/1/stream");
    }

    #[test]
    fn rejects_invalid_base() {
        assert!(matches!(StreamUrls::new("not a url"), Err(ApiError::InvalidUrl(_))));
        assert!(matches!(StreamUrls::new("mailto:me@example.com"), Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn audio_extension_check() {
        assert!(is_valid_audio_file("/music/a.mp3"));
        assert!(is_valid_audio_file("B.FLAC"));
        assert!(is_valid_audio_file("c.d.wav"));
        assert!(!is_valid_audio_file("notes.txt"));
        assert!(!is_valid_audio_file("mp3"));
    }

    #[tokio::test]
    async fn upload_rejects_non_audio_before_request() {
        let client = MelodyClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let result = client.upload_song("/tmp/cover.png", &UploadMetadata::default()).await;
        assert!(matches!(result, Err(ApiError::InvalidFile(_))));
    }

    #[tokio::test]
    async fn upload_posts_to_collection_route() {
        let (base, seen) = spawn_library_server().await;
        let client = MelodyClient::new(&base, Duration::from_secs(5)).unwrap();

        let path = std::env::temp_dir().join(format!("melody-upload-{}.mp3", std::process::id()));
        std::fs::write(&path, b"ID3 not really audio").unwrap();

        let metadata = UploadMetadata { title: Some("Uploaded".into()), ..Default::default() };
        let result = client.upload_song(path.to_str().unwrap(), &metadata).await;
        let _ = std::fs::remove_file(&path);

        let song = result.unwrap();
        assert_eq!(song.id, 7);
        let requests = seen.lock().unwrap().clone();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].starts_with("POST /songs/?title=Uploaded "), "{requests:?}");
    }

    #[tokio::test]
    async fn stream_urls_follow_token() {
        let client = MelodyClient::new("http://localhost:8000", Duration::from_secs(1)).unwrap();
        assert_eq!(client.stream_urls().await.stream_url(1), "http://localhost:8000/songs/1/stream");

        client.set_token(Some("t0k".into())).await;
        assert_eq!(client.stream_urls().await.stream_url(1), "http://localhost:8000/songs/1/stream?token=t0k");
    }
}
