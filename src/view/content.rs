//! Main content area rendering (song listings, playlist and queue views)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, ListItem, Paragraph},
    Frame,
};
use ratatui::widgets::Padding;

use crate::model::{ActiveSection, ContentState, ContentView, Playlist, Song, UiState};
use crate::player::PlayerSnapshot;
use super::utils::{
    calculate_num_width, format_date, format_file_size, format_seconds, render_scrollable_list,
    truncate_string,
};

pub fn render_main_content(
    frame: &mut Frame,
    area: Rect,
    ui_state: &UiState,
    content_state: &ContentState,
    player: &PlayerSnapshot,
) {
    let is_focused = ui_state.active_section == ActiveSection::MainContent;
    let border_style = if is_focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    if content_state.is_loading {
        let loading = Paragraph::new("Loading...")
            .style(Style::default().fg(Color::Yellow))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Content ")
                    .border_style(border_style),
            );
        frame.render_widget(loading, area);
        return;
    }

    let playing_id = player.current_track.as_ref().map(|s| s.id);

    match &content_state.view {
        ContentView::Empty => {
            let content = Paragraph::new("Select \"All songs\" or a playlist and press Enter\n\nUse Tab to navigate between sections\nUse ↑/↓ to select items\nPress h for all keys")
                .style(Style::default().fg(Color::DarkGray))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .padding(Padding::horizontal(1))
                        .border_style(border_style),
                );
            frame.render_widget(content, area);
        }
        ContentView::Songs { songs, selected_index, page, query } => {
            render_songs(frame, area, songs, *selected_index, *page, query.as_deref(), is_focused, playing_id);
        }
        ContentView::PlaylistDetail { playlist, songs, selected_index } => {
            render_playlist_detail(frame, area, playlist, songs, *selected_index, is_focused, playing_id);
        }
        ContentView::Queue { songs, selected_index } => {
            render_queue(frame, area, player, songs, *selected_index, is_focused);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn render_songs(
    frame: &mut Frame,
    area: Rect,
    songs: &[Song],
    selected_index: usize,
    page: u32,
    query: Option<&str>,
    is_focused: bool,
    playing_id: Option<i64>,
) {
    let border_style = if is_focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header
            Constraint::Min(0),    // Songs
        ])
        .split(area);

    let title = match query {
        Some(q) => format!("🔎 Results for \"{q}\""),
        None => "🎶 All songs".to_string(),
    };
    let detail = songs
        .get(selected_index)
        .map(song_detail_line)
        .unwrap_or_else(|| "No songs on this page".to_string());
    let header = Paragraph::new(format!("{title}  (page {page}, [ / ] to change)\n {detail}"))
        .style(Style::default().fg(Color::Cyan))
        .block(
            Block::default()
                .padding(Padding::horizontal(1))
                .borders(Borders::ALL)
                .border_style(border_style),
        );
    frame.render_widget(header, chunks[0]);

    let content_width = chunks[1].width.saturating_sub(4) as usize;
    let items = render_song_items(songs, selected_index, is_focused, |_, song| Some(song.id) == playing_id, content_width);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Songs ")
        .padding(Padding::horizontal(1))
        .border_style(border_style);

    render_scrollable_list(frame, chunks[1], items, selected_index + 1, block);
}

fn render_playlist_detail(
    frame: &mut Frame,
    area: Rect,
    playlist: &Playlist,
    songs: &[Song],
    selected_index: usize,
    is_focused: bool,
    playing_id: Option<i64>,
) {
    let border_style = if is_focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header
            Constraint::Min(0),    // Songs
        ])
        .split(area);

    let description = playlist.description.as_deref().filter(|d| !d.is_empty()).unwrap_or("No description");
    let header_text = format!(
        "📻 {}  ({} songs, created {})\n {} | Shift+↑/↓: Reorder | Del: Remove",
        playlist.name,
        songs.len(),
        format_date(&playlist.created_at),
        description,
    );
    let header = Paragraph::new(header_text)
        .style(Style::default().fg(Color::Cyan))
        .block(
            Block::default()
                .padding(Padding::horizontal(1))
                .borders(Borders::ALL)
                .border_style(border_style),
        );
    frame.render_widget(header, chunks[0]);

    let content_width = chunks[1].width.saturating_sub(4) as usize;
    let mut items = render_song_items(songs, selected_index, is_focused, |_, song| Some(song.id) == playing_id, content_width);

    if songs.is_empty() {
        items.push(
            ListItem::new("       Playlist is empty (a on a song adds it)")
                .style(Style::default().fg(Color::DarkGray)),
        );
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Songs ")
        .padding(Padding::horizontal(1))
        .border_style(border_style);

    render_scrollable_list(frame, chunks[1], items, selected_index + 1, block);
}

fn render_queue(
    frame: &mut Frame,
    area: Rect,
    player: &PlayerSnapshot,
    queue: &[Song],
    selected_index: usize,
    is_focused: bool,
) {
    let border_style = if is_focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Currently playing
            Constraint::Min(0),    // Queue
        ])
        .split(area);

    let now_playing = match &player.current_track {
        Some(track) => format!("{}  -  {} ({})", track.title, track.artist, track.album_or_default()),
        None => "No track playing".to_string(),
    };
    let now_playing = Paragraph::new(now_playing)
        .style(Style::default().fg(Color::Cyan))
        .block(
            Block::default()
                .padding(Padding::horizontal(1))
                .borders(Borders::ALL)
                .title(" 🎵 Now Playing ")
                .border_style(border_style),
        );
    frame.render_widget(now_playing, chunks[0]);

    let content_width = chunks[1].width.saturating_sub(4) as usize;
    let current_index = player.current_index;
    let mut items = render_song_items(queue, selected_index, is_focused, |i, _| Some(i) == current_index, content_width);

    if queue.is_empty() {
        items.push(ListItem::new("       Queue is empty").style(Style::default().fg(Color::DarkGray)));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Queue ({}) | Del: Remove | C: Clear ", player.mode.label()))
        .padding(Padding::horizontal(1))
        .border_style(border_style);

    render_scrollable_list(frame, chunks[1], items, selected_index + 1, block);
}

fn song_detail_line(song: &Song) -> String {
    let size = song.file_size.map(format_file_size).unwrap_or_else(|| "-".to_string());
    format!(
        "{} | {} | {} | added {}",
        song.album_or_default(),
        format_seconds(song.duration),
        size,
        format_date(&song.created_at),
    )
}

/// Header row plus one row per song. `is_current` marks the playing row.
fn render_song_items<F>(
    songs: &[Song],
    selected_index: usize,
    is_focused: bool,
    is_current: F,
    content_width: usize,
) -> Vec<ListItem<'static>>
where
    F: Fn(usize, &Song) -> bool,
{
    let num_width = calculate_num_width(songs.len());
    let duration_width = 8;
    let fixed_width = 1 + num_width + 3 + 3 + 3 + 3 + duration_width;
    let remaining_width = content_width.saturating_sub(fixed_width);
    let title_width = (remaining_width * 40) / 100;
    let artist_width = (remaining_width * 30) / 100;
    let album_width = remaining_width.saturating_sub(title_width + artist_width);

    let mut items: Vec<ListItem<'static>> = vec![
        ListItem::new(format!(
            " {:<num_width$}   {:<title_width$}   {:<artist_width$}   {:<album_width$}   {}",
            "#", "Title", "Artist", "Album", "Duration",
        ))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
    ];

    items.extend(songs.iter().enumerate().map(|(i, song)| {
        let playing = is_current(i, song);
        let style = if i == selected_index && is_focused {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else if playing {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else if i == selected_index {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let playing_indicator = if playing { "▶" } else { " " };
        ListItem::new(format!(
            "{}{:<num_width$}   {}   {}   {}   {}",
            playing_indicator,
            i + 1,
            truncate_string(&song.title, title_width),
            truncate_string(&song.artist, artist_width),
            truncate_string(song.album_or_default(), album_width),
            format_seconds(song.duration),
        ))
        .style(style)
    }));

    items
}
