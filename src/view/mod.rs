//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared utility functions (formatting, scrollable lists)
//! - `layout`: Main layout structure (top bar, sidebar)
//! - `content`: Main content area rendering
//! - `progress`: Progress bar rendering
//! - `overlays`: Modal overlays (error, prompt, song info, help)

mod utils;
mod layout;
mod content;
mod progress;
mod overlays;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::{ContentState, UiState};
use crate::player::PlayerSnapshot;

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, player: &PlayerSnapshot, ui_state: &UiState, content_state: &ContentState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search bar + user
                Constraint::Min(0),    // Main content (sidebar + content)
                Constraint::Length(3), // Progress bar with playback info
            ])
            .split(frame.area());

        layout::render_top_bar(frame, chunks[0], ui_state);

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(30), // Sidebar (Library + Playlists)
                Constraint::Percentage(70), // Main content
            ])
            .split(chunks[1]);

        layout::render_sidebar(frame, main_chunks[0], ui_state);
        content::render_main_content(frame, main_chunks[1], ui_state, content_state, player);
        progress::render_progress_bar(frame, chunks[2], player);

        overlays::render_status(frame, ui_state);

        if let Some(prompt) = &ui_state.prompt {
            overlays::render_input_prompt(frame, prompt);
        }

        if let Some(song) = &ui_state.song_info {
            overlays::render_song_info(frame, song);
        }

        if ui_state.show_help_popup {
            overlays::render_help_popup(frame);
        }

        // Errors go on top of everything else
        if ui_state.error_message.is_some() {
            overlays::render_error_notification(frame, ui_state);
        }
    }
}
