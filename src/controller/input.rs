//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::{ActiveSection, ContentView};
use super::AppController;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        let model = self.model.lock().await;

        // Error message blocks all other interactions
        if model.has_error().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                model.clear_error().await;
            }
            return Ok(());
        }

        if model.is_help_popup_open().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H')) {
                model.hide_help_popup().await;
            }
            return Ok(());
        }

        if model.is_song_info_open().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('i')) {
                model.hide_song_info().await;
            }
            return Ok(());
        }

        // Text prompt captures every key
        if model.is_prompt_open().await {
            match key.code {
                KeyCode::Enter => {
                    drop(model);
                    self.submit_prompt().await;
                }
                KeyCode::Esc => {
                    model.take_prompt().await;
                }
                KeyCode::Backspace => model.prompt_pop().await,
                KeyCode::Char(c) => model.prompt_push(c).await,
                _ => {}
            }
            return Ok(());
        }

        let ui_state = model.get_ui_state().await;

        if ui_state.active_section == ActiveSection::Search {
            match key.code {
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        model.cycle_section_backward().await;
                    } else {
                        model.cycle_section_forward().await;
                    }
                    return Ok(());
                }
                KeyCode::BackTab => {
                    model.cycle_section_backward().await;
                    return Ok(());
                }
                KeyCode::Enter => {
                    let query = ui_state.search_query.clone();
                    drop(model);
                    self.perform_search(&query).await;
                    return Ok(());
                }
                KeyCode::Esc => {
                    model.clear_search().await;
                    return Ok(());
                }
                KeyCode::Backspace => {
                    model.backspace_search().await;
                    return Ok(());
                }
                KeyCode::Char(c) => {
                    // Ctrl+Q still quits while typing
                    if (c == 'q' || c == 'Q') && key.modifiers.contains(KeyModifiers::CONTROL) {
                        model.set_should_quit(true).await;
                        return Ok(());
                    }
                    model.append_to_search(c).await;
                    return Ok(());
                }
                _ => {}
            }
        }

        if ui_state.active_section == ActiveSection::MainContent {
            let view = model.get_content_state().await.view;
            let shift = key.modifiers.contains(KeyModifiers::SHIFT);

            match key.code {
                KeyCode::Up if shift => {
                    drop(model);
                    self.move_selected_in_playlist(true).await;
                    return Ok(());
                }
                KeyCode::Down if shift => {
                    drop(model);
                    self.move_selected_in_playlist(false).await;
                    return Ok(());
                }
                KeyCode::Up => {
                    model.content_move_up().await;
                    return Ok(());
                }
                KeyCode::Down => {
                    model.content_move_down().await;
                    return Ok(());
                }
                KeyCode::Enter => {
                    drop(model);
                    self.play_selected().await;
                    return Ok(());
                }
                KeyCode::Esc | KeyCode::Backspace => {
                    model.set_active_section(ActiveSection::Library).await;
                    return Ok(());
                }
                KeyCode::Delete => {
                    drop(model);
                    match view {
                        ContentView::Songs { .. } => self.delete_selected_song().await,
                        ContentView::PlaylistDetail { .. } => self.remove_selected_from_playlist().await,
                        ContentView::Queue { .. } => self.remove_selected_from_queue().await,
                        ContentView::Empty => {}
                    }
                    return Ok(());
                }
                KeyCode::Char('k') | KeyCode::Char('K') => {
                    drop(model);
                    self.add_selected_to_queue().await;
                    return Ok(());
                }
                KeyCode::Char('a') | KeyCode::Char('A') => {
                    drop(model);
                    self.add_selected_to_playlist().await;
                    return Ok(());
                }
                KeyCode::Char('c') => {
                    drop(model);
                    self.refresh_selected_cover().await;
                    return Ok(());
                }
                KeyCode::Char('e') | KeyCode::Char('E') => {
                    drop(model);
                    self.begin_edit_song().await;
                    return Ok(());
                }
                KeyCode::Char('i') | KeyCode::Char('I') => {
                    drop(model);
                    self.show_selected_song_info().await;
                    return Ok(());
                }
                KeyCode::Char(']') => {
                    drop(model);
                    self.next_page().await;
                    return Ok(());
                }
                KeyCode::Char('[') => {
                    drop(model);
                    self.previous_page().await;
                    return Ok(());
                }
                _ => {}
            }
        }

        if ui_state.active_section == ActiveSection::Playlists {
            match key.code {
                KeyCode::Char('r') | KeyCode::Char('R') => {
                    drop(model);
                    self.begin_rename_playlist().await;
                    return Ok(());
                }
                KeyCode::Char('x') | KeyCode::Char('X') | KeyCode::Delete => {
                    drop(model);
                    self.delete_selected_playlist().await;
                    return Ok(());
                }
                _ => {}
            }
        }

        // Global keybindings
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                model.set_should_quit(true).await;
            }
            KeyCode::Char('O') => {
                drop(model);
                self.logout().await;
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    model.cycle_section_backward().await;
                } else {
                    model.cycle_section_forward().await;
                }
            }
            KeyCode::BackTab => {
                model.cycle_section_backward().await;
            }
            KeyCode::Up => {
                model.move_selection_up().await;
            }
            KeyCode::Down => {
                model.move_selection_down().await;
            }
            KeyCode::Enter => match ui_state.active_section {
                ActiveSection::Library => {
                    let item = model.get_selected_library_item().await;
                    drop(model);
                    self.open_library_item(item).await;
                }
                ActiveSection::Playlists => {
                    if let Some(playlist) = model.get_selected_playlist().await {
                        drop(model);
                        self.open_playlist(playlist.id).await;
                    }
                }
                _ => {}
            },
            KeyCode::Char(' ') => {
                drop(model);
                self.toggle_playback().await;
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                drop(model);
                self.stop_playback().await;
            }
            KeyCode::Char('N') => {
                drop(model);
                self.next_track().await;
            }
            KeyCode::Char('P') => {
                drop(model);
                self.previous_track().await;
            }
            KeyCode::Char('m') => {
                drop(model);
                self.cycle_play_mode().await;
            }
            KeyCode::Char('M') => {
                drop(model);
                self.toggle_mute().await;
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                drop(model);
                self.volume_up().await;
            }
            KeyCode::Char('-') => {
                drop(model);
                self.volume_down().await;
            }
            KeyCode::Right => {
                drop(model);
                self.seek_forward().await;
            }
            KeyCode::Left => {
                drop(model);
                self.seek_backward().await;
            }
            KeyCode::Char('C') => {
                drop(model);
                self.clear_queue().await;
            }
            KeyCode::Char('u') | KeyCode::Char('U') => {
                drop(model);
                self.begin_upload().await;
            }
            KeyCode::Char('n') => {
                drop(model);
                self.begin_new_playlist().await;
            }
            KeyCode::Char('/') => {
                model.set_active_section(ActiveSection::Search).await;
            }
            KeyCode::Char('h') | KeyCode::Char('H') => {
                model.show_help_popup().await;
            }
            _ => {}
        }
        Ok(())
    }
}
