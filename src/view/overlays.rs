//! Overlay rendering (error notification, status toast, prompt, song info, help popup)

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::model::{InputPrompt, Song, UiState};
use super::utils::{format_date, format_file_size, format_seconds};

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(4));
    Rect {
        x: area.width.saturating_sub(width) / 2,
        y: area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

pub fn render_error_notification(frame: &mut Frame, ui_state: &UiState) {
    if let Some(ref error_msg) = ui_state.error_message {
        let area = frame.area();

        let popup_width = 52.min(area.width.saturating_sub(4));
        let inner_width = popup_width.saturating_sub(4).max(1) as usize;

        // Height: borders plus the wrapped message
        let error_line_count = error_msg.chars().count().div_ceil(inner_width) as u16;
        let popup_area = centered(area, popup_width, 2 + error_line_count.max(1));

        frame.render_widget(Clear, popup_area);

        let error_widget = Paragraph::new(error_msg.to_string())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red))
                    .title(" Error (Esc to dismiss) ")
                    .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
                    .style(Style::default().bg(Color::Black)),
            );

        frame.render_widget(error_widget, popup_area);
    }
}

/// One-line toast in the bottom-right corner above the progress bar
pub fn render_status(frame: &mut Frame, ui_state: &UiState) {
    let Some(message) = ui_state.status_message.as_deref() else {
        return;
    };
    let area = frame.area();
    let width = (message.chars().count() as u16 + 4).min(area.width);
    let toast = Rect {
        x: area.width.saturating_sub(width + 1),
        y: area.height.saturating_sub(6),
        width,
        height: 3.min(area.height),
    };

    frame.render_widget(Clear, toast);
    frame.render_widget(
        Paragraph::new(message.to_string())
            .style(Style::default().fg(Color::Yellow))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow))
                    .style(Style::default().bg(Color::Black)),
            ),
        toast,
    );
}

pub fn render_input_prompt(frame: &mut Frame, prompt: &InputPrompt) {
    let popup_area = centered(frame.area(), 60, 3);
    frame.render_widget(Clear, popup_area);

    let input = Paragraph::new(Line::from(vec![
        Span::raw(prompt.buffer.clone()),
        Span::styled("█", Style::default().fg(Color::Green)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" {} (Enter to confirm, Esc to cancel) ", prompt.title()))
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .style(Style::default().bg(Color::Black)),
    );

    frame.render_widget(input, popup_area);
}

pub fn render_song_info(frame: &mut Frame, song: &Song) {
    let fields = [
        ("Title", song.title.clone()),
        ("Artist", song.artist.clone()),
        ("Album", song.album_or_default().to_string()),
        ("Duration", format_seconds(song.duration)),
        ("Size", song.file_size.map(format_file_size).unwrap_or_else(|| "-".to_string())),
        ("Added", format_date(&song.created_at)),
        ("Updated", format_date(&song.updated_at)),
        ("Cover", song.cover_url.clone().unwrap_or_else(|| "none".to_string())),
    ];

    let lines: Vec<Line> = fields
        .into_iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!("{label:>9}"), Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                Span::raw("  "),
                Span::raw(value),
            ])
        })
        .collect();

    let popup_area = centered(frame.area(), 64, lines.len() as u16 + 2);
    frame.render_widget(Clear, popup_area);

    let info = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Song info (Esc to close) ")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        );

    frame.render_widget(info, popup_area);
}

pub fn render_help_popup(frame: &mut Frame) {
    let keybindings = [
        ("", "── Navigation ──"),
        ("Tab / Shift+Tab", "Cycle sections"),
        ("↑ / ↓", "Move selection"),
        ("Enter", "Open / Play"),
        ("Esc", "Back to library"),
        ("/", "Focus search"),
        ("[ / ]", "Previous / next page"),
        ("", ""),
        ("", "── Playback ──"),
        ("Space", "Play / Pause"),
        ("S", "Stop"),
        ("Shift+N / Shift+P", "Next / previous song"),
        ("m", "Cycle play mode"),
        ("Shift+M", "Mute / unmute"),
        ("+ / -", "Volume up / down"),
        ("← / →", "Seek 5%"),
        ("", ""),
        ("", "── Library ──"),
        ("K", "Add to queue"),
        ("A", "Add to selected playlist"),
        ("Delete", "Delete / remove song"),
        ("E / I", "Edit song / song info"),
        ("c", "Refresh cover"),
        ("U", "Upload a file"),
        ("Shift+C", "Clear queue"),
        ("", ""),
        ("", "── Playlists ──"),
        ("n", "New playlist"),
        ("R / X", "Rename / delete playlist"),
        ("Shift+↑ / ↓", "Reorder song"),
        ("", ""),
        ("", "── General ──"),
        ("H", "Toggle this help"),
        ("Shift+O", "Log out"),
        ("Q", "Quit"),
    ];

    let popup_area = centered(frame.area(), 62, keybindings.len() as u16 + 2);
    frame.render_widget(Clear, popup_area);

    let lines: Vec<Line> = keybindings
        .iter()
        .map(|(key, desc)| {
            if key.is_empty() {
                Line::from(Span::styled(
                    format!("{:^38}", desc),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(vec![
                    Span::styled(
                        format!("{:>18}", key),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(desc.to_string(), Style::default().fg(Color::White)),
                ])
            }
        })
        .collect();

    let help_text = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help (H or Esc to close) ")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        )
        .style(Style::default().bg(Color::Black));

    frame.render_widget(help_text, popup_area);
}
