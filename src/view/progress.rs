//! Progress bar rendering

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Gauge},
    Frame,
};

use crate::player::{PlayerSnapshot, PlayerState};
use super::utils::format_duration;

pub fn render_progress_bar(frame: &mut Frame, area: Rect, player: &PlayerSnapshot) {
    let status_text = match &player.current_track {
        None => " No track playing".to_string(),
        Some(track) => {
            let icon = match player.state {
                PlayerState::Playing => " ▶",
                PlayerState::Paused => "⏸ ",
                PlayerState::Loading => " …",
                PlayerState::Idle => " ■",
            };
            format!("{} {} | {} ({})", icon, track.title, track.artist, track.album_or_default())
        }
    };

    let volume_text = if player.muted {
        "Vol: muted".to_string()
    } else {
        format!("Vol: {}%", player.volume)
    };
    let position_text = match player.current_index {
        Some(i) => format!("{}/{}", i + 1, player.queue.len()),
        None => format!("-/{}", player.queue.len()),
    };
    let controls_info = format!(
        " {}{}{} | Mode: {} | {} ",
        if player.has_previous { "‹ " } else { "  " },
        position_text,
        if player.has_next { " ›" } else { "  " },
        player.mode.label(),
        volume_text,
    );

    let time_str = match player.duration {
        Some(total) => format!("{} / {}", format_duration(player.elapsed), format_duration(total)),
        None => format!("{} / --:--", format_duration(player.elapsed)),
    };

    let gauge_color = if player.last_error.is_some() && player.state == PlayerState::Idle {
        Color::Red
    } else {
        Color::Green
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{status_text} "))
                .title_bottom(Line::from(controls_info).right_aligned()),
        )
        .gauge_style(Style::default().fg(gauge_color))
        .ratio(player.progress_percent() / 100.0)
        .label(time_str);

    frame.render_widget(gauge, area);
}
