use colored::Colorize;
use tabled::Table;

use crate::{
    management::Browser,
    types::{Track, TrackTableRow, UserProfile},
    utils,
};

/// The result list as a table; the current song's row is marked.
pub fn render_results(tracks: &[Track], current: Option<usize>) -> String {
    let rows: Vec<TrackTableRow> = tracks
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let mut row = TrackTableRow::new(i, track);
            if current == Some(i) {
                row.name = format!("▶ {}", row.name);
            }
            row
        })
        .collect();

    Table::new(rows).to_string()
}

/// Detail card for a single track.
pub fn render_track(track: &Track) -> String {
    let mut lines = vec![
        format!("{}", track.name.bold()),
        format!("{} {}", "Artist:".dimmed(), track.artist),
        format!("{} {}", "Album:".dimmed(), track.album),
        format!("{} {}", "Length:".dimmed(), utils::format_duration(track.duration_ms)),
        format!("{} {}", "URI:".dimmed(), track.uri),
    ];
    if !track.image.is_empty() {
        lines.push(format!("{} {}", "Artwork:".dimmed(), track.image));
    }
    if let Some(preview) = &track.preview_url {
        lines.push(format!("{} {}", "Preview:".dimmed(), preview));
    }
    lines.join("\n")
}

/// One-line player bar; `None` while no song is selected.
pub fn render_player_bar(browser: &Browser) -> Option<String> {
    let track = browser.current_song()?;
    let index = browser.current_index().unwrap_or_default();
    let total = browser.results().len();

    let prev = if index > 0 { "⏮" } else { " " };
    let next = if index + 1 < total { "⏭" } else { " " };

    Some(format!(
        "{prev} {} - {} [{}] {next}  ({}/{})",
        track.name.green().bold(),
        track.artist,
        utils::format_duration(track.duration_ms),
        index + 1,
        total
    ))
}

pub fn render_user(user: &UserProfile) -> String {
    let mut lines = vec![format!(
        "{} ({})",
        user.display_name.as_deref().unwrap_or(user.id.as_str()).bold(),
        user.id
    )];
    if let Some(email) = &user.email {
        lines.push(format!("{} {}", "Email:".dimmed(), email));
    }
    if let Some(country) = &user.country {
        lines.push(format!("{} {}", "Country:".dimmed(), country));
    }
    if let Some(product) = &user.product {
        lines.push(format!("{} {}", "Plan:".dimmed(), product));
    }
    lines.join("\n")
}
