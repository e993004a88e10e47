use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use rand::{Rng, distr::Alphanumeric};

/// Length of the OAuth `state` parameter issued by `/login`.
pub const STATE_LENGTH: usize = 16;

/// Provider bounds for the search `limit` parameter.
pub const MIN_SEARCH_LIMIT: u32 = 1;
pub const MAX_SEARCH_LIMIT: u32 = 50;

pub fn generate_state(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

pub fn clamp_search_limit(limit: u32) -> u32 {
    limit.clamp(MIN_SEARCH_LIMIT, MAX_SEARCH_LIMIT)
}

/// Formats milliseconds as `m:ss`.
pub fn format_duration(duration_ms: u64) -> String {
    let total_secs = duration_ms / 1000;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

/// Turns a track id, a `spotify:track:` URI or an `open.spotify.com` link
/// into a playable track URI.
pub fn to_track_uri(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Some(id) = input.strip_prefix("spotify:track:") {
        return is_track_id(id).then(|| input.to_string());
    }

    if let Some(rest) = input
        .strip_prefix("https://open.spotify.com/track/")
        .or_else(|| input.strip_prefix("http://open.spotify.com/track/"))
    {
        let id = rest.split(['?', '/', '#']).next().unwrap_or_default();
        return is_track_id(id).then(|| format!("spotify:track:{id}"));
    }

    is_track_id(input).then(|| format!("spotify:track:{input}"))
}

/// Extracts the bare id from anything `to_track_uri` accepts.
pub fn to_track_id(input: &str) -> Option<String> {
    to_track_uri(input).and_then(|uri| {
        uri.strip_prefix("spotify:track:")
            .map(|id| id.to_string())
    })
}

fn is_track_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric())
}

pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}

/// Escapes text for embedding in the callback result page.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
