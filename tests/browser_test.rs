use spotiplay::{
    cli::{BrowseCommand, views},
    management::Browser,
    types::Track,
};

fn track(i: usize) -> Track {
    Track {
        id: format!("track{i}"),
        name: format!("Song {i}"),
        artist: "Artist A, Artist B".to_string(),
        artists: vec!["Artist A".to_string(), "Artist B".to_string()],
        album: "Album One".to_string(),
        image: String::new(),
        uri: format!("spotify:track:track{i}"),
        duration_ms: 200_000,
        preview_url: None,
    }
}

fn tracks(range: std::ops::Range<usize>) -> Vec<Track> {
    range.map(track).collect()
}

#[test]
fn test_empty_browser_has_no_player() {
    let mut browser = Browser::new();

    assert!(!browser.player_visible());
    assert!(browser.next().is_none());
    assert!(browser.previous().is_none());
    assert!(browser.select(0).is_none());
    assert!(views::render_player_bar(&browser).is_none());
}

#[test]
fn test_results_without_selection() {
    let mut browser = Browser::new();
    browser.set_results("love", tracks(0..3));

    assert_eq!(browser.query(), Some("love"));
    assert_eq!(browser.results().len(), 3);
    assert_eq!(browser.current_index(), None);
    assert!(!browser.player_visible());
    // Navigation needs a current song to start from.
    assert!(browser.next().is_none());
}

#[test]
fn test_navigation_clamps_at_both_ends() {
    let mut browser = Browser::new();
    browser.set_results("love", tracks(0..3));

    browser.select(0);
    browser.previous();
    assert_eq!(browser.current_index(), Some(0));

    browser.next();
    browser.next();
    assert_eq!(browser.current_index(), Some(2));
    browser.next();
    assert_eq!(browser.current_index(), Some(2));
    assert_eq!(browser.current_song().unwrap().id, "track2");

    browser.previous();
    assert_eq!(browser.current_index(), Some(1));
}

#[test]
fn test_select_out_of_range_keeps_current() {
    let mut browser = Browser::new();
    browser.set_results("love", tracks(0..3));

    browser.select(1);
    assert_eq!(browser.select(7).map(|t| t.id.as_str()), Some("track1"));
    assert_eq!(browser.current_index(), Some(1));
}

#[test]
fn test_new_results_keep_current_song_when_present() {
    let mut browser = Browser::new();
    browser.set_results("love", tracks(0..5));
    browser.select(3);

    browser.set_results("love song", tracks(2..6));
    assert_eq!(browser.current_index(), Some(1));
    assert_eq!(browser.current_song().unwrap().id, "track3");

    browser.set_results("other", tracks(10..12));
    assert_eq!(browser.current_index(), None);
    assert!(!browser.player_visible());
}

#[test]
fn test_player_bar() {
    colored::control::set_override(false);
    let mut browser = Browser::new();
    browser.set_results("love", tracks(0..3));

    browser.select(0);
    let first = views::render_player_bar(&browser).unwrap();
    assert!(first.contains("Song 0 - Artist A, Artist B [3:20]"));
    assert!(first.contains("(1/3)"));
    assert!(!first.contains('⏮'));
    assert!(first.contains('⏭'));

    browser.select(2);
    let last = views::render_player_bar(&browser).unwrap();
    assert!(last.contains('⏮'));
    assert!(!last.contains('⏭'));
}

#[test]
fn test_results_table_marks_current_song() {
    let table = views::render_results(&tracks(0..2), Some(1));

    assert!(table.contains("▶ Song 1"));
    assert!(!table.contains("▶ Song 0"));
    assert!(table.contains("3:20"));
}

#[test]
fn test_parse_browse_commands() {
    assert_eq!(
        BrowseCommand::parse("search  daft punk "),
        Ok(BrowseCommand::Search("daft punk".to_string()))
    );
    assert_eq!(
        BrowseCommand::parse("s love"),
        Ok(BrowseCommand::Search("love".to_string()))
    );
    assert_eq!(BrowseCommand::parse("ls"), Ok(BrowseCommand::List));
    assert_eq!(BrowseCommand::parse("show 4"), Ok(BrowseCommand::Show(4)));
    assert_eq!(BrowseCommand::parse("sel 2"), Ok(BrowseCommand::Select(2)));
    assert_eq!(BrowseCommand::parse("n"), Ok(BrowseCommand::Next));
    assert_eq!(BrowseCommand::parse("previous"), Ok(BrowseCommand::Previous));
    assert_eq!(BrowseCommand::parse("play"), Ok(BrowseCommand::Play(None)));
    assert_eq!(BrowseCommand::parse("play 3"), Ok(BrowseCommand::Play(Some(3))));
    assert_eq!(BrowseCommand::parse("?"), Ok(BrowseCommand::Help));
    assert_eq!(BrowseCommand::parse("exit"), Ok(BrowseCommand::Quit));
}

#[test]
fn test_parse_rejects_bad_input() {
    assert_eq!(BrowseCommand::parse("   "), Err(String::new()));
    assert!(BrowseCommand::parse("search").is_err());
    assert!(BrowseCommand::parse("show x").is_err());
    assert!(BrowseCommand::parse("select").is_err());
    assert!(
        BrowseCommand::parse("dance")
            .unwrap_err()
            .contains("unknown command")
    );
}
