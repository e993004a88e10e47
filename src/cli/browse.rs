use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{
    cli::{STORE_POLL_INTERVAL, Session, report_api_error, search::require_login, views},
    info,
    management::Browser,
    spotify::DEFAULT_SEARCH_LIMIT,
    success, utils, warning,
};

const HELP: &str = "\
search <query>   search tracks
list             show the current results
show <n>         show details of result n
select <n>       make result n the current song
next | prev      move through the results
play [n]         play the current song (or result n)
help             this text
quit             leave";

#[derive(Debug, PartialEq, Eq)]
pub enum BrowseCommand {
    Search(String),
    List,
    Show(usize),
    Select(usize),
    Next,
    Previous,
    Play(Option<usize>),
    Help,
    Quit,
}

impl BrowseCommand {
    /// Parses one input line; `Err` carries the message to print.
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let index = |rest: &str| -> Result<usize, String> {
            rest.parse::<usize>()
                .map_err(|_| format!("expected a result number, got \"{}\"", rest))
        };

        match word {
            "search" | "s" if !rest.is_empty() => Ok(BrowseCommand::Search(rest.to_string())),
            "search" | "s" => Err("search needs a query".to_string()),
            "list" | "ls" => Ok(BrowseCommand::List),
            "show" => index(rest).map(BrowseCommand::Show),
            "select" | "sel" => index(rest).map(BrowseCommand::Select),
            "next" | "n" => Ok(BrowseCommand::Next),
            "prev" | "previous" | "p" => Ok(BrowseCommand::Previous),
            "play" if rest.is_empty() => Ok(BrowseCommand::Play(None)),
            "play" => index(rest).map(|i| BrowseCommand::Play(Some(i))),
            "help" | "?" => Ok(BrowseCommand::Help),
            "quit" | "exit" | "q" => Ok(BrowseCommand::Quit),
            "" => Err(String::new()),
            other => Err(format!("unknown command \"{}\", try help", other)),
        }
    }
}

/// Interactive session: search, pick songs and play them.
pub async fn browse(session: &Session, initial_query: Option<String>) {
    require_login(session);

    let watcher = session.store.watch(STORE_POLL_INTERVAL);
    let listener = session.auth.start().await;
    let mut browser = Browser::new();

    if let Some(query) = initial_query {
        run_search(session, &mut browser, &query).await;
    }
    info!("Type help for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        let _ = std::io::stdout().flush();

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warning!("Cannot read input: {}", e);
                break;
            }
        };

        let command = match BrowseCommand::parse(&line) {
            Ok(command) => command,
            Err(message) if message.is_empty() => continue,
            Err(message) => {
                warning!("{}", message);
                continue;
            }
        };

        match command {
            BrowseCommand::Search(query) => run_search(session, &mut browser, &query).await,
            BrowseCommand::List => {
                if browser.results().is_empty() {
                    info!("No results yet. Try search <query>");
                } else {
                    if let Some(query) = browser.query() {
                        info!("Results for \"{}\"", query);
                    }
                    println!(
                        "{}",
                        views::render_results(browser.results(), browser.current_index())
                    );
                }
            }
            BrowseCommand::Show(index) => match browser.get(index) {
                Some(track) => println!("{}", views::render_track(track)),
                None => warning!("No result {}", index),
            },
            BrowseCommand::Select(index) => {
                if browser.get(index).is_none() {
                    warning!("No result {}", index);
                } else {
                    browser.select(index);
                }
            }
            BrowseCommand::Next => {
                browser.next();
            }
            BrowseCommand::Previous => {
                browser.previous();
            }
            BrowseCommand::Play(index) => {
                if let Some(index) = index {
                    if browser.select(index).is_none() {
                        warning!("No result {}", index);
                        continue;
                    }
                }
                let Some(uri) = browser.current_song().map(|t| t.uri.clone()) else {
                    warning!("Select a song first");
                    continue;
                };
                match session.client.play(&uri).await {
                    Ok(()) => success!("Playing"),
                    Err(e) => {
                        if report_api_error(&e) {
                            break;
                        }
                    }
                }
            }
            BrowseCommand::Help => println!("{}", HELP),
            BrowseCommand::Quit => break,
        }

        if let Some(bar) = views::render_player_bar(&browser) {
            println!("{}", bar);
        }
    }

    watcher.abort();
    listener.abort();
}

async fn run_search(session: &Session, browser: &mut Browser, query: &str) {
    let pb = utils::spinner(&format!("Searching for \"{}\"...", query));
    let result = session
        .client
        .search_tracks(query, DEFAULT_SEARCH_LIMIT)
        .await;
    pb.finish_and_clear();

    match result {
        Ok(tracks) => {
            browser.set_results(query, tracks);
            if browser.results().is_empty() {
                info!("No songs found. Try searching for something else!");
            } else {
                println!(
                    "{}",
                    views::render_results(browser.results(), browser.current_index())
                );
            }
        }
        Err(e) => {
            report_api_error(&e);
        }
    }
}
