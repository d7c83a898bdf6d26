//! Interactive shell over the Newsdash feed core.
//!
//! # Responsibility
//! - Drive hydrate/refresh/filter/search/bookmark flows from stdin commands.
//! - Render projected view-models as plain text.
//!
//! # Invariants
//! - All feed invariants live in `newsdash_core`; this binary only renders
//!   and forwards user intent.

use newsdash_core::{
    default_log_level, init_logging, project, BookmarkEvent, BookmarkManager, Density,
    FileSnapshotFetcher, NavMode, NoticeSlot, Projection, RefreshTrigger, Source, SourceFilter,
    SqliteStateStore, SyncEngine, SyncEvent, ViewQuery, ViewState,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

const DATA_DIR: &str = ".newsdash";
const DB_FILE: &str = "newsdash.sqlite3";
const DEFAULT_FEED_PATH: &str = ".tmp/all_articles.json";
const FEED_PATH_ENV: &str = "NEWSDASH_FEED";

fn main() {
    let Ok(cwd) = std::env::current_dir() else {
        eprintln!("newsdash: cannot determine working directory");
        return;
    };
    let data_dir = cwd.join(DATA_DIR);
    let log_dir = data_dir.join("logs");

    if let Err(err) = std::fs::create_dir_all(&data_dir) {
        eprintln!("newsdash: cannot create {}: {err}", data_dir.display());
        return;
    }

    if let Err(err) = init_logging(default_log_level(), &log_dir.to_string_lossy()) {
        eprintln!("newsdash: logging disabled: {err}");
    }

    let conn = match newsdash_core::db::open_db(data_dir.join(DB_FILE)) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("newsdash: cannot open local state: {err}");
            return;
        }
    };

    let fetcher = FileSnapshotFetcher::new(feed_path(&cwd));
    let mut engine = SyncEngine::new(SqliteStateStore::new(&conn));
    let mut bookmarks = BookmarkManager::new(SqliteStateStore::new(&conn));
    let mut notices = NoticeSlot::new();
    let mut query = ViewQuery::default();
    let mut density = Density::default();

    // Optimistic display: cached data first, then the silent startup fetch.
    engine.hydrate();
    bookmarks.hydrate();
    engine.refresh_with(&fetcher, RefreshTrigger::Startup);

    println!("newsdash {} — type `help` for commands", newsdash_core::core_version());
    render(&engine, &bookmarks, &query, density, &notices);

    let stdin = io::stdin();
    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        match parse(&line) {
            Command::Quit => break,
            Command::Help => print_help(),
            Command::Refresh => {
                if let Some(event) = engine.refresh_with(&fetcher, RefreshTrigger::Manual) {
                    notices.publish(sync_notice(&event), Instant::now());
                }
            }
            Command::Mode(mode) => query.mode = mode,
            Command::Source(filter) => query.source = filter,
            Command::Search(text) => query.search = text,
            Command::Density(value) => density = value,
            Command::Save(id) => {
                let event = bookmarks.toggle(&id);
                notices.publish(bookmark_notice(event), Instant::now());
            }
            Command::Open(id) => {
                match engine
                    .snapshot()
                    .and_then(|snapshot| snapshot.articles.iter().find(|a| a.id == id))
                {
                    Some(article) => println!("open: {}", article.url),
                    None => println!("no article with id `{id}` in the current view"),
                }
                continue;
            }
            Command::Unknown(input) => {
                println!("unknown command `{input}`; type `help`");
                continue;
            }
        }

        render(&engine, &bookmarks, &query, density, &notices);
    }
}

enum Command {
    Refresh,
    Mode(NavMode),
    Source(SourceFilter),
    Search(String),
    Density(Density),
    Save(String),
    Open(String),
    Help,
    Quit,
    Unknown(String),
}

fn parse(line: &str) -> Command {
    let trimmed = line.trim();
    let (head, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (trimmed, ""),
    };

    match head {
        "refresh" | "r" => Command::Refresh,
        "mode" => match rest {
            "feed" => Command::Mode(NavMode::Feed),
            "saved" => Command::Mode(NavMode::Saved),
            _ => Command::Unknown(trimmed.to_string()),
        },
        "source" => match rest {
            "all" => Command::Source(SourceFilter::All),
            other => match Source::parse(other) {
                Some(source) => Command::Source(SourceFilter::One(source)),
                None => Command::Unknown(trimmed.to_string()),
            },
        },
        "search" | "/" => Command::Search(rest.to_string()),
        "density" => match rest {
            "grid" => Command::Density(Density::Grid),
            "list" => Command::Density(Density::List),
            _ => Command::Unknown(trimmed.to_string()),
        },
        "save" if !rest.is_empty() => Command::Save(rest.to_string()),
        "open" if !rest.is_empty() => Command::Open(rest.to_string()),
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        "" => Command::Help,
        _ => Command::Unknown(trimmed.to_string()),
    }
}

fn render(
    engine: &SyncEngine<SqliteStateStore<'_>>,
    bookmarks: &BookmarkManager<SqliteStateStore<'_>>,
    query: &ViewQuery,
    density: Density,
    notices: &NoticeSlot,
) {
    let state = ViewState {
        density,
        loading: engine.is_loading(),
        degraded: engine.is_degraded(),
    };

    let Some(snapshot) = engine.snapshot() else {
        println!("(no data yet — run `refresh`)");
        return;
    };

    let projection = project(snapshot, bookmarks.ids(), query);
    print_header(&projection, query, &state, snapshot.scraped_at.as_str());

    if projection.articles.is_empty() {
        println!("  (nothing matches)");
    }
    for article in &projection.articles {
        let marker = if article.saved { "*" } else { " " };
        match state.density {
            Density::List => println!(
                " {marker} [{}] {} — {} ({})",
                article.id, article.title, article.source_label, article.published_display
            ),
            Density::Grid => {
                println!(" {marker} [{}] {}", article.id, article.title);
                if let Some(summary) = &article.summary {
                    println!("      {summary}");
                }
                println!(
                    "      {} · {}",
                    article.source_label, article.published_display
                );
            }
        }
    }

    if let Some(notice) = notices.current(Instant::now()) {
        println!("-- {notice}");
    }
}

fn print_header(projection: &Projection, query: &ViewQuery, state: &ViewState, scraped_at: &str) {
    let mode = match query.mode {
        NavMode::Feed => "feed",
        NavMode::Saved => "saved",
    };
    let mut line = format!(
        "[{mode}] {} shown / {} total / {} saved",
        projection.articles.len(),
        projection.total_count,
        projection.saved_count
    );
    for (source, count) in &projection.source_counts {
        line.push_str(&format!(" | {}: {count}", source.label()));
    }
    if state.degraded {
        line.push_str(" | STALE DATA");
    }
    println!("{line}");
    if !scraped_at.is_empty() {
        println!("  scraped at {scraped_at}");
    }
}

fn sync_notice(event: &SyncEvent) -> String {
    match event {
        SyncEvent::Refreshed { article_count } => {
            format!("Feed updated: {article_count} articles")
        }
        SyncEvent::RefreshFailed => "Could not refresh — showing last known data".to_string(),
    }
}

fn bookmark_notice(event: BookmarkEvent) -> &'static str {
    match event {
        BookmarkEvent::Saved => "Article saved",
        BookmarkEvent::Removed => "Bookmark removed",
    }
}

fn feed_path(cwd: &std::path::Path) -> PathBuf {
    match std::env::var(FEED_PATH_ENV) {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => cwd.join(DEFAULT_FEED_PATH),
    }
}

fn print_help() {
    println!("commands:");
    println!("  refresh              fetch the latest snapshot");
    println!("  mode feed|saved      switch navigation mode");
    println!("  source all|<id>      filter by source (bens_bites, rundown_ai)");
    println!("  search [text]        substring search; empty clears");
    println!("  density grid|list    switch display density");
    println!("  save <id>            toggle bookmark");
    println!("  open <id>            print the article URL");
    println!("  quit                 exit");
}
