//! CLI `browse` command: an interactive search loop.
//!
//! Every line typed becomes the new search term and is sent at once, without waiting
//! for the previous query. Results print as they arrive; answers to queries that have
//! since been superseded are dropped silently.

use anyhow::Result;
use babel::config::BabelConfig;
use babel::entry::{EntryId, TypeFilter};
use babel::sync::{Library, QueryOutcome, QueryTicket};
use tokio::io::{AsyncBufReadExt, BufReader};

/// One line of browse input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Quit,
    Refresh,
    Type(TypeFilter),
    Delete(EntryId),
    /// Anything that is not a `:` command; an empty line clears the search.
    Term(String),
    Invalid(String),
}

pub fn parse_command(line: &str) -> BrowseCommand {
    let line = line.trim();
    let Some(command) = line.strip_prefix(':') else {
        return BrowseCommand::Term(line.to_string());
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match (name, arg) {
        ("q" | "quit", "") => BrowseCommand::Quit,
        ("r" | "refresh", "") => BrowseCommand::Refresh,
        ("t" | "type", "") => BrowseCommand::Invalid("usage: :type <all|word|phrase|author|concept|excerpt>".into()),
        ("t" | "type", filter) => match filter.parse() {
            Ok(filter) => BrowseCommand::Type(filter),
            Err(e) => BrowseCommand::Invalid(e),
        },
        ("d" | "delete", "") => BrowseCommand::Invalid("usage: :delete <id>".into()),
        ("d" | "delete", id) => BrowseCommand::Delete(EntryId::from(id)),
        _ => BrowseCommand::Invalid(format!("unknown command: :{name}")),
    }
}

fn print_help() {
    println!("Type to search. Commands:");
    println!("  :type <all|word|phrase|author|concept|excerpt>   change the type filter");
    println!("  :delete <id>                                     delete an entry");
    println!("  :refresh                                         reload the current view");
    println!("  :quit                                            leave");
    println!();
}

fn render(library: &Library, preview_chars: usize) {
    let intent = library.session.intent();
    library.session.with_store(|store| {
        println!(
            "--- \"{}\" ({}): {} entries ---",
            intent.term,
            intent.type_filter,
            store.len()
        );
        super::print_entries(store.entries(), preview_chars);
    });
}

/// Query for `ticket` in the background and print its outcome.
///
/// The ticket is taken by the caller before spawning, so queries are numbered in
/// the order lines were typed.
fn spawn_query(library: &Library, preview_chars: usize, ticket: Option<QueryTicket>) {
    let Some(ticket) = ticket else {
        return;
    };
    let library = library.clone();
    tokio::spawn(async move {
        match library.queries.run(ticket).await {
            Ok(QueryOutcome::Applied { .. }) => render(&library, preview_chars),
            Ok(QueryOutcome::Superseded { .. } | QueryOutcome::Coalesced) => {}
            Err(e) => eprintln!("Search failed, showing previous results: {e}"),
        }
    });
}

pub async fn browse(config: &BabelConfig) -> Result<()> {
    let library = super::connect(config)?;
    let preview_chars = config.display.preview_chars;

    print_help();
    spawn_query(&library, preview_chars, library.queries.begin_refresh());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            BrowseCommand::Quit => break,
            BrowseCommand::Refresh => {
                spawn_query(&library, preview_chars, library.queries.begin_refresh())
            }
            BrowseCommand::Type(filter) => spawn_query(
                &library,
                preview_chars,
                library.queries.begin_type_filter(filter),
            ),
            BrowseCommand::Term(term) => {
                spawn_query(&library, preview_chars, library.queries.begin_term(&term))
            }
            BrowseCommand::Delete(id) => {
                match library.session.get(&id) {
                    Some(entry) => super::print_entry(&entry),
                    None => println!("Entry {id} is not in the current view."),
                }
                println!("Permanently delete this entry? [y/N]: ");
                let answer = lines.next_line().await?.unwrap_or_default();
                if !super::is_yes(&answer) {
                    println!("Kept.");
                    continue;
                }
                match library.mutations.submit_delete(&id).await {
                    Ok(()) => {
                        println!("Deleted entry {id}.");
                        render(&library, preview_chars);
                    }
                    Err(e) => eprintln!("Delete failed: {e}"),
                }
            }
            BrowseCommand::Invalid(reason) => eprintln!("{reason}"),
        }
    }

    Ok(())
}
