// src/cli.rs
use std::{error::Error, path::PathBuf};

use crate::core::net::HttpFetch;
use crate::model::{Favorite, Settings};
use crate::params::{Command, Params};
use crate::runner::{self, Progress};
use crate::store::Store;

pub fn parse(mut args: impl Iterator<Item = String>) -> Result<Params, Box<dyn Error>> {
    let mut command: Option<Command> = None;
    let mut store_dir: Option<PathBuf> = None;
    let mut verbose = false;

    while let Some(a) = args.next() {
        match a.as_str() {
            "add" => {
                let url = args.next().ok_or("Missing calendar URL")?;
                command = Some(Command::Add { url });
            }
            "update" => command = Some(Command::Update),
            "list" => command = Some(Command::List),
            "show" => {
                let which = args.next().ok_or("Missing calendar id or URL")?;
                command = Some(Command::Show { which });
            }
            "remove" => {
                let which = args.next().ok_or("Missing calendar id or URL")?;
                command = Some(Command::Remove { which });
            }
            "fav" => {
                let sub = args.next().ok_or("Missing fav subcommand (add/list/remove)")?;
                command = Some(match sub.as_str() {
                    "add" => Command::FavAdd {
                        which: args.next().ok_or("Missing calendar id or URL")?,
                        entry_url: args.next().ok_or("Missing entry URL")?,
                    },
                    "list" => Command::FavList,
                    "remove" => Command::FavRemove {
                        entry_url: args.next().ok_or("Missing entry URL")?,
                    },
                    other => return Err(format!("Unknown fav subcommand: {}", other).into()),
                });
            }
            "ack" => command = Some(Command::Ack),
            "interval" => {
                let mins: u64 = args.next().ok_or("Missing minutes")?.parse()?;
                if mins == 0 {
                    return Err("Interval must be at least 1 minute".into());
                }
                command = Some(Command::Interval { mins });
            }
            "--store" => store_dir = Some(PathBuf::from(args.next().ok_or("Missing store dir")?)),
            "-v" | "--verbose" => verbose = true,
            "-h" | "--help" => {
                eprintln!(include_str!("cli_help.txt"));
                std::process::exit(0);
            }
            _ => return Err(format!("Unknown arg: {}", a).into()),
        }
    }

    let mut params = Params::new(command.ok_or("No command given (try --help)")?);
    if let Some(dir) = store_dir {
        params.store_dir = dir;
    }
    params.verbose = verbose;
    Ok(params)
}

/// Prints per-calendar lines as the cycle runs.
struct CliProgress;

impl Progress for CliProgress {
    fn begin(&mut self, total: usize) {
        eprintln!("Refreshing {} calendar(s)…", total);
    }
    fn log(&mut self, msg: &str) {
        eprintln!("  ! {}", msg);
    }
    fn item_done(&mut self, url: &str, new_entries: usize) {
        println!("  {} — {} new", url, new_entries);
    }
}

pub fn run(params: &Params) -> Result<(), Box<dyn Error>> {
    let store = Store::open(&params.store_dir)?;

    match &params.command {
        Command::Add { url } => {
            let cal = runner::subscribe(&store, &HttpFetch::new(), url)?;
            println!("Subscribed: {} ({} entries)", cal.title, cal.entries.len());
            println!("id: {}", cal.id);
        }
        Command::Update => {
            let mut progress = CliProgress;
            let summary = runner::refresh_all(&store, &HttpFetch::new(), Some(&mut progress))?;
            // The cycle total is the badge signal; 0 clears it.
            if summary.new_entries > 0 {
                println!("{} new entr{} this cycle.", summary.new_entries,
                    if summary.new_entries == 1 { "y" } else { "ies" });
            } else {
                println!("No new entries.");
            }
            if summary.failed > 0 {
                eprintln!("{} calendar(s) failed; see log.", summary.failed);
            }
        }
        Command::List => {
            for cal in store.list_calendars()? {
                println!(
                    "{}  {:<40}  {} entries, {} unseen",
                    cal.id, cal.title, cal.entries.len(), cal.new_count
                );
            }
        }
        Command::Show { which } => {
            let cal = resolve(&store, which)?;
            println!("{} <{}>", cal.title, cal.url);
            for e in &cal.entries {
                println!("  {:>6}  {}  — {} <{}>", e.date, e.title, e.author, e.url);
            }
        }
        Command::Remove { which } => {
            let cal = resolve(&store, which)?;
            store.remove_calendar(cal.id)?;
            println!("Removed: {}", cal.title);
        }
        Command::FavAdd { which, entry_url } => {
            let cal = resolve(&store, which)?;
            let entry = cal
                .entries
                .iter()
                .find(|e| e.url == *entry_url)
                .ok_or_else(|| format!("No entry {} in {}", entry_url, cal.title))?;
            if store.add_favorite(&Favorite::pin(entry, &cal.title))? {
                println!("Pinned: {}", entry.title);
            } else {
                println!("Already pinned.");
            }
        }
        Command::FavList => {
            for f in store.list_favorites()? {
                println!("  {:>6}  {}  — {} ({})", f.date, f.title, f.author, f.calendar_title);
                println!("          <{}>", f.url);
            }
        }
        Command::FavRemove { entry_url } => {
            if store.remove_favorite(entry_url)? {
                println!("Unpinned.");
            } else {
                println!("Not pinned: {}", entry_url);
            }
        }
        Command::Ack => {
            store.clear_new_counts()?;
            println!("Unseen counts cleared.");
        }
        Command::Interval { mins } => {
            store.save_settings(&Settings { refresh_interval_mins: *mins })?;
            println!("Refresh interval set to {} min.", mins);
        }
    }

    Ok(())
}

fn resolve(store: &Store, which: &str) -> Result<crate::model::Calendar, Box<dyn Error>> {
    store
        .resolve_calendar(which)?
        .ok_or_else(|| format!("No such calendar: {}", which).into())
}
