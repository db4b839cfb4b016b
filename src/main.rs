use chrono::{Local, NaiveDate};
use chronomind::application::{init, ConfigService, Journal, Utterance, VoiceInput, WeeklySummarizer};
use chronomind::cli::{format_summaries, format_timeline, format_weeks, Cli, Commands, Session};
use chronomind::domain::{DateRef, EntryId};
use chronomind::error::ChronoError;
use chronomind::infrastructure::{FileSystemRepository, JournalRepository, StorageKind};
use chronomind::logging;
use clap::Parser;
use std::io;
use std::str::FromStr;

fn main() {
    logging::init();
    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e.display_with_suggestions());
            std::process::exit(e.exit_code());
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn resolve_date(reference: &str) -> Result<NaiveDate, ChronoError> {
    Ok(DateRef::parse(reference)?.resolve(today()))
}

fn print_notices(journal: &mut Journal) {
    while let Some(notice) = journal.take_notice() {
        eprintln!("! {}", notice);
    }
}

fn run(cli: Cli) -> Result<(), ChronoError> {
    match cli.command {
        Commands::Init { path, storage } => {
            let storage = StorageKind::from_str(&storage).map_err(ChronoError::Config)?;
            init::init(&path, storage)
        }
        Commands::Add { text, date } => {
            let date = resolve_date(&date)?;
            let repo = FileSystemRepository::discover()?;
            let mut journal = Journal::open_for_command(&repo, "add")?;
            print_notices(&mut journal);

            let entry = journal.add(date, &text.join(" "))?;
            println!("Added {}  {}", entry.id, entry.date.format("%Y-%m-%d"));
            Ok(())
        }
        Commands::Voice { date } => {
            let date = resolve_date(&date)?;
            let repo = FileSystemRepository::discover()?;
            let mut journal = Journal::open_for_command(&repo, "voice")?;
            print_notices(&mut journal);

            let voice = VoiceInput::from_config(journal.config(), journal.root());
            eprintln!("Listening...");
            match voice.listen() {
                Utterance::Text(text) => {
                    let entry = journal.add(date, &text)?;
                    println!("Added {}  {}  {}", entry.id, entry.date.format("%Y-%m-%d"), entry.text);
                    Ok(())
                }
                Utterance::Failed(failure) => Err(ChronoError::Voice(failure.message())),
            }
        }
        Commands::Timeline { limit } => {
            let repo = FileSystemRepository::discover()?;
            let mut journal = Journal::open_for_command(&repo, "timeline")?;
            print_notices(&mut journal);

            let mut timeline = journal.timeline();
            if let Some(limit) = limit {
                timeline.truncate(limit);
            }
            print!("{}", format_timeline(&timeline));
            Ok(())
        }
        Commands::Delete { id, position } => {
            let repo = FileSystemRepository::discover()?;
            let mut journal = Journal::open_for_command(&repo, "delete")?;
            print_notices(&mut journal);

            let entry = match (id, position) {
                (Some(id), _) => journal.delete(EntryId::from_str(&id)?)?,
                (None, Some(position)) => journal.delete_at_position(position)?,
                (None, None) => {
                    return Err(ChronoError::EntryNotFound(
                        "no entry id or position given".to_string(),
                    ))
                }
            };
            println!("Deleted {}  {}  {}", entry.id, entry.date.format("%Y-%m-%d"), entry.text);
            Ok(())
        }
        Commands::Weeks => {
            let repo = FileSystemRepository::discover()?;
            let mut journal = Journal::open_for_command(&repo, "weeks")?;
            print_notices(&mut journal);

            print!("{}", format_weeks(&journal.weeks()));
            Ok(())
        }
        Commands::Summaries => {
            let repo = FileSystemRepository::discover()?;
            let mut journal = Journal::open_for_command(&repo, "summaries")?;
            print_notices(&mut journal);

            let mut summarizer = WeeklySummarizer::from_config(&journal.config().summarizer);
            let result = summarizer.summarize_weeks(&journal.weeks());
            print!("{}", format_summaries(&result, !journal.entries().is_empty()));
            Ok(())
        }
        Commands::Export { output } => {
            let repo = FileSystemRepository::discover()?;
            let mut journal = Journal::open_for_command(&repo, "export")?;
            print_notices(&mut journal);

            let path = output.unwrap_or_else(|| journal.export_path());
            let mut summarizer = WeeklySummarizer::from_config(&journal.config().summarizer);
            if let Some(reason) = summarizer.unavailable_reason() {
                return Err(ChronoError::Summarizer(reason.to_string()));
            }
            let result = summarizer.export(&journal.weeks(), &path)?;
            for notice in &result.notices {
                eprintln!("! {}", notice);
            }
            if !result.available {
                return Err(ChronoError::Summarizer(
                    summarizer
                        .unavailable_reason()
                        .unwrap_or("no summarizer configured")
                        .to_string(),
                ));
            }
            println!(
                "Exported {} weekly summaries to {}",
                result.summaries.len(),
                path.display()
            );
            Ok(())
        }
        Commands::Session { ephemeral } => {
            let repo = FileSystemRepository::discover()?;
            let journal = if ephemeral {
                let config = repo.load_config()?;
                Journal::with_storage(&repo.root, config, StorageKind::Memory)
            } else {
                Journal::open(&repo)?
            };

            let summarizer = WeeklySummarizer::from_config(&journal.config().summarizer);
            let voice = VoiceInput::from_config(journal.config(), journal.root());
            let mut session = Session::new(journal, summarizer, voice, today);

            let stdin = io::stdin();
            let mut stdout = io::stdout();
            session.run(stdin.lock(), &mut stdout)
        }
        Commands::Config { key, value, list } => {
            let repo = FileSystemRepository::discover()?;
            let service = ConfigService::new(repo);

            if list {
                for (key, value) in service.list()? {
                    println!("{} = {}", key, value);
                }
                Ok(())
            } else if let Some(k) = key {
                if let Some(v) = value {
                    service.set(&k, &v)?;
                    println!("Set {} = {}", k, v);
                    Ok(())
                } else {
                    println!("{}", service.get(&k)?);
                    Ok(())
                }
            } else {
                println!("Usage: chronomind config [--list | <key> [<value>]]");
                println!("List every key with: chronomind config --list");
                Ok(())
            }
        }
    }
}
