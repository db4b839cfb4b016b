//! Interactive session: read a command, update the journal, redraw

use crate::application::{Journal, Utterance, VoiceInput, WeeklySummarizer};
use crate::cli::output::{format_summaries, format_timeline, format_weeks};
use crate::domain::EntryId;
use crate::error::Result;
use chrono::NaiveDate;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;

const HELP: &str = "\
Commands:
  add TEXT       add an entry dated today
  voice          dictate an entry
  delete ID      delete the entry with this id (e.g. 3 or #3)
  drop POS       delete the entry at this timeline position (0 = most recent)
  timeline       show entries, most recent first
  weeks          show entries grouped by week
  summaries      summarize each week
  export [PATH]  write weekly summaries to a file
  help           show this help
  quit           leave the session
";

/// One interactive session over an opened journal
pub struct Session {
    journal: Journal,
    summarizer: WeeklySummarizer,
    voice: VoiceInput,
    today: Box<dyn Fn() -> NaiveDate>,
}

enum Step {
    Continue { redraw: bool },
    Quit,
}

impl Session {
    /// `today` is asked for the entry date on every `add` and `voice`
    pub fn new(
        journal: Journal,
        summarizer: WeeklySummarizer,
        voice: VoiceInput,
        today: impl Fn() -> NaiveDate + 'static,
    ) -> Self {
        Session {
            journal,
            summarizer,
            voice,
            today: Box::new(today),
        }
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Run until `quit` or end of input. Only failures to read `input` or
    /// write `output` end the session early; undecodable bytes are replaced.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, output: &mut W) -> Result<()> {
        writeln!(
            output,
            "chronomind session ({} storage). Type 'help' for commands.",
            self.journal.storage().as_str()
        )?;
        self.show_notices(output)?;
        self.redraw(output)?;

        let mut raw = Vec::new();
        loop {
            raw.clear();
            if input.read_until(b'\n', &mut raw)? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&raw);
            match self.handle(line.trim(), output)? {
                Step::Quit => break,
                Step::Continue { redraw: true } => self.redraw(output)?,
                Step::Continue { redraw: false } => {}
            }
            output.flush()?;
        }

        writeln!(output, "Bye.")?;
        Ok(())
    }

    fn handle<W: Write>(&mut self, line: &str, output: &mut W) -> Result<Step> {
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };
        debug!(command, "session command");

        let step = match command {
            "" => Step::Continue { redraw: false },
            "quit" | "exit" => Step::Quit,
            "help" => {
                write!(output, "{}", HELP)?;
                Step::Continue { redraw: false }
            }
            "add" => {
                let added = self.journal.add((self.today)(), rest);
                self.report_mutation(added.map(|e| format!("Added {}", e.id)), output)?
            }
            "voice" => {
                writeln!(output, "Listening...")?;
                match self.voice.listen() {
                    Utterance::Text(text) => {
                        writeln!(output, "Heard: {}", text)?;
                        let added = self.journal.add((self.today)(), &text);
                        self.report_mutation(added.map(|e| format!("Added {}", e.id)), output)?
                    }
                    Utterance::Failed(failure) => {
                        writeln!(output, "{}", failure.message())?;
                        Step::Continue { redraw: false }
                    }
                }
            }
            "delete" => {
                let deleted = EntryId::from_str(rest).and_then(|id| self.journal.delete(id));
                self.report_mutation(deleted.map(|e| format!("Deleted {}", e.id)), output)?
            }
            "drop" => {
                let deleted = match rest.parse::<usize>() {
                    Ok(position) => self.journal.delete_at_position(position),
                    Err(_) => Err(crate::ChronoError::EntryNotFound(format!(
                        "'{}' is not a timeline position",
                        rest
                    ))),
                };
                self.report_mutation(deleted.map(|e| format!("Deleted {}", e.id)), output)?
            }
            "timeline" => {
                write!(output, "{}", format_timeline(&self.journal.timeline()))?;
                Step::Continue { redraw: false }
            }
            "weeks" => {
                write!(output, "{}", format_weeks(&self.journal.weeks()))?;
                Step::Continue { redraw: false }
            }
            "summaries" => {
                self.show_summaries(output)?;
                Step::Continue { redraw: false }
            }
            "export" => {
                let path = if rest.is_empty() {
                    self.journal.export_path()
                } else {
                    PathBuf::from(rest)
                };
                match self.summarizer.export(&self.journal.weeks(), &path) {
                    Ok(result) if !result.available => {
                        for notice in &result.notices {
                            writeln!(output, "! {}", notice)?;
                        }
                        writeln!(output, "Nothing exported; summaries are unavailable.")?;
                    }
                    Ok(result) => {
                        for notice in &result.notices {
                            writeln!(output, "! {}", notice)?;
                        }
                        writeln!(
                            output,
                            "Exported {} weekly summaries to {}",
                            result.summaries.len(),
                            path.display()
                        )?;
                    }
                    Err(e) => writeln!(output, "Error: {}", e)?,
                }
                Step::Continue { redraw: false }
            }
            other => {
                writeln!(output, "Unknown command '{}'. Type 'help' for commands.", other)?;
                Step::Continue { redraw: false }
            }
        };
        Ok(step)
    }

    fn report_mutation<W: Write>(&mut self, outcome: Result<String>, output: &mut W) -> Result<Step> {
        let redraw = match outcome {
            Ok(message) => {
                writeln!(output, "{}", message)?;
                true
            }
            Err(e) => {
                writeln!(output, "Error: {}", e)?;
                false
            }
        };
        self.show_notices(output)?;
        Ok(Step::Continue { redraw })
    }

    fn show_notices<W: Write>(&mut self, output: &mut W) -> Result<()> {
        while let Some(notice) = self.journal.take_notice() {
            writeln!(output, "! {}", notice)?;
        }
        Ok(())
    }

    fn show_summaries<W: Write>(&mut self, output: &mut W) -> Result<()> {
        let result = self.summarizer.summarize_weeks(&self.journal.weeks());
        let has_entries = !self.journal.entries().is_empty();
        write!(output, "{}", format_summaries(&result, has_entries))?;
        Ok(())
    }

    fn redraw<W: Write>(&mut self, output: &mut W) -> Result<()> {
        writeln!(output, "--- Timeline ---")?;
        write!(output, "{}", format_timeline(&self.journal.timeline()))?;
        writeln!(output, "--- Weekly summaries ---")?;
        self.show_summaries(output)
    }
}
