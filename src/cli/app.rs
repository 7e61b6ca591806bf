//! CLI module for the vibe diary
//!
//! This module renders the diary on a terminal. All display formatting lives
//! here; the diary itself never formats anything for humans.
use std::{
    fs::{read_to_string, OpenOptions},
    io::{stdin, stdout, Write},
    path::{Path, PathBuf},
    process::Command,
};

use chrono::Local;
use console::style;
use log::{info, warn};
use shell_words::split;
use tempfile::Builder;

use crate::{
    note_preview, read_import_file, strip_comments, write_export_file, Commands, Config,
    KeyValueStore, MoodKind, Outcome, Period, Result, StatsSummary, VibeDiary, VibeEntry,
    VibeError,
};

/// Widest mood chart bar, in cells.
const MAX_BAR_WIDTH: usize = 30;

/// CLI Application handler - processes CLI commands against the diary
pub struct App<K: KeyValueStore> {
    /// The diary being driven
    diary: VibeDiary<K>,

    /// Application configuration
    config: Config,

    /// Whether to display verbose output
    verbose: bool,
}

impl<K: KeyValueStore> App<K> {
    pub fn new(diary: VibeDiary<K>, config: Config, verbose: bool) -> Self {
        Self {
            diary,
            config,
            verbose,
        }
    }

    /// Run the CLI application with the given command
    pub async fn run(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Record { mood, notes, edit } => self.handle_record(mood, notes, edit)?,
            Commands::Delete { id, force } => self.handle_delete(id, force)?,
            Commands::List {
                period,
                limit,
                json,
            } => self.handle_list(period, limit, json)?,
            Commands::Stats { period, json } => self.handle_stats(period, json)?,
            Commands::Timeline => self.handle_timeline(),
            Commands::Moods => self.handle_moods(),
            Commands::Search { query, limit } => self.handle_search(&query, limit),
            Commands::Period { period } => {
                let outcome = self.diary.set_period(period);
                self.report(&outcome);
                println!("Statistics period set to {}", period);
            }
            Commands::View { name } => {
                let outcome = self.diary.switch_view(&name);
                self.report(&outcome);
                println!("Current view set to {}", name);
            }
            Commands::Export { output } => self.handle_export(output).await?,
            Commands::Import { file, force } => self.handle_import(&file, force).await?,
            Commands::Clear { force } => self.handle_clear(force)?,
        }

        Ok(())
    }

    /// Prints the storage notices an operation produced.
    fn report<T>(&self, outcome: &Outcome<T>) {
        for issue in &outcome.issues {
            eprintln!("{} {}", style("warning:").yellow().bold(), issue);
        }
    }

    fn handle_record(&mut self, mood: MoodKind, notes: Option<String>, edit: bool) -> Result<()> {
        let notes = match (notes, edit) {
            (Some(_), true) => {
                return Err(VibeError::ApplicationError {
                    message: "Cannot specify both --notes and --edit options".to_string(),
                })
            }
            (Some(notes), false) => notes,
            (None, true) => self.open_editor_for_notes(mood)?,
            (None, false) => String::new(),
        };

        let outcome = self.diary.record_vibe(Some(mood), &notes)?;
        self.report(&outcome);

        let entry = outcome.into_value();
        println!(
            "{} Vibe saved: {} {} (id {})",
            style("✓").green(),
            entry.mood.emoji(),
            entry.mood.label(),
            entry.id
        );
        Ok(())
    }

    fn open_editor_for_notes(&self, mood: MoodKind) -> Result<String> {
        let temp_file = Builder::new().suffix(".md").tempfile()?;
        let temp_path = temp_file.path().to_path_buf();

        {
            let mut file = OpenOptions::new().write(true).open(&temp_path)?;
            writeln!(file, "<!-- {} {} -->", mood.emoji(), mood.label())?;
            writeln!(
                file,
                "<!-- Write about your day below. Comments are ignored. -->"
            )?;
            writeln!(file)?;
        }

        let editor_cmd = self.config.get_editor_command();
        info!("Opening editor '{}' for notes", editor_cmd);
        self.launch_editor(&editor_cmd, &temp_path)?;

        let content = read_to_string(&temp_path)?;
        Ok(strip_comments(&content))
    }

    fn launch_editor(&self, editor_cmd: &str, file_path: &Path) -> Result<()> {
        // Handle shell-like command parsing
        let args = split(editor_cmd).map_err(|e| VibeError::EditorError {
            message: format!("Failed to parse editor command: {}", e),
        })?;

        let (program, rest) = args.split_first().ok_or_else(|| VibeError::EditorError {
            message: "Empty editor command".to_string(),
        })?;

        let status = Command::new(program).args(rest).arg(file_path).status()?;

        if !status.success() {
            return Err(VibeError::EditorError {
                message: "Editor exited with non-zero status".to_string(),
            });
        }

        Ok(())
    }

    fn handle_delete(&mut self, id: i64, force: bool) -> Result<()> {
        let entry = match self.diary.get(id) {
            Some(entry) => entry.clone(),
            None => {
                println!("No vibe with id {}", id);
                return Ok(());
            }
        };

        if !force {
            println!("You are about to delete the following vibe:");
            self.print_entry(&entry, true);
            if !confirm("Are you sure you want to delete this vibe?")? {
                println!("Deletion cancelled.");
                return Ok(());
            }
        }

        let outcome = self.diary.delete_vibe(id);
        self.report(&outcome);
        println!("Vibe {} has been deleted.", id);
        Ok(())
    }

    fn handle_list(&self, period: Period, limit: usize, json: bool) -> Result<()> {
        let mut entries = self.diary.list_for_period(period);
        let total = entries.len();
        if limit > 0 {
            entries.truncate(limit);
        }

        if json {
            println!("{}", serde_json::to_string_pretty(&entries)?);
            return Ok(());
        }

        if entries.is_empty() {
            println!("No vibes yet. Record one with `vibe-diary record <mood>`.");
            return Ok(());
        }

        self.print_entries(&entries);
        if entries.len() < total {
            println!(
                "\nShowing {} of {} vibes. Use --limit 0 to show all.",
                entries.len(),
                total
            );
        }
        Ok(())
    }

    fn print_entries(&self, entries: &[VibeEntry]) {
        let term_width = terminal_size::terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(80);

        for (i, entry) in entries.iter().enumerate() {
            if i > 0 {
                println!("{}", style("-".repeat(term_width.min(50))).dim());
            }
            self.print_entry(entry, self.verbose);
        }
    }

    fn print_entry(&self, entry: &VibeEntry, full_notes: bool) {
        let when = entry.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M");
        println!(
            "{} {}  {}  {}",
            entry.mood.emoji(),
            style(entry.mood.label()).bold(),
            style(when).dim(),
            style(format!("#{}", entry.id)).dim()
        );

        if full_notes {
            if !entry.notes.is_empty() {
                println!("{}", entry.notes);
            }
        } else {
            let preview = note_preview(&entry.notes, 100);
            if !preview.is_empty() {
                println!("{}", preview);
            }
        }
    }

    fn handle_stats(&self, period: Option<Period>, json: bool) -> Result<()> {
        let period = period.unwrap_or(self.diary.settings().current_period);
        let summary = self.diary.summary(period);

        if json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
            return Ok(());
        }

        if summary.total == 0 {
            println!("No vibes in this period ({}).", period);
            return Ok(());
        }

        self.print_summary(&summary);
        Ok(())
    }

    fn print_summary(&self, summary: &StatsSummary) {
        let top = summary
            .top_mood
            .map(|mood| format!("{} {}", mood.emoji(), mood.label()))
            .unwrap_or_else(|| "-".to_string());

        println!("Period:         {}", style(summary.period).cyan());
        println!("Total vibes:    {}", summary.total);
        println!("Current streak: {} day(s)", summary.streak);
        println!("Top mood:       {}\n", top);

        let label_width = MoodKind::ALL
            .iter()
            .map(|mood| mood.label().chars().count())
            .max()
            .unwrap_or(0);

        for bar in &summary.chart {
            let cells = (bar.percent / 100.0 * MAX_BAR_WIDTH as f64).round() as usize;
            println!(
                "{} {:<width$} {} {}",
                bar.mood.emoji(),
                bar.mood.label(),
                style("█".repeat(cells)).magenta(),
                bar.count,
                width = label_width
            );
        }
    }

    fn handle_timeline(&self) {
        for day in self.diary.weekly_timeline() {
            let glyph = day.mood.map(MoodKind::emoji).unwrap_or("·");
            println!("{}  {}", day.date.format("%a %d %b"), glyph);
        }
        println!("\nCurrent streak: {} day(s)", self.diary.current_streak());
    }

    fn handle_moods(&self) {
        for mood in MoodKind::ALL {
            println!("{}  {:<10} {}", mood.emoji(), mood.value(), mood.label());
        }
    }

    fn handle_search(&self, query: &str, limit: usize) {
        let mut results = self.diary.search(query);
        if limit > 0 {
            results.truncate(limit);
        }

        if results.is_empty() {
            println!("No vibes found matching query: \"{}\"", query);
            return;
        }

        self.print_entries(&results);
        println!("\nFound {} matching vibes.", results.len());
    }

    async fn handle_export(&self, output: Option<PathBuf>) -> Result<()> {
        let document = self.diary.export_snapshot()?;
        let path = output.unwrap_or_else(|| self.config.export_dir.join(self.diary.backup_file_name()));

        write_export_file(&path, &document).await?;
        println!(
            "Exported {} vibes to {}",
            self.diary.list_all().len(),
            path.display()
        );
        Ok(())
    }

    async fn handle_import(&mut self, file: &Path, force: bool) -> Result<()> {
        let document = read_import_file(file).await?;

        if !force && !self.diary.list_all().is_empty() {
            println!(
                "Importing replaces all {} existing vibes and your settings.",
                self.diary.list_all().len()
            );
            if !confirm("Continue?")? {
                println!("Import cancelled.");
                return Ok(());
            }
        }

        match self.diary.import_snapshot(&document) {
            Ok(outcome) => {
                self.report(&outcome);
                println!("Successfully imported {} vibes!", outcome.value);
                Ok(())
            }
            Err(e) => {
                warn!("Import of {} failed: {}", file.display(), e);
                Err(e)
            }
        }
    }

    fn handle_clear(&mut self, force: bool) -> Result<()> {
        if !force {
            println!("{}", style("This deletes every vibe and setting.").red());
            if !confirm("Are you sure? This action cannot be undone!")? {
                println!("Nothing deleted.");
                return Ok(());
            }
        }

        let outcome = self.diary.clear_all();
        self.report(&outcome);
        if outcome.is_clean() {
            println!("All data cleared.");
        }
        Ok(())
    }
}

/// Asks a yes/no question on the terminal; anything but y/yes is a no.
fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N]: ", question);
    stdout().flush().map_err(VibeError::Io)?;

    let mut input = String::new();
    stdin().read_line(&mut input).map_err(VibeError::Io)?;

    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}
