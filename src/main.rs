#![cfg(not(tarpaulin_include))]

use clap::{Parser, Subcommand};
use etymon::config::Config;
use etymon::feedback::{FeedbackKind, FeedbackRecord, append_feedback, load_feedback, pending_feedback};
use etymon::saving::{load_pending, open_store};
use etymon::{
    MergeStats, VocabularyTree, build_tree_from_records, downloader, loader, merge_into,
    parse_contribution_with_report,
};
use log::info;
use std::error::Error;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

/// Maintains the Etymon Decoder vocabulary database.
///
/// Every write command loads the database, merges new material into it and
/// saves it back. Run one writer at a time against the same database.
#[derive(Parser)]
#[command(name = "etymon", version, about = "Etymon Decoder vocabulary database tool")]
struct Cli {
    /// Database file (.json, .json.gz or .csv) [env: ETYMON_DB]
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Pending contributions file [env: ETYMON_PENDING]
    #[arg(long, global = true)]
    pending: Option<PathBuf>,

    /// Feedback log [env: ETYMON_FEEDBACK]
    #[arg(long, global = true)]
    feedback: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Merge rows from a CSV export of the vocabulary sheet
    Import {
        csv: PathBuf,
        /// The sheet uses side-by-side 9-column blocks
        #[arg(long)]
        blocks: bool,
    },
    /// Parse a free-text contribution (file or `-` for stdin) and merge it
    Contribute { input: String },
    /// Merge the pending contributions file into the database
    MergePending,
    /// Write the database as a flattened CSV backup
    Export {
        output: PathBuf,
        /// Prefix a byte-order mark for spreadsheet programs
        #[arg(long)]
        excel: bool,
    },
    /// Print database counters
    Stats,
    /// File an error report against a word
    Report {
        word: String,
        /// pronunciation, breakdown, definition, category or other
        kind: FeedbackKind,
        comment: String,
    },
    /// List reports still waiting for review
    Reports,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = Config::from_env().with_overrides(cli.db, cli.pending, cli.feedback);

    match run(&config, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config, command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Import { csv, blocks } => {
            let records = if blocks {
                loader::from_csv_blocks(&csv)?
            } else {
                loader::from_csv(&csv)?
            };
            let (incoming, skipped) = build_tree_from_records(&records);
            println!(
                "Read {} rows from {} ({} without a word were dropped)",
                records.len(),
                csv.display(),
                skipped
            );
            commit(config, incoming)?;
        }
        Command::Contribute { input } => {
            let text = if input == "-" {
                let mut buf = String::new();
                io::stdin().read_to_string(&mut buf)?;
                buf
            } else {
                fs::read_to_string(&input)?
            };
            let (incoming, report) = parse_contribution_with_report(&text)?;
            println!(
                "Recognised {} categories, {} root groups, {} words",
                report.categories, report.groups, report.words
            );
            if report.dropped_categories + report.dropped_groups + report.skipped_lines > 0 {
                println!(
                    "Dropped {} empty categories, {} empty root groups, {} unrecognised lines",
                    report.dropped_categories, report.dropped_groups, report.skipped_lines
                );
            }
            commit(config, incoming)?;
        }
        Command::MergePending => match load_pending(&config.pending)? {
            Some(incoming) => {
                commit(config, incoming)?;
            }
            None => {
                return Err(format!("{} not found", config.pending.display()).into());
            }
        },
        Command::Export { output, excel } => {
            let tree = open_store(&config.database)?.load()?;
            let csv = if excel {
                downloader::to_excel_csv(&tree)
            } else {
                downloader::to_csv(&tree)
            };
            fs::write(&output, csv)?;
            println!("Exported {} words to {}", tree.stats().words, output.display());
        }
        Command::Stats => {
            let tree = open_store(&config.database)?.load()?;
            println!("{}", tree.stats());
            for cat in &tree {
                println!("  {:<24} {:>4} groups {:>6} words", cat.category, cat.root_groups.len(), cat.word_count());
            }
        }
        Command::Report { word, kind, comment } => {
            let record = FeedbackRecord::new(&word, kind, &comment)?;
            append_feedback(&config.feedback, &record)?;
            println!("Report for '{}' saved to {}", record.word, config.feedback.display());
        }
        Command::Reports => {
            let records = load_feedback(&config.feedback)?;
            let pending = pending_feedback(&records);
            if pending.is_empty() {
                println!("No pending reports.");
            }
            for r in pending {
                println!("[{}] {} ({}): {}", r.timestamp, r.word, r.kind, r.comment);
            }
        }
    }
    Ok(())
}

/// Load, merge, save. Nothing is written when the merge changed nothing.
fn commit(config: &Config, incoming: VocabularyTree) -> Result<MergeStats, Box<dyn Error>> {
    let store = open_store(&config.database)?;
    let mut tree = store.load()?;
    let stats = merge_into(&mut tree, incoming);

    if stats.is_noop() {
        println!("Nothing new to merge ({})", stats);
        return Ok(stats);
    }

    store.save(&tree)?;
    info!("saved {} ({})", config.database.display(), tree.stats());
    println!("Merged into {}: {}", config.database.display(), stats);
    Ok(stats)
}
