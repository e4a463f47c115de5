use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use cynical_prep::config::SelectionConfig;
use cynical_prep::corpus::normalize::normalize_lines;
use cynical_prep::corpus::ratio::RatioTable;
use cynical_prep::corpus::vocab::{count_vocabulary, write_vocabulary};
use cynical_prep::corpus::{read_corpus, read_vocabulary_file};
use cynical_prep::output::terminal;

/// cynical-prep: prepare corpora for cynical data selection.
///
/// Normalizes text, computes vocabulary statistics, runs the external
/// selection script, and maps its choices back onto the original lines.
#[derive(Parser)]
#[command(name = "cynical-prep", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run selection: pick lines from AVAIL that best model REPR
    Select(SelectArgs),

    /// Normalize a corpus and print its vocabulary (word, probability, count)
    Vocab {
        /// Corpus file, one sentence per line
        corpus: PathBuf,

        /// Keep original casing
        #[arg(long)]
        no_lower: bool,

        /// Print the full table as TSV instead of a summary
        #[arg(long)]
        tsv: bool,
    },

    /// Merge two vocabulary files into a ratio table
    Ratios {
        /// Vocabulary of the representative (in-domain) corpus
        repr_vocab: PathBuf,

        /// Vocabulary of the available (general) corpus
        avail_vocab: PathBuf,

        /// Print the full table as TSV instead of a summary
        #[arg(long)]
        tsv: bool,
    },
}

#[derive(Args)]
struct SelectArgs {
    /// Representative set: the data we're modelling
    #[arg(long = "repr")]
    representative: PathBuf,

    /// Available set: the data we're selecting from
    #[arg(long = "avail")]
    available: PathBuf,

    /// Seed set: data already selected or used
    #[arg(long)]
    seed: Option<PathBuf>,

    /// Directory for selection artifacts and tool output
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Path or name of the selection script
    #[arg(long)]
    cyn_path: Option<String>,

    /// Select sqrt(k) lines per iteration. Much faster, much more approximate.
    #[arg(long)]
    batch_mode: bool,

    /// Ignore words that appear fewer than this many times
    #[arg(long)]
    min_count: Option<u32>,

    /// Ignore words that appear more than this many times (0 = tool default)
    #[arg(long)]
    max_count: Option<u32>,

    /// How many lines to select (0 = all)
    #[arg(long)]
    num_lines: Option<u32>,

    /// Don't select on words with a vocabulary ratio close to 1
    #[arg(long)]
    no_keep_boring: bool,

    /// Let the tool use more memory to run faster
    #[arg(long)]
    no_save_memory: bool,

    /// Keep original casing
    #[arg(long)]
    no_lower: bool,

    /// Keep the working directory after a successful run
    #[arg(long)]
    save_output: bool,

    /// Write the line -> selection mapping as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// How many selected lines to show
    #[arg(long, default_value = "20")]
    show: usize,
}

impl SelectArgs {
    /// Apply command-line overrides on top of env/default config.
    fn apply(&self, config: &mut SelectionConfig) {
        if let Some(dir) = &self.out_dir {
            config.outdir = dir.clone();
        }
        if let Some(tool) = &self.cyn_path {
            config.tool = tool.clone();
        }
        if let Some(n) = self.min_count {
            config.min_count = n;
        }
        if let Some(n) = self.max_count {
            config.max_count = n;
        }
        if let Some(n) = self.num_lines {
            config.num_lines = n;
        }
        config.batch_mode |= self.batch_mode;
        config.save_output |= self.save_output;
        if self.no_keep_boring {
            config.keep_boring = false;
        }
        if self.no_save_memory {
            config.save_memory = false;
        }
        if self.no_lower {
            config.lower = false;
        }
    }
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("cynical_prep=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Select(args) => run_select(&args)?,

        Commands::Vocab {
            corpus,
            no_lower,
            tsv,
        } => {
            let lines = read_corpus(&corpus)?;
            let table = count_vocabulary(normalize_lines(&lines, !no_lower));
            if tsv {
                write_vocabulary(std::io::stdout().lock(), &table)?;
            } else {
                terminal::display_vocabulary(&table, 25);
            }
        }

        Commands::Ratios {
            repr_vocab,
            avail_vocab,
            tsv,
        } => {
            let repr = read_vocabulary_file(&repr_vocab)?;
            let avail = read_vocabulary_file(&avail_vocab)?;
            let ratios = RatioTable::compute(&repr, &avail);
            if tsv {
                ratios.write_stats(std::io::stdout().lock())?;
            } else {
                terminal::display_ratios(&ratios, 15);
            }
        }
    }

    Ok(())
}

fn run_select(args: &SelectArgs) -> Result<()> {
    let mut config = SelectionConfig::from_env()?;
    args.apply(&mut config);

    info!(
        repr = %args.representative.display(),
        avail = %args.available.display(),
        "Reading corpora"
    );
    let representative = read_corpus(&args.representative)?;
    let available = read_corpus(&args.available)?;
    let seed = match &args.seed {
        Some(path) => read_corpus(path)?,
        None => Vec::new(),
    };

    let spinner = terminal::tool_spinner("Running cynical selection");
    let result = cynical_prep::run_selection(&representative, &available, &seed, &config);
    spinner.finish_and_clear();

    let mapping = result.with_context(|| {
        format!(
            "Selection failed (working directory: {})",
            config.outdir.display()
        )
    })?;

    terminal::display_selection(&mapping, args.show);

    if let Some(path) = &args.json {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &mapping)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("{}", format!("Selection mapping saved to: {}", path.display()).bold());
    }

    if config.save_output {
        println!("Artifacts kept in: {}", config.outdir.display());
    }

    Ok(())
}
