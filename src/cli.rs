use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre;

use crate::history::{self, QueryHistory};
use crate::options::ParseOptions;

#[derive(Debug, Parser)]
#[command(name = "sqp", version)]
#[command(about = "Parse search-bar query strings into text and field filters", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a query and print it as JSON
    Parse(ParseArgs),
    /// Show or clear previously parsed queries
    History(HistoryArgs),
}

#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Query words, joined with spaces
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Field name to treat as a keyword (comma-separated values)
    #[arg(short, long = "keyword", env = "SQP_KEYWORDS", value_delimiter = ',')]
    pub keywords: Vec<String>,

    /// Field name to treat as a range (from-to)
    #[arg(short, long = "range", env = "SQP_RANGES", value_delimiter = ',')]
    pub ranges: Vec<String>,

    /// JSON config file with "keywords" and "ranges" lists
    #[arg(short, long, env = "SQP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(short, long)]
    pub pretty: bool,

    /// Don't record this query in the history
    #[arg(long)]
    pub no_history: bool,
}

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Number of entries to show
    #[arg(short = 'n', long, default_value_t = 20)]
    pub limit: usize,

    /// Remove all entries
    #[arg(long)]
    pub clear: bool,
}

impl Cli {
    pub async fn run(self, out: &mut impl Write) -> eyre::Result<()> {
        match self.command {
            Command::Parse(args) => run_parse(args, out).await,
            Command::History(args) => run_history(args, out).await,
        }
    }
}

impl ParseArgs {
    /// Config file options (explicit or default location) plus names given on the command line.
    pub async fn options(&self) -> eyre::Result<ParseOptions> {
        let from_file = match &self.config {
            Some(path) => ParseOptions::load(path).await?,
            None => ParseOptions::load_default().await?,
        };

        let from_args = ParseOptions::new()
            .with_keywords(self.keywords.iter().filter(|k| !k.is_empty()).cloned())
            .with_ranges(self.ranges.iter().filter(|r| !r.is_empty()).cloned());

        Ok(from_file.merge(from_args))
    }

    pub fn raw_query(&self) -> String {
        self.query.join(" ")
    }
}

async fn run_parse(args: ParseArgs, out: &mut impl Write) -> eyre::Result<()> {
    let options = args.options().await?;
    let raw = args.raw_query();

    let query = crate::parse(&raw, &options);

    let json = if args.pretty {
        serde_json::to_string_pretty(&query)?
    } else {
        serde_json::to_string(&query)?
    };
    writeln!(out, "{json}")?;

    if !args.no_history {
        if let Err(err) = record_history(raw).await {
            tracing::warn!("Could not update history: {err:#}");
        }
    }

    Ok(())
}

async fn record_history(raw: String) -> eyre::Result<()> {
    let path = history::default_history_path()?;
    let mut history = history::load_history(&path).await?;
    history.add_query(raw);
    history::save_history(&path, &history).await
}

async fn run_history(args: HistoryArgs, out: &mut impl Write) -> eyre::Result<()> {
    let path = history::default_history_path()?;

    if args.clear {
        history::save_history(&path, &QueryHistory::default()).await?;
        return Ok(());
    }

    let history = history::load_history(&path).await?;
    for query in history.recent(args.limit) {
        writeln!(out, "{query}")?;
    }

    Ok(())
}
