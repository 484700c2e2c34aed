//! CLI definition and dispatch.
//!
//! Every invocation loads a fresh ledger snapshot, performs one operation and
//! exits. Command output goes to stdout; diagnostics go to stderr.

use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_ledger_adapter::CsvLedgerAdapter;
use crate::adapters::csv_watchlist_adapter::CsvWatchlistAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::html_report::HtmlReportAdapter;
use crate::adapters::sample_article_source::SampleArticleSource;
use crate::adapters::serialized_ledger::SerializedLedger;
use crate::domain::analytics::{LedgerSummary, NO_TRADES};
use crate::domain::article::{AnalyzedArticle, DEFAULT_ARTICLES, MAX_ARTICLES, clamp_count};
use crate::domain::config_validation::validate_config;
use crate::domain::error::LedgerError;
use crate::domain::ledger::checked_index;
use crate::domain::trade::{Action, TradeOutcome, TradeRecord};
use crate::domain::watchlist::Stance;
use crate::ports::article_port::ArticleSource;
use crate::ports::config_port::ConfigPort;
use crate::ports::ledger_port::LedgerPort;
use crate::ports::report_port::ReportPort;
use crate::ports::watchlist_port::WatchlistPort;

pub type CliLedger = SerializedLedger<Box<dyn LedgerPort + Send>>;

#[derive(Parser, Debug)]
#[command(name = "tradeledger", about = "Trade decision ledger with analytics")]
pub struct Cli {
    /// INI configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record a new open trade
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        action: Action,
        #[arg(long)]
        summary: String,
    },
    /// Close the trade at INDEX with a result
    Close {
        #[arg(allow_negative_numbers = true)]
        index: i64,
        #[arg(long)]
        result: TradeOutcome,
    },
    /// Print the trade log
    List,
    /// Print ledger analytics
    Stats,
    /// Write the HTML dashboard
    Report {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show analyzed articles
    News {
        #[arg(long, default_value_t = DEFAULT_ARTICLES)]
        count: usize,
    },
    /// Manage tracked positions
    Watch {
        #[command(subcommand)]
        command: WatchCommand,
    },
    /// Record a trade from an article's recommendation
    LogTrade {
        #[arg(long)]
        article: usize,
    },
}

#[derive(Subcommand, Debug)]
pub enum WatchCommand {
    /// Print tracked positions
    List,
    /// Track the article at the given position in the news list
    Track {
        #[arg(long)]
        article: usize,
        /// Defaults to the article's recommendation
        #[arg(long)]
        stance: Option<Stance>,
        /// Defaults to `[watchlist] default_size`
        #[arg(long, allow_negative_numbers = true)]
        size: Option<f64>,
    },
    /// Stop tracking every position with this title
    Remove {
        #[arg(long)]
        title: String,
    },
}

pub fn run(command: Command, config: &dyn ConfigPort) -> ExitCode {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match execute(command, config, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Validate `config`, then run one command, writing its output to `out`.
pub fn execute(
    command: Command,
    config: &dyn ConfigPort,
    out: &mut dyn Write,
) -> Result<(), LedgerError> {
    validate_config(config)?;

    match command {
        Command::Add {
            title,
            action,
            summary,
        } => run_add(config, &title, action, &summary, out),
        Command::Close { index, result } => run_close(config, index, result, out),
        Command::List => run_list(config, out),
        Command::Stats => run_stats(config, out),
        Command::Report { output } => run_report(config, output.as_deref(), out),
        Command::News { count } => run_news(count, out),
        Command::Watch { command } => run_watch(config, command, out),
        Command::LogTrade { article } => run_log_trade(config, article, out),
    }
}

/// Read the INI file when one is given; otherwise every key takes its default.
pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, LedgerError> {
    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            FileConfigAdapter::from_file(path)
        }
        None => Ok(FileConfigAdapter::empty()),
    }
}

pub fn open_ledger(config: &dyn ConfigPort) -> Result<CliLedger, LedgerError> {
    let backend = config.get_string_or("ledger", "backend", "csv").to_lowercase();
    let inner: Box<dyn LedgerPort + Send> = match backend.as_str() {
        #[cfg(feature = "sqlite")]
        "sqlite" => Box::new(
            crate::adapters::sqlite_ledger_adapter::SqliteLedgerAdapter::from_config(config)?,
        ),
        _ => Box::new(CsvLedgerAdapter::new(PathBuf::from(
            config.get_string_or("ledger", "path", "trades.csv"),
        ))),
    };
    tracing::debug!(backend = %backend, "opened ledger");
    Ok(SerializedLedger::new(inner))
}

fn open_watchlist(config: &dyn ConfigPort) -> CsvWatchlistAdapter {
    CsvWatchlistAdapter::new(PathBuf::from(
        config.get_string_or("watchlist", "path", "watchlist.csv"),
    ))
}

fn now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}

fn run_add(
    config: &dyn ConfigPort,
    title: &str,
    action: Action,
    summary: &str,
    out: &mut dyn Write,
) -> Result<(), LedgerError> {
    let record = TradeRecord::open(now(), title, action, summary)?;
    let ledger = open_ledger(config)?;
    let index = ledger.append(record)?;
    writeln!(out, "Logged trade #{index}: {action} {}", title.trim())?;
    Ok(())
}

fn run_close(
    config: &dyn ConfigPort,
    raw_index: i64,
    result: TradeOutcome,
    out: &mut dyn Write,
) -> Result<(), LedgerError> {
    let ledger = open_ledger(config)?;
    let len = ledger.load()?.len();
    let index = checked_index(raw_index, len).inspect_err(|e| {
        tracing::warn!(index = raw_index, len, error = %e, "close rejected");
    })?;
    ledger.close(index, result)?;
    writeln!(out, "Closed trade #{index} as {result}")?;
    Ok(())
}

fn run_list(config: &dyn ConfigPort, out: &mut dyn Write) -> Result<(), LedgerError> {
    let records = open_ledger(config)?.load()?;
    if records.is_empty() {
        writeln!(out, "{NO_TRADES}")?;
        return Ok(());
    }

    writeln!(out, "#\ttimestamp\ttitle\taction\tstatus\tresult\tsummary")?;
    for (index, record) in records.iter().enumerate() {
        writeln!(
            out,
            "{index}\t{}\t{}\t{}\t{}\t{}\t{}",
            record.formatted_timestamp(),
            record.title,
            record.action,
            record.status,
            record.result.map(|r| r.label()).unwrap_or("-"),
            record.summary,
        )?;
    }
    Ok(())
}

fn run_stats(config: &dyn ConfigPort, out: &mut dyn Write) -> Result<(), LedgerError> {
    let records = open_ledger(config)?.load()?;
    if records.is_empty() {
        writeln!(out, "{NO_TRADES}")?;
        return Ok(());
    }

    let summary = LedgerSummary::compute(&records);
    writeln!(out, "Total trades: {}", summary.total_trades)?;
    writeln!(out, "Open: {}", summary.open_trades)?;
    writeln!(out, "Closed: {}", summary.closed_trades)?;
    writeln!(out, "Awaiting result: {}", summary.awaiting_result)?;

    writeln!(out, "Buy vs Sell:")?;
    for (action, pct) in summary.action_mix.shares() {
        writeln!(
            out,
            "  {action}: {} ({pct:.1}%)",
            summary.action_mix.count(action)
        )?;
    }

    writeln!(out, "Open vs Closed:")?;
    for (status, count) in &summary.status_mix.entries {
        writeln!(out, "  {status}: {count}")?;
    }

    writeln!(out, "Trades per day:")?;
    for (date, count) in &summary.frequency {
        writeln!(out, "  {date}: {count}")?;
    }

    match summary.success_rate_note() {
        None => writeln!(out, "Success rate: {}", summary.success_rate)?,
        Some(note) => writeln!(out, "Success rate: {} ({note})", summary.success_rate)?,
    }
    Ok(())
}

fn run_report(
    config: &dyn ConfigPort,
    output: Option<&Path>,
    out: &mut dyn Write,
) -> Result<(), LedgerError> {
    let output = match output {
        Some(path) => path.display().to_string(),
        None => config.get_string_or("report", "output", "dashboard.html"),
    };
    let records = open_ledger(config)?.load()?;
    HtmlReportAdapter::new().write(&records, &output)?;
    writeln!(out, "Dashboard written to {output}")?;
    Ok(())
}

fn analyzed_articles(limit: usize) -> Result<Vec<AnalyzedArticle>, LedgerError> {
    Ok(SampleArticleSource::new()
        .fetch(clamp_count(limit))?
        .into_iter()
        .map(AnalyzedArticle::analyze)
        .collect())
}

fn article_at(position: usize) -> Result<AnalyzedArticle, LedgerError> {
    let mut articles = analyzed_articles(MAX_ARTICLES)?;
    if position >= articles.len() {
        return Err(LedgerError::InvalidInput {
            field: "article",
            reason: format!(
                "no article at position {position} ({} available)",
                articles.len()
            ),
        });
    }
    Ok(articles.swap_remove(position))
}

fn run_news(count: usize, out: &mut dyn Write) -> Result<(), LedgerError> {
    let articles = analyzed_articles(count)?;
    if articles.is_empty() {
        writeln!(out, "No articles available.")?;
        return Ok(());
    }
    for (position, analyzed) in articles.iter().enumerate() {
        let article = &analyzed.article;
        writeln!(out, "[{position}] {}", article.title)?;
        writeln!(out, "    {}", article.description)?;
        writeln!(out, "    {}", article.url)?;
        writeln!(
            out,
            "    price {:.2} | sentiment {} | recommendation {}",
            article.price, analyzed.sentiment, analyzed.recommendation
        )?;
    }
    Ok(())
}

fn run_watch(
    config: &dyn ConfigPort,
    command: WatchCommand,
    out: &mut dyn Write,
) -> Result<(), LedgerError> {
    let store = open_watchlist(config);
    match command {
        WatchCommand::List => {
            let watchlist = store.load()?;
            if watchlist.is_empty() {
                writeln!(out, "No positions tracked yet.")?;
            }
            for position in watchlist.positions() {
                writeln!(
                    out,
                    "{}\t{}\t{:.2}\t{}\t{}",
                    position.title,
                    position.stance,
                    position.investment_size,
                    position.sentiment,
                    position.recommendation
                )?;
            }
        }
        WatchCommand::Track {
            article,
            stance,
            size,
        } => {
            let analyzed = article_at(article)?;
            let stance = stance.unwrap_or(Stance::from(analyzed.recommendation));
            let size = size.unwrap_or_else(|| config.get_double("watchlist", "default_size", 0.0));
            let mut watchlist = store.load()?;
            let title = watchlist.track(&analyzed, stance, size)?.title.clone();
            store.save(&watchlist)?;
            tracing::info!(title = %title, stance = %stance, size, "tracking position");
            writeln!(out, "Tracking {title} ({stance}, {size:.2})")?;
        }
        WatchCommand::Remove { title } => {
            let mut watchlist = store.load()?;
            let removed = watchlist.remove_by_title(&title);
            if removed == 0 {
                let tracked = watchlist.titles();
                if tracked.is_empty() {
                    writeln!(out, "No tracked position titled {title}; nothing is tracked.")?;
                } else {
                    writeln!(
                        out,
                        "No tracked position titled {title}. Tracked: {}",
                        tracked.join(", ")
                    )?;
                }
                return Ok(());
            }
            store.save(&watchlist)?;
            tracing::info!(title = %title, removed, "removed tracked positions");
            writeln!(out, "Removed {removed} position(s) titled {title}")?;
        }
    }
    Ok(())
}

fn run_log_trade(
    config: &dyn ConfigPort,
    article: usize,
    out: &mut dyn Write,
) -> Result<(), LedgerError> {
    let analyzed = article_at(article)?;
    let action = analyzed.recommendation;
    run_add(
        config,
        &analyzed.article.title,
        action,
        &analyzed.article.description,
        out,
    )
}
