//! # trend
//!
//! Command-line front end for trendkit: analyze a series file, run a single
//! operation, keep a monitoring service running, or manage the spending
//! ledger.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use indexmap::IndexMap;
use serde_json::{Map, Value};

use trend_analysis::{AnalysisConfig, Operation, SeriesAnalyzer};
use trend_core::guard::positive_integer;
use trend_core::{guarded, ArgKey, CallArgs, ResultTable};
use trend_service::ledger::{Card, CardUpdate, JsonLedger};
use trend_service::logging::{init_logging, LogConfig};
use trend_service::monitor::MonitoringService;
use trend_service::sink::{file_sink, write_report, Report};
use trend_service::source::{JsonFileSource, Snapshot};
use trend_service::{OutputFormat, Result, ServiceConfig, ServiceError};

#[derive(Parser)]
#[command(name = "trend")]
#[command(about = "Single-series trend analysis", long_about = None)]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the full result table for a series file
    Analyze {
        #[command(flatten)]
        input: InputArgs,

        /// Moving average window; passed through argument validation as given
        #[arg(short, long)]
        window: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Run one operation by name
    Run {
        #[command(flatten)]
        input: InputArgs,

        /// Operation (moving_average, differential, autocorrelation, maxima, minima)
        #[arg(long)]
        operation: Operation,

        /// Operation argument as NAME=VALUE, or a bare VALUE for a positional one
        #[arg(long = "arg")]
        args: Vec<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Re-analyze a source on an interval, as described by a service config
    Monitor(MonitorArgs),

    /// Manage the spending ledger
    Ledger {
        /// Ledger database file
        #[arg(long, default_value = "BD.json")]
        db: PathBuf,

        #[command(subcommand)]
        command: LedgerCommand,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Series file (JSON array, or object of keyword columns with optional "dates")
    #[arg(short, long)]
    input: PathBuf,

    /// Column to analyze in an object-shaped file
    #[arg(short, long)]
    keyword: Option<String>,
}

#[derive(Args)]
struct OutputArgs {
    /// Output format (text, csv, json)
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Output file; stdout when absent
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct MonitorArgs {
    /// Service configuration file
    #[arg(short, long)]
    config: PathBuf,

    /// Stop after this many cycles
    #[arg(long)]
    cycles: Option<u64>,

    /// Run a single cycle on the current thread and exit
    #[arg(long, conflicts_with = "cycles")]
    once: bool,
}

#[derive(Subcommand)]
enum LedgerCommand {
    /// Create a user
    AddUser {
        user_id: String,
        /// Extra profile fields as a JSON object
        #[arg(default_value = "{}")]
        data: String,
    },

    /// Merge profile fields into a user
    UpdateUser {
        user_id: String,
        /// Profile fields as a JSON object
        data: String,
    },

    /// Add a payment card to a user
    AddCard {
        user_id: String,
        card_number: String,
        /// Expiry date, MM/YY
        expiry_date: String,
        cvv_code: u32,
        /// Monthly spending as a JSON object of month to amount
        #[arg(default_value = "{}")]
        monthly_spending: String,
    },

    /// Change fields of an existing card
    UpdateCard {
        user_id: String,
        card_number: String,
        #[arg(long)]
        expiry_date: Option<String>,
        #[arg(long)]
        cvv_code: Option<u32>,
        /// Replacement monthly spending as a JSON object
        #[arg(long)]
        monthly_spending: Option<String>,
    },

    /// Remove a card
    DeleteCard { user_id: String, card_number: String },

    /// List a user's cards and their spending
    Cards { user_id: String },

    /// Total, monthly, min, max, mean and range of a user's spending
    Summary { user_id: String },

    /// Analyze a user's monthly spending totals
    Analyze {
        user_id: String,

        /// Moving average window
        #[arg(short, long)]
        window: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },
}

impl Cli {
    fn log_config(&self, base: LogConfig) -> LogConfig {
        let config = match &self.log_level {
            Some(level) => base.with_level(level.clone()),
            None => base,
        };
        if self.log_json {
            config.with_json(true)
        } else {
            config
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // A service config may carry its own log settings.
    let preloaded = match &cli.command {
        Command::Monitor(args) => Some(ServiceConfig::from_file(&args.config)),
        _ => None,
    };
    let base_log = preloaded
        .as_ref()
        .and_then(|config| config.as_ref().ok())
        .map(|config| config.log.clone())
        .unwrap_or_default();

    if let Err(err) = init_logging(&cli.log_config(base_log)) {
        eprintln!("trend: {err}");
        return ExitCode::FAILURE;
    }

    match run(cli.command, preloaded) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, preloaded: Option<Result<ServiceConfig>>) -> Result<()> {
    match command {
        Command::Analyze {
            input,
            window,
            output,
        } => {
            let snapshot = load_snapshot(&input)?;
            let window = window_size(window.as_deref(), AnalysisConfig::default().window_size)?;
            let label = input.keyword.clone().unwrap_or_else(|| input.input.display().to_string());
            analyze_snapshot(&label, snapshot, window, &output)
        }

        Command::Run {
            input,
            operation,
            args,
            output,
        } => {
            let snapshot = load_snapshot(&input)?;
            let call_args = parse_call_args(&args);
            let analyzer = SeriesAnalyzer::new(snapshot.values);
            let series = analyzer.invoke(operation, &call_args)?;

            let table = ResultTable::from_columns([(operation.column_name(), series)])?;
            let label = operation.name();
            let report = Report::new(label, &table).with_row_labels(snapshot.labels.as_deref());
            emit(output.format, &report, output.output.as_deref())
        }

        Command::Monitor(args) => {
            let config = match preloaded {
                Some(config) => config?,
                None => ServiceConfig::from_file(&args.config)?,
            };
            monitor(config, &args)
        }

        Command::Ledger { db, command } => ledger(&db, command),
    }
}

fn load_snapshot(input: &InputArgs) -> Result<Snapshot> {
    let mut source = JsonFileSource::new(&input.input);
    if let Some(keyword) = &input.keyword {
        source = source.with_keyword(keyword.clone());
    }
    source.read()?.ok_or_else(|| {
        ServiceError::invalid_source(format!("no data in {}", input.input.display()))
    })
}

/// Validate a raw window argument the same way named operation arguments are.
fn window_size(raw: Option<&str>, default: usize) -> Result<usize> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let args = CallArgs::new().named("window_size", raw);
    let window = guarded(&args, |numeric| {
        let operation = Operation::MovingAverage;
        let bound = numeric.bind(operation.name(), operation.params())?;
        let value = bound.first().copied().unwrap_or(default as f64);
        positive_integer(ArgKey::name("window_size"), value)
    })?;
    Ok(window)
}

fn parse_call_args(raw: &[String]) -> CallArgs {
    raw.iter().fold(CallArgs::new(), |args, item| match item.split_once('=') {
        Some((name, value)) => args.named(name.trim(), value.trim()),
        None => args.arg(item.trim()),
    })
}

fn analyze_snapshot(label: &str, snapshot: Snapshot, window: usize, output: &OutputArgs) -> Result<()> {
    let analyzer = SeriesAnalyzer::new(snapshot.values);
    let table = analyzer.results_with(&AnalysisConfig::default().with_window_size(window))?;
    tracing::info!(label, rows = table.len(), window, "analysis complete");

    let report = Report::new(label, &table).with_row_labels(snapshot.labels.as_deref());
    emit(output.format, &report, output.output.as_deref())
}

fn emit(format: OutputFormat, report: &Report<'_>, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path).map_err(|e| ServiceError::io(path, e))?;
            write_report(format, report, BufWriter::new(file))?;
            tracing::info!(path = %path.display(), %format, "results written");
            Ok(())
        }
        None => write_report(format, report, io::stdout().lock()),
    }
}

fn monitor(mut config: ServiceConfig, args: &MonitorArgs) -> Result<()> {
    if args.cycles.is_some() {
        config.max_cycles = args.cycles;
    }
    config.validate()?;

    let mut source = JsonFileSource::new(&config.source.path);
    if let Some(keyword) = &config.source.keyword {
        source = source.with_keyword(keyword.clone());
    }
    let sink = file_sink(config.output.format, &config.output.path);
    let mut service = MonitoringService::new(source, sink, config);

    if args.once {
        let outcome = service.run_cycle()?;
        tracing::info!(?outcome, "single cycle complete");
        return Ok(());
    }

    service.start()?;
    let stats = service.join()?;
    tracing::info!(
        cycles = stats.cycles,
        analyzed = stats.analyzed,
        skipped = stats.skipped,
        failed = stats.failed,
        "monitoring finished"
    );
    Ok(())
}

fn parse_object(text: &str) -> Result<Map<String, Value>> {
    Ok(serde_json::from_str(text)?)
}

fn parse_spending(text: &str) -> Result<IndexMap<String, f64>> {
    Ok(serde_json::from_str(text)?)
}

fn ledger(db: &Path, command: LedgerCommand) -> Result<()> {
    let mut ledger = JsonLedger::open(db)?;

    match command {
        LedgerCommand::AddUser { user_id, data } => {
            ledger.add_user(&user_id, parse_object(&data)?)?;
        }
        LedgerCommand::UpdateUser { user_id, data } => {
            ledger.update_user(&user_id, parse_object(&data)?)?;
        }
        LedgerCommand::AddCard {
            user_id,
            card_number,
            expiry_date,
            cvv_code,
            monthly_spending,
        } => {
            let card = Card::new(card_number, expiry_date, cvv_code, parse_spending(&monthly_spending)?);
            ledger.add_card(&user_id, card)?;
        }
        LedgerCommand::UpdateCard {
            user_id,
            card_number,
            expiry_date,
            cvv_code,
            monthly_spending,
        } => {
            let update = CardUpdate {
                expiry_date,
                cvv_code,
                monthly_spending: monthly_spending.as_deref().map(parse_spending).transpose()?,
            };
            if update.is_empty() {
                tracing::warn!(user_id = %user_id, card_number = %card_number, "nothing to update");
                return Ok(());
            }
            ledger.update_card(&user_id, &card_number, update)?;
        }
        LedgerCommand::DeleteCard { user_id, card_number } => {
            ledger.delete_card(&user_id, &card_number)?;
        }
        LedgerCommand::Cards { user_id } => {
            let summary = ledger.summary(&user_id)?;
            let mut out = io::stdout().lock();
            if let Some(user) = ledger.get_user(&user_id) {
                for card in &user.user_cards {
                    writeln!(out, "Card: {}", card.card_number)?;
                    for (month, amount) in &card.monthly_spending {
                        writeln!(out, "{month}: {amount}")?;
                    }
                }
            }
            writeln!(out, "Total: {}", summary.total)?;
        }
        LedgerCommand::Summary { user_id } => {
            let summary = ledger.summary(&user_id)?;
            let mut out = io::stdout().lock();
            serde_json::to_writer_pretty(&mut out, &summary)?;
            writeln!(out)?;
        }
        LedgerCommand::Analyze {
            user_id,
            window,
            output,
        } => {
            let summary = ledger.summary(&user_id)?;
            if summary.monthly.is_empty() {
                return Err(ServiceError::invalid_source(format!(
                    "user '{user_id}' has no spending data"
                )));
            }
            let window = window_size(window.as_deref(), AnalysisConfig::default().window_size)?;
            analyze_snapshot(&user_id, summary.to_snapshot(), window, &output)?;
        }
    }
    Ok(())
}
