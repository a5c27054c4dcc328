use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use domaindeck_migrate::{
    CredentialProvider, HttpSqlExecutor, MigrationReport, MigrationRunner, RemoteConfig,
    RunnerOptions, collect_sql_files, read_script, split_statements,
};
use tracing::info;
use url::Url;

const ENDPOINT_ENV: &str = "DOMAINDECK_DB_URL";
const SERVICE_KEY_ENV: &str = "DOMAINDECK_SERVICE_KEY";

/// How many error summaries `migrate` prints before eliding the rest.
const ERROR_DISPLAY_LIMIT: usize = 5;

#[derive(Parser)]
#[command(name = "domaindeck", version, about = "DomainDeck schema migration tool")]
struct Cli {
    /// Only log warnings and errors.
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run migration scripts against the remote database.
    Migrate(MigrateArgs),
    /// List the statements a script would run, without executing anything.
    Plan(PlanArgs),
}

#[derive(Args)]
struct MigrateArgs {
    /// Migration script, or a directory of .sql files.
    path: PathBuf,

    /// SQL query endpoint of the hosted database.
    #[arg(long, env = ENDPOINT_ENV)]
    endpoint: Url,

    /// Service key used as the bearer credential.
    #[arg(long, env = SERVICE_KEY_ENV, hide_env_values = true)]
    service_key: Option<String>,

    /// Pause between statements, in milliseconds.
    #[arg(long, default_value_t = 250)]
    delay_ms: u64,

    /// Halt at the first failed statement.
    #[arg(long)]
    stop_on_error: bool,

    /// Print the reports as one JSON document instead of progress text.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct PlanArgs {
    /// Migration script, or a directory of .sql files.
    path: PathBuf,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.quiet);

    match cli.command {
        Command::Migrate(args) => run_migrate(args, cli.quiet).await,
        Command::Plan(args) => run_plan(args),
    }
}

fn init_tracing(quiet: bool) {
    let default_filter = if quiet { "warn" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    // Logs go to stderr so --json output on stdout stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_migrate(args: MigrateArgs, quiet: bool) -> Result<ExitCode> {
    let files = collect_sql_files(&args.path).context("failed to collect migration scripts")?;

    let credentials = match args.service_key {
        Some(key) => CredentialProvider::with_token(key),
        None => CredentialProvider::from_env(SERVICE_KEY_ENV),
    };

    let executor = HttpSqlExecutor::new(RemoteConfig::new(args.endpoint), &credentials)
        .context("failed to set up the remote executor")?;

    let options = RunnerOptions {
        delay: Duration::from_millis(args.delay_ms),
        stop_on_error: args.stop_on_error,
        quiet,
    };
    let runner = MigrationRunner::new(executor, options);

    let mut reports: Vec<(PathBuf, MigrationReport)> = Vec::new();
    for file in files {
        let script = read_script(&file)?;
        let statements = split_statements(&script);

        if !args.json {
            println!("{} ({} statements)", file.display(), statements.len());
        }
        info!("running {} ({} statements)", file.display(), statements.len());

        let report = runner.run(&statements).await;
        if !args.json {
            println!("  {}", report.summary());
        }

        let halt = args.stop_on_error && report.failed > 0;
        reports.push((file, report));
        if halt {
            break;
        }
    }

    let failed: usize = reports.iter().map(|(_, r)| r.failed).sum();

    if args.json {
        print_json_reports(&reports)?;
    } else {
        print_error_summaries(&reports);
        print_final_tally(&reports);
    }

    Ok(if failed > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn run_plan(args: PlanArgs) -> Result<ExitCode> {
    let files = collect_sql_files(&args.path).context("failed to collect migration scripts")?;

    for file in &files {
        let script = read_script(file)?;
        let statements = split_statements(&script);

        println!("{} ({} statements)", file.display(), statements.len());
        for (position, statement) in statements.iter().enumerate() {
            let first_line = statement.lines().next().unwrap_or_default();
            println!("  {:>3}. {}", position + 1, preview(first_line));
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_json_reports(reports: &[(PathBuf, MigrationReport)]) -> Result<()> {
    let entries: Vec<serde_json::Value> = reports
        .iter()
        .map(|(file, report)| {
            serde_json::json!({
                "file": file.display().to_string(),
                "report": report,
            })
        })
        .collect();

    let rendered =
        serde_json::to_string_pretty(&entries).context("failed to render json report")?;
    println!("{rendered}");
    Ok(())
}

fn print_error_summaries(reports: &[(PathBuf, MigrationReport)]) {
    let errors: Vec<(&PathBuf, &String)> = reports
        .iter()
        .flat_map(|(file, report)| report.errors.iter().map(move |e| (file, e)))
        .collect();

    if errors.is_empty() {
        return;
    }

    println!();
    println!("Errors:");
    for (file, error) in errors.iter().take(ERROR_DISPLAY_LIMIT) {
        println!("  {}: {error}", file.display());
    }
    if errors.len() > ERROR_DISPLAY_LIMIT {
        println!("  ... and {} more", errors.len() - ERROR_DISPLAY_LIMIT);
    }
}

fn print_final_tally(reports: &[(PathBuf, MigrationReport)]) {
    let mut aggregate = MigrationReport::default();
    for (_, report) in reports {
        aggregate.total += report.total;
        aggregate.succeeded += report.succeeded;
        aggregate.failed += report.failed;
    }

    println!();
    println!("{} script(s), {}", reports.len(), aggregate.summary());
}

/// Cut a statement's first line down to a listing-friendly width.
fn preview(line: &str) -> String {
    const MAX: usize = 72;
    if line.chars().count() <= MAX {
        line.to_string()
    } else {
        let cut: String = line.chars().take(MAX).collect();
        format!("{cut}...")
    }
}
