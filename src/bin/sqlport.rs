//! sqlport — MySQL to Dameng script converter
//!
//! # Usage
//!
//! ```bash
//! # Convert a dump, writing diagnostics as JSON lines
//! sqlport convert dump.sql -o dump_dm.sql --log convert.log
//!
//! # Dry run: statistics only
//! sqlport check dump.sql
//!
//! # Dialect tables
//! sqlport audit
//! sqlport types
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlport::config::Config;
use sqlport::dialect::LimitStyle;
use sqlport::engine::read_script;
use sqlport::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sqlport")]
#[command(version)]
#[command(about = "Convert MySQL scripts to Dameng SQL", long_about = None)]
#[command(after_help = "EXAMPLES:
    sqlport convert dump.sql -o dump_dm.sql
    sqlport convert dump.sql --compact --top --jobs 4
    sqlport check dump.sql")]
struct Cli {
    /// Config file (default: ./sqlport.toml, then the user config dir)
    #[arg(long, global = true, env = "SQLPORT_CONFIG")]
    config: Option<PathBuf>,

    /// Target dialect (dameng, oracle, generic)
    #[arg(long, global = true, env = "SQLPORT_TARGET")]
    target: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a script and write the result
    Convert {
        /// Input MySQL script
        input: Option<PathBuf>,

        /// Output file (default: <input>_<target>.sql)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON-lines diagnostics file
        #[arg(long)]
        log: Option<PathBuf>,

        /// Single-line statements
        #[arg(long)]
        compact: bool,

        /// Use TOP n instead of LIMIT n where possible
        #[arg(long)]
        top: bool,

        /// Worker count
        #[arg(short, long)]
        jobs: Option<usize>,
    },
    /// Convert without writing output and print statistics
    Check {
        /// Input MySQL script
        input: Option<PathBuf>,

        /// List every failed statement
        #[arg(short, long)]
        verbose: bool,
    },
    /// Report types and constructs the target dialect does not cover
    Audit,
    /// Show the resolved type mapping
    Types,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sqlport=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(target) = cli.target {
        config.target = target;
    }

    match cli.command {
        Commands::Convert {
            input,
            output,
            log,
            compact,
            top,
            jobs,
        } => {
            if let Some(input) = input {
                config.input = Some(input);
            }
            if output.is_some() {
                config.output = output;
            }
            if log.is_some() {
                config.log_file = log;
            }
            if compact {
                config.pretty = false;
            }
            if top {
                config.limit_style = LimitStyle::Top;
            }
            if let Some(jobs) = jobs {
                config.jobs = jobs;
            }
            config.validate()?;
            convert(&config).await
        }
        Commands::Check { input, verbose } => {
            if let Some(input) = input {
                config.input = Some(input);
            }
            config.validate()?;
            check(&config, verbose).await
        }
        Commands::Audit => audit(&config),
        Commands::Types => show_types(&config),
    }
}

async fn run_conversion(config: &Config, diagnostics: &mut Diagnostics) -> Result<ConversionReport> {
    let input = config
        .input
        .as_deref()
        .context("no input file given (argument or `input` in config)")?;
    let script = read_script(input).with_context(|| format!("reading {}", input.display()))?;
    let converter = Converter::new(config.dialect()?, config.generator_options());

    let report = if config.jobs > 1 {
        converter
            .convert_script_concurrent(&script, config.jobs, diagnostics)
            .await?
    } else {
        converter.convert_script(&script, diagnostics)
    };
    Ok(report)
}

async fn convert(config: &Config) -> Result<()> {
    let mut diagnostics = Diagnostics::new().with_sink(TracingSink);
    if let Some(log) = &config.log_file {
        let sink = JsonLinesSink::create(log).with_context(|| format!("creating {}", log.display()))?;
        diagnostics.add(sink);
    }

    let report = run_conversion(config, &mut diagnostics).await?;
    diagnostics.finish()?;

    let output = match &config.output {
        Some(path) => path.clone(),
        None => default_output(config.input.as_deref().unwrap_or(Path::new("out")), &config.target),
    };
    std::fs::write(&output, &report.output).with_context(|| format!("writing {}", output.display()))?;

    print_summary(&report.stats, report.replacements);
    println!("{} {}", "Output:".dimmed(), output.display().to_string().cyan());
    if let Some(log) = &config.log_file {
        println!("{} {}", "Log:".dimmed(), log.display().to_string().cyan());
    }
    Ok(())
}

async fn check(config: &Config, verbose: bool) -> Result<()> {
    let mut diagnostics = Diagnostics::new();
    let report = run_conversion(config, &mut diagnostics).await?;

    print_summary(&report.stats, report.replacements);
    if verbose {
        for failure in report.failures() {
            let reason = match &failure.result {
                ConversionResult::Failed(reason) => reason.as_str(),
                _ => "",
            };
            println!();
            println!(
                "{} {}",
                format!("#{}", failure.statement.index).red().bold(),
                reason.yellow()
            );
            println!("{}", failure.statement.preview(200).dimmed());
        }
    }
    Ok(())
}

fn audit(config: &Config) -> Result<()> {
    let dialect = config.dialect()?;
    let report = dialect.audit();

    println!("{} {}", "Dialect:".cyan().bold(), dialect.chain().join(" → "));
    if report.is_complete() {
        println!(
            "{} {} types, {} constructs resolved",
            "✓".green(),
            AbstractType::ALL.len(),
            ConstructKind::ALL.len()
        );
        return Ok(());
    }

    for ty in &report.missing_types {
        println!("  {} type {:?}", "✗".red(), ty);
    }
    for kind in &report.missing_constructs {
        println!("  {} construct {}", "✗".red(), kind);
    }
    anyhow::bail!("dialect '{}' is incomplete", report.dialect)
}

fn show_types(config: &Config) -> Result<()> {
    let dialect = config.dialect()?;
    println!("{}", format!("MySQL → {}", dialect.name()).cyan().bold());
    println!();
    for (ty, target) in dialect.type_table() {
        println!("  {:<16} {}", format!("{:?}", ty).yellow(), target);
    }
    Ok(())
}

fn print_summary(stats: &ConversionStats, replacements: usize) {
    println!("{}", "Conversion summary".cyan().bold());
    println!("  {:<22} {}", "Total statements:", stats.total);
    println!("  {:<22} {}", "Direct success:", stats.direct_success.to_string().green());
    println!(
        "  {:<22} {}",
        "Preprocessed success:",
        stats.preprocessed_success.to_string().yellow()
    );
    println!("  {:<22} {}", "Failed:", stats.failed.to_string().red());
    match stats.success_rate() {
        Some(rate) => println!("  {:<22} {:.2}%", "Success rate:", rate),
        None => println!("  {:<22} {}", "Success rate:", "n/a".dimmed()),
    }
    if replacements > 0 {
        println!("  {:<22} {}", "Charset rewrites:", replacements);
    }
}

/// `dump.sql` → `dump_dameng.sql` next to the input.
fn default_output(input: &Path, target: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{}_{}.sql", stem, target.to_ascii_lowercase()))
}
