use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use oceantea_harvester::app::{App, HarvestResult, ProgressSink, ProgressSinkKind, SeriesListing};
use oceantea_harvester::config::{ConfigLoader, ConfigOverrides};
use oceantea_harvester::error::HarvestError;
use oceantea_harvester::oceantea::OceanTeaHttpClient;
use oceantea_harvester::output::{JsonOutput, LogProgress, OutputMode, RecordWriter};

#[derive(Parser)]
#[command(name = "oceantea-harvest")]
#[command(about = "Harvest OceanTEA time series into bibliographic metadata records")]
#[command(version, author)]
struct Cli {
    #[arg(long, global = true)]
    non_interactive: bool,

    #[arg(long, global = true)]
    config: Option<String>,

    #[arg(long, global = true)]
    base_url: Option<String>,

    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Harvest every scalar time series into metadata records")]
    Harvest(HarvestArgs),
    #[command(about = "List merged time series")]
    Series,
    #[command(about = "List known data types")]
    Datatypes,
    #[command(about = "Print the dataset download URL of every time series")]
    Url,
}

#[derive(Args)]
struct HarvestArgs {
    #[arg(long)]
    output: Option<Utf8PathBuf>,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(error) = report.downcast_ref::<HarvestError>() {
            return ExitCode::from(map_exit_code(error));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &HarvestError) -> u8 {
    match error {
        HarvestError::ConfigRead(_)
        | HarvestError::ConfigParse(_)
        | HarvestError::InvalidConfig(_) => 2,
        HarvestError::OceanTeaHttp(_) | HarvestError::OceanTeaStatus { .. } => 3,
        HarvestError::MalformedTimestamp { .. } | HarvestError::ResponseParse(_) => 4,
        HarvestError::Filesystem(_) => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.non_interactive {
        OutputMode::NonInteractive
    } else {
        OutputMode::Interactive
    };

    let config = ConfigLoader::resolve_with_overrides(
        cli.config.as_deref(),
        ConfigOverrides {
            base_url: cli.base_url,
            timeout_secs: cli.timeout,
        },
    )?;
    let client = OceanTeaHttpClient::new(&config)?;
    let app = App::new(config, client);

    match cli.command {
        Commands::Harvest(args) => run_harvest(&app, args, output_mode),
        Commands::Series => run_series(&app, output_mode),
        Commands::Datatypes => run_data_types(&app, output_mode),
        Commands::Url => run_urls(&app, output_mode),
    }
}

const DEFAULT_LOG_DIRECTIVE: &str = "info";

fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_DIRECTIVE))
}

fn progress_sink(kind: ProgressSinkKind, mode: OutputMode) -> Box<dyn ProgressSink> {
    match mode {
        OutputMode::Interactive => Box::new(LogProgress::new(kind)),
        OutputMode::NonInteractive => Box::new(JsonOutput),
    }
}

fn run_harvest(
    app: &App<OceanTeaHttpClient>,
    args: HarvestArgs,
    output_mode: OutputMode,
) -> miette::Result<()> {
    let sink = progress_sink(ProgressSinkKind::Harvest, output_mode);
    let result = app.harvest(sink.as_ref())?;

    if let Some(dir) = args.output {
        let writer = RecordWriter::new(dir);
        let written = writer.write_all(&result.records)?;
        tracing::info!(count = written.len(), dir = %writer.root(), "records written");
    }

    match output_mode {
        OutputMode::NonInteractive => JsonOutput::print_harvest(&result).into_diagnostic()?,
        OutputMode::Interactive => print_harvest_summary(&result),
    }
    Ok(())
}

fn run_series(app: &App<OceanTeaHttpClient>, output_mode: OutputMode) -> miette::Result<()> {
    let sink = progress_sink(ProgressSinkKind::Series, output_mode);
    let listing = app.series(sink.as_ref())?;
    match output_mode {
        OutputMode::NonInteractive => JsonOutput::print_series(&listing).into_diagnostic()?,
        OutputMode::Interactive => print_series_summary(&listing),
    }
    Ok(())
}

fn run_data_types(app: &App<OceanTeaHttpClient>, output_mode: OutputMode) -> miette::Result<()> {
    let sink = progress_sink(ProgressSinkKind::DataTypes, output_mode);
    let catalog = app.data_types(sink.as_ref())?;
    match output_mode {
        OutputMode::NonInteractive => JsonOutput::print_data_types(&catalog).into_diagnostic()?,
        OutputMode::Interactive => {
            for info in catalog.iter() {
                let unit = if info.unit.is_empty() { "-" } else { info.unit.as_str() };
                println!("{:<26} {:<28} {}", info.name, info.print_name, unit);
            }
        }
    }
    Ok(())
}

fn run_urls(app: &App<OceanTeaHttpClient>, output_mode: OutputMode) -> miette::Result<()> {
    let sink = progress_sink(ProgressSinkKind::Series, output_mode);
    let entries = app.download_urls(sink.as_ref())?;
    match output_mode {
        OutputMode::NonInteractive => JsonOutput::print_urls(&entries).into_diagnostic()?,
        OutputMode::Interactive => {
            for entry in &entries {
                println!("{}\t{}", entry.identifier, entry.url);
            }
        }
    }
    Ok(())
}

fn print_harvest_summary(result: &HarvestResult) {
    let green = "\x1b[32m";
    let yellow = "\x1b[33m";
    let cyan = "\x1b[36m";
    let reset = "\x1b[0m";

    println!("{cyan}OceanTEA harvest (version {}){reset}", result.version);
    println!(
        "{green}records: {} of {} series{reset}",
        result.records.len(),
        result.total_series
    );
    println!(
        "{yellow}excluded non-scalar: {}  rejected: {}{reset}",
        result.excluded_non_scalar,
        result.rejected.len()
    );
    for record in &result.records {
        println!("  {} {}", record.identifier, record.title);
    }
    for rejected in &result.rejected {
        println!(
            "{yellow}  #{} {}/{}: {}{reset}",
            rejected.index, rejected.station, rejected.data_type, rejected.reason
        );
    }
}

fn print_series_summary(listing: &SeriesListing) {
    for series in &listing.series {
        println!(
            "{:<28} {:<12} {:<24} {:>8} m  {}",
            series.identifier,
            series.station,
            series.data_type_print_name,
            oceantea_harvester::format::format_depth(series.depth_meters),
            series.region_print_name
        );
    }
    println!(
        "{} series, {} excluded non-scalar, {} rejected",
        listing.series.len(),
        listing.excluded_non_scalar,
        listing.rejected.len()
    );
}
