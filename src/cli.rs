use crate::config::{AppConfig, LogFormat, TelemetryConfig};
use crate::error::AppError;
use crate::infra::{document_generator, load_repository};
use crate::server;
use crate::telemetry;
use crate::workflows::applications::ApplicationId;
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(
    name = "egeria",
    about = "Render status documents for financial product applications",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Produce documents for a single application
    Document {
        #[command(subcommand)]
        command: DocumentCommand,
    },
}

#[derive(Subcommand, Debug)]
enum DocumentCommand {
    /// Render and convert an application document to PDF
    Generate(GenerateArgs),
    /// Print the rendered HTML without converting it
    Preview(DocumentSource),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct DocumentSource {
    /// Application identifier (UUID)
    #[arg(long)]
    pub(crate) application_id: Uuid,
    /// JSON file containing an array of application records
    #[arg(long)]
    pub(crate) applications: PathBuf,
    /// Base path templates are resolved against (defaults to APP_TEMPLATE_ROOT)
    #[arg(long)]
    pub(crate) base_path: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct GenerateArgs {
    #[command(flatten)]
    pub(crate) source: DocumentSource,
    /// Where to write the PDF
    #[arg(long, short)]
    pub(crate) output: PathBuf,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Document {
            command: DocumentCommand::Generate(args),
        } => run_generate(args),
        Command::Document {
            command: DocumentCommand::Preview(args),
        } => run_preview(args),
    }
}

fn init_cli_telemetry(config: &AppConfig) -> Result<(), AppError> {
    // Human-facing commands keep logs compact regardless of the server format.
    telemetry::init(&TelemetryConfig {
        log_level: config.telemetry.log_level.clone(),
        log_format: LogFormat::Compact,
    })?;
    Ok(())
}

fn run_generate(args: GenerateArgs) -> Result<(), AppError> {
    let GenerateArgs { source, output } = args;
    let config = AppConfig::load()?;
    init_cli_telemetry(&config)?;

    let repository = Arc::new(load_repository(&source.applications)?);
    let generator = document_generator(repository, &config.documents);
    let base_path = source
        .base_path
        .unwrap_or_else(|| config.documents.template_root.clone());

    let document = generator.generate(&ApplicationId(source.application_id), &base_path)?;
    fs::write(&output, &document.bytes)?;

    println!(
        "Wrote {} ({} bytes, template {}) to {}",
        document.filename(),
        document.bytes.len(),
        document.template.name(),
        output.display()
    );
    Ok(())
}

fn run_preview(args: DocumentSource) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    init_cli_telemetry(&config)?;

    let repository = Arc::new(load_repository(&args.applications)?);
    let generator = document_generator(repository, &config.documents);
    let base_path = args
        .base_path
        .unwrap_or_else(|| config.documents.template_root.clone());

    let rendered = generator.render(&ApplicationId(args.application_id), &base_path)?;
    println!("{}", rendered.html);
    Ok(())
}
