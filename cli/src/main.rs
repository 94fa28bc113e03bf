use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use schema_compose_core::{
    ComposeStats, Composer, NoProvenance, WideningPolicy, validate_document, validate_merged,
};
use schema_compose_store::{
    ComposeConfig, FileProvenanceSink, FileSchemaLoader, FileSchemaWriter, collect_document_paths,
};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug, Parser)]
#[command(name = "schema-compose")]
#[command(about = "Merge class schema documents and record their provenance")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides it.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Merge schema documents into one schema.
    Compose(ComposeArgs),
    /// Check schema documents for structural problems.
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
struct ComposeArgs {
    /// Schema files and/or directories, in merge order.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Merged schema output path (.json, .yaml or .yml).
    #[arg(long)]
    output: PathBuf,
    /// Composition config YAML.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Do not write provenance files.
    #[arg(long)]
    no_provenance: bool,
    /// Name of the placeholder class for unresolved references.
    #[arg(long)]
    unknown_class: Option<String>,
    /// Only widen same-named attributes whose types differ.
    #[arg(long)]
    widen_on_mismatch: bool,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Schema files and/or directories.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Compose(args) => run_compose(args),
        Command::Validate(args) => run_validate(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run_compose(args: ComposeArgs) -> Result<(), String> {
    let mut config = match &args.config {
        Some(path) => ComposeConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => ComposeConfig::default(),
    };
    if let Some(name) = args.unknown_class {
        config.unknown_class = name;
    }
    if args.widen_on_mismatch {
        config.widening = WideningPolicy::OnMismatch;
    }
    debug!(?config, "composition config");

    let documents = collect_document_paths(&args.inputs).map_err(|e| e.to_string())?;
    let options = config.compose_options();

    let result = if args.no_provenance || !config.provenance.enabled {
        Composer::new(FileSchemaLoader, FileSchemaWriter::new(), NoProvenance)
            .with_options(options)
            .compose(&documents, args.output.as_path())
    } else {
        let sink = match &config.provenance.directory {
            Some(directory) => FileProvenanceSink::new().with_directory(directory),
            None => FileProvenanceSink::new(),
        };
        Composer::new(FileSchemaLoader, FileSchemaWriter::new(), sink)
            .with_options(options)
            .compose(&documents, args.output.as_path())
    };
    let composition = result.map_err(|e| e.to_string())?;

    let Some(composition) = composition else {
        println!("No schema documents to compose.");
        return Ok(());
    };

    let errors = validate_merged(&composition.schema);
    for error in &errors {
        warn!(%error, "merged schema check failed");
    }

    println!(
        "Composed {} document(s) into {} class(es) at '{}'.",
        documents.len(),
        composition.schema.class_count(),
        args.output.display()
    );
    print_stats(&composition.stats());
    Ok(())
}

fn print_stats(stats: &ComposeStats) {
    println!(
        "  classes: {} registered, {} merged",
        stats.classes_registered, stats.classes_merged
    );
    println!(
        "  attributes: {} added, {} widened to String",
        stats.attributes_added, stats.attributes_widened
    );
    println!(
        "  references: {} resolved, {} unresolved",
        stats.references_resolved, stats.references_unresolved
    );
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let paths = collect_document_paths(&args.inputs).map_err(|e| e.to_string())?;

    let mut classes = 0usize;
    for path in &paths {
        let document = FileSchemaLoader::read_document(path)
            .map_err(|err| format!("Failed to load '{}': {err}", path.display()))?;
        let errors = validate_document(&document.classes);
        if let Some(first) = errors.first() {
            return Err(format!(
                "Schema validation failed for '{}': {first}",
                path.display()
            ));
        }
        classes += document.classes.len();
    }

    println!(
        "Validated {} schema document(s) with {} class(es).",
        paths.len(),
        classes
    );
    Ok(())
}
