use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use kira_annotation_summary::app::{App, LogSink, ProgressSink};
use kira_annotation_summary::config::{ConfigLoader, ResolvedConfig, validate_top_n};
use kira_annotation_summary::domain::CategorySummary;
use kira_annotation_summary::error::AnnotationError;
use kira_annotation_summary::output::{self, JsonOutput, OutputMode};
use kira_annotation_summary::source::{
    DataSource, HttpDataSource, OfflineDataSource, Resource,
};
use kira_annotation_summary::table::AnnotationTable;

#[derive(Parser)]
#[command(name = "kira-as")]
#[command(about = "Category-count summaries from eggNOG-mapper annotation tables")]
#[command(version, author)]
struct Cli {
    #[arg(long, global = true)]
    non_interactive: bool,

    #[arg(long, global = true)]
    config: Option<String>,

    /// Never touch the network; reference documents must be given as files.
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Genes per KEGG pathway category (BRITE level 2)")]
    Kegg(KeggArgs),
    #[command(about = "COG functional category letters per macro category")]
    Cog(CommonArgs),
    #[command(about = "Most common GO terms per ontology domain")]
    Go(GoArgs),
}

#[derive(Args, Clone)]
struct CommonArgs {
    /// eggNOG-mapper annotation table (tab separated, optionally .gz)
    input: Utf8PathBuf,

    /// Annotation column name
    #[arg(long)]
    column: Option<String>,

    /// Gene identifier column name
    #[arg(long)]
    gene_column: Option<String>,

    /// Write the summary table as TSV
    #[arg(long, short)]
    output: Option<Utf8PathBuf>,
}

#[derive(Args, Clone)]
struct KeggArgs {
    #[command(flatten)]
    common: CommonArgs,

    #[arg(long)]
    top_n: Option<usize>,

    /// Local copy of the br08901 hierarchy instead of the KEGG REST API
    #[arg(long)]
    hierarchy_file: Option<Utf8PathBuf>,

    /// Local copy of the KO → pathway link list instead of the KEGG REST API
    #[arg(long)]
    links_file: Option<Utf8PathBuf>,
}

#[derive(Args, Clone)]
struct GoArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Terms shown per ontology domain
    #[arg(long)]
    top_n: Option<usize>,

    /// Local go-basic.obo instead of downloading it
    #[arg(long)]
    obo_file: Option<Utf8PathBuf>,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(error) = report.downcast_ref::<AnnotationError>() {
            return ExitCode::from(map_exit_code(error));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &AnnotationError) -> u8 {
    match error {
        AnnotationError::InputNotFound(_)
        | AnnotationError::EmptyTable(_)
        | AnnotationError::MissingRequiredColumn { .. } => 2,
        AnnotationError::SourceFetch { .. } | AnnotationError::SourceStatus { .. } => 3,
        AnnotationError::NoValidAnnotations { .. }
        | AnnotationError::NoCategoriesResolved { .. } => 4,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.non_interactive {
        OutputMode::NonInteractive
    } else {
        OutputMode::Interactive
    };

    let mut config = ConfigLoader::resolve(cli.config.as_deref())?;
    apply_overrides(&mut config, &cli.command)?;

    if cli.offline {
        run_command(cli.command, App::new(OfflineDataSource, config), output_mode)
    } else {
        let source = HttpDataSource::new(config.timeout)?;
        run_command(cli.command, App::new(source, config), output_mode)
    }
}

fn apply_overrides(config: &mut ResolvedConfig, command: &Commands) -> Result<(), AnnotationError> {
    match command {
        Commands::Kegg(args) => {
            if let Some(column) = &args.common.column {
                config.kegg.annotation_column = column.clone();
            }
            if let Some(top_n) = args.top_n {
                config.kegg.top_n = validate_top_n(top_n)?;
            }
            apply_gene_column(config, &args.common);
        }
        Commands::Cog(args) => {
            if let Some(column) = &args.column {
                config.cog.column = column.clone();
            }
            apply_gene_column(config, args);
        }
        Commands::Go(args) => {
            if let Some(column) = &args.common.column {
                config.go.column = column.clone();
            }
            if let Some(top_n) = args.top_n {
                config.go.top_n = validate_top_n(top_n)?;
            }
            apply_gene_column(config, &args.common);
        }
    }
    Ok(())
}

fn apply_gene_column(config: &mut ResolvedConfig, args: &CommonArgs) {
    if let Some(gene_column) = &args.gene_column {
        config.entity_column = gene_column.clone();
    }
}

fn run_command<S: DataSource>(
    command: Commands,
    app: App<S>,
    output_mode: OutputMode,
) -> miette::Result<()> {
    let sink: &dyn ProgressSink = match output_mode {
        OutputMode::Interactive => &LogSink,
        OutputMode::NonInteractive => &JsonOutput,
    };

    let (summary, destination) = match command {
        Commands::Kegg(args) => {
            let table = AnnotationTable::load(&args.common.input)?;
            let mut resources = app.kegg_resources();
            if let Some(path) = args.hierarchy_file {
                resources.hierarchy = Resource::Local(path);
            }
            if let Some(path) = args.links_file {
                resources.links = Resource::Local(path);
            }
            let summary = app.kegg_table(&table, &resources, sink)?;
            (summary, args.common.output)
        }
        Commands::Cog(args) => {
            let table = AnnotationTable::load(&args.input)?;
            let summary = app.cog_table(&table, sink)?;
            (summary, args.output)
        }
        Commands::Go(args) => {
            let table = AnnotationTable::load(&args.common.input)?;
            let obo = Resource::from_override(&app.config().go.obo_url, args.obo_file);
            let summary = app.go_table(&table, &obo, sink)?;
            (summary, args.common.output)
        }
    };

    emit(&summary, destination, output_mode)
}

fn emit(
    summary: &CategorySummary,
    destination: Option<Utf8PathBuf>,
    output_mode: OutputMode,
) -> miette::Result<()> {
    if let Some(path) = destination {
        output::write_tsv(&path, summary)?;
        tracing::info!(%path, "summary table written");
    }
    match output_mode {
        OutputMode::NonInteractive => JsonOutput::print_summary(summary).into_diagnostic(),
        OutputMode::Interactive => {
            output::print_summary(summary);
            Ok(())
        }
    }
}
