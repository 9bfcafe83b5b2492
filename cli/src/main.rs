use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use modelgen_core::{Generator, Schema};
use modelgen_loader::{GeneratorConfig, ProjectDefinitions};
use modelgen_render::{Formatter, OutputWriter, RenderSettings};
use tracing::{debug, info};

const LOG_TARGETS: [&str; 4] = [
    "modelgen_core",
    "modelgen_loader",
    "modelgen_render",
    "modelgen_cli",
];

/// Output format for `inspect`.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "modelgen", version)]
#[command(about = "Generate SQLAlchemy declarative mixins from YAML model definitions")]
struct Cli {
    /// Project root. Relative paths in the configuration resolve against it.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,
    /// Configuration file (default: <root>/modelgen.yml when it exists).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log debug output.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate, write and format the Python modules.
    Generate(GenerateArgs),
    /// Load and validate the definitions without writing anything.
    Validate,
    /// Print the generated intermediate representation.
    Inspect(InspectArgs),
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Skip the external formatter.
    #[arg(long)]
    no_format: bool,
}

#[derive(Debug, Args)]
struct InspectArgs {
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = load_config(&cli).and_then(|config| match &cli.command {
        Command::Generate(args) => run_generate(&cli.root, &config, args),
        Command::Validate => run_validate(&cli.root, &config),
        Command::Inspect(args) => run_inspect(&cli.root, &config, args),
    });

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    for target in LOG_TARGETS {
        filter = filter.add_directive(
            format!("{target}={level}")
                .parse()
                .expect("static log directive must parse"),
        );
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<GeneratorConfig, String> {
    let config = match &cli.config {
        Some(path) => GeneratorConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => GeneratorConfig::discover(&cli.root).map_err(|err| {
            format!("Failed to load config from '{}': {err}", cli.root.display())
        })?,
    };
    debug!(config = ?config, "loaded configuration");
    Ok(config)
}

fn build_schema(root: &Path, config: &GeneratorConfig) -> Result<Schema, String> {
    let project = ProjectDefinitions::load(config.models_path(root), config.mixins_path(root))
        .map_err(|err| err.to_string())?;
    info!(
        models = project.models.len(),
        mixins = project.mixins.len(),
        "loaded definitions"
    );

    Generator::new(
        project.mixins.into_definitions(),
        project.models.into_definitions(),
    )
    .run()
    .map_err(|err| err.to_string())
}

fn run_generate(root: &Path, config: &GeneratorConfig, args: &GenerateArgs) -> Result<(), String> {
    let schema = build_schema(root, config)?;
    let settings = RenderSettings::new(&config.package, &config.enum_type_module);

    let output = config.output_path(root);
    let writer = OutputWriter::new(&output);
    let written = writer
        .write_schema(&schema, &settings)
        .map_err(|err| err.to_string())?;

    if args.no_format || !config.formatter.enabled {
        debug!("formatter skipped");
    } else {
        Formatter::new(&config.formatter.command)
            .with_args(config.formatter.args.iter().cloned())
            .with_timeout(Duration::from_secs(config.formatter.timeout_secs))
            .run(writer.models_dir())
            .map_err(|err| err.to_string())?;
    }

    println!(
        "Generated {} file(s) in '{}'.",
        written.len(),
        output.display()
    );
    Ok(())
}

fn run_validate(root: &Path, config: &GeneratorConfig) -> Result<(), String> {
    let schema = build_schema(root, config)?;
    println!(
        "Validated {} model(s), {} mixin(s) and {} association table(s).",
        schema.models.len(),
        schema.mixins.len(),
        schema.association_tables.len()
    );
    Ok(())
}

fn run_inspect(root: &Path, config: &GeneratorConfig, args: &InspectArgs) -> Result<(), String> {
    let schema = build_schema(root, config)?;
    let raw = match args.format {
        CliOutputFormat::Json => serde_json::to_string_pretty(&schema)
            .map_err(|e| format!("JSON serialization failed: {e}"))?,
        CliOutputFormat::Yaml => {
            serde_yaml::to_string(&schema).map_err(|e| format!("YAML serialization failed: {e}"))?
        }
    };
    println!("{raw}");
    Ok(())
}
