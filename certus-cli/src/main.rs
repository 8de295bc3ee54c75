use std::path::{Path, PathBuf};
use std::process::ExitCode;

use certus_catalog::{CatalogFetcher, PlatformEnumFetcher, RestCatalogFetcher};
use certus_cli::{
    parse_groups, run_fields, run_render, run_validate, telemetry, CliConfig, CliError,
    ConfigError, FileCatalogFetcher, FileEnumFetcher, Session,
};
use certus_core::{ConditionGroup, EntityType, FieldSource, Resource};
use certus_render::BadgeVariant;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "certus")]
#[command(version, about = "Inspect filter catalogs and render condition groups")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, env = "CERTUS_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Debug logging for the CERTUS crates
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Target {
    /// Entity type whose catalog is used (e.g. CERTIFICATE, RA_PROFILE)
    #[arg(short, long, default_value = "CERTIFICATE")]
    entity: EntityType,

    /// Backend resource; defaults to the entity type's own resource
    #[arg(short, long)]
    resource: Option<Resource>,

    /// Saved searchable-fields response to use instead of the platform API
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Saved platform enum dictionary
    #[arg(long)]
    enums: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// List the filterable fields of an entity type
    Fields {
        #[command(flatten)]
        target: Target,
        /// Only fields of this source (property, data, meta, custom)
        #[arg(long)]
        source: Option<FieldSource>,
        #[arg(long)]
        json: bool,
    },
    /// Render condition groups from a JSON file
    Render {
        file: PathBuf,
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        compact: bool,
        #[arg(long)]
        json: bool,
    },
    /// Check condition groups against the catalog
    Validate {
        file: PathBuf,
        #[command(flatten)]
        target: Target,
    },
}

impl Command {
    fn target(&self) -> &Target {
        match self {
            Command::Fields { target, .. }
            | Command::Render { target, .. }
            | Command::Validate { target, .. } => target,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let target = cli.command.target();
    // A saved catalog makes the config file optional.
    let config = match (&cli.config, target.catalog.is_some()) {
        (None, true) => None,
        (path, _) => Some(CliConfig::load(path.as_deref())?),
    };
    let logging = config.as_ref().map(|c| c.logging.clone()).unwrap_or_default();
    telemetry::init(&logging, cli.verbose)?;
    let display = config.as_ref().map(|c| c.display.clone()).unwrap_or_default();

    let session = build_session(target, config.as_ref())?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Command::Fields { source, json, .. } => run_fields(&session, &mut out, *source, *json).await,
        Command::Render {
            file,
            compact,
            json,
            ..
        } => {
            let groups = read_groups(file)?;
            let dates = display.date_formatter()?;
            let variant = if *compact || display.compact {
                BadgeVariant::Compact
            } else {
                BadgeVariant::Standard
            };
            run_render(&session, &mut out, &groups, &dates, variant, *json).await
        }
        Command::Validate { file, .. } => {
            let groups = read_groups(file)?;
            run_validate(&session, &mut out, &groups).await
        }
    }
}

fn build_session(target: &Target, config: Option<&CliConfig>) -> Result<Session, CliError> {
    let resource = target
        .resource
        .unwrap_or_else(|| target.entity.default_resource());
    let rest = config
        .map(|c| RestCatalogFetcher::new(&c.rest_config()))
        .transpose()?;

    let catalog: Box<dyn CatalogFetcher> = match (&target.catalog, &rest) {
        (Some(path), _) => Box::new(FileCatalogFetcher::new(path.clone())),
        (None, Some(rest)) => Box::new(rest.clone()),
        (None, None) => return Err(ConfigError::MissingConfigPath.into()),
    };
    let enums: Option<Box<dyn PlatformEnumFetcher>> = match (&target.enums, rest) {
        (Some(path), _) => Some(Box::new(FileEnumFetcher::new(path.clone()))),
        (None, Some(rest)) => Some(Box::new(rest)),
        (None, None) => None,
    };
    Ok(Session::new(target.entity, resource, catalog, enums))
}

fn read_groups(path: &Path) -> Result<Vec<ConditionGroup>, CliError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let default_name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("conditions");
    parse_groups(&contents, default_name).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}
