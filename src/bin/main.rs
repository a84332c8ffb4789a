//! schemadoc CLI - Snapshot SQL Server schemas and generate record definitions
//!
//! Usage:
//!   schemadoc fetch --profile <id> [--remember-password]
//!   schemadoc tables --profile <id>
//!   schemadoc columns --profile <id> --table <name> [--schema <name>]
//!   schemadoc search --profile <id> [<logical name>...] [--partial] [--format csv|tsv]
//!   schemadoc generate [--input <file>] [--class-name <name>] [--profile <id>]
//!   schemadoc record --profile <id> --table <name> [--lang kotlin|rust]
//!   schemadoc test-connection --profile <id>
//!
//! Without `--profile`, connection details come from `SCHEMADOC_DB_*`
//! environment variables and the snapshot is cached under the id `env`.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use schemadoc::cache::{CacheError, SnapshotCache, SnapshotStore};
use schemadoc::codegen::{self, CodegenError, DEFAULT_CLASS_NAME};
use schemadoc::config::{ConfigError, ConnectionParams, Credentials, Settings, SettingsError};
use schemadoc::crypto::{CryptoError, MasterKey};
use schemadoc::export::{self, ExportError};
use schemadoc::metadata::{
    FetchError, MetadataService, MetadataSnapshot, SchemaIntrospector, TableMeta, WorkerCatalog,
};
use schemadoc::parser::{LogicalNameLookup, NoLogicalNames};
use schemadoc::search::{LogicalNameIndex, MatchMode};

/// Profile id used when connection details come from the environment.
const ENV_PROFILE: &str = "env";

#[derive(Parser)]
#[command(name = "schemadoc")]
#[command(about = "schemadoc - Annotated SQL Server schema snapshots and record generation")]
#[command(version)]
struct Cli {
    /// Path to a config file (overrides the default search)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log filter (error, warn, info, debug, trace, or a RUST_LOG directive)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a fresh snapshot and store it in the cache
    Fetch {
        #[arg(short, long)]
        profile: Option<String>,

        /// Store the password encrypted for later runs
        #[arg(long)]
        remember_password: bool,
    },

    /// Recompute missing camelCase identifiers in the cached snapshot
    RefreshIdentifiers {
        #[arg(short, long)]
        profile: Option<String>,
    },

    /// List tables in the cached snapshot
    Tables {
        #[arg(short, long)]
        profile: Option<String>,
    },

    /// List columns of one table in the cached snapshot
    Columns {
        #[arg(short, long)]
        profile: Option<String>,

        #[arg(short, long)]
        table: String,

        /// Schema name (defaults to the profile's default schema)
        #[arg(short, long)]
        schema: Option<String>,
    },

    /// Search columns by logical name; lists every column without queries
    Search {
        #[arg(short, long)]
        profile: Option<String>,

        /// Logical names to look up
        queries: Vec<String>,

        /// Match substrings instead of whole names
        #[arg(long)]
        partial: bool,

        /// Only this schema
        #[arg(long, default_value = "")]
        schema: String,

        /// Only tables whose name contains this text
        #[arg(long, default_value = "")]
        table: String,

        #[arg(short, long, default_value = "tsv")]
        format: ExportFormat,
    },

    /// Generate a record definition from a pasted result set or SELECT
    Generate {
        /// Input file (reads stdin when absent)
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[arg(long, default_value = DEFAULT_CLASS_NAME)]
        class_name: String,

        /// Profile whose cached snapshot supplies field comments
        #[arg(short, long)]
        profile: Option<String>,
    },

    /// Generate a record definition for a cached table
    Record {
        #[arg(short, long)]
        profile: Option<String>,

        #[arg(short, long)]
        table: String,

        #[arg(short, long)]
        schema: Option<String>,

        #[arg(short, long, default_value = "kotlin")]
        lang: RecordLang,
    },

    /// Check that a profile's database is reachable
    TestConnection {
        #[arg(short, long)]
        profile: Option<String>,
    },

    /// Inspect or clear the snapshot cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// List stored snapshots
    List,
    /// Remove a profile's snapshot and saved password
    Clear { profile: String },
}

#[derive(Clone, ValueEnum)]
enum ExportFormat {
    Csv,
    Tsv,
}

#[derive(Clone, ValueEnum)]
enum RecordLang {
    Kotlin,
    Rust,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Codegen(#[from] CodegenError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("no cached snapshot for profile '{0}'; run `schemadoc fetch` first")]
    NoSnapshot(String),

    #[error("table not found in snapshot: {0}")]
    TableNotFound(String),
}

type CliResult<T> = Result<T, CliError>;

/// Everything needed to open a connection for one profile.
struct Target {
    profile_id: String,
    params: ConnectionParams,
    credentials: Credentials,
    default_schema: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run(cli: Cli) -> CliResult<()> {
    let settings = match &cli.config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::load()?,
    };

    match cli.command {
        Commands::Fetch {
            profile,
            remember_password,
        } => cmd_fetch(settings, profile.as_deref(), remember_password).await,
        Commands::RefreshIdentifiers { profile } => {
            cmd_refresh_identifiers(settings, profile.as_deref())
        }
        Commands::Tables { profile } => cmd_tables(&settings, profile.as_deref()),
        Commands::Columns {
            profile,
            table,
            schema,
        } => cmd_columns(&settings, profile.as_deref(), &table, schema.as_deref()),
        Commands::Search {
            profile,
            queries,
            partial,
            schema,
            table,
            format,
        } => {
            let mode = if partial {
                MatchMode::Partial
            } else {
                MatchMode::Exact
            };
            cmd_search(&settings, profile.as_deref(), &queries, mode, &schema, &table, format)
        }
        Commands::Generate {
            input,
            class_name,
            profile,
        } => cmd_generate(&settings, input, &class_name, profile.as_deref()),
        Commands::Record {
            profile,
            table,
            schema,
            lang,
        } => cmd_record(&settings, profile.as_deref(), &table, schema.as_deref(), lang),
        Commands::TestConnection { profile } => {
            cmd_test_connection(settings, profile.as_deref()).await
        }
        Commands::Cache { action } => cmd_cache(&settings, action),
    }
}

fn open_cache(settings: &Settings) -> CliResult<SnapshotCache> {
    if settings.metadata.cache_enabled {
        Ok(SnapshotCache::open()?)
    } else {
        Ok(SnapshotCache::open_in_memory()?)
    }
}

fn profile_id(profile: Option<&str>) -> &str {
    profile.unwrap_or(ENV_PROFILE)
}

/// Resolve connection details. The password comes from the profile, then
/// `SCHEMADOC_DB_PASSWORD`, then the encrypted copy in the cache.
fn resolve_target(
    settings: &Settings,
    cache: &SnapshotCache,
    profile: Option<&str>,
) -> CliResult<Target> {
    let mut target = match profile {
        Some(id) => {
            let p = settings.profile(id)?;
            Target {
                profile_id: id.to_string(),
                params: p.connection_params(),
                credentials: p.credentials()?,
                default_schema: settings.default_schema_for(p),
            }
        }
        None => Target {
            profile_id: ENV_PROFILE.to_string(),
            params: ConnectionParams::from_env()?,
            credentials: Credentials::default(),
            default_schema: settings.metadata.default_schema.clone(),
        },
    };

    if target.credentials.password.is_none() {
        target.credentials = Credentials::from_env();
    }
    if target.credentials.password.is_none() {
        let key = MasterKey::from_env()?;
        target.credentials.password = cache.load_password(&key, &target.profile_id)?;
    }

    Ok(target)
}

fn build_service(
    settings: Settings,
    cache: SnapshotCache,
    target: &Target,
) -> MetadataService<WorkerCatalog, SnapshotCache> {
    let introspector = SchemaIntrospector::new(WorkerCatalog::new(settings))
        .with_default_schema(&target.default_schema);
    MetadataService::new(introspector, cache)
}

fn load_snapshot(cache: &SnapshotCache, profile_id: &str) -> CliResult<MetadataSnapshot> {
    cache
        .load(profile_id)?
        .ok_or_else(|| CliError::NoSnapshot(profile_id.to_string()))
}

/// Schema assumed for `--table` lookups when `--schema` is absent.
fn default_schema(settings: &Settings, profile: Option<&str>) -> String {
    match profile.and_then(|id| settings.profiles.get(id)) {
        Some(p) => settings.default_schema_for(p),
        None => settings.metadata.default_schema.clone(),
    }
}

fn find_table<'a>(
    snapshot: &'a MetadataSnapshot,
    settings: &Settings,
    profile: Option<&str>,
    schema: Option<&str>,
    table: &str,
) -> CliResult<&'a TableMeta> {
    let schema = schema
        .map(str::to_string)
        .unwrap_or_else(|| default_schema(settings, profile));
    snapshot
        .find_table(&schema, table)
        .ok_or_else(|| CliError::TableNotFound(format!("{}.{}", schema, table)))
}

async fn cmd_fetch(
    settings: Settings,
    profile: Option<&str>,
    remember_password: bool,
) -> CliResult<()> {
    let cache = open_cache(&settings)?;
    let target = resolve_target(&settings, &cache, profile)?;
    let service = build_service(settings, cache, &target);

    let snapshot = service
        .fetch_and_save(&target.profile_id, &target.params, &target.credentials)
        .await?;

    println!(
        "Fetched {} tables ({} columns) from {}",
        snapshot.tables.len(),
        snapshot.column_count(),
        target.params.display_string()
    );

    if remember_password {
        if let Some(password) = &target.credentials.password {
            let key = MasterKey::from_env()?;
            if !key.is_persistent() {
                eprintln!(
                    "Warning: {} is not set; the saved password will not survive this run",
                    schemadoc::crypto::MASTER_KEY_ENV
                );
            }
            service
                .store()
                .save_password(&key, &target.profile_id, password)?;
        }
    }

    Ok(())
}

fn cmd_refresh_identifiers(settings: Settings, profile: Option<&str>) -> CliResult<()> {
    let cache = open_cache(&settings)?;
    let introspector = SchemaIntrospector::new(WorkerCatalog::new(settings));
    let service = MetadataService::new(introspector, cache);
    let id = profile_id(profile);
    let snapshot = load_snapshot(service.store(), id)?;
    let refreshed = service.refresh_identifiers(&snapshot)?;
    println!("Refreshed identifiers for {} columns", refreshed.column_count());
    Ok(())
}

fn cmd_tables(settings: &Settings, profile: Option<&str>) -> CliResult<()> {
    let cache = open_cache(settings)?;
    let snapshot = load_snapshot(&cache, profile_id(profile))?;

    println!(
        "Database: {} (fetched {})",
        snapshot.database_name,
        snapshot.fetched_at.to_rfc3339()
    );
    for table in &snapshot.tables {
        println!(
            "{}\t{}\t{}",
            table.qualified_name(),
            table.columns.len(),
            table.logical_name()
        );
    }
    Ok(())
}

fn cmd_columns(
    settings: &Settings,
    profile: Option<&str>,
    table: &str,
    schema: Option<&str>,
) -> CliResult<()> {
    let cache = open_cache(settings)?;
    let snapshot = load_snapshot(&cache, profile_id(profile))?;
    let table = find_table(&snapshot, settings, profile, schema, table)?;

    for c in &table.columns {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            c.column_name,
            c.camel_case_name,
            c.db_type_name,
            c.jdbc_type,
            c.types.java,
            c.types.kotlin,
            c.logical_name
        );
    }
    Ok(())
}

fn cmd_search(
    settings: &Settings,
    profile: Option<&str>,
    queries: &[String],
    mode: MatchMode,
    schema: &str,
    table: &str,
    format: ExportFormat,
) -> CliResult<()> {
    let cache = open_cache(settings)?;
    let snapshot = load_snapshot(&cache, profile_id(profile))?;
    let index = LogicalNameIndex::build(&snapshot);

    let outcome = index.search(queries, mode, schema, table);
    let rows = export::rows(&outcome.matches);

    match format {
        ExportFormat::Csv => print!("{}", export::to_csv(&rows)?),
        ExportFormat::Tsv => print!("{}", export::to_tsv(&rows)?),
    }
    for query in &outcome.unmatched {
        eprintln!("No match: {}", query);
    }
    Ok(())
}

fn cmd_generate(
    settings: &Settings,
    input: Option<PathBuf>,
    class_name: &str,
    profile: Option<&str>,
) -> CliResult<()> {
    let raw = match &input {
        Some(path) => fs::read_to_string(path)?,
        None => io::read_to_string(io::stdin())?,
    };

    let snapshot = match profile {
        Some(id) => open_cache(settings)?.load(id)?,
        None => None,
    };
    let index = snapshot.as_ref().map(LogicalNameIndex::build);
    let lookup: &dyn LogicalNameLookup = match &index {
        Some(index) => index,
        None => &NoLogicalNames,
    };

    print!("{}", codegen::generate_from_text(&raw, class_name, lookup)?);
    Ok(())
}

fn cmd_record(
    settings: &Settings,
    profile: Option<&str>,
    table: &str,
    schema: Option<&str>,
    lang: RecordLang,
) -> CliResult<()> {
    let cache = open_cache(settings)?;
    let snapshot = load_snapshot(&cache, profile_id(profile))?;
    let table = find_table(&snapshot, settings, profile, schema, table)?;

    let out = match lang {
        RecordLang::Kotlin => codegen::generate_for_table(table),
        RecordLang::Rust => codegen::generate_rust_struct(table),
    };
    print!("{}", out);
    Ok(())
}

async fn cmd_test_connection(settings: Settings, profile: Option<&str>) -> CliResult<()> {
    let cache = open_cache(&settings)?;
    let target = resolve_target(&settings, &cache, profile)?;
    let service = build_service(settings, cache, &target);

    service
        .test_connection(&target.params, &target.credentials)
        .await?;
    println!("Connection OK: {}", target.params.display_string());
    Ok(())
}

fn cmd_cache(settings: &Settings, action: CacheAction) -> CliResult<()> {
    let cache = open_cache(settings)?;
    match action {
        CacheAction::List => {
            for entry in cache.list()? {
                println!(
                    "{}\t{}\t{}",
                    entry.profile_id, entry.fetched_at, entry.content_hash
                );
            }
        }
        CacheAction::Clear { profile } => {
            let removed = cache.delete(&profile)?;
            cache.delete_password(&profile)?;
            if removed {
                println!("Removed snapshot for {}", profile);
            } else {
                println!("No snapshot stored for {}", profile);
            }
        }
    }
    Ok(())
}
