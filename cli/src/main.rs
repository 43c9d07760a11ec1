use std::str::FromStr;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use sc_db::Dialect;
use sc_crawler_cli::command::{hash, pull, schema};
use sc_crawler_cli::settings;

/// Cross-vendor cloud inventory crawler.
#[derive(Parser, Debug)]
#[clap(name = "sc-crawler", version, propagate_version = true, arg_required_else_help = true)]
struct Cli {
    /// Log level passed to `tracing-subscriber`'s `EnvFilter` when `RUST_LOG` is unset.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print `CREATE TABLE` statements for one SQL dialect.
    Schema {
        /// One of: postgresql, mysql, sqlite, oracle, sqlserver.
        #[arg(value_parser = parse_dialect)]
        dialect: Dialect,
    },
    /// Run the inventory pipeline against a database.
    Pull {
        /// Database connection string, e.g. `sqlite://inventory.db`.
        #[arg(long, env = "SC_CRAWLER_CONNECTION_STRING")]
        connection_string: String,
        /// Restrict the pull to these vendor ids (repeatable). Defaults to every known vendor.
        #[arg(long = "include-vendor")]
        include_vendor: Vec<String>,
        /// Skip these vendor ids (repeatable). Applied after `--include-vendor`.
        #[arg(long = "exclude-vendor")]
        exclude_vendor: Vec<String>,
        /// Also duplicate every upserted row into its SCD companion table.
        #[arg(long, default_value_t = false)]
        scd: bool,
        /// Disable the SCD duplication pass (overrides `--scd`).
        #[arg(long)]
        no_scd: bool,
        /// Enable the inspector dataset and fetch it from this archive URL.
        #[arg(long)]
        inspector_archive_url: Option<String>,
        /// Skip inspector enrichment entirely, even if `--inspector-archive-url` is set.
        #[arg(long)]
        no_inspector: bool,
        /// Let adapters read/write the on-disk response cache.
        #[arg(long, default_value_t = false)]
        cache: bool,
        /// Disable the on-disk response cache (overrides `--cache`).
        #[arg(long)]
        no_cache: bool,
        /// Cache entry lifetime in minutes, ignored when the cache is disabled.
        #[arg(long, default_value_t = 60)]
        cache_ttl: u64,
    },
    /// Print the DATABASE-level content hash.
    Hash {
        /// Database connection string, e.g. `sqlite://inventory.db`.
        #[arg(long, env = "SC_CRAWLER_CONNECTION_STRING")]
        connection_string: String,
    },
}

fn parse_dialect(s: &str) -> Result<Dialect, String> {
    Dialect::from_str(s)
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    settings::load_dotenv();

    let cli = Cli::parse();
    sc_crawler_cli::init_tracing(&cli.log_level);

    match cli.command {
        Commands::Schema { dialect } => schema::execute(dialect),
        Commands::Pull {
            connection_string,
            include_vendor,
            exclude_vendor,
            scd,
            no_scd,
            inspector_archive_url,
            no_inspector,
            cache,
            no_cache,
            cache_ttl,
        } => {
            let opts = pull::PullOptions {
                connection_string,
                include_vendor,
                exclude_vendor,
                scd: scd && !no_scd,
                inspector_archive_url: if no_inspector { None } else { inspector_archive_url },
                cache_enabled: cache && !no_cache,
                cache_ttl_minutes: cache_ttl,
            };
            pull::execute(opts).await?;
        }
        Commands::Hash { connection_string } => hash::execute(&connection_string).await?,
    }

    Ok(())
}
