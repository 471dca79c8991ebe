//! deces CLI — synchronize INSEE death-record archives into the hosted store.
//!
//! Commands:
//! - `sync` — fetch, normalize, and load the configured period range
//! - `plan` — print the source paths and schema dialect per period, no network

use anyhow::Result;
use clap::{Parser, Subcommand};

use deces_core::dialect::dialect_for_year;
use deces_core::fetch::HttpFetcher;
use deces_core::locate::{candidates, monthly_fallback, Period};
use deces_core::store::{CommitMode, SupabaseStore};
use deces_sync::config::{MissingPolicy, SyncConfig};
use deces_sync::progress::StdoutProgress;
use deces_sync::runner::run_sync;

#[derive(Parser)]
#[command(name = "deces", about = "INSEE death-record sync pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, normalize, and load death-record archives.
    ///
    /// Requires SUPABASE_URL and SUPABASE_KEY in the environment.
    Sync {
        /// First year to process. Defaults to 1975.
        #[arg(long)]
        from: Option<i32>,

        /// Last year to process. Defaults to the current year.
        #[arg(long)]
        to: Option<i32>,

        /// Records per store commit.
        #[arg(long)]
        batch_size: Option<usize>,

        /// Upsert on the identifying tuple instead of plain inserts.
        #[arg(long, default_value_t = false)]
        upsert: bool,

        /// Fail the run when a requested period has no published archive.
        #[arg(long, default_value_t = false)]
        strict: bool,

        /// Target table name.
        #[arg(long)]
        table: Option<String>,

        /// Archive host base URL override.
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Print candidate source paths and the dialect for each period.
    Plan {
        /// First year to plan. Defaults to 1975.
        #[arg(long)]
        from: Option<i32>,

        /// Last year to plan. Defaults to the current year.
        #[arg(long)]
        to: Option<i32>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Sync {
            from,
            to,
            batch_size,
            upsert,
            strict,
            table,
            base_url,
        } => run_sync_cmd(from, to, batch_size, upsert, strict, table, base_url),
        Commands::Plan { from, to } => run_plan(from, to),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_sync_cmd(
    from: Option<i32>,
    to: Option<i32>,
    batch_size: Option<usize>,
    upsert: bool,
    strict: bool,
    table: Option<String>,
    base_url: Option<String>,
) -> Result<()> {
    let mut config = SyncConfig::from_env()?;
    if let Some(from) = from {
        config.from_year = from;
    }
    if let Some(to) = to {
        config.to_year = to;
    }
    if let Some(batch_size) = batch_size {
        config.batch_size = batch_size;
    }
    if upsert {
        config.mode = CommitMode::Upsert;
    }
    if strict {
        config.missing_policy = MissingPolicy::Strict;
    }
    if let Some(table) = table {
        config.table = table;
    }
    if let Some(base_url) = base_url {
        config.base_url = base_url;
    }
    config.validate()?;

    let fetcher = HttpFetcher::new(config.base_url.clone());
    let store = SupabaseStore::new(
        config.store_url.clone(),
        config.store_key.clone(),
        config.table.clone(),
    );

    let result = run_sync(&fetcher, &store, &config, &StdoutProgress);
    if !result.is_success() {
        std::process::exit(1);
    }

    Ok(())
}

fn run_plan(from: Option<i32>, to: Option<i32>) -> Result<()> {
    let mut config = SyncConfig::new("-", "-");
    if let Some(from) = from {
        config.from_year = from;
    }
    if let Some(to) = to {
        config.to_year = to;
    }
    config.validate()?;

    for year in config.years() {
        let dialect = dialect_for_year(year);
        println!("{year}  [{}]", dialect.name);
        for path in candidates(&Period::annual(year)) {
            println!("  {path}");
        }
        if let Some(months) = monthly_fallback(year) {
            let first = candidates(&months[0]).remove(0);
            let last = candidates(&months[11]).remove(0);
            println!("  fallback: {first} .. {last}");
        }
    }

    Ok(())
}
