use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};

use review_tables::cache::{self, HttpFetcher, Source};
use review_tables::cleaner::{self, DataCleaner};
use review_tables::table::truncate;
use review_tables::{db, Recipe, Settings};

#[derive(Parser)]
#[command(name = "review_tables", about = "Turn cached music review listings into ranked tables")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a listing into the local cache (no-op if already cached)
    Fetch {
        #[arg(long)]
        url: String,
        /// Cache name; the page is stored as <data_dir>/<name>.html
        #[arg(long)]
        name: String,
    },
    /// Run a JSON recipe and print the resulting table
    Run {
        recipe: PathBuf,
        /// Also store the table in the SQLite database
        #[arg(long)]
        save: bool,
        /// Print the table as JSON instead of columns
        #[arg(long)]
        json: bool,
        /// Dump intermediate state before the table
        #[arg(short, long)]
        verbose: bool,
    },
    /// Open a cached listing in the default browser
    View {
        #[arg(long)]
        name: String,
    },
    /// Show saved reviews
    Overview {
        #[arg(short, long)]
        reviewer: Option<String>,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load().context("Failed to load settings")?;

    match cli.command {
        Commands::Fetch { url, name } => {
            let source = Source::new(url, name);
            let path = cache::storage_path(&settings.data_dir, &source.name);
            let fetcher = HttpFetcher::new(&settings.user_agent)?;
            let html = cache::fetch_or_load(&source, &path, &fetcher)?;
            println!("{}: {} bytes at {}", source.name, html.len(), path.display());
        }
        Commands::Run {
            recipe,
            save,
            json,
            verbose,
        } => {
            let recipe = Recipe::from_path(&recipe)
                .with_context(|| format!("Failed to read recipe {}", recipe.display()))?;
            let mut cleaner = DataCleaner::open(recipe.source(), &settings)?;
            let table = recipe.run(&mut cleaner)?;

            if verbose {
                cleaner.print_data()?;
            } else if json {
                println!("{}", table.to_json()?);
            } else {
                print!("{}", table);
            }

            if save {
                let conn = db::connect(&settings.db_path)?;
                db::init_schema(&conn)?;
                let n = db::save_table(&conn, &table)?;
                println!("Saved {} rows to {}", n, settings.db_path.display());
            }
        }
        Commands::View { name } => {
            let path = cache::storage_path(&settings.data_dir, &name);
            if !path.exists() {
                println!("No cached page for {}. Run 'fetch' first.", name);
                return Ok(());
            }
            cleaner::open_in_browser(&path)?;
        }
        Commands::Overview { reviewer, limit } => {
            let conn = db::connect(&settings.db_path)?;
            db::init_schema(&conn)?;
            let rows = db::fetch_reviews(&conn, reviewer.as_deref(), limit)?;
            if rows.is_empty() {
                println!("No saved reviews.");
                return Ok(());
            }

            println!(
                "{:<16} | {:>4} | {:<24} | {:<28} | {:<5}",
                "Reviewer", "Rank", "Artist", "Album", "Year"
            );
            println!("{}", "-".repeat(88));
            for r in &rows {
                println!(
                    "{:<16} | {:>4} | {:<24} | {:<28} | {:<5}",
                    truncate(&r.reviewer, 16),
                    r.rank,
                    truncate(&r.artist, 24),
                    truncate(&r.album, 28),
                    r.year.as_deref().unwrap_or("-"),
                );
            }
            println!("\n{} rows", rows.len());
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }
    Ok(())
}
