//! Inspect and edit a nopesql page file
//!
//! ```bash
//! nopesql --db data.db --page-size 64 write 1 "hello"
//! nopesql --db data.db --page-size 64 read 1 --trim
//! nopesql --config store.json info
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use nopesql::{Page, PageNumber, PageStore, StoreConfig};

#[derive(Parser, Debug)]
#[command(name = "nopesql", version, about = "Page file inspection tool")]
struct Args {
    /// Backing database file
    #[arg(long, value_name = "FILE")]
    db: Option<PathBuf>,

    /// Page size in bytes (defaults to the host page size)
    #[arg(long)]
    page_size: Option<usize>,

    /// JSON store configuration
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'v', long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write text as the payload of a page
    Write { page: PageNumber, text: String },
    /// Print a page as hex
    Read {
        page: PageNumber,
        /// Drop trailing zero padding
        #[arg(long)]
        trim: bool,
    },
    /// Print store parameters and page count
    Info,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => StoreConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => StoreConfig::default(),
    };
    if let Some(db) = &args.db {
        config = config.with_path(db);
    }
    if let Some(page_size) = args.page_size {
        config = config.with_page_size(page_size);
    }

    let store = PageStore::with_config(config).context("invalid store configuration")?;

    match args.command {
        Command::Write { page, text } => {
            store
                .write_page(&Page::new(page, text.into_bytes()))
                .with_context(|| format!("writing page {}", page))?;
        }
        Command::Read { page, trim } => {
            let page = store
                .read_page(page)
                .with_context(|| format!("reading page {}", page))?;
            let mut data = page.data();
            if trim {
                let end = data.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
                data = &data[..end];
            }
            println!("{}", hex_dump(data));
        }
        Command::Info => {
            println!("path:      {}", store.path().display());
            println!("page size: {}", store.page_size());
            println!("pages:     {}", store.page_count()?);
        }
    }

    Ok(())
}

fn hex_dump(data: &[u8]) -> String {
    data.chunks(16)
        .map(|chunk| {
            chunk
                .iter()
                .map(|b| format!("{:02x}", b))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
