//! Content store binary entry point.
//!
//! Uploads files and metadata to IPFS, pins them through Pinata and reads
//! content back by CID.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use content_store::{ContentId, ContentStoreError, RemoteContentStore, StoreConfig};
use std::io::{Read, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Content store CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "content-store")]
#[command(about = "Upload, pin and retrieve content on IPFS")]
struct Args {
    /// TOML configuration file. Environment variables override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a file and pin it; prints the CID.
    UploadFile { path: PathBuf },
    /// Upload a JSON object as metadata.json and pin it; `-` reads stdin.
    UploadMetadata { source: String },
    /// Write the content behind a CID to stdout or a file.
    Retrieve {
        cid: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Pin content that is already stored.
    Pin { cid: String },
    /// Validate configuration and probe the pinning credentials.
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout only carries CIDs and content.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => {
            dotenv::dotenv().ok();
            StoreConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?
                .with_env_overrides()
        }
        None => StoreConfig::from_env(),
    };
    let store =
        RemoteContentStore::from_config(&config).context("Failed to initialize content store")?;

    match args.command {
        Command::UploadFile { path } => {
            let cid = store.upload_file(&path).await.map_err(report_stored)?;
            println!("{cid}");
        }
        Command::UploadMetadata { source } => {
            let raw = read_source(&source)?;
            let metadata: serde_json::Value =
                serde_json::from_str(&raw).context("Metadata is not valid JSON")?;
            let cid = store
                .upload_json_metadata(&metadata)
                .await
                .map_err(report_stored)?;
            println!("{cid}");
        }
        Command::Retrieve { cid, output } => {
            let bytes = store.retrieve_file(&ContentId::new(cid)).await?;
            match output {
                Some(path) => tokio::fs::write(&path, &bytes)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => {
                    let mut stdout = std::io::stdout().lock();
                    stdout.write_all(&bytes)?;
                    stdout.flush()?;
                }
            }
        }
        Command::Pin { cid } => {
            store.pin_file(&ContentId::new(cid)).await?;
        }
        Command::Check => {
            store
                .pinning()
                .test_authentication()
                .await
                .context("Pinata rejected the configured keys")?;
            tracing::info!("configuration valid, pinning credentials accepted");
        }
    }

    Ok(())
}

/// Surface the CID of content that was stored even though pinning failed.
fn report_stored(error: ContentStoreError) -> anyhow::Error {
    if let Some(cid) = error.stored_cid() {
        eprintln!("stored (unpinned): {cid}");
    }
    error.into()
}

fn read_source(source: &str) -> Result<String> {
    if source == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("Failed to read metadata from stdin")?;
        return Ok(raw);
    }
    std::fs::read_to_string(source).with_context(|| format!("Failed to read {source}"))
}
