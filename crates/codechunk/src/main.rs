//! codechunk command-line entry point

mod cli;
mod logging;

use crate::cli::{ChunkArgs, Cli, Command};
use anyhow::Context;
use clap::Parser;
use codechunk_config::ApplicationConfig;
use codechunk_indexing::{ChunkIndexer, ScanOptions, service_from_config};
use codechunk_parsing::parsing::get_language_config;
use codechunk_parsing::{GrammarProvider, LanguageId, boundary_types};
use serde::Serialize;
use std::io::Write;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = cli.load_config()?;
    let _log_guard = logging::init(&config.logging);

    match cli.command {
        Command::Chunk(args) => run_chunk(&args, config).await,
        Command::Languages => print_json(&language_table(), true),
    }
}

async fn run_chunk(args: &ChunkArgs, config: ApplicationConfig) -> anyhow::Result<()> {
    let config = args.apply(config)?;

    let provider = Arc::new(GrammarProvider::new());
    let service = service_from_config(&config.chunking, Arc::clone(&provider))?;
    let indexer = ChunkIndexer::new(service, ScanOptions::from(&config.scan));

    let metadata = tokio::fs::metadata(&args.path)
        .await
        .with_context(|| format!("Cannot read '{}'", args.path.display()))?;

    let result = if metadata.is_dir() {
        let report = indexer.chunk_directory(&args.path).await?;
        print_json(&report, args.pretty)
    } else {
        let chunks = indexer.chunk_file(&args.path).await?;
        print_json(&chunks, args.pretty)
    };

    provider.dispose();
    result
}

#[derive(Serialize)]
struct LanguageEntry {
    id: LanguageId,
    extensions: Vec<&'static str>,
    boundary_kinds: Vec<&'static str>,
}

fn language_table() -> Vec<LanguageEntry> {
    LanguageId::ALL
        .iter()
        .map(|&id| {
            let mut boundary_kinds: Vec<_> = boundary_types(id).iter().copied().collect();
            boundary_kinds.sort_unstable();
            LanguageEntry {
                id,
                extensions: get_language_config(id)
                    .map(|config| config.extensions.to_vec())
                    .unwrap_or_default(),
                boundary_kinds,
            }
        })
        .collect()
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    writeln!(out)?;
    Ok(())
}
