//! rolesearch CLI binary.
//!
//! Builds an in-memory hybrid index from a roles JSON file and runs a
//! search, or looks up one role's stored description by role number.

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rolesearch::chunking::ChunkingConfig;
use rolesearch::corpus::RoleCorpus;
use rolesearch::error::RoleSearchError;
use rolesearch::hybrid::{HybridSearcher, SearchRequest};
use rolesearch::index::IndexBuilder;

#[derive(Parser)]
#[command(name = "rolesearch", version, about = "Hybrid search over classification roles")]
struct Args {
    /// Path to the roles JSON corpus (object or record-array form).
    #[arg(short, long, env = "ROLESEARCH_CORPUS")]
    corpus: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a hybrid search and print ranked results as JSON.
    Search {
        /// Free-text query.
        query: String,

        /// Maximum number of results.
        #[arg(long, default_value_t = 10)]
        top_k: usize,

        /// Weight of the normalized lexical (BM25) score.
        #[arg(long, default_value_t = 0.4)]
        lexical_weight: f32,

        /// Weight of the normalized semantic (embedding) score.
        #[arg(long, default_value_t = 0.6)]
        semantic_weight: f32,

        /// Maximum tokens per chunk.
        #[arg(long, default_value_t = 250)]
        max_tokens: usize,

        /// Overlapping tokens between consecutive chunks.
        #[arg(long, default_value_t = 50)]
        overlap: usize,
    },

    /// Print the stored description of one role number.
    Lookup {
        /// Role number, e.g. 1111.0300.
        role_number: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let corpus = RoleCorpus::from_json_file(&args.corpus)
        .with_context(|| format!("failed to load corpus from {}", args.corpus.display()))?;

    match args.command {
        Command::Search {
            query,
            top_k,
            lexical_weight,
            semantic_weight,
            max_tokens,
            overlap,
        } => {
            let chunking = ChunkingConfig::new(max_tokens, overlap)?;
            let index = IndexBuilder::new().chunking(chunking).build(&corpus)?;
            let searcher = HybridSearcher::new(index);

            let request = SearchRequest::new(query)
                .top_k(top_k)
                .weights(lexical_weight, semantic_weight);
            let response = searcher.search(&request)?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Lookup { role_number } => {
            let description = corpus
                .description(&role_number)
                .ok_or_else(|| RoleSearchError::not_found(format!("role {role_number}")))?;
            println!("{}", serde_json::json!({ "description": description }));
        }
    }

    Ok(())
}
