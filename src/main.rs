//! vidore command-line entrypoint.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use vidore::config::Config;
use vidore::evaluation::{evaluate_dataset, load_dataset};
use vidore::retrievers::{RETRIEVER_NAMES, load_retriever};

#[derive(Debug, Parser)]
#[command(name = "vidore")]
#[command(version, about = "Text retrievers for visual document retrieval benchmarks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the retrievers that can be evaluated
    List,

    /// Score a dataset with a retriever and print the metrics as JSON
    Evaluate {
        /// Retriever name (see `vidore list`)
        retriever: String,

        /// Dataset file, JSON array or JSON Lines
        #[arg(value_name = "FILE")]
        dataset: PathBuf,

        /// Queries encoded per forward pass (overrides VIDORE_BATCH_QUERY)
        #[arg(long)]
        batch_query: Option<usize>,

        /// Documents encoded per forward pass (overrides VIDORE_BATCH_DOC)
        #[arg(long)]
        batch_doc: Option<usize>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::List => {
            for name in RETRIEVER_NAMES {
                println!("{name}");
            }
            Ok(())
        }
        Command::Evaluate {
            retriever,
            dataset,
            batch_query,
            batch_doc,
        } => {
            let mut config = Config::from_env()?;
            if let Some(batch_query) = batch_query {
                config.batch_query = batch_query;
            }
            if let Some(batch_doc) = batch_doc {
                config.batch_doc = batch_doc;
            }
            run_evaluation(&retriever, &dataset, &config)
        }
    }
}

fn run_evaluation(name: &str, dataset: &Path, config: &Config) -> anyhow::Result<()> {
    config.validate()?;

    tracing::info!(
        retriever = name,
        dataset = %dataset.display(),
        batch_query = config.batch_query,
        batch_doc = config.batch_doc,
        "Starting evaluation"
    );

    let rows = load_dataset(dataset)?;
    let mut retriever = load_retriever(name, config)
        .with_context(|| format!("failed to load retriever '{name}'"))?;

    let report = evaluate_dataset(retriever.as_ref(), &rows, config.batch_query, config.batch_doc)?;
    retriever.tear_down();

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_list() {
        let cli = Cli::try_parse_from(["vidore", "list"]).unwrap();
        assert!(matches!(cli.command, Command::List));
    }

    #[test]
    fn test_parse_evaluate_with_overrides() {
        let cli = Cli::try_parse_from([
            "vidore",
            "evaluate",
            "bm25",
            "data.jsonl",
            "--batch-query",
            "8",
        ])
        .unwrap();

        match cli.command {
            Command::Evaluate {
                retriever,
                dataset,
                batch_query,
                batch_doc,
            } => {
                assert_eq!(retriever, "bm25");
                assert_eq!(dataset, PathBuf::from("data.jsonl"));
                assert_eq!(batch_query, Some(8));
                assert_eq!(batch_doc, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_evaluate_requires_dataset() {
        let err = Cli::try_parse_from(["vidore", "evaluate", "bm25"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["vidore", "serve"]).is_err());
    }
}
