//! cognition: resolve utterances from the command line
//!
//! Bootstraps the knowledge store once, then resolves either the utterance
//! given as arguments or every line read from stdin. Facts learned along the
//! way can be persisted to a JSON file and are fed back into later runs.

mod sink;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use cognition::{CognitionConfig, CognitivePipeline, PersonalFacts, Resolved};
use knowledge::{BuiltinSource, JsonFileSource, KnowledgeSource, KnowledgeStore};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use sink::{load_facts, JsonFileSink};

#[derive(Parser)]
#[command(name = "cognition")]
#[command(about = "Resolve utterances with the cognitive resolution pipeline")]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long, env = "COGNITION_CONFIG", default_value = "cognition.yaml")]
    config: PathBuf,

    /// JSON knowledge seed (built-in seed when unset)
    #[arg(short, long, env = "COGNITION_KNOWLEDGE")]
    knowledge: Option<PathBuf>,

    /// JSON file of personal facts, read before and updated after each run
    #[arg(short, long, env = "COGNITION_FACTS")]
    facts: Option<PathBuf>,

    /// Seed for phrasing selection (overrides config file)
    #[arg(long, env = "COGNITION_SEED")]
    seed: Option<u64>,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,

    /// Print the thought trace after each answer
    #[arg(short, long)]
    verbose: bool,

    /// Utterance to resolve; reads lines from stdin when empty
    utterance: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(&cli.config).await?;
    if let Some(seed) = cli.seed {
        config.phrasing.seed = Some(seed);
    }

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("cognition={}", config.general.log_level).parse()?)
                .add_directive(format!("knowledge={}", config.general.log_level).parse()?),
        )
        .init();

    info!("Config file: {}", cli.config.display());

    let source: Box<dyn KnowledgeSource> = match &cli.knowledge {
        Some(path) => Box::new(JsonFileSource::new(path)),
        None => Box::new(BuiltinSource::new()),
    };
    let store = KnowledgeStore::bootstrap(source.as_ref()).await?;
    let pipeline = CognitivePipeline::with_config(Arc::new(store), config)?;

    let sink = cli.facts.as_deref().map(JsonFileSink::new);
    let mut facts = match cli.facts.as_deref() {
        Some(path) => load_facts(path).await?,
        None => PersonalFacts::new(),
    };

    if !cli.utterance.is_empty() {
        let utterance = cli.utterance.join(" ");
        run_once(&pipeline, &utterance, &mut facts, sink.as_ref(), &cli).await?;
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "quit" | "exit") {
            break;
        }
        run_once(&pipeline, line, &mut facts, sink.as_ref(), &cli).await?;
    }

    Ok(())
}

/// Read the YAML config, falling back to defaults when the file is missing.
async fn load_config(path: &Path) -> anyhow::Result<CognitionConfig> {
    if !tokio::fs::try_exists(path).await? {
        return Ok(CognitionConfig::default());
    }
    let content = tokio::fs::read_to_string(path).await?;
    Ok(CognitionConfig::from_yaml(&content)?)
}

/// Resolve one utterance, persist what it learned and print the answer.
async fn run_once(
    pipeline: &CognitivePipeline,
    utterance: &str,
    facts: &mut PersonalFacts,
    sink: Option<&JsonFileSink>,
    cli: &Cli,
) -> anyhow::Result<()> {
    let resolved = match sink {
        Some(sink) => {
            pipeline
                .resolve_and_report(utterance, facts.clone(), sink)
                .await?
        }
        None => pipeline.resolve(utterance, facts.clone()),
    };
    *facts = facts.apply(&resolved.suggestions);

    print_resolved(&resolved, cli.json, cli.verbose)?;
    if let Some(path) = cli.facts.as_deref().filter(|_| !resolved.suggestions.is_empty()) {
        info!(path = %path.display(), "Updated facts file");
    }
    Ok(())
}

fn print_resolved(resolved: &Resolved, json: bool, verbose: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(resolved)?);
        return Ok(());
    }

    println!("{}", resolved.content);
    println!(
        "  [{} | confidence {:.2} | {} pass(es){}]",
        resolved.category,
        resolved.confidence,
        resolved.iterations,
        if resolved.corrected { " | corrected" } else { "" }
    );
    if verbose {
        for line in &resolved.reasoning {
            println!("  - {}", line);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("cognition.yaml")).await.unwrap();
        assert_eq!(config.engine.early_exit_threshold, 0.9);
    }

    #[tokio::test]
    async fn test_config_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cognition.yaml");
        tokio::fs::write(&path, "phrasing:\n  seed: 9\nengine:\n  early_exit_threshold: 0.5\n")
            .await
            .unwrap();

        let config = load_config(&path).await.unwrap();
        assert_eq!(config.phrasing.seed, Some(9));
        assert_eq!(config.engine.early_exit_threshold, 0.5);
    }

    #[tokio::test]
    async fn test_invalid_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cognition.yaml");
        tokio::fs::write(&path, "engine:\n  early_exit_threshold: 2.0\n")
            .await
            .unwrap();

        assert!(load_config(&path).await.is_err());
    }
}
