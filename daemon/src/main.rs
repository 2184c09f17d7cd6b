//! agora daemon: entry point for running an election node.
//!
//! The daemon is a thin driver: it reads calls from a JSON-lines file (one
//! `ElectionCall` per line) and submits them in file order, which is the
//! total order the core relies on.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use agora_election::ElectionCall;
use agora_node::{ElectionNode, LogFormat, NodeConfig, NodeError};
use agora_store::ElectionStore;
use agora_types::Identity;
use anyhow::{bail, Context};
use clap::Parser;

#[derive(Parser)]
#[command(name = "agora-daemon", about = "agora election ledger daemon")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "AGORA_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory for ledger storage.
    #[arg(long, env = "AGORA_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Identity of the election authority. Required without a config file.
    #[arg(long, env = "AGORA_AUTHORITY")]
    authority: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "AGORA_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "AGORA_LOG_FORMAT")]
    log_format: Option<String>,

    /// Collect Prometheus metrics.
    #[arg(long, env = "AGORA_ENABLE_METRICS")]
    metrics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Submit every call in a JSON-lines file, in order.
    Apply {
        /// File with one JSON-encoded call per line. Blank lines and lines
        /// starting with '#' are ignored.
        file: PathBuf,
    },
    /// Print the current election state as JSON.
    Status,
    /// Replay the journal and check it reproduces the stored election.
    Verify,
    /// Print every accepted call as JSON lines.
    Journal,
}

fn build_config(cli: &Cli) -> anyhow::Result<NodeConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let path_str = path.to_string_lossy();
            let config = NodeConfig::from_toml_file(&path_str)
                .with_context(|| format!("loading config from {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => {
            let Some(raw) = cli.authority.as_deref() else {
                bail!("--authority is required when no --config file is given");
            };
            NodeConfig::new(Identity::parse(raw).context("invalid --authority")?)
        }
    };

    if let Some(raw) = cli.authority.as_deref() {
        config.authority = Identity::parse(raw).context("invalid --authority")?;
    }
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.log_format = format.clone();
    }
    config.enable_metrics |= cli.metrics;
    Ok(config)
}

async fn apply_file<S: ElectionStore>(
    node: &ElectionNode<S>,
    file: &Path,
) -> anyhow::Result<(usize, usize)> {
    let reader = std::io::BufReader::new(
        std::fs::File::open(file).with_context(|| format!("opening {}", file.display()))?,
    );

    let (mut accepted, mut rejected) = (0usize, 0usize);
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let call: ElectionCall = serde_json::from_str(trimmed)
            .with_context(|| format!("{}:{}: malformed call", file.display(), line_no + 1))?;

        match node.submit(call).await {
            Ok(events) => {
                accepted += 1;
                for event in events {
                    println!("{}", serde_json::to_string(&event)?);
                }
            }
            Err(NodeError::Election(reason)) => {
                rejected += 1;
                eprintln!("{}:{}: rejected: {reason}", file.display(), line_no + 1);
            }
            Err(other) => return Err(other.into()),
        }
    }
    Ok((accepted, rejected))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = build_config(&cli)?;

    let format: LogFormat = config.log_format()?;
    agora_node::init_logging(format, &config.log_level)?;

    tracing::info!(
        "opening election at {} (authority: {})",
        config.data_dir.display(),
        config.authority
    );
    let node = ElectionNode::open_lmdb(&config)?;

    match cli.command {
        Command::Apply { file } => {
            let (accepted, rejected) = apply_file(&node, &file).await?;
            tracing::info!(accepted, rejected, phase = %node.phase().await, "call file applied");
            if let Some(metrics) = node.metrics() {
                print!("{}", metrics.encode()?);
            }
        }
        Command::Status => {
            let snapshot = node.snapshot().await;
            let tally = node.tally_result().await.ok();
            let registered = snapshot.voters.values().filter(|v| v.registered).count();
            let status = serde_json::json!({
                "authority": snapshot.authority,
                "phase": snapshot.phase,
                "registered_voters": registered,
                "proposals": snapshot.proposals,
                "tally_result": tally,
                "journal_len": node.journal_len().await,
            });
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        Command::Verify => {
            node.verify_journal().await?;
            println!("journal verified: {} entries", node.journal_len().await);
        }
        Command::Journal => {
            for entry in node.journal()? {
                println!("{}", serde_json::to_string(&entry)?);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("agora-daemon").chain(args.iter().copied()))
            .expect("valid args")
    }

    #[test]
    fn authority_flag_builds_default_config() {
        let cli = parse(&["--authority", "chair", "status"]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.authority, Identity::new("chair"));
        assert_eq!(config.log_level, "info");
        assert!(!config.enable_metrics);
    }

    #[test]
    fn missing_authority_without_config_fails() {
        let cli = parse(&["status"]);
        assert!(build_config(&cli).is_err());
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agora.toml");
        std::fs::write(&path, "authority = \"chair\"\nlog_level = \"warn\"\n").unwrap();

        let cli = parse(&[
            "--config",
            path.to_str().unwrap(),
            "--log-level",
            "debug",
            "--metrics",
            "verify",
        ]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.authority, Identity::new("chair"));
        assert_eq!(config.log_level, "debug");
        assert!(config.enable_metrics);
    }

    #[tokio::test]
    async fn apply_file_counts_accepted_and_rejected_calls() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = NodeConfig::new(Identity::new("chair"));
        config.data_dir = dir.path().join("data");
        config.map_size_mb = 16;
        let node = ElectionNode::open_lmdb(&config).unwrap();

        let calls = dir.path().join("calls.jsonl");
        std::fs::write(
            &calls,
            concat!(
                "# admit one voter\n",
                "{\"register_voter\":{\"caller\":\"chair\",\"voter\":\"alice\"}}\n",
                "\n",
                "{\"register_voter\":{\"caller\":\"alice\",\"voter\":\"bob\"}}\n",
                "{\"open_proposal_intake\":{\"caller\":\"chair\"}}\n",
            ),
        )
        .unwrap();

        let (accepted, rejected) = apply_file(&node, &calls).await.unwrap();
        assert_eq!((accepted, rejected), (2, 1));
        assert_eq!(node.journal_len().await, 2);
    }
}
