// Copyright 2026 The Filterstream Project
// SPDX-License-Identifier: Apache-2.0

// filterstream: manage filtered-stream rules and tail the stream.
//
// Usage:
//   filterstream list
//   filterstream add --rule "cat has:images::cats" --rule "dog"
//   filterstream validate --rule "(cat"
//   filterstream delete --id 1165037377523306498
//   filterstream stream [--keep-alive]
//   filterstream stream --legacy --param track=rust --param language=en

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use filterstream::config::{self, FileSource};
use filterstream::{ClientError, LineReader, Rule, Session};

#[derive(Parser)]
#[command(name = "filterstream", about = "Filtered-stream rule management and streaming")]
struct Cli {
    /// Path to the filterstream.yaml config file
    #[arg(long, default_value = "filterstream.yaml", env = "FILTERSTREAM_CONFIG")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the current rule set.
    List,
    /// Add rules. Each rule is VALUE or VALUE::TAG.
    Add {
        #[arg(long = "rule", value_name = "RULE", required = true)]
        rules: Vec<String>,
    },
    /// Dry-run rules without creating them.
    Validate {
        #[arg(long = "rule", value_name = "RULE", required = true)]
        rules: Vec<String>,
    },
    /// Delete rules by id.
    Delete {
        #[arg(long = "id", value_name = "ID", required = true)]
        ids: Vec<String>,
    },
    /// Open the stream and print each line to stdout.
    Stream {
        /// Use the OAuth1-signed statuses/filter stream.
        #[arg(long)]
        legacy: bool,

        /// Legacy stream parameter as KEY=VALUE (e.g. track=rust).
        #[arg(long = "param", value_name = "KEY=VALUE", requires = "legacy")]
        params: Vec<String>,

        /// Also print empty keep-alive lines.
        #[arg(long)]
        keep_alive: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .json()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let source = FileSource {
        path: std::path::PathBuf::from(&cli.config),
    };
    let config = match config::load_config(&source) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("failed to load config: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        version = %config.version,
        base_url = %config.endpoints.base_url,
        auth = config.credentials.kind(),
        "config loaded"
    );

    let session = Session::from_config(&config);

    let result = match cli.command {
        Command::List => session.list_rules().await.and_then(print_json),
        Command::Add { rules } => session.add_rules(&parse_rules(&rules)).await.and_then(print_json),
        Command::Validate { rules } => session
            .validate_rules(&parse_rules(&rules))
            .await
            .and_then(print_json),
        Command::Delete { ids } => session.delete_rules(&ids).await.and_then(print_json),
        Command::Stream {
            legacy,
            params,
            keep_alive,
        } => {
            let opened = if legacy {
                let pairs = match parse_params(&params) {
                    Ok(p) => p,
                    Err(bad) => {
                        tracing::error!(param = %bad, "expected KEY=VALUE");
                        std::process::exit(2);
                    }
                };
                session.open_legacy_stream(&pairs).await
            } else {
                session.open_stream().await
            };
            match opened {
                Ok(reader) => tail(reader, keep_alive).await,
                Err(e) => Err(e),
            }
        }
    };

    if let Err(e) = result {
        match &e {
            ClientError::UnexpectedStatus { .. } if e.is_auth_failure() => {
                tracing::error!(%e, "credentials rejected");
            }
            ClientError::UnexpectedStatus { .. } if e.is_rate_limited() => {
                tracing::error!(%e, "rate limited");
            }
            _ => tracing::error!(%e, "request failed"),
        }
        std::process::exit(1);
    }
}

fn parse_rules(inputs: &[String]) -> Vec<Rule> {
    inputs.iter().map(|s| Rule::parse(s)).collect()
}

fn parse_params(params: &[String]) -> Result<Vec<(String, String)>, String> {
    params
        .iter()
        .map(|p| match p.split_once('=') {
            Some((k, v)) if !k.is_empty() => Ok((k.to_string(), v.to_string())),
            _ => Err(p.clone()),
        })
        .collect()
}

fn print_json<T: Serialize>(value: T) -> Result<(), ClientError> {
    let rendered = serde_json::to_string_pretty(&value).map_err(ClientError::Encode)?;
    println!("{rendered}");
    Ok(())
}

async fn tail(mut reader: LineReader, keep_alive: bool) -> Result<(), ClientError> {
    while let Some(line) = reader.next_line().await? {
        if keep_alive || !filterstream::stream::is_keep_alive(&line) {
            println!("{line}");
        }
    }
    tracing::info!(lines = reader.lines_read(), "stream closed by server");
    Ok(())
}
