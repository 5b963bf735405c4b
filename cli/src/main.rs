//! chainstream CLI: inspect anchored streams and build stream pallet calls.
//!
//! # Commands
//! ```text
//! chainstream id            <RAW_ID> [--schema]
//! chainstream query         <STREAM_ID>
//! chainstream owner         <STREAM_ID>
//! chainstream revoked       <STREAM_ID>
//! chainstream encode-create --creator <SS58> --hash <HEX> --schema <ID> --signature <HEX>
//! chainstream encode-update --stream <ID> --hash <HEX> --signature <HEX>
//! chainstream encode-status --stream <ID> --revoke|--restore --tx-hash <HEX> --tx-signature <HEX>
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use chainstream_client::{stream, ChainContext, ClientConfig, Extrinsic, RpcConnectionProvider};
use chainstream_core::{canonicalize, StreamCreate, StreamUpdate, SCHEMA_PREFIX, STREAM_PREFIX};
use chainstream_observability::init_tracing;

#[derive(Parser)]
#[command(
    name = "chainstream",
    about = "Query anchored streams and build stream pallet calls",
    long_about = "
Query anchored credential streams on a CORD-style chain and build the
unsigned call data for create / update / set_status.

ENVIRONMENT VARIABLES:
  CHAINSTREAM_RPC_URL        Node HTTP JSON-RPC endpoint
  CHAINSTREAM_SS58_FORMAT    Address format used to render accounts
  RUST_LOG                   Log filter (overrides the config file)
",
    version
)]
struct Cli {
    /// YAML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Node RPC URL (overrides config and environment)
    #[arg(long, global = true)]
    rpc: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the canonical form of an identifier
    Id {
        raw: String,
        /// Use the schema namespace instead of the stream namespace
        #[arg(long)]
        schema: bool,
    },

    /// Fetch a stream record
    Query { stream_id: String },

    /// Print the controller of a stream
    Owner { stream_id: String },

    /// Print whether a stream is revoked
    Revoked { stream_id: String },

    /// Build call data for `stream.create`
    #[command(name = "encode-create")]
    EncodeCreate {
        #[arg(long)]
        creator: String,
        /// Content hash (0x-prefixed, 32 bytes)
        #[arg(long)]
        hash: String,
        #[arg(long)]
        holder: Option<String>,
        /// Raw schema id
        #[arg(long)]
        schema: String,
        /// Raw id of the stream this one links to
        #[arg(long)]
        link: Option<String>,
        #[arg(long)]
        signature: String,
    },

    /// Build call data for `stream.update`
    #[command(name = "encode-update")]
    EncodeUpdate {
        #[arg(long)]
        stream: String,
        #[arg(long)]
        hash: String,
        #[arg(long)]
        signature: String,
    },

    /// Build call data for `stream.set_status`
    #[command(name = "encode-status")]
    EncodeStatus {
        #[arg(long)]
        stream: String,
        /// Mark the stream revoked
        #[arg(long, conflicts_with = "restore")]
        revoke: bool,
        /// Clear the revoked flag
        #[arg(long)]
        restore: bool,
        #[arg(long)]
        tx_hash: String,
        #[arg(long)]
        tx_signature: String,
    },
}

impl Commands {
    fn is_encode(&self) -> bool {
        matches!(
            self,
            Self::EncodeCreate { .. } | Self::EncodeUpdate { .. } | Self::EncodeStatus { .. }
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ClientConfig::load(path)?,
        None => {
            let mut config = ClientConfig::default();
            config.apply_env()?;
            config
        }
    };
    if let Some(rpc) = &cli.rpc {
        config.rpc_url = rpc.clone();
    }
    if cli.verbose {
        config.log.level = "debug".into();
    }
    init_tracing(&config.log).context("failed to initialise logging")?;

    if let Commands::Id { raw, schema } = &cli.command {
        let prefix = if *schema { SCHEMA_PREFIX } else { STREAM_PREFIX };
        println!("{}", canonicalize(raw, prefix));
        return Ok(());
    }

    // Call data needs no node; only reads connect.
    let span = tracing::info_span!("chainstream", rpc = %config.rpc_url);
    let ctx = if cli.command.is_encode() {
        ChainContext::offline(&config)
    } else {
        ChainContext::new(Arc::new(RpcConnectionProvider::new(config)))
    }
    .with_span(span);

    match cli.command {
        Commands::Id { .. } => {}
        Commands::Query { stream_id } => match stream::query(&ctx, &stream_id).await? {
            Some(record) if cli.json => println!("{}", serde_json::to_string_pretty(&record)?),
            Some(record) => {
                println!("Stream:     {}", record.stream_id);
                println!("Hash:       {}", record.stream_hash);
                println!("Controller: {}", record.controller);
                println!("Holder:     {}", record.holder.as_deref().unwrap_or("-"));
                println!("Schema:     {}", record.schema_id.as_deref().unwrap_or("-"));
                println!("Link:       {}", record.link_id.as_deref().unwrap_or("-"));
                println!("Revoked:    {}", record.revoked);
            }
            None if cli.json => println!("null"),
            None => println!("No stream found for {}", canonicalize(&stream_id, STREAM_PREFIX)),
        },
        Commands::Owner { stream_id } => {
            let owner = stream::get_owner(&ctx, &stream_id).await?;
            if cli.json {
                println!("{}", serde_json::json!({ "controller": owner }));
            } else {
                println!("{owner}");
            }
        }
        Commands::Revoked { stream_id } => {
            let revoked = stream::is_revoked(&ctx, &stream_id).await?;
            if cli.json {
                println!("{}", serde_json::json!({ "revoked": revoked }));
            } else {
                match revoked {
                    Some(flag) => println!("{flag}"),
                    None => println!("No stream found for {}", canonicalize(&stream_id, STREAM_PREFIX)),
                }
            }
        }
        Commands::EncodeCreate {
            creator,
            hash,
            holder,
            schema,
            link,
            signature,
        } => {
            let tx = stream::create(
                &ctx,
                &StreamCreate {
                    creator,
                    stream_hash: hash,
                    holder,
                    schema_id: schema,
                    link_id: link,
                    signature,
                },
            )
            .await?;
            print_extrinsic(&tx, cli.json)?;
        }
        Commands::EncodeUpdate {
            stream: stream_id,
            hash,
            signature,
        } => {
            let tx = stream::update(
                &ctx,
                &StreamUpdate {
                    stream_id,
                    stream_hash: hash,
                    signature,
                },
            )
            .await?;
            print_extrinsic(&tx, cli.json)?;
        }
        Commands::EncodeStatus {
            stream: stream_id,
            revoke,
            restore,
            tx_hash,
            tx_signature,
        } => {
            anyhow::ensure!(revoke || restore, "pass --revoke or --restore");
            let tx = stream::set_status(&ctx, &stream_id, revoke, &tx_hash, &tx_signature).await?;
            print_extrinsic(&tx, cli.json)?;
        }
    }

    Ok(())
}

fn print_extrinsic(tx: &Extrinsic, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(tx)?);
    } else {
        println!("{}.{}: {}", tx.pallet, tx.method, tx.to_hex());
    }
    Ok(())
}
