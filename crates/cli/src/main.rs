//! Command Line Interface for pair statistics.
use anyhow::{Context, Result};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use dotenv::dotenv;
use pairstats_data::documents::PairBucketDocument;
use pairstats_data::{Hydrate, Project};
use pairstats_domain::address::Address;
use pairstats_domain::codec;
use pairstats_domain::config::ValuationConfig;
use pairstats_domain::entities::{BucketWindow, Pair, Token};
use pairstats_domain::reserves::RawReserves;
use pairstats_protocols::{BlockNumber, FixedReserves, PairReader};
use primitive_types::U256;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pairstats")]
#[command(about = "Decimal-safe AMM pair statistics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a decimal into its stored text form
    Encode {
        /// Decimal value, e.g. 0.000000000000000001
        value: BigDecimal,
    },
    /// Decode stored text back into a decimal
    Decode {
        /// Stored text
        text: String,
    },
    /// Value a pair from raw reserves and print its liquidity document
    Value {
        /// Pair contract address
        #[arg(long)]
        pair: Address,

        /// Token 0 address
        #[arg(long)]
        token0: Address,

        /// Token 0 symbol
        #[arg(long)]
        symbol0: String,

        /// Token 0 decimals
        #[arg(long, default_value_t = 18)]
        decimals0: u8,

        /// Token 1 address
        #[arg(long)]
        token1: Address,

        /// Token 1 symbol
        #[arg(long)]
        symbol1: String,

        /// Token 1 decimals
        #[arg(long, default_value_t = 18)]
        decimals1: u8,

        /// Raw reserve of token 0 (decimal integer)
        #[arg(long)]
        reserve0: String,

        /// Raw reserve of token 1 (decimal integer)
        #[arg(long)]
        reserve1: String,

        /// Total supply of pair shares
        #[arg(long, default_value = "0")]
        total_supply: BigDecimal,

        /// Sample time (RFC 3339), defaults to now
        #[arg(long)]
        time: Option<DateTime<Utc>>,

        /// Align the sample time to the start of this window
        #[arg(long, value_enum)]
        window: Option<Window>,

        /// Block the reserves were read at
        #[arg(long)]
        block: Option<BlockNumber>,
    },
    /// Check a stored pair bucket document for degraded fields
    Check {
        /// Path to the JSON document
        path: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Window {
    Hour,
    Day,
}

impl From<Window> for BucketWindow {
    fn from(window: Window) -> Self {
        match window {
            Window::Hour => BucketWindow::Hour,
            Window::Day => BucketWindow::Day,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Encode { value } => {
            println!("{}", codec::encode(&value));
        }
        Commands::Decode { text } => {
            let value = codec::decode(&text).with_context(|| format!("cannot decode {text:?}"))?;
            println!("{value}");
        }
        Commands::Value {
            pair,
            token0,
            symbol0,
            decimals0,
            token1,
            symbol1,
            decimals1,
            reserve0,
            reserve1,
            total_supply,
            time,
            window,
            block,
        } => {
            let raw = RawReserves::new(parse_raw(&reserve0)?, parse_raw(&reserve1)?);
            let token0 = Token::new(token0, symbol0.clone(), decimals0, symbol0);
            let token1 = Token::new(token1, symbol1.clone(), decimals1, symbol1);
            let pair = Pair::new(0, pair, token0, token1)?;

            let mut time = time.unwrap_or_else(Utc::now);
            if let Some(window) = window {
                time = BucketWindow::from(window).floor(time);
            }

            let config = ValuationConfig::from_env();
            info!(anchors = ?config.anchor_symbols, pair = %pair, "Valuing pair");

            let reader = PairReader::new(FixedReserves::new().with_pair(pair.address, raw), config);
            let (sample, reason) = reader
                .sample_with_reason(&pair, time, total_supply, block)
                .await?;
            if let Some(e) = reason {
                println!("⚠️  {pair} has no USD price: {e}");
            }

            let document = serde_json::to_string_pretty(&sample.project())?;
            println!("{document}");
        }
        Commands::Check { path } => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("cannot read {}", path.display()))?;
            let document: PairBucketDocument =
                serde_json::from_str(&text).context("not a pair bucket document")?;
            let hydrated = document.hydrate();

            if hydrated.is_degraded() {
                println!("❌ {} is degraded:", hydrated.record.pair);
                for issue in &hydrated.issues {
                    println!("   {issue}");
                }
            } else {
                println!(
                    "✅ {} at {}: volume {} USD",
                    hydrated.record.pair, hydrated.record.time, hydrated.record.volume_usd
                );
            }
        }
    }

    Ok(())
}

/// Parses a raw on-chain integer written in decimal.
fn parse_raw(text: &str) -> Result<U256> {
    U256::from_dec_str(text.trim()).with_context(|| format!("invalid raw reserve {text:?}"))
}
