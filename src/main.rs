use std::str::FromStr;

use alloy::primitives::U256;
use clap::Parser;
use metadata_rescue::types::{ChainId, TokenInput};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr);
    let _ = match cli.json_logs {
        true => subscriber.json().try_init(),
        false => subscriber.pretty().try_init(),
    };

    let mut config = metadata_rescue::config::init()?;
    if let Some(providers) = cli.providers {
        config.providers = providers;
    }

    let resolver = config.build_resolver()?;
    let chain_id: ChainId = cli.chain_id.parse()?;
    let token_id = U256::from_str(&cli.token_id)
        .map_err(|err| eyre::eyre!("Invalid token id {}: {:?}", cli.token_id, err))?;
    let token = TokenInput::new(chain_id.as_u64(), cli.contract_address, token_id);

    let resolution = resolver.resolve_with_report(&token).await;
    if cli.report {
        eprintln!("{}", resolution.summary());
    }

    println!("{}", serde_json::to_string_pretty(&resolution.metadata)?);
    Ok(())
}

/// Resolve the display name and image of an ERC-721 token.
#[derive(Parser, Debug)]
struct Cli {
    chain_id: String,
    contract_address: String,
    token_id: String,

    /// Comma separated provider order, overrides METADATA_PROVIDERS
    #[arg(long)]
    providers: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Print what every provider returned to stderr
    #[arg(long)]
    report: bool,
}
