use std::collections::HashMap;

use alloy::primitives::{Address, Bytes, TxKind};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::client::RpcClient;
use alloy::rpc::types::eth::{BlockId, TransactionInput, TransactionRequest};
use alloy::sol_types::SolCall;
use once_cell::sync::Lazy;
use regex::Regex;

pub static VARIABLE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\{(.+?)}").unwrap());

/// Public JSON-RPC endpoints used when no `CHAIN_<id>_RPC_HTTP` is set.
pub static DEFAULT_RPC_URLS: Lazy<HashMap<u64, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (1, "https://ethereum-rpc.publicnode.com"),
        (10, "https://mainnet.optimism.io"),
        (137, "https://polygon-rpc.com"),
        (8453, "https://mainnet.base.org"),
        (42161, "https://arb1.arbitrum.io/rpc"),
        (7777777, "https://rpc.zora.energy"),
    ])
});

/// Infura network subdomains by chain id.
pub static INFURA_NETWORKS: Lazy<HashMap<u64, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (1, "mainnet"),
        (5, "goerli"),
        (11155111, "sepolia"),
        (10, "optimism-mainnet"),
        (137, "polygon-mainnet"),
        (80001, "polygon-mumbai"),
        (8453, "base-mainnet"),
        (42161, "arbitrum-mainnet"),
    ])
});

pub fn infura_url(chain_id: u64, project_id: &str) -> Option<String> {
    INFURA_NETWORKS
        .get(&chain_id)
        .map(|network| format!("https://{network}.infura.io/v3/{project_id}"))
}

/// Builds an HTTP JSON-RPC provider. URLs with unexpanded `${VAR}`
/// placeholders are rejected up front.
pub fn connect(url: &str) -> eyre::Result<impl Provider> {
    if VARIABLE_REGEX.is_match(url) {
        return Err(eyre::eyre!("URL contains variables"));
    }

    let provider = ProviderBuilder::new().connect_client(RpcClient::new_http(url.parse()?));
    Ok(provider)
}

/// Helper function for calling view functions for SolCall types
pub async fn view_contract_call<T, P>(call: T, provider: &P, address: Address) -> eyre::Result<T::Return>
where
    T: SolCall,
    P: Provider,
{
    provider
        .call(TransactionRequest {
            to: Some(TxKind::Call(address)),
            input: TransactionInput::new(Bytes::from(call.abi_encode())),
            ..Default::default()
        })
        .block(BlockId::latest())
        .await
        .map_err(|err| eyre::eyre!("Error calling contract: {:?}", err))
        .and_then(|response| {
            T::abi_decode_returns(&response)
                .map_err(|err| eyre::eyre!("Error decoding contract response: {:?}", err))
        })
}
