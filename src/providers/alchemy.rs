use std::collections::HashMap;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;

use super::{accept_candidate, read_json};
use crate::error::ProviderError;
use crate::provider::MetadataProvider;
use crate::types::{Metadata, MetadataCandidate, TokenInput};

const NAME: &str = "alchemy";

/// Alchemy network slugs by chain id.
pub static ALCHEMY_NETWORKS: Lazy<HashMap<u64, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (1, "eth-mainnet"),
        (5, "eth-goerli"),
        (11155111, "eth-sepolia"),
        (10, "opt-mainnet"),
        (137, "polygon-mainnet"),
        (80001, "polygon-mumbai"),
        (42161, "arb-mainnet"),
        (8453, "base-mainnet"),
    ])
});

#[derive(Debug, Clone, PartialEq)]
pub struct AlchemyApp {
    pub api_key: String,
    pub network: String,
}

/// NFT API v2 `getNFTMetadata`, one Alchemy app per chain.
pub struct AlchemyProvider {
    client: Client,
    apps: HashMap<u64, AlchemyApp>,
}

impl AlchemyProvider {
    pub fn new(client: Client, apps: HashMap<u64, AlchemyApp>) -> Self {
        Self { client, apps }
    }

    /// Uses one key for every network Alchemy serves.
    pub fn with_api_key(client: Client, api_key: &str) -> Self {
        let apps = ALCHEMY_NETWORKS
            .iter()
            .map(|(chain_id, network)| {
                (
                    *chain_id,
                    AlchemyApp {
                        api_key: api_key.to_string(),
                        network: network.to_string(),
                    },
                )
            })
            .collect();
        Self::new(client, apps)
    }

    fn app_for(&self, token: &TokenInput) -> Result<&AlchemyApp, ProviderError> {
        self.apps
            .get(&token.chain_id.as_u64())
            .filter(|app| !app.api_key.is_empty())
            .ok_or_else(|| {
                ProviderError::not_configured(NAME, format!("no app for chain {}", token.chain_id))
            })
    }
}

pub fn metadata_url(app: &AlchemyApp) -> String {
    format!(
        "https://{}.g.alchemy.com/nft/v2/{}/getNFTMetadata",
        app.network, app.api_key
    )
}

#[derive(Debug, Deserialize)]
pub struct NftMetadataResponse {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub media: Vec<Media>,
}

#[derive(Debug, Deserialize)]
pub struct Media {
    #[serde(default)]
    pub gateway: Option<String>,
}

impl From<NftMetadataResponse> for MetadataCandidate {
    fn from(resp: NftMetadataResponse) -> Self {
        MetadataCandidate::new(
            resp.title,
            resp.media.into_iter().next().and_then(|m| m.gateway),
        )
    }
}

#[async_trait]
impl MetadataProvider for AlchemyProvider {
    async fn fetch(&self, token: &TokenInput) -> Result<Metadata, ProviderError> {
        let app = self.app_for(token)?;
        let token_id = token.token_id.to_string();

        let request = self.client.get(metadata_url(app)).query(&[
            ("contractAddress", token.contract_address.as_str()),
            ("tokenId", token_id.as_str()),
            ("tokenType", "ERC721"),
        ]);

        let resp: NftMetadataResponse = read_json(NAME, request).await?;
        accept_candidate(NAME, token, resp.into())
    }

    fn provider_name(&self) -> &'static str {
        NAME
    }
}
