use std::collections::HashMap;

use alloy::primitives::Address;
use alloy::sol;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{accept_candidate, read_json};
use crate::chain::{connect, infura_url, view_contract_call, INFURA_NETWORKS};
use crate::error::ProviderError;
use crate::provider::MetadataProvider;
use crate::types::{Metadata, MetadataCandidate, TokenInput};
use crate::uri::{decode_data_uri, UriRewriter};

sol! {
    #[derive(Debug)]
    interface IERC721Metadata {
        function tokenURI(uint256 tokenId) external view returns (string memory);
    }
}

/// Reads `tokenURI` straight from the ERC-721 contract and follows it to the
/// metadata document.
pub struct ContractProvider {
    name: &'static str,
    client: Client,
    rpc_urls: HashMap<u64, String>,
    rewriter: UriRewriter,
}

impl ContractProvider {
    pub fn new(client: Client, rpc_urls: HashMap<u64, String>, rewriter: UriRewriter) -> Self {
        Self {
            name: "rpc",
            client,
            rpc_urls,
            rewriter,
        }
    }

    /// Same lookup, routed through Infura for every network it serves.
    pub fn infura(client: Client, project_id: &str, rewriter: UriRewriter) -> Self {
        let rpc_urls = INFURA_NETWORKS
            .keys()
            .filter_map(|chain_id| infura_url(*chain_id, project_id).map(|url| (*chain_id, url)))
            .collect();

        Self {
            name: "infura",
            ..Self::new(client, rpc_urls, rewriter)
        }
    }

    async fn token_uri(&self, token: &TokenInput) -> Result<String, ProviderError> {
        let rpc_url = self
            .rpc_urls
            .get(&token.chain_id.as_u64())
            .ok_or_else(|| {
                ProviderError::not_configured(self.name, format!("no RPC URL for chain {}", token.chain_id))
            })?;

        let address: Address = token.contract_address.parse().map_err(|err| {
            ProviderError::other(format!(
                "invalid contract address {}: {}",
                token.contract_address, err
            ))
        })?;

        let provider = connect(rpc_url).map_err(|err| ProviderError::transport(self.name, err))?;

        let result = view_contract_call(
            IERC721Metadata::tokenURICall {
                tokenId: token.token_id,
            },
            &provider,
            address,
        )
        .await
        .map_err(|err| ProviderError::transport(self.name, err))?;

        Ok(result)
    }

    async fn document(&self, token_uri: &str) -> Result<TokenDocument, ProviderError> {
        if token_uri.starts_with("data:") {
            let json = decode_data_uri(token_uri).map_err(|err| ProviderError::transport(self.name, err))?;
            return serde_json::from_str(&json).map_err(|err| ProviderError::transport(self.name, err));
        }

        let url = self.rewriter.resolve(token_uri);
        tracing::debug!(token_uri, url = url.as_str(), "fetching token metadata document");
        read_json(self.name, self.client.get(url)).await
    }
}

/// The subset of the ERC-721 metadata JSON schema that matters here.
#[derive(Debug, Default, Deserialize)]
pub struct TokenDocument {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl TokenDocument {
    pub fn into_candidate(self, rewriter: &UriRewriter) -> MetadataCandidate {
        let image = self
            .image
            .filter(|s| !s.is_empty())
            .or(self.image_url)
            .filter(|s| !s.is_empty())
            .map(|uri| rewriter.resolve(&uri));

        MetadataCandidate::new(self.name, image)
    }
}

#[async_trait]
impl MetadataProvider for ContractProvider {
    async fn fetch(&self, token: &TokenInput) -> Result<Metadata, ProviderError> {
        let token_uri = self.token_uri(token).await?;
        let document = self.document(&token_uri).await?;

        accept_candidate(self.name, token, document.into_candidate(&self.rewriter))
    }

    fn provider_name(&self) -> &'static str {
        self.name
    }
}
