use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{accept_candidate, read_json};
use crate::error::ProviderError;
use crate::provider::MetadataProvider;
use crate::types::{Metadata, MetadataCandidate, TokenInput};

const NAME: &str = "center";
const API_BASE: &str = "https://api.center.dev/v1";

pub fn network(chain_id: u64) -> Option<&'static str> {
    match chain_id {
        1 => Some("ethereum-mainnet"),
        137 => Some("polygon-mainnet"),
        _ => None,
    }
}

pub struct CenterProvider {
    client: Client,
    api_key: String,
}

impl CenterProvider {
    pub fn new(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AssetResponse {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub metadata: Option<AssetMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct AssetMetadata {
    #[serde(default)]
    pub image: Option<String>,
}

impl From<AssetResponse> for MetadataCandidate {
    fn from(resp: AssetResponse) -> Self {
        MetadataCandidate::new(resp.name, resp.metadata.and_then(|m| m.image))
    }
}

#[async_trait]
impl MetadataProvider for CenterProvider {
    async fn fetch(&self, token: &TokenInput) -> Result<Metadata, ProviderError> {
        let network = network(token.chain_id.as_u64())
            .ok_or_else(|| ProviderError::unsupported(NAME, token.chain_id))?;

        let url = format!(
            "{API_BASE}/{network}/{}/{}",
            token.contract_address, token.token_id
        );
        let request = self.client.get(url).header("X-API-Key", &self.api_key);

        let resp: AssetResponse = read_json(NAME, request).await?;
        accept_candidate(NAME, token, resp.into())
    }

    fn provider_name(&self) -> &'static str {
        NAME
    }
}
