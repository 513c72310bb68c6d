use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{accept_candidate, read_json};
use crate::error::ProviderError;
use crate::provider::MetadataProvider;
use crate::types::{Metadata, MetadataCandidate, TokenInput};

const NAME: &str = "zora";
pub const API_ENDPOINT: &str = "https://api.zora.co/graphql";

const TOKEN_QUERY: &str = r#"query Token($token: TokenInput!, $network: NetworkInput!) {
  token(token: $token, network: $network) {
    token {
      name
      image {
        url
      }
    }
  }
}"#;

/// Only Ethereum mainnet and Goerli are indexed.
pub fn chain(chain_id: u64) -> Option<&'static str> {
    match chain_id {
        1 => Some("MAINNET"),
        5 => Some("GOERLI"),
        _ => None,
    }
}

pub struct ZoraProvider {
    client: Client,
    api_key: Option<String>,
}

impl ZoraProvider {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self {
            client,
            api_key,
        }
    }
}

#[derive(Debug, Serialize)]
struct GraphqlRequest {
    query: &'static str,
    variables: serde_json::Value,
}

pub fn token_request(token: &TokenInput, chain: &str) -> serde_json::Value {
    json!({
        "token": {
            "address": token.contract_address,
            "tokenId": token.token_id.to_string(),
        },
        "network": {
            "network": "ETHEREUM",
            "chain": chain,
        },
    })
}

#[derive(Debug, Deserialize)]
pub struct GraphqlResponse {
    #[serde(default)]
    pub data: Option<TokenData>,
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphqlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenData {
    pub token: Option<TokenWithMarketsSummary>,
}

#[derive(Debug, Deserialize)]
pub struct TokenWithMarketsSummary {
    pub token: Option<Token>,
}

#[derive(Debug, Deserialize)]
pub struct Token {
    pub name: Option<String>,
    pub image: Option<Image>,
}

#[derive(Debug, Deserialize)]
pub struct Image {
    pub url: Option<String>,
}

impl From<TokenData> for MetadataCandidate {
    fn from(data: TokenData) -> Self {
        match data.token.and_then(|t| t.token) {
            Some(token) => MetadataCandidate::new(token.name, token.image.and_then(|i| i.url)),
            None => MetadataCandidate::default(),
        }
    }
}

#[async_trait]
impl MetadataProvider for ZoraProvider {
    async fn fetch(&self, token: &TokenInput) -> Result<Metadata, ProviderError> {
        let chain = chain(token.chain_id.as_u64())
            .ok_or_else(|| ProviderError::unsupported(NAME, token.chain_id))?;

        let body = GraphqlRequest {
            query: TOKEN_QUERY,
            variables: token_request(token, chain),
        };

        let mut request = self.client.post(API_ENDPOINT).json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.header("X-API-KEY", api_key);
        }

        let resp: GraphqlResponse = read_json(NAME, request).await?;
        if let Some(err) = resp.errors.first() {
            return Err(ProviderError::transport(NAME, err.message.clone()));
        }

        let candidate = resp.data.map(MetadataCandidate::from).unwrap_or_default();
        accept_candidate(NAME, token, candidate)
    }

    fn provider_name(&self) -> &'static str {
        NAME
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use alloy::primitives::U256;

    #[test]
    fn test_parse_response() {
        let resp: GraphqlResponse = serde_json::from_str(
            r#"{"data": {"token": {"token": {"name": "Noun 1", "image": {"url": "https://img/noun1.svg"}}}}}"#,
        )
        .unwrap();

        let candidate: MetadataCandidate = resp.data.unwrap().into();
        assert_eq!(candidate.name.as_deref(), Some("Noun 1"));
        assert_eq!(candidate.image_url.as_deref(), Some("https://img/noun1.svg"));
    }

    #[test]
    fn test_parse_unknown_token() {
        let resp: GraphqlResponse =
            serde_json::from_str(r#"{"data": {"token": null}}"#).unwrap();
        let candidate: MetadataCandidate = resp.data.unwrap().into();
        assert_eq!(candidate, MetadataCandidate::default());
    }

    #[test]
    fn test_token_request() {
        let token = TokenInput::new(5, "0xabc", U256::from(12));
        let vars = token_request(&token, chain(5).unwrap());
        assert_eq!(vars["token"]["tokenId"], "12");
        assert_eq!(vars["network"]["chain"], "GOERLI");
    }

    #[tokio::test]
    async fn test_unsupported_chain() {
        let provider = ZoraProvider::new(Client::new(), None);
        let token = TokenInput::new(137, "0xabc", U256::from(1));
        let err = provider.fetch(&token).await.unwrap_err();
        assert_eq!(err.to_string(), "chain 137 not supported by zora");
    }
}
