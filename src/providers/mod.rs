pub mod alchemy;
pub mod center;
pub mod contract;
pub mod zora;

use std::fmt;
use std::str::FromStr;

use crate::error::ProviderError;
use crate::types::{Metadata, MetadataCandidate, TokenInput};

pub use alchemy::{AlchemyApp, AlchemyProvider};
pub use center::CenterProvider;
pub use contract::ContractProvider;
pub use zora::ZoraProvider;

/// The built-in providers, as named in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderName {
    Alchemy,
    Center,
    Zora,
    Rpc,
    Infura,
}

impl ProviderName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderName::Alchemy => "alchemy",
            ProviderName::Center => "center",
            ProviderName::Zora => "zora",
            ProviderName::Rpc => "rpc",
            ProviderName::Infura => "infura",
        }
    }
}

impl fmt::Display for ProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderName {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "alchemy" => Ok(Self::Alchemy),
            "center" => Ok(Self::Center),
            "zora" => Ok(Self::Zora),
            "rpc" | "contract" => Ok(Self::Rpc),
            "infura" => Ok(Self::Infura),
            other => Err(eyre::eyre!("Unknown metadata provider: {}", other)),
        }
    }
}

/// Runs the presence check on what a provider found and logs the hit.
pub(crate) fn accept_candidate(
    provider: &'static str,
    token: &TokenInput,
    candidate: MetadataCandidate,
) -> Result<Metadata, ProviderError> {
    match candidate.into_metadata() {
        Ok(metadata) => {
            tracing::info!(
                contract_address = token.contract_address.as_str(),
                token_id = %token.token_id,
                "resolved via {}",
                provider
            );
            Ok(metadata)
        }
        Err(validation) => Err(ProviderError::validation(provider, token, validation.errors)),
    }
}

/// Shared GET/POST error handling: transport failures and non-2xx statuses
/// both become `ProviderError::Transport`.
pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(
    provider: &'static str,
    request: reqwest::RequestBuilder,
) -> Result<T, ProviderError> {
    let response = request
        .send()
        .await
        .and_then(|resp| resp.error_for_status())
        .map_err(|err| ProviderError::transport(provider, err))?;

    response
        .json::<T>()
        .await
        .map_err(|err| ProviderError::transport(provider, err))
}
