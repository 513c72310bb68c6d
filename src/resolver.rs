use crate::error::ProviderError;
use crate::provider::MetadataProvider;
use crate::types::{Metadata, TokenInput};

/// Outcome of asking one provider.
#[derive(Debug)]
pub struct Attempt {
    pub provider: &'static str,
    pub result: Result<(), ProviderError>,
}

/// Everything that happened while resolving one token.
#[derive(Debug)]
pub struct Resolution {
    pub metadata: Option<Metadata>,
    pub attempts: Vec<Attempt>,
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        self.metadata.is_some()
    }

    /// No provider produced metadata. This is also the result for an empty
    /// provider list.
    pub fn is_exhausted(&self) -> bool {
        self.metadata.is_none()
    }

    pub fn resolved_by(&self) -> Option<&'static str> {
        match self.attempts.last() {
            Some(Attempt {
                provider,
                result: Ok(()),
            }) => Some(*provider),
            _ => None,
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = (&'static str, &ProviderError)> {
        self.attempts
            .iter()
            .filter_map(|a| a.result.as_ref().err().map(|e| (a.provider, e)))
    }

    pub fn into_metadata(self) -> Option<Metadata> {
        self.metadata
    }

    pub fn summary(&self) -> String {
        if self.attempts.is_empty() {
            return "no providers configured".to_string();
        }

        self.attempts
            .iter()
            .map(|a| match a.result {
                Ok(()) => format!("{}: Resolved", a.provider),
                Err(ref e) => format!("{}: Error ({})", a.provider, e),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Tries `providers` in order and returns the first metadata any of them
/// produces. Failures are logged and skipped.
pub async fn find_metadata(
    providers: &[Box<dyn MetadataProvider>],
    token: &TokenInput,
) -> Option<Metadata> {
    run_providers(providers, token).await.metadata
}

async fn run_providers(providers: &[Box<dyn MetadataProvider>], token: &TokenInput) -> Resolution {
    let mut attempts = Vec::with_capacity(providers.len());

    for provider in providers {
        let name = provider.provider_name();
        match provider.fetch(token).await {
            Ok(metadata) => {
                tracing::info!(
                    provider = name,
                    chain_id = token.chain_id.as_u64(),
                    contract_address = token.contract_address.as_str(),
                    token_id = %token.token_id,
                    "resolved metadata"
                );
                attempts.push(Attempt {
                    provider: name,
                    result: Ok(()),
                });
                return Resolution {
                    metadata: Some(metadata),
                    attempts,
                };
            }
            Err(err) => {
                tracing::warn!(
                    provider = name,
                    chain_id = token.chain_id.as_u64(),
                    contract_address = token.contract_address.as_str(),
                    token_id = %token.token_id,
                    error = err.to_string(),
                    "provider failed, trying next"
                );
                attempts.push(Attempt {
                    provider: name,
                    result: Err(err),
                });
            }
        }
    }

    tracing::warn!(
        chain_id = token.chain_id.as_u64(),
        contract_address = token.contract_address.as_str(),
        token_id = %token.token_id,
        tried = attempts.len(),
        "no provider returned metadata"
    );

    Resolution {
        metadata: None,
        attempts,
    }
}

/// Ordered list of providers; earlier entries take priority.
#[derive(Default)]
pub struct MetadataResolver {
    providers: Vec<Box<dyn MetadataProvider>>,
}

impl MetadataResolver {
    pub fn new() -> Self {
        MetadataResolver { providers: vec![] }
    }

    pub fn add_provider(&mut self, provider: Box<dyn MetadataProvider>) {
        self.providers.push(provider);
    }

    pub fn with_provider(mut self, provider: Box<dyn MetadataProvider>) -> Self {
        self.add_provider(provider);
        self
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.provider_name()).collect()
    }

    pub async fn resolve(&self, token: &TokenInput) -> Option<Metadata> {
        find_metadata(&self.providers, token).await
    }

    pub async fn resolve_with_report(&self, token: &TokenInput) -> Resolution {
        run_providers(&self.providers, token).await
    }
}

impl FromIterator<Box<dyn MetadataProvider>> for MetadataResolver {
    fn from_iter<I: IntoIterator<Item = Box<dyn MetadataProvider>>>(iter: I) -> Self {
        MetadataResolver {
            providers: iter.into_iter().collect(),
        }
    }
}
