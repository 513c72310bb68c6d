use thiserror::Error;

use crate::types::{ChainId, TokenInput};

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Why a single provider could not produce metadata. The resolver treats
/// every variant the same way: log it and move on to the next provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("chain {chain_id} not supported by {provider}")]
    Unsupported {
        provider: &'static str,
        chain_id: ChainId,
    },

    #[error("{provider} not configured: {reason}")]
    NotConfigured {
        provider: &'static str,
        reason: String,
    },

    #[error("{provider} request failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("{provider} failed to provide metadata for {token}: {}", .errors.join(", "))]
    Validation {
        provider: &'static str,
        token: String,
        errors: Vec<String>,
    },

    #[error("{0}")]
    Other(String),
}

impl ProviderError {
    pub fn unsupported(provider: &'static str, chain_id: ChainId) -> Self {
        Self::Unsupported { provider, chain_id }
    }

    pub fn not_configured(provider: &'static str, reason: impl Into<String>) -> Self {
        Self::NotConfigured {
            provider,
            reason: reason.into(),
        }
    }

    pub fn transport(provider: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Transport {
            provider,
            source: source.into(),
        }
    }

    pub fn validation(provider: &'static str, token: &TokenInput, errors: Vec<String>) -> Self {
        Self::Validation {
            provider,
            token: token.to_string(),
            errors,
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// True when the provider never attempted a lookup for this token.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. } | Self::NotConfigured { .. })
    }
}
