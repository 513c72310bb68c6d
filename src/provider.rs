use async_trait::async_trait;

use crate::error::ProviderError;
use crate::types::{Metadata, TokenInput};

/// A single source of token metadata (vendor API, contract read, ...).
///
/// Implementations are expected to run the presence check from
/// [`crate::validation::validate_metadata`] before returning `Ok`.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn fetch(&self, token: &TokenInput) -> Result<Metadata, ProviderError>;
    fn provider_name(&self) -> &'static str;
}

/// Adapts a plain async function into a [`MetadataProvider`].
pub struct FnProvider<T>(pub &'static str, pub T);

#[async_trait]
impl<T, Fut> MetadataProvider for FnProvider<T>
where
    T: Fn(TokenInput) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = Result<Metadata, ProviderError>> + Send,
{
    async fn fetch(&self, token: &TokenInput) -> Result<Metadata, ProviderError> {
        self.1(token.clone()).await
    }

    fn provider_name(&self) -> &'static str {
        self.0
    }
}

#[async_trait]
impl<P: MetadataProvider + ?Sized> MetadataProvider for std::sync::Arc<P> {
    async fn fetch(&self, token: &TokenInput) -> Result<Metadata, ProviderError> {
        (**self).fetch(token).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }
}

#[macro_export]
macro_rules! provider {
    ($fn:tt) => {
        std::boxed::Box::new($crate::provider::FnProvider(stringify!($fn), $fn))
    };
}
