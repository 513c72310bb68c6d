pub mod chain;
pub mod config;
pub mod error;
pub mod provider;
pub mod providers;
pub mod resolver;
pub mod types;
pub mod uri;
pub mod validation;

pub use error::ProviderError;
pub use provider::{FnProvider, MetadataProvider};
pub use resolver::{find_metadata, MetadataResolver, Resolution};
pub use types::{ChainId, Metadata, MetadataCandidate, TokenInput};
pub use validation::{validate_metadata, Validation};
