use std::collections::HashMap;
use std::env;
use std::time::Duration;

use envconfig::Envconfig;
use reqwest::Client;

use crate::chain::DEFAULT_RPC_URLS;
use crate::providers::{AlchemyProvider, CenterProvider, ContractProvider, ProviderName, ZoraProvider};
use crate::resolver::MetadataResolver;
use crate::uri::{UriRewriter, DEFAULT_IPFS_GATEWAY};

#[derive(Envconfig, Debug, Clone)]
pub struct Config {
    // Comma separated, in priority order
    #[envconfig(from = "METADATA_PROVIDERS", default = "zora,alchemy,center,rpc")]
    pub providers: String,

    #[envconfig(from = "IPFS_GATEWAY", default = "https://ipfs.io/ipfs/")]
    pub ipfs_gateway: String,

    #[envconfig(from = "ALCHEMY_API_KEY")]
    pub alchemy_api_key: Option<String>,

    #[envconfig(from = "CENTER_API_KEY")]
    pub center_api_key: Option<String>,

    #[envconfig(from = "ZORA_API_KEY")]
    pub zora_api_key: Option<String>,

    #[envconfig(from = "INFURA_API_KEY")]
    pub infura_api_key: Option<String>,

    #[envconfig(from = "REQUEST_TIMEOUT_SECS", default = "10")]
    pub request_timeout_secs: u64,
    // Dynamic configuration: RPC urls take the form of CHAIN_<chain_id>_RPC_HTTP
    // If not provided in the environment, the default is to use the public node
}

impl Config {
    pub fn test_default() -> Self {
        Config {
            providers: "zora,alchemy,center,rpc".to_string(),
            ipfs_gateway: DEFAULT_IPFS_GATEWAY.to_string(),
            alchemy_api_key: None,
            center_api_key: None,
            zora_api_key: None,
            infura_api_key: None,
            request_timeout_secs: 10,
        }
    }
}

impl Config {
    pub fn provider_names(&self) -> eyre::Result<Vec<ProviderName>> {
        self.providers
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.parse())
            .collect()
    }

    pub fn rpc_url(&self, chain_id: u64) -> eyre::Result<String> {
        match env::var(format!("CHAIN_{}_RPC_HTTP", chain_id)) {
            Ok(url) => Ok(url),
            Err(_) => match DEFAULT_RPC_URLS.get(&chain_id) {
                Some(url) => Ok(url.to_string()),
                None => Err(eyre::eyre!("No default RPC URL for chain {}", chain_id)),
            },
        }
    }

    /// Every chain with a known or configured RPC URL.
    pub fn rpc_urls(&self) -> HashMap<u64, String> {
        let mut urls: HashMap<u64, String> = DEFAULT_RPC_URLS
            .iter()
            .map(|(chain_id, url)| (*chain_id, url.to_string()))
            .collect();

        for (key, value) in env::vars() {
            if let Some(chain_id) = parse_rpc_var(&key) {
                urls.insert(chain_id, value);
            }
        }

        urls
    }

    pub fn uri_rewriter(&self) -> UriRewriter {
        UriRewriter::gateway(self.ipfs_gateway.clone())
    }

    pub fn http_client(&self) -> eyre::Result<Client> {
        let client = Client::builder()
            .timeout(Duration::from_secs(self.request_timeout_secs))
            .build()?;
        Ok(client)
    }

    /// Builds the provider chain in configured order. Providers that need a
    /// key which isn't set are left out.
    pub fn build_resolver(&self) -> eyre::Result<MetadataResolver> {
        let client = self.http_client()?;
        let mut resolver = MetadataResolver::new();

        for name in self.provider_names()? {
            match name {
                ProviderName::Alchemy => match non_empty(&self.alchemy_api_key) {
                    Some(key) => resolver.add_provider(Box::new(AlchemyProvider::with_api_key(
                        client.clone(),
                        key,
                    ))),
                    None => skip(name, "ALCHEMY_API_KEY"),
                },
                ProviderName::Center => match non_empty(&self.center_api_key) {
                    Some(key) => {
                        resolver.add_provider(Box::new(CenterProvider::new(client.clone(), key)))
                    }
                    None => skip(name, "CENTER_API_KEY"),
                },
                ProviderName::Zora => resolver.add_provider(Box::new(ZoraProvider::new(
                    client.clone(),
                    non_empty(&self.zora_api_key).map(str::to_string),
                ))),
                ProviderName::Infura => match non_empty(&self.infura_api_key) {
                    Some(key) => resolver.add_provider(Box::new(ContractProvider::infura(
                        client.clone(),
                        key,
                        self.uri_rewriter(),
                    ))),
                    None => skip(name, "INFURA_API_KEY"),
                },
                ProviderName::Rpc => resolver.add_provider(Box::new(ContractProvider::new(
                    client.clone(),
                    self.rpc_urls(),
                    self.uri_rewriter(),
                ))),
            }
        }

        tracing::info!(
            providers = resolver.provider_names().join(","),
            "metadata providers configured"
        );

        Ok(resolver)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn skip(name: ProviderName, var: &str) {
    tracing::warn!(provider = name.as_str(), "{} not set, skipping provider", var);
}

fn parse_rpc_var(key: &str) -> Option<u64> {
    key.strip_prefix("CHAIN_")?
        .strip_suffix("_RPC_HTTP")?
        .parse()
        .ok()
}

pub fn init() -> eyre::Result<Config> {
    let config = Config::init_from_env()?;
    config.provider_names()?;
    Ok(config)
}
