use alloy::primitives::{Address, U256};
use metadata_rescue::types::{Metadata, TokenInput};
use rand::{Rng, RngCore};

pub trait Factory<O>
where
    Self: Sized,
    O: Default,
{
    fn build(options: O) -> Self;
    fn build_default() -> Self {
        Self::build(O::default())
    }
}

#[derive(Default)]
pub struct TokenInputOptions {
    pub chain_id: Option<u64>,
    pub contract_address: Option<Address>,
    pub token_id: Option<u64>,
}

impl Factory<TokenInputOptions> for TokenInput {
    fn build(options: TokenInputOptions) -> Self {
        let mut rng = rand::thread_rng();

        TokenInput::new(
            options.chain_id.unwrap_or(1),
            options
                .contract_address
                .unwrap_or(Address::from(rng.gen::<[u8; 20]>()))
                .to_string(),
            U256::from(options.token_id.unwrap_or(rng.next_u64())),
        )
    }
}

#[derive(Default)]
pub struct MetadataOptions {
    pub name: Option<String>,
    pub image_url: Option<String>,
}

impl Factory<MetadataOptions> for Metadata {
    fn build(options: MetadataOptions) -> Self {
        let n = rand::thread_rng().gen_range(1..10_000);

        Metadata {
            name: options.name.unwrap_or(format!("Cat #{n}")),
            image_url: options
                .image_url
                .unwrap_or(format!("https://img/{n}.png")),
        }
    }
}
