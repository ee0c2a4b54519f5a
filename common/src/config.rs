// common/src/config.rs
use dotenv::dotenv;
use log::debug;
use secrecy::SecretString;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use std::env;

use crate::error::{Error, Result};

pub const PRIVATE_KEY_VAR: &str = "PRIVATE_KEY";
pub const RPC_URL_VAR: &str = "RPC_URL";
pub const WRAP_AMOUNT_VAR: &str = "WRAP_AMOUNT_LAMPORTS";

pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";
/// 0.00001 SOL
pub const DEFAULT_WRAP_AMOUNT_LAMPORTS: u64 = 10_000;

#[derive(Debug)]
pub struct Config {
    pub rpc_url: String,
    /// Wallet secret: JSON byte array, mnemonic phrase or base58 key.
    pub private_key: SecretString,
    pub wrap_amount_lamports: u64,
}

impl Config {
    /// Build a config from any variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let private_key = get(PRIVATE_KEY_VAR).ok_or(Error::ConfigMissing(PRIVATE_KEY_VAR))?;
        let rpc_url = get(RPC_URL_VAR)
            .map(|url| url.trim().to_string())
            .unwrap_or_else(|| DEFAULT_RPC_URL.to_string());
        let wrap_amount_lamports = match get(WRAP_AMOUNT_VAR) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| Error::InvalidConfig {
                name: WRAP_AMOUNT_VAR,
                reason: e.to_string(),
            })?,
            None => DEFAULT_WRAP_AMOUNT_LAMPORTS,
        };

        Ok(Config {
            rpc_url,
            private_key: SecretString::new(private_key),
            wrap_amount_lamports,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }
}

/// Load `.env` (if present) and read the config from the process environment.
pub fn load_config() -> Result<Config> {
    dotenv().ok();
    let cfg = Config::from_env()?;
    debug!("config loaded: rpc_url={} wrap_amount={}", cfg.rpc_url, cfg.wrap_amount_lamports);
    Ok(cfg)
}

pub fn rpc_client(cfg: &Config) -> RpcClient {
    RpcClient::new_with_commitment(cfg.rpc_url.clone(), CommitmentConfig::confirmed())
}
