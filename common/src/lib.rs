// common/src/lib.rs
use anyhow::Result;
use log::{error, info};
use secrecy::ExposeSecret;
use solana_sdk::signature::{Keypair, Signature, Signer};

pub mod config;
pub mod error;
pub mod ledger;
pub mod wallet;
pub mod wsol;

pub use config::{load_config, rpc_client, Config};
pub use error::{Error, TransactionError};
pub use ledger::Ledger;
pub use wallet::{load_wallet, SecretMaterial};
pub use wsol::WsolRunner;

// ─────────────────── Setup ───────────────────

/// `info` unless overridden by `RUST_LOG`.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

/// Load `.env` + environment; log and exit(1) if anything required is missing.
pub fn load_config_or_exit() -> Config {
    match load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    }
}

/// Load the signing keypair from `PRIVATE_KEY`
pub fn keypair(cfg: &Config) -> Result<Keypair> {
    Ok(load_wallet(cfg.private_key.expose_secret())?)
}

// ─────────────────── wSOL Flows ───────────────────

/// Wrap `cfg.wrap_amount_lamports`, wait for confirmation, then unwrap everything.
pub async fn wrap_unwrap_flow(cfg: &Config) -> Result<(Signature, Signature)> {
    let rpc = rpc_client(cfg);
    let kp = keypair(cfg)?;
    info!("wallet {} on {}", kp.pubkey(), cfg.rpc_url);

    run_wrap_unwrap(&rpc, &kp, cfg.wrap_amount_lamports).await
}

pub async fn wrap_flow(cfg: &Config) -> Result<Signature> {
    let rpc = rpc_client(cfg);
    let kp = keypair(cfg)?;
    info!("wallet {} on {}", kp.pubkey(), cfg.rpc_url);

    Ok(WsolRunner::new(&rpc, &kp).wrap(cfg.wrap_amount_lamports).await?)
}

pub async fn unwrap_flow(cfg: &Config) -> Result<Signature> {
    let rpc = rpc_client(cfg);
    let kp = keypair(cfg)?;
    info!("wallet {} on {}", kp.pubkey(), cfg.rpc_url);

    Ok(WsolRunner::new(&rpc, &kp).unwrap().await?)
}

/// Unwrap only starts once the wrap transaction is confirmed.
pub async fn run_wrap_unwrap<L, S>(ledger: &L, signer: &S, amount: u64) -> Result<(Signature, Signature)>
where
    L: Ledger + ?Sized,
    S: Signer,
{
    let runner = WsolRunner::new(ledger, signer);
    let wrapped = runner.wrap(amount).await?;
    let unwrapped = runner.unwrap().await?;
    Ok((wrapped, unwrapped))
}
