// demos/wrap/src/main.rs

use common::{init_logging, load_config_or_exit, wrap_flow};
use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    // load .env (PRIVATE_KEY, RPC_URL, WRAP_AMOUNT_LAMPORTS)
    let cfg = load_config_or_exit();
    wrap_flow(&cfg).await?;
    Ok(())
}
